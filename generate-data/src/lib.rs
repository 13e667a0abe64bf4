pub mod frequencies;
pub mod wiki_dump;
