use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use generate_data::{frequencies, wiki_dump};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Build an Arabic vocabulary database from a Wikipedia dump",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a bzip2 Wikipedia dump into one line of plain text per article
    Extract {
        #[arg(long, default_value = "arwiki-latest-pages-articles.xml.bz2")]
        dump: PathBuf,
        #[arg(long, default_value = "wiki_arabic_text.txt")]
        output: PathBuf,
    },
    /// Count word frequencies in plain text and save the most common words
    Frequencies {
        #[arg(long, default_value = "wiki_arabic_text.txt")]
        input: PathBuf,
        #[arg(long, default_value = "voc_database.csv")]
        output: PathBuf,
        /// Number of words to keep
        #[arg(short = 'n', long, default_value_t = 5000)]
        limit: usize,
    },
    /// Run extract followed by frequencies
    All {
        #[arg(long, default_value = "arwiki-latest-pages-articles.xml.bz2")]
        dump: PathBuf,
        #[arg(long, default_value = "wiki_arabic_text.txt")]
        text: PathBuf,
        #[arg(long, default_value = "voc_database.csv")]
        output: PathBuf,
        #[arg(short = 'n', long, default_value_t = 5000)]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    match args.command {
        Command::Extract { dump, output } => {
            wiki_dump::extract_dump(&dump, &output)?;
        }
        Command::Frequencies {
            input,
            output,
            limit,
        } => {
            let entries = frequencies::compute_frequencies_file(&input)?;
            frequencies::write_vocab_database_file(&entries, limit, &output)?;
        }
        Command::All {
            dump,
            text,
            output,
            limit,
        } => {
            wiki_dump::extract_dump(&dump, &text)?;
            let entries = frequencies::compute_frequencies_file(&text)?;
            frequencies::write_vocab_database_file(&entries, limit, &output)?;
        }
    }

    println!("Total time: {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
