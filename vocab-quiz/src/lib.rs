pub mod dataset;
pub mod grading;
pub mod shell;
