use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use language_utils::Language;
use quiz_scheduler::{Scheduler, SchedulerConfig};
use vocab_quiz::dataset;
use vocab_quiz::grading::{GradingChain, OllamaGrader};
use vocab_quiz::shell::{self, Console};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Adaptive Arabic vocabulary quiz",
    long_about = None
)]
struct Args {
    /// Vocabulary database produced by generate-data
    #[arg(long, env = "VOCAB_MASTER_DB", default_value = "voc_database.csv")]
    master_db: PathBuf,

    /// Words to practice, with columns arabic_word,translation
    #[arg(long, env = "VOCAB_EXAM_LIST", default_value = "exam_list.csv")]
    exam_list: PathBuf,

    /// Language answers are written in (eng or zho)
    #[arg(long, env = "VOCAB_NATIVE_LANGUAGE", default_value = "eng")]
    native_language: Language,

    /// Correct answers needed to master a word
    #[arg(
        long,
        env = "VOCAB_WIN_CONDITION",
        default_value_t = SchedulerConfig::DEFAULT_WIN_CONDITION
    )]
    win_condition: u32,

    #[arg(
        long,
        env = "VOCAB_DECAY_DIVISOR",
        default_value_t = SchedulerConfig::DEFAULT_DECAY_DIVISOR
    )]
    decay_divisor: f64,

    #[arg(
        long,
        env = "VOCAB_GROWTH_MULTIPLIER",
        default_value_t = SchedulerConfig::DEFAULT_GROWTH_MULTIPLIER
    )]
    growth_multiplier: f64,

    #[arg(
        long,
        env = "VOCAB_WEIGHT_FLOOR",
        default_value_t = SchedulerConfig::DEFAULT_WEIGHT_FLOOR
    )]
    weight_floor: f64,

    #[arg(
        long,
        env = "OLLAMA_MODEL",
        default_value = OllamaGrader::DEFAULT_MODEL
    )]
    model: String,

    #[arg(
        long,
        env = "OLLAMA_API_ENDPOINT",
        default_value = OllamaGrader::DEFAULT_ENDPOINT
    )]
    ollama_endpoint: String,

    /// Seconds to wait for the model before falling back to manual grading
    #[arg(long, env = "VOCAB_GRADING_TIMEOUT", default_value_t = 60)]
    grading_timeout_secs: u64,

    /// Skip the model and always judge answers yourself
    #[arg(long)]
    manual: bool,

    /// Seed for a reproducible word order
    #[arg(long, env = "VOCAB_SEED")]
    seed: Option<u64>,

    /// Do not clear the terminal between words
    #[arg(long)]
    no_clear: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    if args.native_language == Language::Arabic {
        anyhow::bail!("Answers must be written in English or Chinese");
    }

    let config = SchedulerConfig {
        win_condition: args.win_condition,
        decay_divisor: args.decay_divisor,
        growth_multiplier: args.growth_multiplier,
        weight_floor: args.weight_floor,
    };

    let entities =
        dataset::load_quiz_dataset(&args.master_db, &args.exam_list, args.native_language)?;
    let mut scheduler = match args.seed {
        Some(seed) => Scheduler::seeded(entities, config, seed),
        None => Scheduler::new(entities, config),
    }
    .context("Failed to start the quiz")?;

    let grader = if args.manual {
        None
    } else {
        log::info!("Grading with {} at {}", args.model, args.ollama_endpoint);
        Some(OllamaGrader::new(
            args.ollama_endpoint,
            args.model,
            Duration::from_secs(args.grading_timeout_secs),
        )?)
    };
    let grading = GradingChain::new(grader, args.native_language);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout(), !args.no_clear);
    let summary = shell::run_session(&mut scheduler, &grading, &mut console).await?;

    if !summary.completed {
        println!(
            "\nSession ended after {} answers. Progress: {} words mastered",
            summary.rounds, summary.progress
        );
    }
    Ok(())
}
