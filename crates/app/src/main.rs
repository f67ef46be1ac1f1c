use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lesson_core::model::{LessonId, SessionSettings};
use services::{Clock, InMemoryQuestionBank, JsonQuestionBank, LessonRunner, QuestionBank};
use tracing::debug;

mod demo;
mod terminal;

#[derive(Parser)]
#[command(name = "lesson", about = "Run multiple-choice lessons in the terminal")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the lessons in the bank
    List(BankArgs),
    /// Take a lesson
    Run(RunArgs),
}

#[derive(Args)]
struct BankArgs {
    /// Lesson file or directory of `.json` lesson files. Uses the built-in
    /// demo lesson when omitted.
    #[arg(long, env = "LESSON_PATH")]
    lessons: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    /// Lesson to take
    #[arg(default_value = demo::DEMO_LESSON_ID)]
    lesson_id: LessonId,

    #[command(flatten)]
    bank: BankArgs,

    /// Shuffle question order
    #[arg(long)]
    shuffle: bool,

    /// Seed for a reproducible shuffle
    #[arg(long, requires = "shuffle")]
    seed: Option<u64>,

    /// Hearts at the start of the lesson
    #[arg(long, env = "LESSON_HEARTS", default_value_t = SessionSettings::DEFAULT_STARTING_HEARTS)]
    hearts: u32,
}

fn load_bank(args: &BankArgs) -> Result<Arc<dyn QuestionBank>> {
    match &args.lessons {
        Some(path) => {
            let bank = JsonQuestionBank::load(path)
                .with_context(|| format!("loading lessons from {}", path.display()))?;
            Ok(Arc::new(bank))
        }
        None => {
            debug!("no lesson path given, using built-in demo lesson");
            let bank = InMemoryQuestionBank::from_lessons([demo::net_force_basics()?])?;
            Ok(Arc::new(bank))
        }
    }
}

fn list(args: &BankArgs) -> Result<()> {
    let bank = load_bank(args)?;
    terminal::render_listing(&bank.lessons(), &mut io::stdout().lock())?;
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let settings = SessionSettings::with_starting_hearts(args.hearts)?;
    let mut runner = LessonRunner::new(Clock::default(), load_bank(&args.bank)?)
        .with_settings(settings)
        .with_shuffle(args.shuffle);
    if let Some(seed) = args.seed {
        runner = runner.with_seed(seed);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    terminal::run_lesson(&runner, &args.lesson_id, stdin.lock(), &mut stdout)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::List(args) => list(&args),
        Commands::Run(args) => run(args),
    }
}
