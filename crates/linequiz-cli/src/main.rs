use clap::Parser;
use linequiz_core::{ClockSeed, FixedSeed, LineCount, QuizConfig, Sampler};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod session;

use session::Session;

#[derive(Parser, Debug)]
#[command(name = "linequiz")]
#[command(version, about = "Guess which file a random line of code came from", long_about = None)]
struct Cli {
    /// Directory to scan for files
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Lines of context shown around the line before the reveal
    #[arg(short, long, value_name = "N", default_value_t = 1, value_parser = parse_radius, allow_negative_numbers = true)]
    context: usize,

    /// Lines of context shown around the line after the reveal
    #[arg(short, long, value_name = "N", default_value_t = 10, value_parser = parse_radius, allow_negative_numbers = true)]
    reveal: usize,

    /// Print eligible file and line totals instead of playing
    #[arg(short = 'l', long)]
    linecount: bool,

    /// Play a single round and exit
    #[arg(long)]
    once: bool,

    /// Don't color the output
    #[arg(long)]
    no_color: bool,

    /// Fixed random seed, for replaying a session
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> QuizConfig {
        QuizConfig {
            root: self.root,
            context_radius: self.context,
            reveal_radius: self.reveal,
            line_count_only: self.linecount,
            run_once: self.once,
            color: !self.no_color,
            seed: self.seed,
        }
    }
}

fn parse_radius(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| "expected a non-negative integer".to_string())
}

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config();

    // Logs go to stderr so they never end up in the middle of a quiz
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linequiz=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(config.color),
        )
        .init();

    tracing::debug!("Starting with {:?}", config);

    let files = linequiz_core::enumerate(&config.root)?;

    if config.line_count_only {
        println!("{}", LineCount::tally(&files));
        return Ok(());
    }

    let input = io::stdin().lock();
    let out = io::stdout().lock();
    let err = io::stderr();

    match config.seed {
        Some(seed) => Session::new(
            &config,
            &files,
            Sampler::new(FixedSeed::new(seed)),
            input,
            out,
            err,
        )
        .run(),
        None => Session::new(
            &config,
            &files,
            Sampler::new(ClockSeed::new()),
            input,
            out,
            err,
        )
        .run(),
    }
}
