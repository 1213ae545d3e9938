//! `iengine`: propositional entailment from the command line.
//!
//! ```text
//! iengine problem.txt TT
//! iengine problem.txt FC --format json
//! ```
//!
//! Prints `YES: ...` or `NO` on stdout. Input, parse and engine errors go
//! to stderr with exit code 1; usage errors exit with 2.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use entail_engine::{Engine, Method};
use tracing_subscriber::EnvFilter;

mod settings;

const LOG_ENV: &str = "IENGINE_LOG";

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// `YES: ...` / `NO`
    Text,
    /// One JSON object per run
    Json,
}

/// Check whether a TELL/ASK knowledge base entails its query.
#[derive(Parser, Debug)]
#[command(name = "iengine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Problem file with a TELL section and an ASK section
    file: PathBuf,

    /// Inference method: TT, FC or BC (case-insensitive)
    method: String,

    /// JSON engine configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Refuse truth tables with more models than this
    #[arg(long, value_name = "N")]
    max_models: Option<u64>,

    /// Abort truth-table enumeration after this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let method: Method = cli.method.parse()?;
    let config = settings::load(
        cli.config.as_deref(),
        settings::Overrides {
            max_models: cli.max_models,
            timeout_ms: cli.timeout_ms,
        },
    )?;

    let text = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    tracing::info!(file = %cli.file.display(), %method, "solving");

    let verdict = Engine::new(config).ask_text(&text, method)?;

    match cli.format {
        OutputFormat::Text => println!("{verdict}"),
        OutputFormat::Json => println!("{}", serde_json::to_string(&verdict)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}
