//! Command-line front end for the computer club simulator
//!
//! Reads an input log, validates it as a whole, runs the day and prints the
//! resulting records. On invalid input only the offending line is printed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use computer_club_core::{report, run_day, validate_log};
use tracing::{debug, error, info, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One record per line
    Text,
    /// A single JSON document
    Json,
}

/// Simulate one day of a computer club from an event log
#[derive(Parser, Debug)]
#[command(name = "computer-club", version, about, long_about = None)]
struct Args {
    /// Input log: header (tables, hours, price) followed by events
    input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log engine decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let text = std::fs::read_to_string(&args.input)
        .inspect_err(|e| error!("cannot read {}: {}", args.input.display(), e))
        .with_context(|| format!("failed to read input file {}", args.input.display()))?;

    let outcome = run(&text, args.format)?;
    print!("{}", outcome.stdout());

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// What a run writes to stdout
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// The rendered day
    Report(String),
    /// The first offending input line
    Invalid(String),
}

impl Outcome {
    fn stdout(&self) -> String {
        match self {
            Outcome::Report(text) => text.clone(),
            Outcome::Invalid(line) => format!("{}\n", line),
        }
    }

    fn is_success(&self) -> bool {
        matches!(self, Outcome::Report(_))
    }
}

/// Validate the whole log, then simulate the day and render it
fn run(text: &str, format: Format) -> Result<Outcome> {
    let log = match validate_log(text) {
        Ok(log) => log,
        Err(e) => {
            debug!("validation failed: {}", e);
            return Ok(Outcome::Invalid(e.line().to_string()));
        }
    };

    info!(events = log.events.len(), "input validated");
    let day = run_day(log.config, log.events).context("simulation failed")?;

    let rendered = match format {
        Format::Text => report::render_text(&day),
        Format::Json => {
            let json = report::render_json(&day).context("failed to serialize report")?;
            format!("{}\n", json)
        }
    };
    Ok(Outcome::Report(rendered))
}
