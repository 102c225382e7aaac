pub mod args;
pub mod clients;
pub mod config;
pub mod content;
pub mod env;
pub mod execution;
pub mod files;
pub mod output;
pub mod process;
pub mod report;
pub mod runner;
pub mod verdict;

use std::{
  io::{self, Read},
  path::PathBuf,
  time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, builder::styling};
use clap_verbosity_flag::Verbosity;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

use crate::{
  clients::{RealContentFetcher, RealProcessExecutor},
  runner::Runner,
};

fn styles() -> styling::Styles {
  styling::Styles::styled()
    .header(styling::AnsiColor::Yellow.on_default() | styling::Effects::BOLD)
    .usage(styling::AnsiColor::Yellow.on_default() | styling::Effects::BOLD)
    .literal(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))))
}

#[derive(Parser, Debug)]
#[command(author, about, version)]
#[command(propagate_version = true, styles = styles())]
pub struct Cli {
  #[command(subcommand)]
  pub commands: Commands,

  #[clap(flatten)]
  pub verbose: Verbosity,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  #[command(arg_required_else_help = true)]
  Run(Run),
  #[command(arg_required_else_help = true)]
  Translate(Translate),
}

/// Run kubepug for an execution request and report the verdict
#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Run {
  /// Execution request (JSON or YAML) describing the content, arguments and variables
  #[arg(short, long)]
  pub execution: PathBuf,

  #[arg(short, long, value_enum, default_value_t)]
  pub format: output::Format,

  /// Write to file instead of stdout
  #[arg(short, long)]
  pub output: Option<String>,

  /// Path to configuration file (default: .kubepug-executor.yaml in the current directory)
  #[arg(long)]
  pub config: Option<String>,
}

/// Translate previously captured kubepug JSON output into an execution report
#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Translate {
  /// File containing the kubepug output, `-` reads from stdin
  #[arg(short, long)]
  pub input: String,

  #[arg(short, long, value_enum, default_value_t)]
  pub format: output::Format,

  /// Write to file instead of stdout
  #[arg(short, long)]
  pub output: Option<String>,
}

/// Spinner shown while the scan runs
///
/// Hidden once logging goes beyond errors since log lines share stderr with it
fn spinner(verbose: &Verbosity) -> ProgressBar {
  if verbose.log_level_filter().as_trace() > LevelFilter::ERROR {
    return ProgressBar::hidden();
  }

  let spinner = ProgressBar::new_spinner();
  spinner.enable_steady_tick(Duration::from_millis(120));
  spinner
}

/// Execute the full pipeline against the real content fetcher and scanner
pub async fn run(args: &Run, verbose: &Verbosity) -> Result<()> {
  let config = config::load(args.config.as_deref())?;
  let execution = execution::load(&args.execution)?;

  let fetcher = RealContentFetcher::new()?;
  let executor = RealProcessExecutor::new(&config.scanner);
  let runner = Runner::new(fetcher, executor, &config);

  let spinner = spinner(verbose);
  spinner.set_message(format!("Running {}", config.scanner.binary));
  let result = runner.run(&execution).await;
  spinner.finish_and_clear();

  let report = result?;
  output::output(&report, &args.format, &args.output)?;

  Ok(())
}

/// Parse captured kubepug output and render the resulting report
pub fn translate(args: &Translate) -> Result<()> {
  let raw = if args.input == "-" {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("Failed to read kubepug output from stdin")?;
    buf
  } else {
    std::fs::read_to_string(&args.input).with_context(|| format!("Failed to read kubepug output: {}", args.input))?
  };

  let scan = report::parse(&raw).context("could not unmarshal kubepug execution result")?;
  let report = verdict::build_report(&scan, &raw);
  output::output(&report, &args.format, &args.output)?;

  Ok(())
}
