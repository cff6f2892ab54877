//! # gapwise CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gapwise_cli::assess::{run_assess, AssessArgs};
use gapwise_cli::catalog::{run_catalog, CatalogArgs};
use gapwise_cli::score::{run_score, ScoreArgs};
use gapwise_cli::submit::{run_submit, SubmitArgs};

/// Compliance gap assessment against a control framework.
///
/// Inspects and validates control catalogs, scores control risk, runs
/// assessments from answers files and submits results to the gapwise
/// service.
#[derive(Parser, Debug)]
#[command(name = "gapwise", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or validate a control catalog.
    Catalog(CatalogArgs),

    /// Score one control judgement.
    Score(ScoreArgs),

    /// Run an assessment from an answers file.
    Assess(AssessArgs),

    /// Submit a saved report to the gapwise service.
    Submit(SubmitArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Catalog(args) => run_catalog(&args),
        Commands::Score(args) => run_score(&args),
        Commands::Assess(args) => run_assess(&args),
        Commands::Submit(args) => run_submit(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
