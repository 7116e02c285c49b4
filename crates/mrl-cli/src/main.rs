//! # mrl CLI entry point
//!
//! Parses command-line arguments, opens the record store, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mrl_cli::alternatives::{run_alternatives, AlternativesArgs};
use mrl_cli::batch::{run_batch, BatchArgs};
use mrl_cli::check::{run_check, CheckArgs};
use mrl_cli::session::Session;
use mrl_cli::substances::{run_substances, SubstancesArgs};

/// MRL compliance checker.
///
/// Checks pesticide residues against EU and Codex maximum residue limits
/// and recommends alternative substances when a check fails.
#[derive(Parser, Debug)]
#[command(name = "mrl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load records from a YAML or JSON fixture instead of PostgREST.
    #[arg(long, env = "MRL_FIXTURE", global = true)]
    fixture: Option<PathBuf>,

    /// Print JSON instead of a human-readable summary.
    #[arg(long, global = true)]
    json: bool,

    /// Warning band as a fraction of the MRL, in (0, 1].
    #[arg(long, global = true)]
    warning_ratio: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one substance on one crop for one market.
    Check(CheckArgs),

    /// Check several substances on one crop.
    Batch(BatchArgs),

    /// Rank substitute substances for a failing one.
    Alternatives(AlternativesArgs),

    /// List every published record for a crop.
    Substances(SubstancesArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise verbosity picks the level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let session = match Session::open(cli.fixture.as_deref(), cli.warning_ratio, cli.json) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match &cli.command {
        Commands::Check(args) => run_check(args, &session).await,
        Commands::Batch(args) => run_batch(args, &session).await,
        Commands::Alternatives(args) => run_alternatives(args, &session).await,
        Commands::Substances(args) => run_substances(args, &session).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
