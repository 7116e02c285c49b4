//! # Check Subcommand
//!
//! ```bash
//! mrl check --crop mango --substance Azoxystrobin --market EU --residue 2.0
//! mrl --json check --crop mango --substance Chlorpyrifos
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use mrl_engine::{Assessment, ComplianceQuery};

use crate::output;
use crate::session::Session;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Crop name (case-insensitive).
    #[arg(long)]
    pub crop: String,

    /// Active substance name (case-insensitive).
    #[arg(long)]
    pub substance: String,

    /// Target market: EU or Codex.
    #[arg(long, default_value = "EU")]
    pub market: String,

    /// Measured residue in mg/kg. Omit for an approval-only check.
    #[arg(long)]
    pub residue: Option<f64>,

    /// Do not look up alternatives for a failing substance.
    #[arg(long)]
    pub no_alternatives: bool,

    /// Evaluation date for expiry notices (YYYY-MM-DD, default: today).
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Execute the check subcommand.
pub async fn run_check(args: &CheckArgs, session: &Session) -> Result<u8> {
    let as_of = args.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let query = ComplianceQuery::parse(
        &args.crop,
        &args.substance,
        &args.market,
        args.residue,
        as_of,
    )?;

    let assessment = if args.no_alternatives {
        Assessment {
            verdict: session.checker.evaluate(&query).await?,
            alternatives: None,
        }
    } else {
        session.checker.assess(&query).await?
    };

    if session.json {
        output::print_json(&assessment)?;
    } else {
        print!("{}", output::verdict_summary(&assessment.verdict));
        if let Some(alternatives) = &assessment.alternatives {
            println!();
            println!("Alternatives for {} on {}:", query.substance, query.crop);
            print!("{}", output::alternatives_table(alternatives));
        }
    }

    Ok(output::exit_code([&assessment.verdict]))
}
