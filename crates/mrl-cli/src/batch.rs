//! # Batch Subcommand
//!
//! Checks several substances on one crop. Each `--item` is a substance
//! name, optionally followed by `=residue`:
//!
//! ```bash
//! mrl batch --crop mango --market EU --item Azoxystrobin=0.5 --item Spinosad
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use mrl_engine::{BatchItem, ComplianceVerdict};

use crate::output;
use crate::session::Session;

/// Arguments for the batch subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Crop name (case-insensitive).
    #[arg(long)]
    pub crop: String,

    /// Target market: EU or Codex.
    #[arg(long, default_value = "EU")]
    pub market: String,

    /// Substance to check, as `NAME` or `NAME=RESIDUE`. Repeatable.
    #[arg(long = "item", required = true, value_parser = parse_item)]
    pub items: Vec<BatchItem>,

    /// Evaluation date for expiry notices (YYYY-MM-DD, default: today).
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Serialize)]
struct BatchReport<'a> {
    count: usize,
    verdicts: &'a [ComplianceVerdict],
}

/// Parse `NAME` or `NAME=RESIDUE`. The split is on the last `=`.
pub fn parse_item(raw: &str) -> Result<BatchItem, String> {
    match raw.rsplit_once('=') {
        Some((name, residue)) => {
            let residue: f64 = residue
                .trim()
                .parse()
                .map_err(|_| format!("invalid residue in '{raw}': expected a number in mg/kg"))?;
            Ok(BatchItem::new(name.trim(), Some(residue)))
        }
        None => Ok(BatchItem::new(raw.trim(), None)),
    }
}

/// Execute the batch subcommand.
pub async fn run_batch(args: &BatchArgs, session: &Session) -> Result<u8> {
    let as_of = args.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let verdicts = session
        .checker
        .check_batch_on(&args.crop, &args.market, &args.items, as_of)
        .await?;

    if session.json {
        output::print_json(&BatchReport {
            count: verdicts.len(),
            verdicts: &verdicts,
        })?;
    } else {
        print!("{}", output::batch_table(&verdicts));
    }

    Ok(output::exit_code(&verdicts))
}
