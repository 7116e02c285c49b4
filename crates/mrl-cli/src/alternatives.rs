//! # Alternatives Subcommand
//!
//! ```bash
//! mrl alternatives --crop mango --market EU --exclude Chlorpyrifos --same-type insecticide
//! ```

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::Session;

/// Arguments for the alternatives subcommand.
#[derive(Args, Debug)]
pub struct AlternativesArgs {
    /// Crop name (case-insensitive).
    #[arg(long)]
    pub crop: String,

    /// Target market: EU or Codex.
    #[arg(long, default_value = "EU")]
    pub market: String,

    /// The failing substance to replace.
    #[arg(long)]
    pub exclude: String,

    /// Only candidates whose pesticide type contains this text.
    #[arg(long)]
    pub same_type: Option<String>,

    /// Show at most this many candidates.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Execute the alternatives subcommand.
pub async fn run_alternatives(args: &AlternativesArgs, session: &Session) -> Result<u8> {
    let alternatives = match args.same_type.as_deref() {
        Some(kind) => {
            session
                .checker
                .recommend_same_type(&args.crop, &args.market, &args.exclude, kind)
                .await?
        }
        None => {
            session
                .checker
                .recommend(&args.crop, &args.market, &args.exclude)
                .await?
        }
    };
    let alternatives = match args.limit {
        Some(limit) => alternatives.truncated(limit),
        None => alternatives,
    };

    if session.json {
        output::print_json(&alternatives)?;
    } else {
        print!("{}", output::alternatives_table(&alternatives));
    }
    Ok(output::EXIT_OK)
}
