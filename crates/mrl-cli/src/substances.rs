//! # Substances Subcommand
//!
//! Lists every record published for a crop, approved substances first.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::Session;

/// Arguments for the substances subcommand.
#[derive(Args, Debug)]
pub struct SubstancesArgs {
    /// Crop name (case-insensitive).
    #[arg(long)]
    pub crop: String,
}

/// Execute the substances subcommand.
pub async fn run_substances(args: &SubstancesArgs, session: &Session) -> Result<u8> {
    let records = session.checker.substances_for_crop(&args.crop).await?;
    if session.json {
        output::print_json(&records)?;
    } else {
        print!("{}", output::records_table(&records));
    }
    Ok(output::EXIT_OK)
}
