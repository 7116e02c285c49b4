//! # mrl-cli: MRL Compliance Command-Line Interface
//!
//! Thin clap front-end over [`mrl_engine::ComplianceChecker`].
//!
//! ## Subcommands
//!
//! - `check`: one substance on one crop for one market
//! - `batch`: many substances on one crop, verdicts in input order
//! - `alternatives`: ranked substitutes for a failing substance
//! - `substances`: every published record for a crop
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                       |
//! |------|-----------------------------------------------|
//! | 0    | No NON_COMPLIANT verdict                      |
//! | 1    | Invalid input, configuration or store failure |
//! | 2    | At least one NON_COMPLIANT verdict            |
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to `mrl-engine`; no decision logic lives here.

pub mod alternatives;
pub mod batch;
pub mod check;
pub mod output;
pub mod session;
pub mod substances;
