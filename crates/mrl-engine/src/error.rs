//! Errors surfaced by [`ComplianceChecker`](crate::ComplianceChecker).
//!
//! Only two things can go wrong: the caller's input is invalid, or the
//! record store could not answer. A missing record is not an error; it is
//! an UNKNOWN verdict.

use thiserror::Error;

use mrl_core::{StoreError, ValidationError};

#[derive(Error, Debug)]
pub enum CheckError {
    /// Malformed input: empty names, unknown market, negative residue.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] ValidationError),

    /// The record store is unreachable or answered with garbage.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
