//! # Error Types
//!
//! Two families, kept structurally apart:
//!
//! - [`ValidationError`]: caller input that can never be evaluated
//!   (empty names, negative residues, unknown markets). Rejected before any
//!   lookup happens.
//! - [`StoreError`]: the external record store failed. Propagated to the
//!   caller as-is; never converted into a compliance verdict.

use thiserror::Error;

/// Caller input failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Crop name is empty after trimming.
    #[error("crop name must be non-empty")]
    EmptyCrop,

    /// Substance name is empty after trimming.
    #[error("substance name must be non-empty")]
    EmptySubstance,

    /// Name exceeds the maximum accepted length.
    #[error("{field} name is too long ({len} characters, maximum {max})")]
    NameTooLong {
        /// Which name was rejected ("crop" or "substance").
        field: &'static str,
        /// Length of the trimmed input in characters.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Name contains control characters.
    #[error("{field} name contains control characters: {value:?}")]
    ControlCharacters {
        /// Which name was rejected ("crop" or "substance").
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Market string is not one of the supported markets.
    #[error("unknown target market: {0:?} (expected \"EU\" or \"Codex\")")]
    UnknownMarket(String),

    /// Approval label is not recognized.
    #[error("unknown approval status: {0:?}")]
    UnknownApprovalStatus(String),

    /// Quantity is negative.
    #[error("{field} must be non-negative, got {value} mg/kg")]
    NegativeQuantity {
        /// Which quantity was rejected ("residue", "mrl").
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Quantity is NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFiniteQuantity {
        /// Which quantity was rejected.
        field: &'static str,
    },
}

/// Failure reaching or reading the external record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (connection refused, timeout, DNS).
    #[error("record store unavailable at {endpoint}: {reason}")]
    Unavailable {
        /// The endpoint or operation that failed.
        endpoint: String,
        /// Transport-level reason.
        reason: String,
    },

    /// The store answered with a non-success status.
    #[error("record store {endpoint} returned {status}: {body}")]
    Rejected {
        /// The endpoint or operation that failed.
        endpoint: String,
        /// HTTP (or equivalent) status code.
        status: u16,
        /// Response body, for operator diagnostics.
        body: String,
    },

    /// The store returned data that cannot be mapped to a record.
    #[error("malformed record from {endpoint}: {reason}")]
    Malformed {
        /// The endpoint or operation that produced the data.
        endpoint: String,
        /// What was wrong with the data.
        reason: String,
    },

    /// More than one record exists for a (crop, substance) pair.
    #[error("duplicate regulatory record for crop {crop:?} and substance {substance:?}")]
    DuplicateRecord {
        /// Crop key of the offending pair.
        crop: String,
        /// Substance key of the offending pair.
        substance: String,
    },
}
