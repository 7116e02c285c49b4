//! # API Route Modules
//!
//! - [`compliance`]: verdicts, batch checks, alternatives.
//! - [`crops`]: per-crop record listings.

pub mod compliance;
pub mod crops;
