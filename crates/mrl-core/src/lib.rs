//! # mrl-core: Foundational Types for the MRL Compliance Stack
//!
//! The leaf of the workspace DAG. Defines the domain primitives every other
//! crate builds on and the capability contract through which the stack
//! reaches the external regulatory data store.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for names.** `CropName` and `SubstanceName` trim and
//!    validate at construction and compare case-insensitively. No bare
//!    strings for record identity.
//!
//! 2. **`MgPerKg` for every quantity.** MRLs and measured residues share one
//!    validated unit type. Negative or non-finite values cannot be
//!    constructed, so the engine never sees them.
//!
//! 3. **Single `Market` enum.** EU and Codex, exhaustive `match` everywhere.
//!    Only the EU carries an approval gate.
//!
//! 4. **Store capability, not store technology.** [`RecordStore`] is the only
//!    way the stack reads regulatory records. "Not found" is `Ok(None)`;
//!    infrastructure failure is `Err(StoreError)`. The two never mix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mrl-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod market;
pub mod names;
pub mod record;
pub mod store;
pub mod units;

// Re-export primary types for ergonomic imports.
pub use error::{StoreError, ValidationError};
pub use market::{ApprovalStatus, Market};
pub use names::{CropName, RecordKey, SubstanceName};
pub use record::{GapGuidance, MarketLimit, RegulatoryRecord};
pub use store::{InMemoryStore, RecordStore};
pub use units::MgPerKg;
