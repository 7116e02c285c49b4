//! # mrl-store: Record Store Adapters
//!
//! Concrete [`RecordStore`](mrl_core::RecordStore) implementations:
//!
//! - [`PostgrestStore`] reads the COLEAD GAP table through a
//!   Supabase/PostgREST endpoint, with [`Backoff`] retries on transport failures.
//! - [`fixture`] loads YAML or JSON record files into an
//!   [`InMemoryStore`](mrl_core::InMemoryStore) for offline use.
//!
//! ## Architecture
//!
//! This crate is the only place that knows table names, column names, or
//! the COLEAD label vocabulary. Everything above it sees
//! [`RegulatoryRecord`](mrl_core::RegulatoryRecord)s.

pub mod backoff;
pub mod config;
pub mod fixture;
pub mod postgrest;
pub mod row;

pub use backoff::Backoff;
pub use config::{ConfigError, StoreConfig};
pub use fixture::FixtureError;
pub use postgrest::PostgrestStore;
pub use row::ColeadRow;
