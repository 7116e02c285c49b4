//! Fixture files: regulatory records loaded into an [`InMemoryStore`].
//!
//! Used by the CLI and API for offline runs, demos and tests. The format
//! is a single `records` list in either YAML or JSON:
//!
//! ```yaml
//! records:
//!   - crop: Mango
//!     substance: Azoxystrobin
//!     eu_status: APPROVED
//!     mrl_eu: { mrl: 4.0 }
//!     gap: { preharvest_interval_eu_days: 7 }
//! ```
//!
//! Each (crop, substance) pair may appear once.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use mrl_core::{InMemoryStore, RegulatoryRecord, StoreError};

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    records: Vec<RegulatoryRecord>,
}

/// Errors from loading a fixture.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Duplicate(#[from] StoreError),
}

/// Load a fixture file. `.json` files are parsed as JSON, anything else
/// as YAML.
pub fn load_path(path: impl AsRef<Path>) -> Result<InMemoryStore, FixtureError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let store = if is_json {
        from_json_str(&raw)?
    } else {
        from_yaml_str(&raw)?
    };
    tracing::info!(path = %path.display(), records = store.len(), "loaded fixture");
    Ok(store)
}

pub fn from_yaml_str(raw: &str) -> Result<InMemoryStore, FixtureError> {
    let file: FixtureFile = serde_yaml::from_str(raw)?;
    Ok(InMemoryStore::from_records(file.records)?)
}

pub fn from_json_str(raw: &str) -> Result<InMemoryStore, FixtureError> {
    let file: FixtureFile = serde_json::from_str(raw)?;
    Ok(InMemoryStore::from_records(file.records)?)
}
