//! Store and engine wiring shared by every subcommand.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use mrl_core::RecordStore;
use mrl_engine::{ComplianceChecker, EngineConfig};
use mrl_store::PostgrestStore;

/// A ready checker plus the output mode.
#[derive(Debug, Clone)]
pub struct Session {
    pub checker: ComplianceChecker,
    /// Print JSON instead of the human-readable summary.
    pub json: bool,
}

impl Session {
    /// Open the record store and build the engine.
    ///
    /// A fixture path takes precedence over the PostgREST environment
    /// (`MRL_STORE_URL`, `MRL_STORE_KEY`). `warning_ratio` overrides
    /// `MRL_WARNING_RATIO`.
    pub fn open(fixture: Option<&Path>, warning_ratio: Option<f64>, json: bool) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match fixture {
            Some(path) => Arc::new(
                mrl_store::fixture::load_path(path)
                    .with_context(|| format!("failed to load fixture {}", path.display()))?,
            ),
            None => Arc::new(PostgrestStore::from_env().context(
                "record store not configured: set MRL_STORE_URL and MRL_STORE_KEY, or pass --fixture",
            )?),
        };

        let config = engine_config(warning_ratio)?;
        tracing::debug!(warning_ratio = config.warning_ratio(), "engine configured");

        Ok(Self {
            checker: ComplianceChecker::new(store, config),
            json,
        })
    }
}

fn engine_config(warning_ratio: Option<f64>) -> Result<EngineConfig> {
    let config = EngineConfig::from_env().context("invalid engine configuration")?;
    match warning_ratio {
        Some(ratio) => config
            .with_warning_ratio(ratio)
            .context("invalid --warning-ratio"),
        None => Ok(config),
    }
}
