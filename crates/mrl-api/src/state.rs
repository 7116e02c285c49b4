//! # Application State
//!
//! Shared across handlers via axum's `State` extractor. Holds the
//! compliance checker; the checker owns the store handle.

use std::path::PathBuf;
use std::sync::Arc;

use mrl_engine::ComplianceChecker;

/// Process-level configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Serve records from a fixture file instead of PostgREST.
    pub fixture: Option<PathBuf>,
}

impl AppConfig {
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `MRL_FIXTURE` (optional)
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            fixture: std::env::var_os("MRL_FIXTURE").map(PathBuf::from),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            fixture: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub checker: Arc<ComplianceChecker>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(checker: ComplianceChecker) -> Self {
        Self::with_config(checker, AppConfig::default())
    }

    pub fn with_config(checker: ComplianceChecker, config: AppConfig) -> Self {
        Self {
            checker: Arc::new(checker),
            config,
        }
    }
}
