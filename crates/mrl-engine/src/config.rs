//! Engine configuration.
//!
//! Every tunable of the decision procedure lives here and is passed to the
//! engine at construction. Decision logic never carries its own literals.

use thiserror::Error;

/// Default warning band: residues above 80% of the MRL are flagged.
pub const DEFAULT_WARNING_RATIO: f64 = 0.8;

/// Default lead time for EU approval expiry notices, in days.
pub const DEFAULT_EXPIRY_NOTICE_DAYS: i64 = 180;

/// Tunables for the decision engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    warning_ratio: f64,
    expiry_notice_days: i64,
}

impl EngineConfig {
    /// Build a validated configuration.
    ///
    /// `warning_ratio` must lie in `(0, 1]`. A ratio of exactly 1 disables
    /// the warning band. `expiry_notice_days` must be non-negative.
    pub fn new(warning_ratio: f64, expiry_notice_days: i64) -> Result<Self, EngineConfigError> {
        if !warning_ratio.is_finite() || warning_ratio <= 0.0 || warning_ratio > 1.0 {
            return Err(EngineConfigError::WarningRatio(warning_ratio));
        }
        if expiry_notice_days < 0 {
            return Err(EngineConfigError::ExpiryNoticeDays(expiry_notice_days));
        }
        Ok(Self {
            warning_ratio,
            expiry_notice_days,
        })
    }

    /// Replace the warning ratio, keeping the other settings.
    pub fn with_warning_ratio(self, warning_ratio: f64) -> Result<Self, EngineConfigError> {
        Self::new(warning_ratio, self.expiry_notice_days)
    }

    /// Load from environment variables, falling back to defaults.
    ///
    /// - `MRL_WARNING_RATIO` (default: 0.8)
    /// - `MRL_EXPIRY_NOTICE_DAYS` (default: 180)
    pub fn from_env() -> Result<Self, EngineConfigError> {
        let warning_ratio = match std::env::var("MRL_WARNING_RATIO") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| EngineConfigError::Unparseable("MRL_WARNING_RATIO", raw))?,
            Err(_) => DEFAULT_WARNING_RATIO,
        };
        let expiry_notice_days = match std::env::var("MRL_EXPIRY_NOTICE_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| EngineConfigError::Unparseable("MRL_EXPIRY_NOTICE_DAYS", raw))?,
            Err(_) => DEFAULT_EXPIRY_NOTICE_DAYS,
        };
        Self::new(warning_ratio, expiry_notice_days)
    }

    pub fn warning_ratio(&self) -> f64 {
        self.warning_ratio
    }

    pub fn expiry_notice_days(&self) -> i64 {
        self.expiry_notice_days
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            warning_ratio: DEFAULT_WARNING_RATIO,
            expiry_notice_days: DEFAULT_EXPIRY_NOTICE_DAYS,
        }
    }
}

/// Invalid engine configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineConfigError {
    #[error("warning ratio must be in (0, 1], got {0}")]
    WarningRatio(f64),
    #[error("expiry notice days must be non-negative, got {0}")]
    ExpiryNoticeDays(i64),
    #[error("{0} is not a number: {1:?}")]
    Unparseable(&'static str, String),
}
