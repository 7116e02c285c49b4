//! PostgREST store configuration.
//!
//! Points the adapter at a Supabase/PostgREST project. Override via
//! environment variables or explicit construction for staging/testing.

use url::Url;
use zeroize::Zeroizing;

use crate::backoff::Backoff;

/// Default table holding the COLEAD GAP export.
pub const DEFAULT_TABLE: &str = "pesticide_mrl";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the regulatory record store.
///
/// Custom `Debug` implementation redacts the `api_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub base_url: Url,
    /// Service key, sent as both `apikey` and bearer token.
    pub api_key: Zeroizing<String>,
    /// Table name under `/rest/v1/`.
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for transport failures.
    pub backoff: Backoff,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .field("backoff", &self.backoff)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `MRL_STORE_URL` (required)
    /// - `MRL_STORE_KEY` (required)
    /// - `MRL_STORE_TABLE` (default: `pesticide_mrl`)
    /// - `MRL_STORE_TIMEOUT_SECS` (default: 30)
    /// - `MRL_STORE_RETRIES` (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("MRL_STORE_URL").map_err(|_| ConfigError::MissingUrl)?;
        let api_key = Zeroizing::new(
            std::env::var("MRL_STORE_KEY").map_err(|_| ConfigError::MissingKey)?,
        );
        let base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("MRL_STORE_URL".to_string(), e.to_string()))?;
        let table = std::env::var("MRL_STORE_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string());

        Self::new(base_url, api_key, table).map(|cfg| Self {
            timeout_secs: std::env::var("MRL_STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            backoff: Backoff {
                retries: std::env::var("MRL_STORE_RETRIES")
                    .ok()
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(cfg.backoff.retries),
                ..cfg.backoff
            },
            ..cfg
        })
    }

    /// Build a configuration with the default timeout and retry policy.
    ///
    /// The table name must be a plain identifier: it is interpolated into the
    /// request path.
    pub fn new(
        base_url: Url,
        api_key: Zeroizing<String>,
        table: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let table = table.into();
        if table.is_empty()
            || !table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidTable(table));
        }
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        Ok(Self {
            base_url,
            api_key,
            table,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            backoff: Backoff::default(),
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed
    /// (should not occur for valid port numbers, but avoids `expect()`).
    pub fn local_mock(port: u16, key: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        let mut cfg = Self::new(base_url, Zeroizing::new(key.to_string()), DEFAULT_TABLE)?;
        cfg.timeout_secs = 5;
        cfg.backoff = Backoff {
            retries: 1,
            base_delay: std::time::Duration::from_millis(10),
        };
        Ok(cfg)
    }

    /// `{base}/rest/v1/{table}`.
    pub fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.table
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MRL_STORE_URL environment variable is required")]
    MissingUrl,
    #[error("MRL_STORE_KEY environment variable is required")]
    MissingKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid table name {0:?}: expected letters, digits and underscores")]
    InvalidTable(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
