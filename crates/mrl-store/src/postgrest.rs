//! PostgREST-backed [`RecordStore`].
//!
//! Reads the COLEAD GAP table through the Supabase REST interface.
//!
//! | Operation                  | Request                                                                  |
//! |----------------------------|--------------------------------------------------------------------------|
//! | `find`                     | `GET /rest/v1/{table}?crop=ilike.{crop}&active_substance=ilike.{subst}`  |
//! | `list_for_crop`            | `GET /rest/v1/{table}?crop=ilike.{crop}`                                 |
//! | `list_approved_for_crop`   | `list_for_crop`, plus `mrl_codex=not.is.null` for Codex                 |
//!
//! `ilike` without wildcards gives exact case-insensitive matching. LIKE
//! metacharacters in caller input are escaped so that "Mango%" cannot match
//! every mango row.
//!
//! EU approval is decided client-side. The table mixes French and English
//! spellings of the approval label, and [`ApprovalStatus`] is the one place
//! that knows them all, so `find` and `list_approved_for_crop` always agree.
//!
//! [`ApprovalStatus`]: mrl_core::ApprovalStatus

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use mrl_core::{CropName, Market, RecordKey, RecordStore, RegulatoryRecord, StoreError};

use crate::backoff::Backoff;
use crate::config::{ConfigError, StoreConfig};
use crate::row::ColeadRow;

/// Record store client for a PostgREST table.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    http: reqwest::Client,
    table_url: String,
    table: String,
    backoff: Backoff,
}

impl PostgrestStore {
    /// Create a client from configuration.
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        let key = HeaderValue::from_str(config.api_key.as_str()).map_err(|_| ConfigError::MissingKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key.as_str()))
            .map_err(|_| ConfigError::MissingKey)?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            http,
            table_url: config.table_url(),
            table: config.table,
            backoff: config.backoff,
        })
    }

    /// Load configuration from the environment and build a client.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(StoreConfig::from_env()?)
    }

    async fn fetch(
        &self,
        endpoint: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<RegulatoryRecord>, StoreError> {
        let mut params: Vec<(&str, String)> = vec![("select", "*".to_string())];
        params.extend(filters.iter().cloned());

        let resp = self
            .backoff
            .send(endpoint, || self.http.get(&self.table_url).query(&params).send())
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(endpoint, status, "record store rejected request");
            return Err(StoreError::Rejected {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        let rows: Vec<ColeadRow> = resp.json().await.map_err(|e| StoreError::Malformed {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        rows.into_iter()
            .map(|row| row.into_record(endpoint))
            .collect()
    }

    fn crop_filter(crop: &CropName) -> (&'static str, String) {
        ("crop", format!("ilike.{}", escape_like(crop.as_str())))
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn find(&self, key: &RecordKey) -> Result<Option<RegulatoryRecord>, StoreError> {
        let endpoint = format!("GET /rest/v1/{} (find)", self.table);
        let filters = [
            Self::crop_filter(&key.crop),
            (
                "active_substance",
                format!("ilike.{}", escape_like(key.substance.as_str())),
            ),
        ];
        let mut records = self.fetch(&endpoint, &filters).await?;

        match records.len() {
            0 => Ok(None),
            1 => Ok(records.pop()),
            n => {
                tracing::error!(%key, rows = n, "duplicate rows for record key");
                Err(StoreError::DuplicateRecord {
                    crop: key.crop.key().to_string(),
                    substance: key.substance.key().to_string(),
                })
            }
        }
    }

    async fn list_for_crop(&self, crop: &CropName) -> Result<Vec<RegulatoryRecord>, StoreError> {
        let endpoint = format!("GET /rest/v1/{} (list)", self.table);
        self.fetch(&endpoint, &[Self::crop_filter(crop)]).await
    }

    async fn list_approved_for_crop(
        &self,
        crop: &CropName,
        market: Market,
    ) -> Result<Vec<RegulatoryRecord>, StoreError> {
        let endpoint = format!("GET /rest/v1/{} (approved, {market})", self.table);
        let mut filters = vec![Self::crop_filter(crop)];
        if let Market::Codex = market {
            filters.push(("mrl_codex", "not.is.null".to_string()));
        }
        let records = self.fetch(&endpoint, &filters).await?;
        Ok(records
            .into_iter()
            .filter(|record| record.approved_for(market))
            .collect())
    }
}

/// Escape LIKE metacharacters so the pattern matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_' | '*') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("Mango"), "Mango");
        assert_eq!(escape_like("50%_mix*"), "50\\%\\_mix\\*");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn client_builds_from_mock_config() {
        let cfg = StoreConfig::local_mock(9000, "test-key").unwrap();
        let store = PostgrestStore::new(cfg).unwrap();
        assert_eq!(store.table_url, "http://127.0.0.1:9000/rest/v1/pesticide_mrl");
    }
}
