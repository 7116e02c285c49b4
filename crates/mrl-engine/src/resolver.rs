//! # Record Resolver
//!
//! The boundary between the decision logic and the external record store.
//! Names are normalized (trimmed, case-insensitive keys) before the store
//! is consulted, and the store's answer is turned into a two-variant
//! [`Lookup`] so that "no record" and "store failure" can never be confused:
//!
//! - `Ok(Lookup::Found(record))`: the store has the pair.
//! - `Ok(Lookup::NotFound)`: a normal outcome; the engine answers UNKNOWN.
//! - `Err(StoreError)`: infrastructure failure, surfaced to the caller.
//!
//! The resolver never retries. Retry policy belongs to store adapters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use mrl_core::{CropName, Market, RecordKey, RecordStore, RegulatoryRecord, StoreError};

/// Result of resolving a (crop, substance) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum Lookup {
    Found(RegulatoryRecord),
    NotFound,
}

impl Lookup {
    pub fn record(&self) -> Option<&RegulatoryRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl From<Option<RegulatoryRecord>> for Lookup {
    fn from(record: Option<RegulatoryRecord>) -> Self {
        record.map_or(Self::NotFound, Self::Found)
    }
}

/// Resolves regulatory records through a [`RecordStore`].
#[derive(Clone)]
pub struct RecordResolver {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for RecordResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordResolver").finish_non_exhaustive()
    }
}

impl RecordResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Look up the record for a (crop, substance) pair.
    pub async fn resolve(&self, key: &RecordKey) -> Result<Lookup, StoreError> {
        tracing::debug!(crop = key.crop.key(), substance = key.substance.key(), "resolving record");
        let record = self.store.find(key).await?;

        // Adapters match case-insensitively; guard against one that does not.
        let record = record.filter(|r| r.key() == *key);
        if record.is_none() {
            tracing::debug!(crop = key.crop.key(), substance = key.substance.key(), "no record");
        }
        Ok(Lookup::from(record))
    }

    /// Records for `crop` usable in `market`.
    ///
    /// EU: records whose substance is approved. Codex: records with a Codex
    /// MRL. Records for other crops are dropped even if the store returns
    /// them.
    pub async fn list_approved_for_crop(
        &self,
        crop: &CropName,
        market: Market,
    ) -> Result<Vec<RegulatoryRecord>, StoreError> {
        let records = self.store.list_approved_for_crop(crop, market).await?;
        Ok(records
            .into_iter()
            .filter(|r| &r.crop == crop && r.approved_for(market))
            .collect())
    }

    /// Every record for `crop`.
    pub async fn list_for_crop(&self, crop: &CropName) -> Result<Vec<RegulatoryRecord>, StoreError> {
        let records = self.store.list_for_crop(crop).await?;
        Ok(records.into_iter().filter(|r| &r.crop == crop).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mrl_core::{ApprovalStatus, InMemoryStore, SubstanceName};

    fn record(crop: &str, substance: &str, status: ApprovalStatus) -> RegulatoryRecord {
        RegulatoryRecord::new(
            CropName::parse(crop).unwrap(),
            SubstanceName::parse(substance).unwrap(),
            status,
        )
    }

    struct DownStore;

    #[async_trait]
    impl RecordStore for DownStore {
        async fn find(&self, _key: &RecordKey) -> Result<Option<RegulatoryRecord>, StoreError> {
            Err(StoreError::Unavailable {
                endpoint: "test".into(),
                reason: "connection refused".into(),
            })
        }

        async fn list_for_crop(
            &self,
            _crop: &CropName,
        ) -> Result<Vec<RegulatoryRecord>, StoreError> {
            Err(StoreError::Unavailable {
                endpoint: "test".into(),
                reason: "connection refused".into(),
            })
        }
    }

    /// Ignores the key and always answers with the same record.
    struct SloppyStore(RegulatoryRecord);

    #[async_trait]
    impl RecordStore for SloppyStore {
        async fn find(&self, _key: &RecordKey) -> Result<Option<RegulatoryRecord>, StoreError> {
            Ok(Some(self.0.clone()))
        }

        async fn list_for_crop(
            &self,
            _crop: &CropName,
        ) -> Result<Vec<RegulatoryRecord>, StoreError> {
            Ok(vec![self.0.clone()])
        }
    }

    #[tokio::test]
    async fn resolves_with_normalized_names() {
        let store = InMemoryStore::from_records([record("mango", "Azoxystrobin", ApprovalStatus::Approved)])
            .unwrap();
        let resolver = RecordResolver::new(Arc::new(store));
        let lookup = resolver
            .resolve(&RecordKey::parse("  Mango", "AZOXYSTROBIN ").unwrap())
            .await
            .unwrap();
        assert!(lookup.is_found());
    }

    #[tokio::test]
    async fn absent_pair_is_not_found() {
        let resolver = RecordResolver::new(Arc::new(InMemoryStore::new()));
        let lookup = resolver
            .resolve(&RecordKey::parse("durian", "Azoxystrobin").unwrap())
            .await
            .unwrap();
        assert_eq!(lookup, Lookup::NotFound);
    }

    #[tokio::test]
    async fn store_failure_is_an_error_not_a_lookup() {
        let resolver = RecordResolver::new(Arc::new(DownStore));
        let result = resolver
            .resolve(&RecordKey::parse("mango", "Azoxystrobin").unwrap())
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn mismatched_store_answer_is_discarded() {
        let resolver = RecordResolver::new(Arc::new(SloppyStore(record(
            "tomato",
            "Abamectin",
            ApprovalStatus::Approved,
        ))));
        let lookup = resolver
            .resolve(&RecordKey::parse("mango", "Azoxystrobin").unwrap())
            .await
            .unwrap();
        assert_eq!(lookup, Lookup::NotFound);

        let mango = CropName::parse("mango").unwrap();
        assert!(resolver
            .list_approved_for_crop(&mango, Market::Eu)
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn lookup_serializes_as_tagged_outcome() {
        let json = serde_json::to_value(Lookup::NotFound).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "not_found" }));
    }
}
