//! # Record Store Capability
//!
//! [`RecordStore`] is the contract between the stack and whatever holds the
//! regulatory data. Storage technology and column names are adapter
//! concerns (see `mrl-store`); the stack only needs:
//!
//! - a keyed lookup returning a record or an explicit "not found",
//! - a listing of all records for a crop,
//! - a listing of records usable on a crop for a given market.
//!
//! ## Outcome Contract
//!
//! | Situation                      | Return                      |
//! |--------------------------------|-----------------------------|
//! | Record exists                  | `Ok(Some(record))`          |
//! | No record for the pair         | `Ok(None)`                  |
//! | Store unreachable / broken     | `Err(StoreError)`           |
//!
//! Implementations receive already-normalized names; comparisons must use
//! [`CropName::key`] / [`SubstanceName::key`](crate::SubstanceName::key).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::market::Market;
use crate::names::{CropName, RecordKey};
use crate::record::RegulatoryRecord;

/// Read access to regulatory records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record for a (crop, substance) pair.
    async fn find(&self, key: &RecordKey) -> Result<Option<RegulatoryRecord>, StoreError>;

    /// All records for a crop, in no particular order.
    async fn list_for_crop(&self, crop: &CropName) -> Result<Vec<RegulatoryRecord>, StoreError>;

    /// Records for a crop that are usable in `market`.
    ///
    /// The default filters [`list_for_crop`](Self::list_for_crop) with
    /// [`RegulatoryRecord::approved_for`]. Adapters that can filter
    /// server-side should override it.
    async fn list_approved_for_crop(
        &self,
        crop: &CropName,
        market: Market,
    ) -> Result<Vec<RegulatoryRecord>, StoreError> {
        let records = self.list_for_crop(crop).await?;
        Ok(records
            .into_iter()
            .filter(|record| record.approved_for(market))
            .collect())
    }
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn find(&self, key: &RecordKey) -> Result<Option<RegulatoryRecord>, StoreError> {
        (**self).find(key).await
    }

    async fn list_for_crop(&self, crop: &CropName) -> Result<Vec<RegulatoryRecord>, StoreError> {
        (**self).list_for_crop(crop).await
    }

    async fn list_approved_for_crop(
        &self,
        crop: &CropName,
        market: Market,
    ) -> Result<Vec<RegulatoryRecord>, StoreError> {
        (**self).list_approved_for_crop(crop, market).await
    }
}

/// Thread-safe in-memory record store keyed by (crop, substance).
///
/// Backs fixture files and tests. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<BTreeMap<RecordKey, RegulatoryRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, rejecting duplicate pairs.
    pub fn from_records(
        records: impl IntoIterator<Item = RegulatoryRecord>,
    ) -> Result<Self, StoreError> {
        let store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Insert a record.
    ///
    /// A (crop, substance) pair maps to at most one record: a second insert
    /// for the same pair fails with [`StoreError::DuplicateRecord`].
    pub fn insert(&self, record: RegulatoryRecord) -> Result<(), StoreError> {
        let key = record.key();
        let mut guard = self.records.write();
        if guard.contains_key(&key) {
            return Err(StoreError::DuplicateRecord {
                crop: key.crop.key().to_string(),
                substance: key.substance.key().to_string(),
            });
        }
        guard.insert(key, record);
        Ok(())
    }

    /// Replace or insert a record, returning the previous one.
    pub fn upsert(&self, record: RegulatoryRecord) -> Option<RegulatoryRecord> {
        self.records.write().insert(record.key(), record)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find(&self, key: &RecordKey) -> Result<Option<RegulatoryRecord>, StoreError> {
        Ok(self.records.read().get(key).cloned())
    }

    async fn list_for_crop(&self, crop: &CropName) -> Result<Vec<RegulatoryRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|(key, _)| &key.crop == crop)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
