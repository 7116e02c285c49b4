//! # Compliance Checker
//!
//! The caller-facing facade: validates raw input, resolves the record,
//! evaluates it, and, when a verdict calls for it, asks the recommender
//! for substitutes.
//!
//! ```ignore
//! let checker = ComplianceChecker::new(store, EngineConfig::default());
//! let verdict = checker.check("mango", "Azoxystrobin", "EU", Some(2.0)).await?;
//! ```

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mrl_core::{CropName, Market, RecordStore, RegulatoryRecord, SubstanceName};

use crate::config::EngineConfig;
use crate::engine::DecisionEngine;
use crate::error::CheckError;
use crate::query::ComplianceQuery;
use crate::recommend::{Alternatives, Recommender};
use crate::resolver::RecordResolver;
use crate::verdict::ComplianceVerdict;

/// A verdict together with substitutes, when the verdict needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub verdict: ComplianceVerdict,
    /// Present only when the verdict is NON_COMPLIANT or the substance is
    /// not approved in the EU. May be present and empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Alternatives>,
}

/// One substance of a batch check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub substance: String,
    #[serde(default)]
    pub residue: Option<f64>,
}

impl BatchItem {
    pub fn new(substance: impl Into<String>, residue: Option<f64>) -> Self {
        Self {
            substance: substance.into(),
            residue,
        }
    }
}

/// Resolves, evaluates and recommends against a single record store.
#[derive(Debug, Clone)]
pub struct ComplianceChecker {
    resolver: RecordResolver,
    engine: DecisionEngine,
    recommender: Recommender,
}

impl ComplianceChecker {
    pub fn new(store: Arc<dyn RecordStore>, config: EngineConfig) -> Self {
        Self::with_engine(store, DecisionEngine::new(config))
    }

    /// Checker with a pre-built engine (e.g. a custom rule order).
    pub fn with_engine(store: Arc<dyn RecordStore>, engine: DecisionEngine) -> Self {
        let resolver = RecordResolver::new(store);
        Self {
            recommender: Recommender::new(resolver.clone()),
            resolver,
            engine,
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Validate raw input and evaluate it as of today.
    pub async fn check(
        &self,
        crop: &str,
        substance: &str,
        market: &str,
        residue: Option<f64>,
    ) -> Result<ComplianceVerdict, CheckError> {
        let query = ComplianceQuery::parse(crop, substance, market, residue, today())?;
        self.evaluate(&query).await
    }

    /// Evaluate an already-validated query.
    pub async fn evaluate(&self, query: &ComplianceQuery) -> Result<ComplianceVerdict, CheckError> {
        let lookup = self.resolver.resolve(&query.key()).await?;
        Ok(self.engine.evaluate(query, &lookup))
    }

    /// Evaluate and attach substitutes when the verdict calls for them.
    pub async fn assess(&self, query: &ComplianceQuery) -> Result<Assessment, CheckError> {
        let verdict = self.evaluate(query).await?;
        let alternatives = if verdict.needs_alternatives() {
            let alts = self
                .recommender
                .recommend(&query.crop, query.market, &query.substance)
                .await?;
            tracing::debug!(
                substance = %query.substance,
                candidates = alts.len(),
                "recommended alternatives"
            );
            Some(alts)
        } else {
            None
        };
        Ok(Assessment {
            verdict,
            alternatives,
        })
    }

    /// Substitutes for `failing` on `crop` in `market`.
    pub async fn recommend(
        &self,
        crop: &str,
        market: &str,
        failing: &str,
    ) -> Result<Alternatives, CheckError> {
        let (crop, market, failing) = parse_target(crop, market, failing)?;
        Ok(self.recommender.recommend(&crop, market, &failing).await?)
    }

    /// Substitutes restricted to one pesticide type.
    pub async fn recommend_same_type(
        &self,
        crop: &str,
        market: &str,
        failing: &str,
        pesticide_type: &str,
    ) -> Result<Alternatives, CheckError> {
        let (crop, market, failing) = parse_target(crop, market, failing)?;
        Ok(self
            .recommender
            .recommend_same_type(&crop, market, &failing, pesticide_type)
            .await?)
    }

    /// One verdict per item, in input order, as of today.
    pub async fn check_batch(
        &self,
        crop: &str,
        market: &str,
        items: &[BatchItem],
    ) -> Result<Vec<ComplianceVerdict>, CheckError> {
        self.check_batch_on(crop, market, items, today()).await
    }

    /// [`check_batch`](Self::check_batch) anchored to an explicit date.
    ///
    /// Every item is validated before the first lookup. The first store
    /// failure aborts the batch.
    pub async fn check_batch_on(
        &self,
        crop: &str,
        market: &str,
        items: &[BatchItem],
        as_of: NaiveDate,
    ) -> Result<Vec<ComplianceVerdict>, CheckError> {
        let queries = items
            .iter()
            .map(|item| ComplianceQuery::parse(crop, &item.substance, market, item.residue, as_of))
            .collect::<Result<Vec<_>, _>>()?;

        let mut verdicts = Vec::with_capacity(queries.len());
        for query in &queries {
            verdicts.push(self.evaluate(query).await?);
        }
        tracing::debug!(crop, market, items = verdicts.len(), "batch evaluated");
        Ok(verdicts)
    }

    /// Every record for `crop`, approved substances first, then by name.
    pub async fn substances_for_crop(
        &self,
        crop: &str,
    ) -> Result<Vec<RegulatoryRecord>, CheckError> {
        let crop = CropName::parse(crop)?;
        let mut records = self.resolver.list_for_crop(&crop).await?;
        records.sort_by(|a, b| {
            b.eu_status
                .is_approved()
                .cmp(&a.eu_status.is_approved())
                .then_with(|| a.substance.cmp(&b.substance))
        });
        Ok(records)
    }
}

fn parse_target(
    crop: &str,
    market: &str,
    failing: &str,
) -> Result<(CropName, Market, SubstanceName), CheckError> {
    Ok((
        CropName::parse(crop)?,
        market.parse::<Market>()?,
        SubstanceName::parse(failing)?,
    ))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mrl_core::{
        ApprovalStatus, InMemoryStore, MarketLimit, MgPerKg, RecordKey, StoreError,
        ValidationError,
    };

    use crate::verdict::ComplianceStatus;

    fn record(substance: &str, status: ApprovalStatus, mrl_eu: Option<f64>) -> RegulatoryRecord {
        let mut r = RegulatoryRecord::new(
            CropName::parse("mango").unwrap(),
            SubstanceName::parse(substance).unwrap(),
            status,
        );
        r.mrl_eu = mrl_eu.map(|v| MarketLimit::new(MgPerKg::new(v).unwrap()));
        r
    }

    fn checker() -> ComplianceChecker {
        let store = InMemoryStore::from_records([
            record("Azoxystrobin", ApprovalStatus::Approved, Some(4.0)),
            record("Alpha-cypermethrin", ApprovalStatus::NotApproved, Some(0.2)),
            record("Boscalid", ApprovalStatus::Approved, Some(1.0)),
        ])
        .unwrap();
        ComplianceChecker::new(Arc::new(store), EngineConfig::default())
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    struct DownStore;

    #[async_trait]
    impl RecordStore for DownStore {
        async fn find(&self, _key: &RecordKey) -> Result<Option<RegulatoryRecord>, StoreError> {
            Err(StoreError::Unavailable {
                endpoint: "test".into(),
                reason: "down".into(),
            })
        }

        async fn list_for_crop(
            &self,
            _crop: &CropName,
        ) -> Result<Vec<RegulatoryRecord>, StoreError> {
            Err(StoreError::Unavailable {
                endpoint: "test".into(),
                reason: "down".into(),
            })
        }
    }

    #[tokio::test]
    async fn check_validates_before_lookup() {
        let checker = ComplianceChecker::new(Arc::new(DownStore), EngineConfig::default());
        let err = checker.check("", "Azoxystrobin", "EU", None).await.unwrap_err();
        assert!(matches!(err, CheckError::InvalidQuery(ValidationError::EmptyCrop)));

        let err = checker
            .check("mango", "Azoxystrobin", "EU", Some(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn assess_attaches_alternatives_only_when_needed() {
        let checker = checker();

        let q = ComplianceQuery::parse("mango", "Azoxystrobin", "EU", Some(1.0), day()).unwrap();
        let ok = checker.assess(&q).await.unwrap();
        assert_eq!(ok.verdict.status, ComplianceStatus::Compliant);
        assert!(ok.alternatives.is_none());

        let q = ComplianceQuery::parse("mango", "Alpha-cypermethrin", "EU", None, day()).unwrap();
        let bad = checker.assess(&q).await.unwrap();
        assert_eq!(bad.verdict.status, ComplianceStatus::NonCompliant);
        let names: Vec<_> = bad
            .alternatives
            .unwrap()
            .iter()
            .map(|c| c.substance.to_string())
            .collect();
        assert_eq!(names, vec!["Azoxystrobin", "Boscalid"]);
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let verdicts = checker()
            .check_batch_on(
                "mango",
                "EU",
                &[
                    BatchItem::new("Boscalid", Some(2.0)),
                    BatchItem::new("Azoxystrobin", Some(1.0)),
                    BatchItem::new("Durianol", None),
                ],
                day(),
            )
            .await
            .unwrap();
        let statuses: Vec<_> = verdicts.iter().map(|v| v.status).collect();
        assert_eq!(
            statuses,
            vec![
                ComplianceStatus::NonCompliant,
                ComplianceStatus::Compliant,
                ComplianceStatus::Unknown,
            ]
        );
    }

    #[tokio::test]
    async fn batch_rejects_any_invalid_item() {
        let err = checker()
            .check_batch(
                "mango",
                "EU",
                &[
                    BatchItem::new("Boscalid", Some(0.1)),
                    BatchItem::new("Azoxystrobin", Some(-1.0)),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckError::InvalidQuery(ValidationError::NegativeQuantity { .. })
        ));
    }

    #[tokio::test]
    async fn substances_listed_approved_first() {
        let records = checker().substances_for_crop("Mango").await.unwrap();
        let names: Vec<_> = records.iter().map(|r| r.substance.as_str()).collect();
        assert_eq!(names, vec!["Azoxystrobin", "Boscalid", "Alpha-cypermethrin"]);
    }

    #[tokio::test]
    async fn recommend_rejects_unknown_market() {
        let err = checker()
            .recommend("mango", "Mercosur", "Azoxystrobin")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckError::InvalidQuery(ValidationError::UnknownMarket(_))
        ));
    }
}
