//! # Alternative-Substance Recommender
//!
//! When a substance fails (non-compliant verdict, or not approved in the
//! EU), proposes other substances usable on the same crop in the same
//! market.
//!
//! ## Ranking
//!
//! 1. approved for the market first,
//! 2. shorter GAP pre-harvest interval first (unknown intervals last),
//! 3. substance name, for a deterministic tie-break.
//!
//! An empty result is a valid outcome: the crop simply has no substitute.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use mrl_core::{CropName, Market, MgPerKg, RegulatoryRecord, StoreError, SubstanceName};

use crate::resolver::RecordResolver;

/// One substitute substance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub substance: SubstanceName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pesticide_type: Option<String>,
    pub approved_for_market: bool,
    /// GAP pre-harvest interval for the market, in days.
    pub preharvest_interval_days: Option<u32>,
    /// Market MRL for the substitute on this crop.
    pub mrl: Option<MgPerKg>,
}

impl Candidate {
    fn from_record(record: &RegulatoryRecord, market: Market) -> Self {
        Self {
            substance: record.substance.clone(),
            pesticide_type: record.pesticide_type.clone(),
            approved_for_market: record.approved_for(market),
            preharvest_interval_days: record.preharvest_interval_days(market),
            mrl: record.mrl(market).map(|l| l.mrl),
        }
    }

    fn rank(&self, other: &Self) -> Ordering {
        other
            .approved_for_market
            .cmp(&self.approved_for_market)
            .then_with(|| match (self.preharvest_interval_days, other.preharvest_interval_days) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.substance.cmp(&other.substance))
    }
}

/// Ranked substitutes for a failing substance.
///
/// Finite and restartable: [`iter`](Self::iter) can be called any number of
/// times and each iteration yields the same candidates in the same order.
/// Iteration is lazy, so `alternatives.iter().take(5)` only visits five.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alternatives {
    candidates: Vec<Candidate>,
}

impl Alternatives {
    /// Rank candidates. Ordering is total, so the result is deterministic.
    pub fn ranked(mut candidates: Vec<Candidate>) -> Self {
        candidates.sort_by(Candidate::rank);
        Self { candidates }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Keep at most `limit` candidates.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.candidates.truncate(limit);
        self
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }
}

impl<'a> IntoIterator for &'a Alternatives {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Alternatives {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

/// Proposes approved substitutes through a [`RecordResolver`].
#[derive(Debug, Clone)]
pub struct Recommender {
    resolver: RecordResolver,
}

impl Recommender {
    pub fn new(resolver: RecordResolver) -> Self {
        Self { resolver }
    }

    /// Substitutes for `exclude` on `crop` in `market`.
    pub async fn recommend(
        &self,
        crop: &CropName,
        market: Market,
        exclude: &SubstanceName,
    ) -> Result<Alternatives, StoreError> {
        let records = self.resolver.list_approved_for_crop(crop, market).await?;
        Ok(rank(&records, market, exclude, None))
    }

    /// Like [`recommend`](Self::recommend), restricted to substances whose
    /// pesticide type contains `pesticide_type` (case-insensitive), so a
    /// failing fungicide is replaced by a fungicide.
    pub async fn recommend_same_type(
        &self,
        crop: &CropName,
        market: Market,
        exclude: &SubstanceName,
        pesticide_type: &str,
    ) -> Result<Alternatives, StoreError> {
        let records = self.resolver.list_approved_for_crop(crop, market).await?;
        Ok(rank(&records, market, exclude, Some(pesticide_type)))
    }
}

/// Pure ranking step, separated from the store fetch.
pub fn rank(
    records: &[RegulatoryRecord],
    market: Market,
    exclude: &SubstanceName,
    pesticide_type: Option<&str>,
) -> Alternatives {
    let wanted_type = pesticide_type
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let candidates = records
        .iter()
        .filter(|r| &r.substance != exclude)
        .filter(|r| match &wanted_type {
            Some(wanted) => r
                .pesticide_type
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(wanted.as_str())),
            None => true,
        })
        .map(|r| Candidate::from_record(r, market))
        .collect();

    Alternatives::ranked(candidates)
}
