//! # Regulatory Records
//!
//! One [`RegulatoryRecord`] per (crop, substance) pair, as published in the
//! Good Agricultural Practice database. Records are owned by the external
//! store; the stack reads them as immutable snapshots for the duration of a
//! single evaluation.

use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::market::{ApprovalStatus, Market};
use crate::names::{CropName, RecordKey, SubstanceName};
use crate::units::MgPerKg;

/// A published maximum residue limit for one market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketLimit {
    /// The limit in mg/kg.
    pub mrl: MgPerKg,
    /// The limit is set at the analytical limit of quantification.
    #[serde(default)]
    pub at_loq: bool,
}

impl MarketLimit {
    pub fn new(mrl: MgPerKg) -> Self {
        Self { mrl, at_loq: false }
    }

    pub fn at_loq(mrl: MgPerKg) -> Self {
        Self { mrl, at_loq: true }
    }
}

/// Good Agricultural Practice parameters that keep residues under the MRL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapGuidance {
    /// Application dose as published (free text, e.g. "0.25 L/ha").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    /// Maximum number of applications per season.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_applications: Option<NonZeroU32>,
    /// Minimum days between two applications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_interval_days: Option<u32>,
    /// Pre-harvest interval under EU practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preharvest_interval_eu_days: Option<u32>,
    /// Pre-harvest interval under Codex practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preharvest_interval_codex_days: Option<u32>,
}

impl GapGuidance {
    /// Pre-harvest interval for the given market, in days.
    pub fn preharvest_interval_days(&self, market: Market) -> Option<u32> {
        match market {
            Market::Eu => self.preharvest_interval_eu_days,
            Market::Codex => self.preharvest_interval_codex_days,
        }
    }

    /// True when no field carries any guidance.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Regulatory data for one (crop, substance) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryRecord {
    pub crop: CropName,
    pub substance: SubstanceName,
    /// EU approval of the active substance.
    pub eu_status: ApprovalStatus,
    /// Date the EU approval expires, if scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eu_expiration: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrl_eu: Option<MarketLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrl_codex: Option<MarketLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<GapGuidance>,
    /// Product class (e.g. "Fungicide", "Insecticide").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pesticide_type: Option<String>,
    /// WHO acute toxicity class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who_class: Option<String>,
    /// Resistance management group (FRAC/IRAC/HRAC code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance_group: Option<String>,
}

impl RegulatoryRecord {
    /// Minimal record: names and approval only.
    pub fn new(crop: CropName, substance: SubstanceName, eu_status: ApprovalStatus) -> Self {
        Self {
            crop,
            substance,
            eu_status,
            eu_expiration: None,
            mrl_eu: None,
            mrl_codex: None,
            gap: None,
            pesticide_type: None,
            who_class: None,
            resistance_group: None,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.crop.clone(), self.substance.clone())
    }

    /// The published limit for `market`, if any.
    pub fn mrl(&self, market: Market) -> Option<&MarketLimit> {
        match market {
            Market::Eu => self.mrl_eu.as_ref(),
            Market::Codex => self.mrl_codex.as_ref(),
        }
    }

    /// Approval status as it applies to `market`.
    ///
    /// Returns `None` for markets without an approval gate.
    pub fn approval_for(&self, market: Market) -> Option<ApprovalStatus> {
        match market {
            Market::Eu => Some(self.eu_status),
            Market::Codex => None,
        }
    }

    /// Whether this substance is usable on this crop for `market`.
    ///
    /// EU: the substance must be approved. Codex has no approval flag, so a
    /// published Codex MRL stands in for approval.
    pub fn approved_for(&self, market: Market) -> bool {
        match market {
            Market::Eu => self.eu_status.is_approved(),
            Market::Codex => self.mrl_codex.is_some(),
        }
    }

    /// GAP pre-harvest interval for `market`, in days.
    pub fn preharvest_interval_days(&self, market: Market) -> Option<u32> {
        self.gap
            .as_ref()
            .and_then(|gap| gap.preharvest_interval_days(market))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: ApprovalStatus) -> RegulatoryRecord {
        RegulatoryRecord::new(
            CropName::parse("mango").unwrap(),
            SubstanceName::parse("Azoxystrobin").unwrap(),
            status,
        )
    }

    #[test]
    fn mrl_is_market_specific() {
        let mut r = record(ApprovalStatus::Approved);
        r.mrl_eu = Some(MarketLimit::new(MgPerKg::new(4.0).unwrap()));
        assert_eq!(r.mrl(Market::Eu).map(|l| l.mrl.value()), Some(4.0));
        assert!(r.mrl(Market::Codex).is_none());
    }

    #[test]
    fn approved_for_codex_requires_codex_limit() {
        let mut r = record(ApprovalStatus::NotApproved);
        assert!(!r.approved_for(Market::Eu));
        assert!(!r.approved_for(Market::Codex));
        r.mrl_codex = Some(MarketLimit::new(MgPerKg::new(0.7).unwrap()));
        assert!(r.approved_for(Market::Codex));
    }

    #[test]
    fn approval_only_reported_for_gated_market() {
        let r = record(ApprovalStatus::Approved);
        assert_eq!(r.approval_for(Market::Eu), Some(ApprovalStatus::Approved));
        assert_eq!(r.approval_for(Market::Codex), None);
    }

    #[test]
    fn preharvest_interval_is_market_scoped() {
        let mut r = record(ApprovalStatus::Approved);
        assert_eq!(r.preharvest_interval_days(Market::Eu), None);
        r.gap = Some(GapGuidance {
            preharvest_interval_eu_days: Some(7),
            preharvest_interval_codex_days: Some(14),
            ..GapGuidance::default()
        });
        assert_eq!(r.preharvest_interval_days(Market::Eu), Some(7));
        assert_eq!(r.preharvest_interval_days(Market::Codex), Some(14));
    }

    #[test]
    fn deserializes_minimal_yaml_shape() {
        let json = serde_json::json!({
            "crop": "Mango",
            "substance": "Azoxystrobin",
            "eu_status": "APPROVED",
            "mrl_eu": { "mrl": 4.0 },
            "gap": { "max_applications": 3, "preharvest_interval_eu_days": 7 }
        });
        let r: RegulatoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(r.crop.key(), "mango");
        assert_eq!(r.mrl_eu.map(|l| l.at_loq), Some(false));
        assert_eq!(
            r.gap.as_ref().and_then(|g| g.max_applications).map(NonZeroU32::get),
            Some(3)
        );
    }

    #[test]
    fn zero_max_applications_is_rejected() {
        let json = serde_json::json!({
            "crop": "mango",
            "substance": "Azoxystrobin",
            "eu_status": "APPROVED",
            "gap": { "max_applications": 0 }
        });
        assert!(serde_json::from_value::<RegulatoryRecord>(json).is_err());
    }
}
