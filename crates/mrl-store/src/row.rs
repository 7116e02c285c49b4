//! COLEAD GAP table rows.
//!
//! [`ColeadRow`] mirrors the column layout of the published GAP export as
//! PostgREST returns it. Conversion into [`RegulatoryRecord`] is where
//! wire-level quirks are resolved:
//!
//! | Column                  | Mapping                                          |
//! |-------------------------|--------------------------------------------------|
//! | `eu_status`             | French or English label → `ApprovalStatus`       |
//! | `mrl_*_flag`            | `"LOQ"` (any case) → `MarketLimit::at_loq`       |
//! | `max_applications`      | `0` → absent                                     |
//! | `eu_expiration`         | ISO date, optional time suffix ignored           |
//!
//! Fields use `#[serde(default)]` so that columns added to the export later
//! do not break decoding.

use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mrl_core::{
    ApprovalStatus, CropName, GapGuidance, MarketLimit, MgPerKg, RegulatoryRecord, StoreError,
    SubstanceName,
};

/// One row of the GAP table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColeadRow {
    pub crop: String,
    pub active_substance: String,
    #[serde(default)]
    pub eu_status: Option<String>,
    #[serde(default)]
    pub eu_expiration: Option<String>,
    #[serde(default)]
    pub mrl_eu: Option<f64>,
    #[serde(default)]
    pub mrl_eu_flag: Option<String>,
    #[serde(default)]
    pub mrl_codex: Option<f64>,
    #[serde(default)]
    pub mrl_codex_flag: Option<String>,
    #[serde(default)]
    pub dose: Option<String>,
    #[serde(default)]
    pub max_applications: Option<i64>,
    #[serde(default)]
    pub interval_days: Option<i64>,
    #[serde(default)]
    pub preharvest_eu: Option<i64>,
    #[serde(default)]
    pub preharvest_codex: Option<i64>,
    #[serde(default)]
    pub who_class: Option<String>,
    #[serde(default)]
    pub pesticide_type: Option<String>,
    #[serde(default)]
    pub resistance_group: Option<String>,
}

impl ColeadRow {
    /// Convert into the domain record.
    ///
    /// Any value the domain types reject (empty names, unknown approval
    /// labels, negative limits or intervals, unparseable dates) makes the
    /// row `StoreError::Malformed`.
    pub fn into_record(self, endpoint: &str) -> Result<RegulatoryRecord, StoreError> {
        let malformed = |reason: String| StoreError::Malformed {
            endpoint: endpoint.to_string(),
            reason,
        };

        let crop = CropName::parse(&self.crop).map_err(|e| malformed(e.to_string()))?;
        let substance =
            SubstanceName::parse(&self.active_substance).map_err(|e| malformed(e.to_string()))?;
        let eu_status: ApprovalStatus = self
            .eu_status
            .as_deref()
            .ok_or_else(|| malformed(format!("eu_status missing for {substance} on {crop}")))?
            .parse()
            .map_err(|e: mrl_core::ValidationError| malformed(e.to_string()))?;

        let eu_expiration = self
            .eu_expiration
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_date(s).ok_or_else(|| malformed(format!("bad eu_expiration {s:?}"))))
            .transpose()?;

        let mrl_eu = limit(self.mrl_eu, self.mrl_eu_flag.as_deref())
            .map_err(|e| malformed(format!("mrl_eu: {e}")))?;
        let mrl_codex = limit(self.mrl_codex, self.mrl_codex_flag.as_deref())
            .map_err(|e| malformed(format!("mrl_codex: {e}")))?;

        let gap = GapGuidance {
            dose: non_blank(self.dose),
            max_applications: days("max_applications", self.max_applications)
                .map_err(malformed)?
                .and_then(NonZeroU32::new),
            application_interval_days: days("interval_days", self.interval_days)
                .map_err(malformed)?,
            preharvest_interval_eu_days: days("preharvest_eu", self.preharvest_eu)
                .map_err(malformed)?,
            preharvest_interval_codex_days: days("preharvest_codex", self.preharvest_codex)
                .map_err(malformed)?,
        };

        Ok(RegulatoryRecord {
            crop,
            substance,
            eu_status,
            eu_expiration,
            mrl_eu,
            mrl_codex,
            gap: (!gap.is_empty()).then_some(gap),
            pesticide_type: non_blank(self.pesticide_type),
            who_class: non_blank(self.who_class),
            resistance_group: non_blank(self.resistance_group),
        })
    }
}

fn limit(value: Option<f64>, flag: Option<&str>) -> Result<Option<MarketLimit>, String> {
    let Some(value) = value else {
        return Ok(None);
    };
    let mrl = MgPerKg::new(value).map_err(|e| e.to_string())?;
    let at_loq = flag.is_some_and(|f| f.trim().eq_ignore_ascii_case("loq"));
    Ok(Some(MarketLimit { mrl, at_loq }))
}

fn days(column: &str, value: Option<i64>) -> Result<Option<u32>, String> {
    value
        .map(|v| u32::try_from(v).map_err(|_| format!("{column} out of range: {v}")))
        .transpose()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ColeadRow {
        ColeadRow {
            crop: "Mango".into(),
            active_substance: "Azoxystrobin".into(),
            eu_status: Some("Approuvée".into()),
            mrl_eu: Some(4.0),
            ..ColeadRow::default()
        }
    }

    #[test]
    fn maps_minimal_row() {
        let record = row().into_record("test").unwrap();
        assert_eq!(record.crop.as_str(), "Mango");
        assert_eq!(record.eu_status, ApprovalStatus::Approved);
        assert_eq!(record.mrl_eu.map(|l| l.mrl.value()), Some(4.0));
        assert!(record.mrl_codex.is_none());
        assert!(record.gap.is_none());
    }

    #[test]
    fn loq_flag_sets_at_loq() {
        let r = ColeadRow {
            mrl_eu: Some(0.01),
            mrl_eu_flag: Some("loq".into()),
            mrl_codex: Some(0.02),
            mrl_codex_flag: Some("*".into()),
            ..row()
        };
        let record = r.into_record("test").unwrap();
        assert!(record.mrl_eu.unwrap().at_loq);
        assert!(!record.mrl_codex.unwrap().at_loq);
    }

    #[test]
    fn zero_max_applications_is_absent() {
        let r = ColeadRow {
            max_applications: Some(0),
            preharvest_eu: Some(14),
            ..row()
        };
        let gap = r.into_record("test").unwrap().gap.unwrap();
        assert!(gap.max_applications.is_none());
        assert_eq!(gap.preharvest_interval_eu_days, Some(14));
    }

    #[test]
    fn french_non_approval_labels() {
        for label in ["Non approuvée", "Non reprise dans la liste"] {
            let r = ColeadRow {
                eu_status: Some(label.into()),
                ..row()
            };
            assert_eq!(
                r.into_record("test").unwrap().eu_status,
                ApprovalStatus::NotApproved
            );
        }
    }

    #[test]
    fn unknown_status_is_malformed() {
        let r = ColeadRow {
            eu_status: Some("En cours".into()),
            ..row()
        };
        assert!(matches!(
            r.into_record("test"),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn negative_limit_is_malformed() {
        let r = ColeadRow {
            mrl_eu: Some(-1.0),
            ..row()
        };
        assert!(matches!(
            r.into_record("test"),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn expiration_accepts_timestamp_suffix() {
        let r = ColeadRow {
            eu_expiration: Some("2026-03-01T00:00:00".into()),
            ..row()
        };
        assert_eq!(
            r.into_record("test").unwrap().eu_expiration,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
    }

    #[test]
    fn decodes_from_postgrest_json() {
        let json = serde_json::json!({
            "id": 42,
            "crop": "Mango",
            "active_substance": "Alpha-cypermethrin",
            "eu_status": "Non approuvée",
            "mrl_eu": 0.2,
            "mrl_eu_flag": null,
            "pesticide_type": "Insecticide",
            "dose": "  "
        });
        let row: ColeadRow = serde_json::from_value(json).unwrap();
        let record = row.into_record("test").unwrap();
        assert_eq!(record.pesticide_type.as_deref(), Some("Insecticide"));
        assert!(record.gap.is_none());
    }
}
