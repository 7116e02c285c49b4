//! Compliance queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mrl_core::{CropName, Market, MgPerKg, RecordKey, SubstanceName, ValidationError};

/// One compliance question: may this residue of this substance on this crop
/// be exported to this market?
///
/// Constructed fresh per request. `as_of` anchors date-dependent notices
/// (approval expiry) so that evaluation stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceQuery {
    pub crop: CropName,
    pub substance: SubstanceName,
    pub market: Market,
    /// Measured residue. `None` requests an approval-only check.
    pub residue: Option<MgPerKg>,
    pub as_of: NaiveDate,
}

impl ComplianceQuery {
    /// Validate raw caller input.
    ///
    /// Names are trimmed and checked, the market is parsed
    /// case-insensitively, and the residue must be finite and non-negative.
    pub fn parse(
        crop: &str,
        substance: &str,
        market: &str,
        residue: Option<f64>,
        as_of: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            crop: CropName::parse(crop)?,
            substance: SubstanceName::parse(substance)?,
            market: market.parse()?,
            residue: residue.map(MgPerKg::residue).transpose()?,
            as_of,
        })
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.crop.clone(), self.substance.clone())
    }
}
