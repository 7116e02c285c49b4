//! # Residue Quantities
//!
//! [`MgPerKg`] is the single unit used for MRLs and measured residues. The
//! stack performs no unit conversion: callers supply residues in the same
//! unit as the stored limit.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A finite, non-negative quantity in mg/kg.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct MgPerKg(f64);

impl MgPerKg {
    /// Zero residue.
    pub const ZERO: MgPerKg = MgPerKg(0.0);

    /// Validate a raw value as an MRL.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        Self::checked(value, "mrl")
    }

    /// Validate a raw value as a measured residue.
    pub fn residue(value: f64) -> Result<Self, ValidationError> {
        Self::checked(value, "residue")
    }

    fn checked(value: f64, field: &'static str) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteQuantity { field });
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeQuantity { field, value });
        }
        // Normalize -0.0 so Display never prints "-0.0".
        Ok(Self(value + 0.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for MgPerKg {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MgPerKg> for f64 {
    fn from(q: MgPerKg) -> f64 {
        q.0
    }
}

/// Always shows at least one decimal place: `2.0`, `0.015`, `3.6`.
impl std::fmt::Display for MgPerKg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
