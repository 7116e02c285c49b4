//! # Markets and Approval Status
//!
//! The two regulatory markets a record carries limits for, and the EU
//! approval flag. Codex Alimentarius publishes limits only; it has no
//! use-authorization gate.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Target export market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Market {
    /// European Union (Regulation (EC) No 396/2005).
    #[serde(rename = "EU", alias = "eu")]
    Eu,
    /// Codex Alimentarius international reference standard.
    #[serde(rename = "Codex", alias = "CODEX", alias = "codex")]
    Codex,
}

impl Market {
    /// All supported markets.
    pub fn all() -> &'static [Market] {
        &[Self::Eu, Self::Codex]
    }

    /// Canonical label, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eu => "EU",
            Self::Codex => "Codex",
        }
    }

    /// Whether the market requires the substance to be approved for use.
    pub fn has_approval_gate(&self) -> bool {
        match self {
            Self::Eu => true,
            Self::Codex => false,
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = ValidationError;

    /// Case-insensitive: `eu`, `EU`, `codex`, `Codex`, `CODEX`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eu" => Ok(Self::Eu),
            "codex" => Ok(Self::Codex),
            _ => Err(ValidationError::UnknownMarket(s.to_string())),
        }
    }
}

/// EU approval status of an active substance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Approved,
    NotApproved,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::NotApproved => "NOT_APPROVED",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = ValidationError;

    /// Accepts the canonical labels and the French labels used by the
    /// COLEAD database. "Non reprise dans la liste" (not included in the
    /// approved list) counts as not approved.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "approved" | "approuvée" | "approuvee" => Ok(Self::Approved),
            "not_approved" | "non_approuvée" | "non_approuvee" | "non_reprise_dans_la_liste" => {
                Ok(Self::NotApproved)
            }
            _ => Err(ValidationError::UnknownApprovalStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_parse_is_case_insensitive() {
        assert_eq!("EU".parse::<Market>().unwrap(), Market::Eu);
        assert_eq!("eu".parse::<Market>().unwrap(), Market::Eu);
        assert_eq!("Codex".parse::<Market>().unwrap(), Market::Codex);
        assert_eq!(" CODEX ".parse::<Market>().unwrap(), Market::Codex);
    }

    #[test]
    fn market_parse_rejects_unknown() {
        assert_eq!(
            "US".parse::<Market>(),
            Err(ValidationError::UnknownMarket("US".into()))
        );
        assert!("".parse::<Market>().is_err());
    }

    #[test]
    fn only_eu_has_approval_gate() {
        assert!(Market::Eu.has_approval_gate());
        assert!(!Market::Codex.has_approval_gate());
    }

    #[test]
    fn market_serde_matches_as_str() {
        for market in Market::all() {
            let json = serde_json::to_string(market).unwrap();
            assert_eq!(json, format!("\"{}\"", market.as_str()));
        }
        let parsed: Market = serde_json::from_str("\"codex\"").unwrap();
        assert_eq!(parsed, Market::Codex);
    }

    #[test]
    fn approval_status_accepts_colead_labels() {
        assert_eq!(
            "Approuvée".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::Approved
        );
        assert_eq!(
            "Non approuvée".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::NotApproved
        );
        assert_eq!(
            "Non reprise dans la liste".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::NotApproved
        );
        assert_eq!(
            "NOT_APPROVED".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::NotApproved
        );
        assert!("pending".parse::<ApprovalStatus>().is_err());
    }
}
