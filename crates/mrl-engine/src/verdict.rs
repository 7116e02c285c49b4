//! # Verdicts
//!
//! The output of one evaluation. A [`ComplianceVerdict`] is created per
//! query, consumed once by the caller, and never persisted.
//!
//! Every verdict carries a message stating the basis for its status; there
//! is no status without an explanation.

use std::fmt;

use serde::{Deserialize, Serialize};

use mrl_core::{ApprovalStatus, CropName, GapGuidance, Market, MgPerKg, SubstanceName};

use crate::rules::RuleId;

/// Reference cited on every verdict.
pub const REF_GAP_DATABASE: &str = "COLEAD GAP Database";
/// Reference cited on EU verdicts.
pub const REF_EU_REGULATION: &str = "EU Reg 396/2005";
/// Reference cited on Codex verdicts.
pub const REF_CODEX: &str = "Codex Alimentarius";

/// Outcome of a compliance evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    /// Residue is within the limit, or the substance is approved and no
    /// residue was measured.
    Compliant,
    /// Substance not approved for the market, or residue above the limit.
    NonCompliant,
    /// Residue within the limit but inside the warning band.
    Warning,
    /// No record or no published limit; compliance cannot be determined.
    Unknown,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "COMPLIANT",
            Self::NonCompliant => "NON_COMPLIANT",
            Self::Warning => "WARNING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently a verdict needs action.
///
/// Ordering: `Info < Minor < Major < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of evaluating one [`ComplianceQuery`](crate::ComplianceQuery).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub status: ComplianceStatus,
    pub severity: Severity,
    /// Human-readable basis for the status.
    pub message: String,
    /// The rule that produced this verdict.
    pub rule: RuleId,
    pub crop: CropName,
    pub substance: SubstanceName,
    pub market: Market,
    /// Residue from the query, if one was measured.
    pub residue: Option<MgPerKg>,
    /// The market-specific MRL the verdict was based on.
    pub mrl: Option<MgPerKg>,
    /// The MRL is set at the limit of quantification.
    pub at_loq: bool,
    /// EU approval status of the record, when a record exists.
    pub approval: Option<ApprovalStatus>,
    /// GAP guidance from the record, when published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<GapGuidance>,
    /// Advisories that do not affect the status (e.g. approval expiry).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
    pub references: Vec<String>,
}

impl ComplianceVerdict {
    /// Whether the caller should look for substitute substances.
    ///
    /// True for NON_COMPLIANT verdicts and for any record that is not
    /// approved in the EU.
    pub fn needs_alternatives(&self) -> bool {
        self.status == ComplianceStatus::NonCompliant
            || self.approval == Some(ApprovalStatus::NotApproved)
    }
}
