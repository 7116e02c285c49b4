//! # Decision Rules
//!
//! The decision procedure is an ordered list of [`Rule`]s. The engine walks
//! the list top to bottom and the first rule that produces a [`Finding`]
//! decides the verdict. Precedence is data: [`DEFAULT_RULES`] can be
//! inspected, tested and reordered without touching any rule body.
//!
//! ## Default Precedence
//!
//! | # | Rule              | Condition                                    | Status        |
//! |---|-------------------|----------------------------------------------|---------------|
//! | 1 | `no_record`       | no record for (crop, substance)              | UNKNOWN       |
//! | 2 | `not_approved`    | market gated and substance not approved      | NON_COMPLIANT |
//! | 3 | `no_limit`        | no MRL published for the market              | UNKNOWN       |
//! | 4 | `approval_only`   | no residue measured                          | COMPLIANT     |
//! | 5 | `limit_exceeded`  | residue > MRL                                | NON_COMPLIANT |
//! | 6 | `near_limit`      | ratio × MRL < residue ≤ MRL                  | WARNING       |
//! | 7 | `within_limit`    | residue ≤ ratio × MRL                        | COMPLIANT     |
//!
//! The approval gate sits above every residue comparison: an unapproved
//! substance is non-compliant even at zero measured residue.

use std::fmt;

use serde::{Deserialize, Serialize};

use mrl_core::{ApprovalStatus, MarketLimit, MgPerKg, RegulatoryRecord};

use crate::query::ComplianceQuery;
use crate::verdict::{ComplianceStatus, Severity};

/// Stable identifier of a decision rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    NoRecord,
    NotApproved,
    NoLimit,
    ApprovalOnly,
    LimitExceeded,
    NearLimit,
    WithinLimit,
    /// No rule in a custom rule list matched.
    Unmatched,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRecord => "no_record",
            Self::NotApproved => "not_approved",
            Self::NoLimit => "no_limit",
            Self::ApprovalOnly => "approval_only",
            Self::LimitExceeded => "limit_exceeded",
            Self::NearLimit => "near_limit",
            Self::WithinLimit => "within_limit",
            Self::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub query: &'a ComplianceQuery,
    /// `None` when the store has no record for the pair.
    pub record: Option<&'a RegulatoryRecord>,
    pub warning_ratio: f64,
}

impl<'a> RuleContext<'a> {
    /// The published limit for the queried market.
    pub fn limit(&self) -> Option<&'a MarketLimit> {
        self.record.and_then(|r| r.mrl(self.query.market))
    }

    /// (residue, limit) when both exist.
    fn measured(&self) -> Option<(MgPerKg, &'a MarketLimit)> {
        Some((self.query.residue?, self.limit()?))
    }

    fn pair(&self) -> String {
        format!("{} on {}", self.query.substance, self.query.crop)
    }
}

/// What a matching rule decided.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub status: ComplianceStatus,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn new(status: ComplianceStatus, severity: Severity, message: String) -> Self {
        Self {
            status,
            severity,
            message,
        }
    }
}

/// A condition paired with the verdict it produces.
///
/// `apply` returns `None` when the condition does not hold, letting the
/// engine fall through to the next rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: RuleId,
    pub apply: fn(&RuleContext<'_>) -> Option<Finding>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish_non_exhaustive()
    }
}

/// The standard precedence.
pub const DEFAULT_RULES: [Rule; 7] = [
    Rule {
        id: RuleId::NoRecord,
        apply: no_record,
    },
    Rule {
        id: RuleId::NotApproved,
        apply: not_approved,
    },
    Rule {
        id: RuleId::NoLimit,
        apply: no_limit,
    },
    Rule {
        id: RuleId::ApprovalOnly,
        apply: approval_only,
    },
    Rule {
        id: RuleId::LimitExceeded,
        apply: limit_exceeded,
    },
    Rule {
        id: RuleId::NearLimit,
        apply: near_limit,
    },
    Rule {
        id: RuleId::WithinLimit,
        apply: within_limit,
    },
];

fn no_record(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.record.is_some() {
        return None;
    }
    Some(Finding::new(
        ComplianceStatus::Unknown,
        Severity::Info,
        format!(
            "No published regulatory data for {}; compliance cannot be determined.",
            ctx.pair()
        ),
    ))
}

fn not_approved(ctx: &RuleContext<'_>) -> Option<Finding> {
    let record = ctx.record?;
    let market = ctx.query.market;
    if record.approval_for(market) != Some(ApprovalStatus::NotApproved) {
        return None;
    }
    Some(Finding::new(
        ComplianceStatus::NonCompliant,
        Severity::Critical,
        format!(
            "{} is not approved for use in the {market}; {} treated with it cannot be exported to the {market} regardless of residue level.",
            ctx.query.substance, ctx.query.crop
        ),
    ))
}

fn no_limit(ctx: &RuleContext<'_>) -> Option<Finding> {
    let record = ctx.record?;
    let market = ctx.query.market;
    if ctx.limit().is_some() {
        return None;
    }
    let approval = match record.approval_for(market) {
        Some(status) => format!(" {market} approval status: {status}."),
        None => String::new(),
    };
    Some(Finding::new(
        ComplianceStatus::Unknown,
        Severity::Info,
        format!(
            "No {market} MRL is published for {}; compliance cannot be determined.{approval}",
            ctx.pair()
        ),
    ))
}

fn approval_only(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.query.residue.is_some() {
        return None;
    }
    let limit = ctx.limit()?;
    let market = ctx.query.market;
    let basis = if market.has_approval_gate() {
        format!("{} is approved in the {market}", ctx.pair())
    } else {
        format!("{market} has no approval gate for {}", ctx.pair())
    };
    Some(Finding::new(
        ComplianceStatus::Compliant,
        Severity::Info,
        format!(
            "{basis} ({market} MRL {} mg/kg{}). Only approval was checked; no residue was measured.",
            limit.mrl,
            loq_note(limit)
        ),
    ))
}

fn limit_exceeded(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (residue, limit) = ctx.measured()?;
    if residue.value() <= limit.mrl.value() {
        return None;
    }
    Some(Finding::new(
        ComplianceStatus::NonCompliant,
        Severity::Major,
        format!(
            "Residue {residue} mg/kg exceeds the {} MRL of {} mg/kg{} for {}.",
            ctx.query.market,
            limit.mrl,
            loq_note(limit),
            ctx.pair()
        ),
    ))
}

fn near_limit(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (residue, limit) = ctx.measured()?;
    let band = ctx.warning_ratio * limit.mrl.value();
    let in_band =
        above_band(residue, limit, ctx.warning_ratio) && residue.value() <= limit.mrl.value();
    if !in_band {
        return None;
    }
    Some(Finding::new(
        ComplianceStatus::Warning,
        Severity::Minor,
        format!(
            "Residue {residue} mg/kg is within the {} MRL of {} mg/kg for {} but above {}% of the limit ({} mg/kg). Tighten application control (dose, pre-harvest interval) to restore margin.",
            ctx.query.market,
            limit.mrl,
            ctx.pair(),
            format_quantity(ctx.warning_ratio * 100.0),
            format_quantity(band)
        ),
    ))
}

fn within_limit(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (residue, limit) = ctx.measured()?;
    if above_band(residue, limit, ctx.warning_ratio) {
        return None;
    }
    let margin = limit.mrl.value() - residue.value();
    Some(Finding::new(
        ComplianceStatus::Compliant,
        Severity::Info,
        format!(
            "Residue {residue} mg/kg is within the {} MRL of {} mg/kg{} for {} (margin {} mg/kg).",
            ctx.query.market,
            limit.mrl,
            loq_note(limit),
            ctx.pair(),
            format_quantity(margin)
        ),
    ))
}

/// Relative slack on `ratio × mrl`. The product is computed in binary
/// floating point and can land just below its decimal value (0.8 × 0.7).
const BAND_TOLERANCE: f64 = 1e-9;

/// Whether the residue lies strictly above the warning band threshold.
///
/// Shared by `near_limit` and `within_limit` so the two rules always
/// partition the range below the MRL.
fn above_band(residue: MgPerKg, limit: &MarketLimit, ratio: f64) -> bool {
    let band = ratio * limit.mrl.value();
    residue.value() > band + band.abs() * BAND_TOLERANCE
}

fn loq_note(limit: &MarketLimit) -> &'static str {
    if limit.at_loq {
        " (at LOQ)"
    } else {
        ""
    }
}

/// Round away float noise (4.0 - 3.6 = 0.3999…) for display.
fn format_quantity(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mrl_core::{CropName, SubstanceName};

    fn query(market: &str, residue: Option<f64>) -> ComplianceQuery {
        ComplianceQuery::parse(
            "mango",
            "Azoxystrobin",
            market,
            residue,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        )
        .unwrap()
    }

    fn record(status: ApprovalStatus, mrl_eu: Option<f64>) -> RegulatoryRecord {
        let mut r = RegulatoryRecord::new(
            CropName::parse("mango").unwrap(),
            SubstanceName::parse("Azoxystrobin").unwrap(),
            status,
        );
        r.mrl_eu = mrl_eu.map(|v| MarketLimit::new(MgPerKg::new(v).unwrap()));
        r
    }

    fn ctx<'a>(q: &'a ComplianceQuery, r: Option<&'a RegulatoryRecord>) -> RuleContext<'a> {
        RuleContext {
            query: q,
            record: r,
            warning_ratio: 0.8,
        }
    }

    #[test]
    fn default_order_is_fixed() {
        let ids: Vec<RuleId> = DEFAULT_RULES.iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                RuleId::NoRecord,
                RuleId::NotApproved,
                RuleId::NoLimit,
                RuleId::ApprovalOnly,
                RuleId::LimitExceeded,
                RuleId::NearLimit,
                RuleId::WithinLimit,
            ]
        );
    }

    #[test]
    fn no_record_only_matches_absent_record() {
        let q = query("EU", Some(1.0));
        assert!(no_record(&ctx(&q, None)).is_some());
        let r = record(ApprovalStatus::Approved, Some(4.0));
        assert!(no_record(&ctx(&q, Some(&r))).is_none());
    }

    #[test]
    fn not_approved_ignores_codex() {
        let q = query("Codex", Some(0.0));
        let r = record(ApprovalStatus::NotApproved, Some(4.0));
        assert!(not_approved(&ctx(&q, Some(&r))).is_none());

        let q = query("EU", Some(0.0));
        let finding = not_approved(&ctx(&q, Some(&r))).unwrap();
        assert_eq!(finding.status, ComplianceStatus::NonCompliant);
        assert_eq!(finding.severity, Severity::Critical);
        assert!(finding.message.contains("not approved"));
    }

    #[test]
    fn no_limit_reports_approval_for_eu() {
        let q = query("EU", Some(1.0));
        let r = record(ApprovalStatus::Approved, None);
        let finding = no_limit(&ctx(&q, Some(&r))).unwrap();
        assert_eq!(finding.status, ComplianceStatus::Unknown);
        assert!(finding.message.contains("EU approval status: APPROVED"));
    }

    #[test]
    fn equality_with_limit_is_not_exceeding() {
        let q = query("EU", Some(4.0));
        let r = record(ApprovalStatus::Approved, Some(4.0));
        assert!(limit_exceeded(&ctx(&q, Some(&r))).is_none());
        assert_eq!(
            near_limit(&ctx(&q, Some(&r))).map(|f| f.status),
            Some(ComplianceStatus::Warning)
        );
    }

    #[test]
    fn band_boundary_is_compliant() {
        let q = query("EU", Some(0.8 * 4.0));
        let r = record(ApprovalStatus::Approved, Some(4.0));
        assert!(near_limit(&ctx(&q, Some(&r))).is_none());
        assert_eq!(
            within_limit(&ctx(&q, Some(&r))).map(|f| f.status),
            Some(ComplianceStatus::Compliant)
        );
    }

    #[test]
    fn decimal_band_boundaries_are_compliant() {
        // 0.8 * 0.7 and 0.8 * 0.35 both round below 0.56 and 0.28.
        for (mrl, residue) in [(0.7, 0.56), (0.35, 0.28), (0.9, 0.72), (4.0, 3.2)] {
            let q = query("EU", Some(residue));
            let r = record(ApprovalStatus::Approved, Some(mrl));
            assert!(
                near_limit(&ctx(&q, Some(&r))).is_none(),
                "{residue} against {mrl} fell in the warning band"
            );
            assert_eq!(
                within_limit(&ctx(&q, Some(&r))).map(|f| f.status),
                Some(ComplianceStatus::Compliant),
                "{residue} against {mrl}"
            );
        }
    }

    #[test]
    fn just_above_band_boundary_is_warning() {
        for (mrl, residue) in [(0.7, 0.5601), (0.35, 0.2801), (4.0, 3.2001)] {
            let q = query("EU", Some(residue));
            let r = record(ApprovalStatus::Approved, Some(mrl));
            assert_eq!(
                near_limit(&ctx(&q, Some(&r))).map(|f| f.status),
                Some(ComplianceStatus::Warning),
                "{residue} against {mrl}"
            );
            assert!(within_limit(&ctx(&q, Some(&r))).is_none());
        }
    }

    #[test]
    fn within_limit_reports_margin() {
        let q = query("EU", Some(2.0));
        let r = record(ApprovalStatus::Approved, Some(4.0));
        let finding = within_limit(&ctx(&q, Some(&r))).unwrap();
        assert!(finding.message.contains("Residue 2.0 mg/kg"));
        assert!(finding.message.contains("MRL of 4.0 mg/kg"));
        assert!(finding.message.contains("margin 2.0 mg/kg"));
    }

    #[test]
    fn loq_limits_are_noted() {
        let q = query("EU", Some(0.005));
        let mut r = record(ApprovalStatus::Approved, None);
        r.mrl_eu = Some(MarketLimit::at_loq(MgPerKg::new(0.01).unwrap()));
        let finding = within_limit(&ctx(&q, Some(&r))).unwrap();
        assert!(finding.message.contains("(at LOQ)"));
    }

    #[test]
    fn format_quantity_hides_float_noise() {
        assert_eq!(format_quantity(4.0 - 3.6), "0.4");
        assert_eq!(format_quantity(80.0), "80.0");
        assert_eq!(format_quantity(0.8 * 4.0), "3.2");
    }
}
