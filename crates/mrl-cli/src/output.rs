//! Output formatting for the human-readable mode, plus the JSON printer.
//!
//! Formatters return `String`s so they can be asserted on; handlers print.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use mrl_core::{GapGuidance, Market, RegulatoryRecord};
use mrl_engine::{Alternatives, ComplianceStatus, ComplianceVerdict};

/// Process exit code when every verdict passes (or is undetermined).
pub const EXIT_OK: u8 = 0;

/// Process exit code when at least one verdict is NON_COMPLIANT.
pub const EXIT_NON_COMPLIANT: u8 = 2;

/// Exit code for a set of verdicts.
pub fn exit_code<'a>(verdicts: impl IntoIterator<Item = &'a ComplianceVerdict>) -> u8 {
    if verdicts
        .into_iter()
        .any(|v| v.status == ComplianceStatus::NonCompliant)
    {
        EXIT_NON_COMPLIANT
    } else {
        EXIT_OK
    }
}

/// Pretty-print any serializable value to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Multi-line summary of one verdict.
pub fn verdict_summary(verdict: &ComplianceVerdict) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})  {} on {}, {}",
        verdict.status, verdict.severity, verdict.substance, verdict.crop, verdict.market
    );
    let _ = writeln!(out, "  {}", verdict.message);

    let mrl = match verdict.mrl {
        Some(mrl) if verdict.at_loq => format!("{mrl} mg/kg (at LOQ)"),
        Some(mrl) => format!("{mrl} mg/kg"),
        None => "none published".to_string(),
    };
    let residue = verdict
        .residue
        .map(|r| format!("{r} mg/kg"))
        .unwrap_or_else(|| "not measured".to_string());
    let _ = writeln!(out, "  MRL: {mrl}   Residue: {residue}");

    if let Some(gap) = &verdict.gap {
        let _ = writeln!(out, "  GAP: {}", gap_line(gap, verdict.market));
    }
    for notice in &verdict.notices {
        let _ = writeln!(out, "  Notice: {notice}");
    }
    let _ = writeln!(out, "  References: {}", verdict.references.join("; "));
    out
}

fn gap_line(gap: &GapGuidance, market: Market) -> String {
    let mut parts = Vec::new();
    if let Some(dose) = &gap.dose {
        parts.push(format!("dose {dose}"));
    }
    if let Some(max) = gap.max_applications {
        parts.push(format!("max {max} applications"));
    }
    if let Some(interval) = gap.application_interval_days {
        parts.push(format!("{interval} days between applications"));
    }
    if let Some(phi) = gap.preharvest_interval_days(market) {
        parts.push(format!("PHI {phi} days"));
    }
    if parts.is_empty() {
        "no guidance published".to_string()
    } else {
        parts.join(", ")
    }
}

/// One line per verdict, for batch output.
pub fn batch_table(verdicts: &[ComplianceVerdict]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<14} {:<28} {:>10} {:>10}", "STATUS", "SUBSTANCE", "RESIDUE", "MRL");
    for v in verdicts {
        let _ = writeln!(
            out,
            "{:<14} {:<28} {:>10} {:>10}",
            v.status.as_str(),
            v.substance.as_str(),
            v.residue.map(|r| r.to_string()).unwrap_or_else(|| "-".into()),
            v.mrl.map(|m| m.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    let count = |status| verdicts.iter().filter(|v| v.status == status).count();
    let _ = writeln!(
        out,
        "\n{} checked: {} compliant, {} warning, {} non-compliant, {} unknown",
        verdicts.len(),
        count(ComplianceStatus::Compliant),
        count(ComplianceStatus::Warning),
        count(ComplianceStatus::NonCompliant),
        count(ComplianceStatus::Unknown),
    );
    out
}

/// Ranked candidate table.
pub fn alternatives_table(alternatives: &Alternatives) -> String {
    if alternatives.is_empty() {
        return "No alternative substances found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<28} {:<14} {:<9} {:>7} {:>10}",
        "#", "SUBSTANCE", "TYPE", "APPROVED", "PHI(d)", "MRL"
    );
    for (rank, c) in alternatives.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<28} {:<14} {:<9} {:>7} {:>10}",
            rank + 1,
            c.substance.as_str(),
            c.pesticide_type.as_deref().unwrap_or("-"),
            if c.approved_for_market { "yes" } else { "no" },
            c.preharvest_interval_days
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
            c.mrl.map(|m| m.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    out
}

/// Record listing for one crop.
pub fn records_table(records: &[RegulatoryRecord]) -> String {
    if records.is_empty() {
        return "No records published for this crop.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:<13} {:>10} {:>10}  {}",
        "SUBSTANCE", "EU STATUS", "MRL EU", "MRL CODEX", "TYPE"
    );
    for r in records {
        let _ = writeln!(
            out,
            "{:<28} {:<13} {:>10} {:>10}  {}",
            r.substance.as_str(),
            r.eu_status.as_str(),
            r.mrl_eu.map(|l| l.mrl.to_string()).unwrap_or_else(|| "-".into()),
            r.mrl_codex.map(|l| l.mrl.to_string()).unwrap_or_else(|| "-".into()),
            r.pesticide_type.as_deref().unwrap_or("-"),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mrl_core::{ApprovalStatus, CropName, MarketLimit, MgPerKg, SubstanceName};
    use mrl_engine::{ComplianceQuery, DecisionEngine, EngineConfig, Lookup};

    fn record(substance: &str, status: ApprovalStatus, mrl: f64) -> RegulatoryRecord {
        let mut r = RegulatoryRecord::new(
            CropName::parse("Mango").unwrap(),
            SubstanceName::parse(substance).unwrap(),
            status,
        );
        r.mrl_eu = Some(MarketLimit::new(MgPerKg::new(mrl).unwrap()));
        r.gap = Some(GapGuidance {
            dose: Some("0.25 L/ha".into()),
            preharvest_interval_eu_days: Some(7),
            ..GapGuidance::default()
        });
        r
    }

    fn verdict(substance: &str, status: ApprovalStatus, residue: Option<f64>) -> ComplianceVerdict {
        let query = ComplianceQuery::parse(
            "Mango",
            substance,
            "EU",
            residue,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .unwrap();
        let lookup = Lookup::Found(record(substance, status, 4.0));
        DecisionEngine::new(EngineConfig::default()).evaluate(&query, &lookup)
    }

    #[test]
    fn summary_shows_status_limits_and_gap() {
        let text = verdict_summary(&verdict("Azoxystrobin", ApprovalStatus::Approved, Some(2.0)));
        assert!(text.starts_with("COMPLIANT (INFO)  Azoxystrobin on Mango, EU"));
        assert!(text.contains("MRL: 4.0 mg/kg   Residue: 2.0 mg/kg"));
        assert!(text.contains("GAP: dose 0.25 L/ha, PHI 7 days"));
        assert!(text.contains("References: "));
    }

    #[test]
    fn summary_without_residue() {
        let text = verdict_summary(&verdict("Azoxystrobin", ApprovalStatus::Approved, None));
        assert!(text.contains("Residue: not measured"));
    }

    #[test]
    fn exit_code_flags_non_compliance() {
        let ok = verdict("Azoxystrobin", ApprovalStatus::Approved, Some(1.0));
        let bad = verdict("Carbendazim", ApprovalStatus::NotApproved, Some(0.0));
        assert_eq!(exit_code([&ok]), EXIT_OK);
        assert_eq!(exit_code([&ok, &bad]), EXIT_NON_COMPLIANT);
        assert_eq!(exit_code(std::iter::empty()), EXIT_OK);
    }

    #[test]
    fn batch_table_tallies() {
        let verdicts = vec![
            verdict("Azoxystrobin", ApprovalStatus::Approved, Some(1.0)),
            verdict("Boscalid", ApprovalStatus::Approved, Some(3.9)),
            verdict("Carbendazim", ApprovalStatus::NotApproved, None),
        ];
        let text = batch_table(&verdicts);
        assert!(text.contains("3 checked: 1 compliant, 1 warning, 1 non-compliant, 0 unknown"));
    }

    #[test]
    fn empty_listings_say_so() {
        assert_eq!(
            alternatives_table(&Alternatives::ranked(vec![])),
            "No alternative substances found.\n"
        );
        assert_eq!(records_table(&[]), "No records published for this crop.\n");
    }

    #[test]
    fn records_table_lists_each_record() {
        let text = records_table(&[
            record("Azoxystrobin", ApprovalStatus::Approved, 4.0),
            record("Carbendazim", ApprovalStatus::NotApproved, 0.1),
        ]);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("NOT_APPROVED"));
    }
}
