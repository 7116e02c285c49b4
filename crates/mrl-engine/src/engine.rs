//! # Decision Engine
//!
//! Turns a [`ComplianceQuery`] and a resolved [`Lookup`] into a
//! [`ComplianceVerdict`] by walking an ordered rule list.
//!
//! Evaluation is a pure function of (query, lookup, configuration): no I/O,
//! no clock reads, no mutation. Evaluating the same inputs twice yields the
//! same verdict.

use mrl_core::{Market, RegulatoryRecord};

use crate::config::EngineConfig;
use crate::query::ComplianceQuery;
use crate::resolver::Lookup;
use crate::rules::{Finding, Rule, RuleContext, RuleId, DEFAULT_RULES};
use crate::verdict::{
    ComplianceStatus, ComplianceVerdict, Severity, REF_CODEX, REF_EU_REGULATION, REF_GAP_DATABASE,
};

/// Evaluates compliance queries against an ordered rule list.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: EngineConfig,
    rules: Vec<Rule>,
}

impl DecisionEngine {
    /// Engine with the standard rule precedence.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rules(config, DEFAULT_RULES.to_vec())
    }

    /// Engine with a caller-supplied precedence.
    pub fn with_rules(config: EngineConfig, rules: Vec<Rule>) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate one query. First matching rule wins.
    ///
    /// A rule list in which nothing matches yields UNKNOWN, never COMPLIANT.
    pub fn evaluate(&self, query: &ComplianceQuery, lookup: &Lookup) -> ComplianceVerdict {
        let record = lookup.record();
        let ctx = RuleContext {
            query,
            record,
            warning_ratio: self.config.warning_ratio(),
        };

        let (rule, finding) = self
            .rules
            .iter()
            .find_map(|rule| (rule.apply)(&ctx).map(|finding| (rule.id, finding)))
            .unwrap_or_else(|| (RuleId::Unmatched, unmatched(query)));

        tracing::debug!(
            crop = %query.crop,
            substance = %query.substance,
            market = %query.market,
            rule = %rule,
            status = %finding.status,
            "compliance rule matched"
        );

        self.build_verdict(query, record, rule, finding)
    }

    fn build_verdict(
        &self,
        query: &ComplianceQuery,
        record: Option<&RegulatoryRecord>,
        rule: RuleId,
        finding: Finding,
    ) -> ComplianceVerdict {
        let limit = match rule {
            RuleId::NoRecord | RuleId::NoLimit => None,
            _ => record.and_then(|r| r.mrl(query.market)).copied(),
        };

        ComplianceVerdict {
            status: finding.status,
            severity: finding.severity,
            message: finding.message,
            rule,
            crop: record.map_or_else(|| query.crop.clone(), |r| r.crop.clone()),
            substance: record.map_or_else(|| query.substance.clone(), |r| r.substance.clone()),
            market: query.market,
            residue: query.residue,
            mrl: limit.map(|l| l.mrl),
            at_loq: limit.is_some_and(|l| l.at_loq),
            approval: record.map(|r| r.eu_status),
            gap: record.and_then(|r| r.gap.clone()).filter(|g| !g.is_empty()),
            notices: record
                .map(|r| self.notices(query, r))
                .unwrap_or_default(),
            references: references(query.market, record.is_some()),
        }
    }

    /// Advisories that never change the status.
    fn notices(&self, query: &ComplianceQuery, record: &RegulatoryRecord) -> Vec<String> {
        let mut notices = Vec::new();
        if query.market != Market::Eu || !record.eu_status.is_approved() {
            return notices;
        }
        if let Some(expires) = record.eu_expiration {
            let days = (expires - query.as_of).num_days();
            if days < 0 {
                notices.push(format!(
                    "EU approval of {} expired on {expires} ({} days ago); confirm renewal before export.",
                    record.substance, -days
                ));
            } else if days < self.config.expiry_notice_days() {
                notices.push(format!(
                    "EU approval of {} expires in {days} days ({expires}); monitor for renewal.",
                    record.substance
                ));
            }
        }
        notices
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn unmatched(query: &ComplianceQuery) -> Finding {
    Finding {
        status: ComplianceStatus::Unknown,
        severity: Severity::Info,
        message: format!(
            "No decision rule applied to {} on {} for the {} market; compliance cannot be determined.",
            query.substance, query.crop, query.market
        ),
    }
}

fn references(market: Market, found: bool) -> Vec<String> {
    let mut refs = vec![REF_GAP_DATABASE.to_string()];
    if found {
        refs.push(
            match market {
                Market::Eu => REF_EU_REGULATION,
                Market::Codex => REF_CODEX,
            }
            .to_string(),
        );
    }
    refs
}
