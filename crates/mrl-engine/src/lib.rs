//! # mrl-engine: Compliance Decision Engine
//!
//! Decides whether a measured pesticide residue on a crop may be exported
//! to a target market, and proposes substitute substances when it may not.
//!
//! ## Pipeline
//!
//! ```text
//! raw input ─► ComplianceQuery ─► RecordResolver ─► Lookup ─► DecisionEngine ─► ComplianceVerdict
//!                                                                   │
//!                                      Recommender ◄── needs_alternatives()
//! ```
//!
//! - [`ComplianceQuery::parse`] rejects malformed input before any lookup.
//! - [`RecordResolver`] is the only component that touches the store. A
//!   missing record is [`Lookup::NotFound`]; a failing store is an error.
//! - [`DecisionEngine::evaluate`] is pure. It walks an ordered
//!   [`Rule`] list and the first match decides.
//! - [`Recommender`] ranks approved substitutes for the same crop.
//! - [`ComplianceChecker`] is the facade callers use.
//!
//! ## Crate Policy
//!
//! - Depends on `mrl-core` only. Store technology is injected as
//!   `Arc<dyn RecordStore>`.
//! - No `.unwrap()` outside tests.

pub mod checker;
pub mod config;
pub mod engine;
pub mod error;
pub mod query;
pub mod recommend;
pub mod resolver;
pub mod rules;
pub mod verdict;

pub use checker::{Assessment, BatchItem, ComplianceChecker};
pub use config::{EngineConfig, EngineConfigError, DEFAULT_EXPIRY_NOTICE_DAYS, DEFAULT_WARNING_RATIO};
pub use engine::DecisionEngine;
pub use error::CheckError;
pub use query::ComplianceQuery;
pub use recommend::{Alternatives, Candidate, Recommender};
pub use resolver::{Lookup, RecordResolver};
pub use rules::{Finding, Rule, RuleContext, RuleId, DEFAULT_RULES};
pub use verdict::{ComplianceStatus, ComplianceVerdict, Severity};
