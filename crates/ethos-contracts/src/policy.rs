//! Intent and decision types for the policy pipeline.
//!
//! An `Intent` is the ingest request a collaborator submits; the pipeline
//! answers with exactly one `PolicyDecision`. Every rejection is a valid
//! decision, never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::score::ScoreTrace;

/// A proposed action awaiting a decision.
///
/// Deserializes from JSON with every field but `action` optional:
///
/// ```json
/// { "action": "invest", "roi_proxy": 0.85,
///   "ethics_factors": { "environmental": 0.9, "equity": 0.7 } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Intent {
    /// Discriminant describing the action (e.g. "invest", "payment").
    pub action: String,

    /// Normalized ROI proxy in `[0, 1]`. Absent means zero.
    #[serde(default)]
    pub roi_proxy: Option<f64>,

    /// Named ethics factors (environmental, equity, fairness, ...), each in
    /// `[0, 1]`. Their arithmetic mean becomes the ethics score.
    #[serde(default)]
    pub ethics_factors: BTreeMap<String, f64>,

    /// Severities of the actor's past violations, oldest first.
    #[serde(default)]
    pub past_violations: Vec<f64>,

    /// Fraction of capital at stake. Values above 1 are capped at 1.
    #[serde(default)]
    pub exposure_ratio: f64,

    /// Set when the counterparty is sanctioned or otherwise restricted.
    #[serde(default)]
    pub sanctioned: bool,

    /// Stakeholder sentiment, used only when the pipeline applies it.
    #[serde(default)]
    pub sentiment: Option<f64>,

    /// Arbitrary caller context. The pipeline never inspects this.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }
}

/// Why a decision came out the way it did.
///
/// Precedence when several apply: `ComplianceFail` > `EpiRejection` >
/// `RiskExceeded` > `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Approved,
    ComplianceFail,
    EpiRejection,
    RiskExceeded,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::Approved => "approved",
            ReasonCode::ComplianceFail => "compliance_fail",
            ReasonCode::EpiRejection => "epi_rejection",
            ReasonCode::RiskExceeded => "risk_exceeded",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline's answer for one intent. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub approved: bool,
    pub reason_code: ReasonCode,
    /// Absent only when the compliance gate short-circuited.
    pub score_trace: Option<ScoreTrace>,
    /// Absent only when the compliance gate short-circuited.
    pub risk_score: Option<f64>,
}

impl PolicyDecision {
    pub fn compliance_fail() -> Self {
        Self {
            approved: false,
            reason_code: ReasonCode::ComplianceFail,
            score_trace: None,
            risk_score: None,
        }
    }
}
