//! Score engine input and trace types.
//!
//! `ScoreInput` is what callers hand to the score engine; `ScoreTrace` is
//! the diagnostic record it hands back, one per evaluation. The trace is
//! what ends up inside audit records, so every field is serializable.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_unit, EthosError, EthosResult};

fn neutral_sentiment() -> f64 {
    0.5
}

/// Raw profit/ethics/violation inputs for one index evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    /// Normalized ROI proxy in `[0, 1]`.
    pub profit: f64,
    /// Aggregated ethics score in `[0, 1]`.
    pub ethics: f64,
    /// Per-incident severities in `[0, 1]`, applied in order.
    #[serde(default)]
    pub violations: Vec<f64>,
    /// Stakeholder sentiment in `[0, 1]`; only applied when requested.
    #[serde(default = "neutral_sentiment")]
    pub sentiment: f64,
}

impl ScoreInput {
    pub fn new(profit: f64, ethics: f64) -> Self {
        Self {
            profit,
            ethics,
            violations: Vec::new(),
            sentiment: neutral_sentiment(),
        }
    }

    pub fn with_violations(mut self, violations: Vec<f64>) -> Self {
        self.violations = violations;
        self
    }

    pub fn with_sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Check that every component lies in `[0, 1]`.
    ///
    /// The first offending field is reported; NaN is always out of range.
    pub fn validate(&self) -> EthosResult<()> {
        ensure_unit("profit", self.profit)?;
        ensure_unit("ethics", self.ethics)?;
        ensure_unit("sentiment", self.sentiment)?;
        for (idx, severity) in self.violations.iter().enumerate() {
            ensure_unit(&format!("violations[{idx}]"), *severity)?;
        }
        Ok(())
    }
}

/// Outcome category of one index evaluation.
///
/// When the index misses the threshold, the first failing factor (in
/// declaration order below) names the rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    /// Harmonic mean below 0.5.
    RejectedHarmonic,
    /// Balance penalty below 0.7.
    RejectedImbalance,
    /// Trust below 0.5.
    RejectedTrust,
    RejectedBelowThreshold,
}

impl Verdict {
    pub fn is_approved(self) -> bool {
        matches!(self, Verdict::Approved)
    }

    /// Human-readable explanation written into the trace.
    pub fn describe(self, index: f64, threshold: f64) -> String {
        match self {
            Verdict::Approved => "approved".to_string(),
            Verdict::RejectedHarmonic => {
                "rejected: insufficient profit or ethics (harmonic mean too low)".to_string()
            }
            Verdict::RejectedImbalance => {
                "rejected: imbalance between profit and ethics".to_string()
            }
            Verdict::RejectedTrust => "rejected: trust compromised by violations".to_string(),
            Verdict::RejectedBelowThreshold => {
                format!("rejected: index {index:.3} below threshold {threshold}")
            }
        }
    }
}

/// Diagnostic breakdown of one index evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrace {
    pub harmonic_mean: f64,
    pub balance_penalty: f64,
    pub trust: f64,
    /// The composite index: product of the three factors (and sentiment,
    /// when applied).
    pub index: f64,
    /// Distance of profit/ethics from the golden ratio or its reciprocal.
    /// `None` when ethics is zero and the ratio is undefined.
    pub golden_ratio_deviation: Option<f64>,
    pub sentiment_applied: bool,
    /// The sentiment multiplier, present only when it was applied.
    pub sentiment: Option<f64>,
    pub threshold: f64,
    pub verdict: Verdict,
    pub reason: String,
}

impl ScoreTrace {
    /// Check that every numeric field is finite.
    ///
    /// JSON has no encoding for NaN or infinity: a trace failing this check
    /// would be written as `null` and could not be read back.
    pub fn validate(&self) -> EthosResult<()> {
        let numbers = [
            ("score_trace.harmonic_mean", Some(self.harmonic_mean)),
            ("score_trace.balance_penalty", Some(self.balance_penalty)),
            ("score_trace.trust", Some(self.trust)),
            ("score_trace.index", Some(self.index)),
            ("score_trace.golden_ratio_deviation", self.golden_ratio_deviation),
            ("score_trace.sentiment", self.sentiment),
            ("score_trace.threshold", Some(self.threshold)),
        ];
        for (field, value) in numbers {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(EthosError::invalid(field, value));
            }
        }
        Ok(())
    }
}
