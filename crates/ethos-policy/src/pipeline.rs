//! Policy pipeline implementation.
//!
//! `PolicyPipeline` loads a `PipelineConfig` from a TOML string or file and
//! implements the `DecisionPolicy` trait from ethos-core.
//!
//! Validation algorithm:
//!
//! 1. Compliance gate: a sanctioned intent is rejected with
//!    `ComplianceFail` before any score is computed.
//! 2. Risk: `risk_score = 1 − min(exposure_ratio, 1)`.
//! 3. Ethics: arithmetic mean of the intent's ethics factors, or the
//!    configured default when there are none.
//! 4. Profit: the intent's ROI proxy, or 0.
//! 5. Score: `ScoreEngine::compute_index` over profit, ethics, and past
//!    violations.
//! 6. Decision: approved only when the index is valid AND the risk score
//!    exceeds the cutoff. An invalid index outranks a risk failure.

use std::path::Path;

use tracing::{debug, warn};

use ethos_contracts::{
    error::{ensure_unit, EthosError, EthosResult},
    policy::{Intent, PolicyDecision, ReasonCode},
    score::ScoreInput,
};
use ethos_core::{traits::DecisionPolicy, ScoreEngine};

use crate::config::PipelineConfig;

/// A `DecisionPolicy` combining compliance, risk, and index gates.
///
/// ```rust,ignore
/// use ethos_policy::PolicyPipeline;
///
/// let pipeline = PolicyPipeline::from_file(Path::new("policy.toml"))?;
/// let decision = pipeline.validate(&intent)?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyPipeline {
    config: PipelineConfig,
    engine: ScoreEngine,
}

impl Default for PolicyPipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            engine: ScoreEngine::default(),
        }
    }
}

impl PolicyPipeline {
    /// Build a pipeline from an already-parsed configuration.
    ///
    /// Returns `EthosError::ConfigError` if any value is out of range.
    pub fn new(config: PipelineConfig) -> EthosResult<Self> {
        config.validate()?;
        let engine = ScoreEngine::new(config.threshold, config.phi_weight).map_err(|e| {
            EthosError::ConfigError {
                reason: e.to_string(),
            }
        })?;
        Ok(Self { config, engine })
    }

    /// Parse `s` as TOML and build a `PolicyPipeline`.
    ///
    /// Returns `EthosError::ConfigError` if the TOML is malformed, names an
    /// unknown key, or holds an out-of-range value.
    pub fn from_toml_str(s: &str) -> EthosResult<Self> {
        let config: PipelineConfig = toml::from_str(s).map_err(|e| EthosError::ConfigError {
            reason: format!("failed to parse pipeline TOML: {}", e),
        })?;
        Self::new(config)
    }

    /// Read the file at `path` and parse it as pipeline configuration.
    pub fn from_file(path: &Path) -> EthosResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EthosError::ConfigError {
            reason: format!("failed to read pipeline config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    fn aggregate_ethics(&self, intent: &Intent) -> EthosResult<f64> {
        if intent.ethics_factors.is_empty() {
            warn!(
                action = %intent.action,
                default_ethics = self.config.default_ethics,
                "intent carries no ethics factors; using default"
            );
            return Ok(self.config.default_ethics);
        }

        let mut total = 0.0;
        for (name, value) in &intent.ethics_factors {
            total += ensure_unit(&format!("ethics_factors.{name}"), *value)?;
        }
        Ok(total / intent.ethics_factors.len() as f64)
    }
}

fn risk_score(exposure_ratio: f64) -> EthosResult<f64> {
    if exposure_ratio.is_nan() || exposure_ratio < 0.0 {
        return Err(EthosError::invalid("exposure_ratio", exposure_ratio));
    }
    Ok(1.0 - exposure_ratio.min(1.0))
}

impl DecisionPolicy for PolicyPipeline {
    /// Validate `intent` through the compliance, risk, and index gates.
    ///
    /// Out-of-range profit, ethics factors, sentiment, violations, or
    /// exposure produce `EthosError::InvalidInput`; every other outcome is
    /// an `Ok(PolicyDecision)`.
    fn validate(&self, intent: &Intent) -> EthosResult<PolicyDecision> {
        debug!(action = %intent.action, "validating intent");

        if intent.sanctioned {
            warn!(action = %intent.action, "compliance gate rejected sanctioned intent");
            return Ok(PolicyDecision::compliance_fail());
        }

        let risk = risk_score(intent.exposure_ratio)?;
        let ethics = self.aggregate_ethics(intent)?;

        let mut input = ScoreInput::new(intent.roi_proxy.unwrap_or(0.0), ethics)
            .with_violations(intent.past_violations.clone());
        if let Some(sentiment) = intent.sentiment {
            input = input.with_sentiment(sentiment);
        }

        let outcome = self
            .engine
            .compute_index(&input, self.config.include_sentiment)?;

        let reason_code = if !outcome.valid {
            ReasonCode::EpiRejection
        } else if risk <= self.config.risk_cutoff {
            ReasonCode::RiskExceeded
        } else {
            ReasonCode::Approved
        };
        let approved = reason_code == ReasonCode::Approved;

        if approved {
            debug!(
                action = %intent.action,
                index = outcome.index,
                risk_score = risk,
                "intent approved"
            );
        } else {
            warn!(
                action = %intent.action,
                reason_code = %reason_code,
                index = outcome.index,
                risk_score = risk,
                trace_reason = %outcome.trace.reason,
                "intent rejected"
            );
        }

        Ok(PolicyDecision {
            approved,
            reason_code,
            score_trace: Some(outcome.trace),
            risk_score: Some(risk),
        })
    }
}
