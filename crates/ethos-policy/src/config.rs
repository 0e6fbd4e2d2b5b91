//! Pipeline configuration schema.
//!
//! A `PipelineConfig` is deserialized from TOML. Every key is optional and
//! falls back to the documented default.
//!
//! Example:
//! ```toml
//! threshold = 0.7
//! phi_weight = 1.0
//! risk_cutoff = 0.5
//! include_sentiment = false
//! default_ethics = 0.0
//! ```

use serde::{Deserialize, Serialize};

use ethos_contracts::error::{ensure_unit, EthosError, EthosResult};

/// Tunables for `PolicyPipeline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Minimum composite index for approval.
    pub threshold: f64,

    /// Weight applied to the golden-ratio balance penalty.
    pub phi_weight: f64,

    /// Risk scores at or below this fail the risk gate.
    pub risk_cutoff: f64,

    /// Multiply the index by the intent's stakeholder sentiment.
    pub include_sentiment: bool,

    /// Ethics score used when an intent carries no ethics factors.
    ///
    /// Defaults to 0, which rejects such intents outright.
    pub default_ethics: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            phi_weight: 1.0,
            risk_cutoff: 0.5,
            include_sentiment: false,
            default_ethics: 0.0,
        }
    }
}

impl PipelineConfig {
    /// Check every value is in range, naming the first offender.
    pub fn validate(&self) -> EthosResult<()> {
        let check = |field: &str, value: f64| {
            ensure_unit(field, value).map_err(|_| EthosError::ConfigError {
                reason: format!("'{}' must lie in [0, 1], got {}", field, value),
            })
        };
        check("threshold", self.threshold)?;
        check("risk_cutoff", self.risk_cutoff)?;
        check("default_ethics", self.default_ethics)?;
        if !self.phi_weight.is_finite() || self.phi_weight < 0.0 {
            return Err(EthosError::ConfigError {
                reason: format!(
                    "'phi_weight' must be finite and non-negative, got {}",
                    self.phi_weight
                ),
            });
        }
        Ok(())
    }
}
