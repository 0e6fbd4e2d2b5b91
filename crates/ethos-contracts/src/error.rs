//! Runtime error types for the Ethos decision gate.
//!
//! Policy rejections are not errors: they travel as `ReasonCode` values
//! inside a successful `PolicyDecision`. The variants here are contract
//! violations and operational faults only.

use thiserror::Error;

/// The unified error type for the Ethos crates.
#[derive(Debug, Error)]
pub enum EthosError {
    /// A score component or ratio fell outside its allowed range.
    #[error("invalid input: {field} = {value} is outside [0, 1]")]
    InvalidInput { field: String, value: f64 },

    /// A stored audit record no longer matches its integrity hash.
    #[error("integrity mismatch for record {sequence_id}: expected {expected}, computed {actual}")]
    IntegrityMismatch {
        sequence_id: u64,
        expected: String,
        actual: String,
    },

    /// The audit store could not persist or read records.
    ///
    /// This is an operational fault, distinct from any policy rejection.
    #[error("audit storage failed: {reason}")]
    StorageFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl EthosError {
    pub fn invalid(field: impl Into<String>, value: f64) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value,
        }
    }

    pub fn storage(reason: impl std::fmt::Display) -> Self {
        Self::StorageFailed {
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the Ethos crates.
pub type EthosResult<T> = Result<T, EthosError>;

/// Reject `value` unless it is a finite number in `[0, 1]`.
pub fn ensure_unit(field: &str, value: f64) -> EthosResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EthosError::invalid(field, value))
    }
}
