//! Violation event and trust state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single reported act of misconduct.
///
/// Immutable once appended to a trust ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationEvent {
    /// Penalty factor in `[0, 1]`; 1 wipes out all trust.
    pub severity: f64,
    pub occurred_at: DateTime<Utc>,
    pub note: String,
}

impl ViolationEvent {
    /// Build an event stamped with the current time.
    pub fn now(severity: f64, note: impl Into<String>) -> Self {
        Self {
            severity,
            occurred_at: Utc::now(),
            note: note.into(),
        }
    }
}

/// Trust after replaying one stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustSnapshot {
    pub timestamp: DateTime<Utc>,
    pub trust_after_event: f64,
    pub severity: f64,
    pub note: String,
}

/// Coarse ledger state.
///
/// `Active → Restricted` is one-way until an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustStatus {
    /// Current trust is above zero.
    Active,
    /// Current trust has collapsed to exactly zero.
    Restricted,
}
