//! Audit record, entry, and query types.
//!
//! `AuditEntry` is what a caller hands to the audit log; `AuditRecord` is
//! what the log stores once it has assigned an id, a timestamp, and an
//! integrity hash. Records are never modified after they are written.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::score::ScoreTrace;

/// Key/value payload map. `BTreeMap` keeps key order stable for hashing.
pub type Fields = BTreeMap<String, Value>;

/// Caller-supplied content for one audit record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor_id: String,
    pub action_kind: String,
    /// Natural-language explanation of the decision.
    pub narrative: String,
    pub score_trace: Option<ScoreTrace>,
    pub inputs: Fields,
    pub outputs: Fields,
    pub extra: Fields,
}

impl AuditEntry {
    pub fn new(
        actor_id: impl Into<String>,
        action_kind: impl Into<String>,
        narrative: impl Into<String>,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            action_kind: action_kind.into(),
            narrative: narrative.into(),
            ..Self::default()
        }
    }

    pub fn with_trace(mut self, trace: ScoreTrace) -> Self {
        self.score_trace = Some(trace);
        self
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.outputs.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// One immutable, hash-verifiable entry in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Monotonically increasing position in the log, starting at 0.
    pub sequence_id: u64,
    /// Wall-clock time (UTC) the log accepted the entry.
    pub timestamp: DateTime<Utc>,
    pub actor_id: String,
    pub action_kind: String,
    pub narrative: String,
    pub score_trace: Option<ScoreTrace>,
    pub inputs: Fields,
    pub outputs: Fields,
    pub extra: Fields,
    /// SHA-256 (lowercase hex) over the canonical serialization of every
    /// other field.
    pub integrity_hash: String,
}

/// Filter for `AuditLog::query`. Unset predicates match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    pub actor_id: Option<String>,
    pub action_kind: Option<String>,
    pub limit: usize,
}

impl AuditQuery {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn action(mut self, action_kind: impl Into<String>) -> Self {
        self.action_kind = Some(action_kind.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn matches(&self, record: &AuditRecord) -> bool {
        let actor_ok = self
            .actor_id
            .as_deref()
            .map_or(true, |a| a == record.actor_id);
        let action_ok = self
            .action_kind
            .as_deref()
            .map_or(true, |k| k == record.action_kind);
        actor_ok && action_ok
    }
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            actor_id: None,
            action_kind: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
