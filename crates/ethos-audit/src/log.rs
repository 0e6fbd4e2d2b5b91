//! The audit log: id assignment, hashing, and persistence of decisions.
//!
//! `AuditLog` owns a `RecordStore` and a monotonic sequence counter. Each
//! `append` holds the counter's mutex across id assignment, hashing, and the
//! store write, so concurrent appends never share an id and never
//! interleave. Ids do not depend on the clock: two entries appended within
//! the same tick still receive distinct, ordered ids.

use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ethos_contracts::{
    audit::{AuditEntry, AuditQuery, AuditRecord, Fields},
    error::{EthosError, EthosResult},
    policy::PolicyDecision,
};
use ethos_core::traits::RecordStore;

use crate::{
    digest::{self, hash_record},
    memory::InMemoryRecordStore,
    summary::AuditSummary,
};

/// Append-only, hash-verifiable decision log.
pub struct AuditLog {
    session_id: Uuid,
    store: Box<dyn RecordStore>,
    next_sequence: Mutex<u64>,
}

impl AuditLog {
    /// Attach to `store`, resuming the sequence after its last record.
    pub fn open(store: Box<dyn RecordStore>) -> EthosResult<Self> {
        let existing = store.scan()?;
        let next_sequence = existing
            .iter()
            .map(|r| r.sequence_id + 1)
            .max()
            .unwrap_or(0);
        let session_id = Uuid::new_v4();

        info!(
            session_id = %session_id,
            existing_records = existing.len(),
            next_sequence,
            "audit log opened"
        );

        Ok(Self {
            session_id,
            store,
            next_sequence: Mutex::new(next_sequence),
        })
    }

    /// A log over a fresh `InMemoryRecordStore`.
    pub fn in_memory() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            store: Box::new(InMemoryRecordStore::new()),
            next_sequence: Mutex::new(0),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Persist `entry` as a new record and return its integrity hash.
    ///
    /// The sequence counter only advances once the store has accepted the
    /// record; a failed write leaves the log unchanged and surfaces as
    /// `EthosError::StorageFailed`. A trace holding a non-finite number is
    /// rejected with `EthosError::InvalidInput` before anything is written.
    pub fn append(&self, entry: AuditEntry) -> EthosResult<String> {
        if let Some(trace) = &entry.score_trace {
            trace.validate()?;
        }

        let mut next = self
            .next_sequence
            .lock()
            .map_err(|e| EthosError::storage(format!("audit sequence lock poisoned: {}", e)))?;

        let mut record = AuditRecord {
            sequence_id: *next,
            timestamp: Utc::now(),
            actor_id: entry.actor_id,
            action_kind: entry.action_kind,
            narrative: entry.narrative,
            score_trace: entry.score_trace,
            inputs: entry.inputs,
            outputs: entry.outputs,
            extra: entry.extra,
            integrity_hash: String::new(),
        };
        record.integrity_hash = hash_record(&record)?;

        self.store.append(&record)?;
        *next += 1;

        info!(
            session_id = %self.session_id,
            sequence_id = record.sequence_id,
            actor_id = %record.actor_id,
            action_kind = %record.action_kind,
            integrity_hash = %record.integrity_hash,
            "audit record appended"
        );

        Ok(record.integrity_hash)
    }

    /// Append a `PolicyDecision` with its trace.
    ///
    /// The record's outputs hold `approved`, `reason_code`, and
    /// `risk_score`; `inputs` is stored as given.
    pub fn record_decision(
        &self,
        actor_id: &str,
        action_kind: &str,
        narrative: &str,
        decision: &PolicyDecision,
        inputs: Fields,
    ) -> EthosResult<String> {
        let mut entry = AuditEntry::new(actor_id, action_kind, narrative)
            .with_output("approved", decision.approved)
            .with_output("reason_code", decision.reason_code.as_str())
            .with_output("risk_score", json!(decision.risk_score));
        entry.inputs = inputs;
        entry.score_trace = decision.score_trace.clone();
        self.append(entry)
    }

    /// Records matching `query`, most recent first.
    pub fn query(&self, query: &AuditQuery) -> EthosResult<Vec<AuditRecord>> {
        let records = self.store.query(query)?;
        debug!(
            actor_id = ?query.actor_id,
            action_kind = ?query.action_kind,
            limit = query.limit,
            returned = records.len(),
            "audit query"
        );
        Ok(records)
    }

    /// Return `true` when `serialized` hashes to `claimed_hash`.
    pub fn verify(&self, serialized: &[u8], claimed_hash: &str) -> bool {
        digest::verify(serialized, claimed_hash)
    }

    /// Re-hash every stored record. Returns `false` at the first mismatch.
    pub fn verify_integrity(&self) -> EthosResult<bool> {
        for record in self.store.scan()? {
            if let Err(e) = digest::verify_record(&record) {
                warn!(session_id = %self.session_id, error = %e, "audit integrity check failed");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Aggregate counts and the mean index over the whole store.
    pub fn summarize(&self) -> EthosResult<AuditSummary> {
        let records = self.store.scan()?;
        Ok(AuditSummary::from_records(self.session_id, &records))
    }
}
