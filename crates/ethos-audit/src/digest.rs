//! Canonical serialization and integrity hashing for audit records.
//!
//! The hash input is the compact JSON encoding of a preimage that lists
//! every record field except `integrity_hash`, in a fixed order:
//!
//!   1. sequence_id
//!   2. timestamp (RFC 3339, UTC)
//!   3. actor_id
//!   4. action_kind
//!   5. narrative
//!   6. score_trace (or null)
//!   7. inputs, outputs, extra (`BTreeMap`, keys sorted)
//!
//! Two records with identical field values therefore hash identically,
//! whichever process produced them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use ethos_contracts::{
    audit::{AuditRecord, Fields},
    error::{EthosError, EthosResult},
    score::ScoreTrace,
};

#[derive(Serialize)]
struct RecordPreimage<'a> {
    sequence_id: u64,
    timestamp: &'a DateTime<Utc>,
    actor_id: &'a str,
    action_kind: &'a str,
    narrative: &'a str,
    score_trace: Option<&'a ScoreTrace>,
    inputs: &'a Fields,
    outputs: &'a Fields,
    extra: &'a Fields,
}

/// The canonical byte serialization of `record`, excluding its hash.
pub fn canonical_bytes(record: &AuditRecord) -> EthosResult<Vec<u8>> {
    serde_json::to_vec(&RecordPreimage {
        sequence_id: record.sequence_id,
        timestamp: &record.timestamp,
        actor_id: &record.actor_id,
        action_kind: &record.action_kind,
        narrative: &record.narrative,
        score_trace: record.score_trace.as_ref(),
        inputs: &record.inputs,
        outputs: &record.outputs,
        extra: &record.extra,
    })
    .map_err(|e| EthosError::storage(format!("failed to serialize audit record: {}", e)))
}

/// SHA-256 of `bytes` as a lowercase 64-character hex string.
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compute the integrity hash `record` should carry.
pub fn hash_record(record: &AuditRecord) -> EthosResult<String> {
    Ok(digest(&canonical_bytes(record)?))
}

/// Return `true` when `serialized` hashes to `claimed_hash`.
///
/// Comparison is case-insensitive on the hex digits.
pub fn verify(serialized: &[u8], claimed_hash: &str) -> bool {
    digest(serialized).eq_ignore_ascii_case(claimed_hash)
}

/// Recompute `record`'s hash and compare it with the stored one.
///
/// Returns `EthosError::IntegrityMismatch` when they differ.
pub fn verify_record(record: &AuditRecord) -> EthosResult<()> {
    let actual = hash_record(record)?;
    if actual.eq_ignore_ascii_case(&record.integrity_hash) {
        Ok(())
    } else {
        Err(EthosError::IntegrityMismatch {
            sequence_id: record.sequence_id,
            expected: record.integrity_hash.clone(),
            actual,
        })
    }
}
