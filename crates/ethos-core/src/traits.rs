//! Seam traits between the decision core and its collaborators.
//!
//! - `DecisionPolicy`: trusted gate turning an intent into a decision
//! - `RecordStore`: append-only sink behind the audit log
//!
//! Collaborators (agents, API layers, CLIs) depend on these traits, never
//! on concrete pipelines or storage backends.

use ethos_contracts::{
    audit::{AuditQuery, AuditRecord},
    error::EthosResult,
    policy::{Intent, PolicyDecision},
};

/// Turns a proposed action into exactly one decision.
///
/// Implementations must be deterministic and free of I/O. Every business
/// rejection is returned as `Ok(PolicyDecision)`; `Err` is reserved for
/// contract violations such as out-of-range inputs.
pub trait DecisionPolicy: Send + Sync {
    fn validate(&self, intent: &Intent) -> EthosResult<PolicyDecision>;
}

/// Durable, append-only storage for audit records.
///
/// Records handed to `append` are final: implementations never rewrite or
/// delete them. Callers serialize appends; the store itself only has to be
/// safe to share across threads.
pub trait RecordStore: Send + Sync {
    /// Persist one record. Failure is an operational fault.
    fn append(&self, record: &AuditRecord) -> EthosResult<()>;

    /// Every stored record, oldest first.
    fn scan(&self) -> EthosResult<Vec<AuditRecord>>;

    /// Records matching `query`, most recent first, at most `query.limit`.
    fn query(&self, query: &AuditQuery) -> EthosResult<Vec<AuditRecord>> {
        let records = self.scan()?;
        Ok(records
            .into_iter()
            .rev()
            .filter(|r| query.matches(r))
            .take(query.limit)
            .collect())
    }
}
