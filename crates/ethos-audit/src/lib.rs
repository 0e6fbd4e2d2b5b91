//! # ethos-audit
//!
//! Append-only, SHA-256 verifiable decision audit log for the Ethos decision
//! gate.
//!
//! ## Overview
//!
//! Every decision is wrapped in an `AuditRecord` carrying a monotonic
//! sequence id and the SHA-256 digest of its canonical serialization.
//! Tampering with any field, even a single bit, changes the digest and is
//! detected by `verify` / `verify_integrity`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ethos_audit::{AuditLog, JsonlRecordStore};
//!
//! let log = AuditLog::open(Box::new(JsonlRecordStore::open("audit.jsonl")?))?;
//! let hash = log.record_decision("CFO-AI", "payment", "vendor payout", &decision, inputs)?;
//!
//! assert!(log.verify_integrity()?);
//! let report = log.summarize()?;
//! ```

pub mod digest;
pub mod file;
pub mod log;
pub mod memory;
pub mod summary;

pub use digest::{canonical_bytes, hash_record, verify, verify_record};
pub use file::JsonlRecordStore;
pub use log::AuditLog;
pub use memory::InMemoryRecordStore;
pub use summary::AuditSummary;

// ── Tests ─────────────────────────────────────────────────────────────────────
