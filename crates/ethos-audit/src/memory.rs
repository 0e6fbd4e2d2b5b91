//! In-memory implementation of `RecordStore`.
//!
//! `InMemoryRecordStore` keeps all records in a `Vec` behind a `Mutex`.
//! Clones share the same storage, so a test or an operator tool can hold a
//! handle while an `AuditLog` appends through another.

use std::sync::{Arc, Mutex};

use ethos_contracts::{
    audit::AuditRecord,
    error::{EthosError, EthosResult},
};
use ethos_core::traits::RecordStore;

/// A volatile, append-only record store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    pub(crate) records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(e: impl std::fmt::Display) -> EthosError {
    EthosError::storage(format!("record store lock poisoned: {}", e))
}

impl RecordStore for InMemoryRecordStore {
    fn append(&self, record: &AuditRecord) -> EthosResult<()> {
        self.records.lock().map_err(poisoned)?.push(record.clone());
        Ok(())
    }

    fn scan(&self) -> EthosResult<Vec<AuditRecord>> {
        Ok(self.records.lock().map_err(poisoned)?.clone())
    }
}
