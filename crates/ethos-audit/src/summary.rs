//! Aggregate statistics over an audit log.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ethos_contracts::{
    audit::AuditRecord,
    error::{EthosError, EthosResult},
};

/// Full-scan report over every record in a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Session of the `AuditLog` that produced the report.
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub per_actor_counts: BTreeMap<String, usize>,
    pub per_action_counts: BTreeMap<String, usize>,
    /// Records whose trace verdict is approved.
    pub approved_count: usize,
    /// Records carrying a trace whose verdict is not approved.
    pub rejected_count: usize,
    /// Mean index over records carrying a trace; 0 when there are none.
    pub mean_index: f64,
}

impl AuditSummary {
    pub fn from_records(session_id: Uuid, records: &[AuditRecord]) -> Self {
        let mut per_actor_counts = BTreeMap::new();
        let mut per_action_counts = BTreeMap::new();
        let mut approved_count = 0;
        let mut rejected_count = 0;
        let mut index_total = 0.0;

        for record in records {
            *per_actor_counts.entry(record.actor_id.clone()).or_insert(0) += 1;
            *per_action_counts
                .entry(record.action_kind.clone())
                .or_insert(0) += 1;

            if let Some(trace) = &record.score_trace {
                index_total += trace.index;
                if trace.verdict.is_approved() {
                    approved_count += 1;
                } else {
                    rejected_count += 1;
                }
            }
        }

        let traced = approved_count + rejected_count;
        let mean_index = if traced == 0 {
            0.0
        } else {
            index_total / traced as f64
        };

        Self {
            session_id,
            generated_at: Utc::now(),
            total_records: records.len(),
            per_actor_counts,
            per_action_counts,
            approved_count,
            rejected_count,
            mean_index,
        }
    }

    /// Write the report to `path` as pretty-printed JSON, replacing any
    /// existing file.
    pub fn save_json(&self, path: &Path) -> EthosResult<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| EthosError::storage(format!("failed to encode summary: {}", e)))?;
        std::fs::write(path, json).map_err(|e| {
            EthosError::storage(format!(
                "failed to write summary '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
