//! # ethos-contracts
//!
//! Shared types, schemas, and contracts for the Ethos decision gate.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions, range checks, and error types.

pub mod audit;
pub mod error;
pub mod policy;
pub mod score;
pub mod trust;

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use audit::{AuditEntry, AuditQuery, AuditRecord};
    use error::{ensure_unit, EthosError};
    use policy::{Intent, ReasonCode};
    use score::{ScoreInput, ScoreTrace, Verdict};

    fn record(actor: &str, action: &str) -> AuditRecord {
        AuditRecord {
            sequence_id: 0,
            timestamp: Utc::now(),
            actor_id: actor.to_string(),
            action_kind: action.to_string(),
            narrative: String::new(),
            score_trace: None,
            inputs: Default::default(),
            outputs: Default::default(),
            extra: Default::default(),
            integrity_hash: String::new(),
        }
    }

    // ── Range checks ─────────────────────────────────────────────────────────

    #[test]
    fn test_ensure_unit_accepts_bounds() {
        assert_eq!(ensure_unit("profit", 0.0).unwrap(), 0.0);
        assert_eq!(ensure_unit("profit", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_ensure_unit_rejects_out_of_range_and_nan() {
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            match ensure_unit("ethics", bad) {
                Err(EthosError::InvalidInput { field, .. }) => assert_eq!(field, "ethics"),
                other => panic!("expected InvalidInput for {bad}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_score_input_validate_names_offending_violation() {
        let input = ScoreInput::new(0.8, 0.8).with_violations(vec![0.1, 1.5]);
        match input.validate() {
            Err(EthosError::InvalidInput { field, value }) => {
                assert_eq!(field, "violations[1]");
                assert_eq!(value, 1.5);
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_score_input_sentiment_defaults_to_neutral() {
        let input: ScoreInput = serde_json::from_str(r#"{"profit":0.4,"ethics":0.6}"#).unwrap();
        assert_eq!(input.sentiment, 0.5);
        assert!(input.violations.is_empty());
        assert!(input.validate().is_ok());
    }

    fn trace() -> ScoreTrace {
        ScoreTrace {
            harmonic_mean: 0.8,
            balance_penalty: 1.0,
            trust: 1.0,
            index: 0.8,
            golden_ratio_deviation: None,
            sentiment_applied: false,
            sentiment: None,
            threshold: 0.7,
            verdict: Verdict::Approved,
            reason: "approved".to_string(),
        }
    }

    #[test]
    fn test_score_trace_validate_accepts_undefined_deviation() {
        assert!(trace().validate().is_ok(), "None deviation is the encoded infinity");
    }

    #[test]
    fn test_score_trace_validate_rejects_non_finite_numbers() {
        let mut nan_index = trace();
        nan_index.index = f64::NAN;
        match nan_index.validate() {
            Err(EthosError::InvalidInput { field, value }) => {
                assert_eq!(field, "score_trace.index");
                assert!(value.is_nan());
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let mut inf_deviation = trace();
        inf_deviation.golden_ratio_deviation = Some(f64::INFINITY);
        assert!(inf_deviation.validate().is_err());

        let mut inf_sentiment = trace();
        inf_sentiment.sentiment = Some(f64::NEG_INFINITY);
        assert!(inf_sentiment.validate().is_err());
    }

    // ── Verdict / ReasonCode ─────────────────────────────────────────────────

    #[test]
    fn test_verdict_serializes_with_approved_prefix() {
        let json = serde_json::to_string(&Verdict::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        let json = serde_json::to_string(&Verdict::RejectedTrust).unwrap();
        assert_eq!(json, "\"rejected_trust\"");
    }

    #[test]
    fn test_verdict_describe_below_threshold_includes_values() {
        let msg = Verdict::RejectedBelowThreshold.describe(0.6543, 0.7);
        assert!(msg.contains("0.654"), "unexpected message: {msg}");
        assert!(msg.contains("0.7"), "unexpected message: {msg}");
        assert!(Verdict::Approved.describe(0.9, 0.7).starts_with("approved"));
    }

    #[test]
    fn test_reason_code_display_matches_serde() {
        for code in [
            ReasonCode::Approved,
            ReasonCode::ComplianceFail,
            ReasonCode::EpiRejection,
            ReasonCode::RiskExceeded,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code));
        }
    }

    // ── Intent ───────────────────────────────────────────────────────────────

    #[test]
    fn test_intent_deserializes_with_defaults() {
        let intent: Intent = serde_json::from_str(r#"{"action":"invest"}"#).unwrap();
        assert_eq!(intent.action, "invest");
        assert_eq!(intent.roi_proxy, None);
        assert!(intent.ethics_factors.is_empty());
        assert_eq!(intent.exposure_ratio, 0.0);
        assert!(!intent.sanctioned);
    }

    // ── AuditQuery ───────────────────────────────────────────────────────────

    #[test]
    fn test_audit_query_filters_on_both_predicates() {
        let q = AuditQuery::default().actor("CFO-AI").action("payment");
        assert!(q.matches(&record("CFO-AI", "payment")));
        assert!(!q.matches(&record("CFO-AI", "budget_allocation")));
        assert!(!q.matches(&record("CEO-AI", "payment")));
        assert!(AuditQuery::default().matches(&record("anyone", "anything")));
    }

    #[test]
    fn test_audit_entry_builders_populate_maps() {
        let entry = AuditEntry::new("CEO-AI", "proposal", "expand clinic network")
            .with_input("amount", 500_000)
            .with_output("approved", true)
            .with_extra("confidence", 0.87);
        assert_eq!(entry.inputs["amount"], 500_000);
        assert_eq!(entry.outputs["approved"], true);
        assert_eq!(entry.extra["confidence"], 0.87);
    }

    // ── EthosError display messages ──────────────────────────────────────────

    #[test]
    fn test_error_storage_failed_display() {
        let msg = EthosError::storage("disk full").to_string();
        assert!(msg.contains("audit storage failed"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_error_integrity_mismatch_display() {
        let err = EthosError::IntegrityMismatch {
            sequence_id: 7,
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("record 7"));
        assert!(msg.contains("aa") && msg.contains("bb"));
    }
}
