//! # ethos-policy
//!
//! A TOML-configured policy pipeline for the Ethos decision gate.
//!
//! ## Overview
//!
//! This crate provides [`PolicyPipeline`], which implements the
//! [`DecisionPolicy`](ethos_core::traits::DecisionPolicy) trait. It folds a
//! stub compliance gate and a simple exposure-based risk gate around the
//! Ethical Profitability Index computed by
//! [`ScoreEngine`](ethos_core::ScoreEngine).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use ethos_policy::PolicyPipeline;
//!
//! let pipeline = PolicyPipeline::from_file(Path::new("policy.toml"))?;
//! let decision = pipeline.validate(&intent)?;
//! ```
//!
//! ## Reason precedence
//!
//! `ComplianceFail` > `EpiRejection` > `RiskExceeded` > `Approved`.

pub mod config;
pub mod pipeline;

pub use config::PipelineConfig;
pub use pipeline::PolicyPipeline;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ethos_contracts::{
        error::EthosError,
        policy::{Intent, ReasonCode},
        score::Verdict,
    };
    use ethos_core::traits::DecisionPolicy;

    use crate::PolicyPipeline;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build an intent with the given ROI proxy and ethics factors.
    fn intent(roi: f64, factors: &[(&str, f64)]) -> Intent {
        Intent {
            action: "invest".to_string(),
            roi_proxy: Some(roi),
            ethics_factors: factors
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            ..Intent::default()
        }
    }

    // ── 1. compliance short-circuit ───────────────────────────────────────────

    /// A sanctioned intent is rejected before anything else is looked at,
    /// even when every other field is out of range.
    #[test]
    fn test_sanctioned_intent_short_circuits() {
        let pipeline = PolicyPipeline::default();
        let mut sanctioned = intent(0.9, &[("env", 0.9)]);
        sanctioned.sanctioned = true;
        sanctioned.exposure_ratio = -5.0;
        sanctioned.roi_proxy = Some(7.0);

        let decision = pipeline.validate(&sanctioned).unwrap();

        assert!(!decision.approved);
        assert_eq!(decision.reason_code, ReasonCode::ComplianceFail);
        assert!(decision.score_trace.is_none(), "no score may be computed");
        assert!(decision.risk_score.is_none());
    }

    // ── 2. approval ───────────────────────────────────────────────────────────

    #[test]
    fn test_balanced_intent_is_approved() {
        let pipeline = PolicyPipeline::default();
        let decision = pipeline
            .validate(&intent(0.85, &[("env", 0.9), ("equity", 0.7)]))
            .unwrap();

        assert!(decision.approved);
        assert_eq!(decision.reason_code, ReasonCode::Approved);
        assert_eq!(decision.risk_score, Some(1.0));
        let trace = decision.score_trace.unwrap();
        assert_eq!(trace.verdict, Verdict::Approved);
        assert!(trace.index >= 0.7);
    }

    // ── 3. ethics aggregation ─────────────────────────────────────────────────

    /// Ethics is the arithmetic mean of the factors: (0.875 + 0.625) / 2 =
    /// 0.75, so this intent must score exactly like profit 0.75 / ethics 0.75.
    #[test]
    fn test_ethics_is_mean_of_factors() {
        let pipeline = PolicyPipeline::default();
        let decision = pipeline
            .validate(&intent(0.75, &[("env", 0.875), ("equity", 0.625)]))
            .unwrap();
        let trace = decision.score_trace.unwrap();

        assert_eq!(trace.harmonic_mean, 0.75);
        assert_eq!(trace.balance_penalty, 1.0);
    }

    /// No factors → the strict default of 0 → harmonic mean collapses.
    #[test]
    fn test_missing_ethics_factors_use_default() {
        let strict = PolicyPipeline::default();
        let decision = strict.validate(&intent(0.9, &[])).unwrap();
        assert_eq!(decision.reason_code, ReasonCode::EpiRejection);
        assert_eq!(decision.score_trace.unwrap().verdict, Verdict::RejectedHarmonic);

        let lenient = PolicyPipeline::from_toml_str("default_ethics = 0.9").unwrap();
        let decision = lenient.validate(&intent(0.9, &[])).unwrap();
        assert_eq!(decision.reason_code, ReasonCode::Approved);
    }

    /// Missing ROI proxy defaults to zero profit.
    #[test]
    fn test_missing_profit_defaults_to_zero() {
        let pipeline = PolicyPipeline::default();
        let mut no_roi = intent(0.0, &[("env", 0.9)]);
        no_roi.roi_proxy = None;

        let decision = pipeline.validate(&no_roi).unwrap();
        assert_eq!(decision.reason_code, ReasonCode::EpiRejection);
        assert_eq!(decision.score_trace.unwrap().harmonic_mean, 0.0);
    }

    // ── 4. risk gate ──────────────────────────────────────────────────────────

    #[test]
    fn test_high_exposure_fails_risk_gate() {
        let pipeline = PolicyPipeline::default();
        let mut risky = intent(0.85, &[("env", 0.9), ("equity", 0.7)]);
        risky.exposure_ratio = 0.5;

        let decision = pipeline.validate(&risky).unwrap();

        assert!(!decision.approved);
        assert_eq!(decision.reason_code, ReasonCode::RiskExceeded);
        assert_eq!(decision.risk_score, Some(0.5), "risk of exactly 0.5 must fail");
    }

    #[test]
    fn test_exposure_above_one_is_capped() {
        let pipeline = PolicyPipeline::default();
        let mut risky = intent(0.85, &[("env", 0.8)]);
        risky.exposure_ratio = 3.0;

        let decision = pipeline.validate(&risky).unwrap();
        assert_eq!(decision.risk_score, Some(0.0));
    }

    /// An invalid index outranks a failing risk gate.
    #[test]
    fn test_epi_rejection_outranks_risk() {
        let pipeline = PolicyPipeline::default();
        let mut both = intent(0.95, &[("env", 0.2)]);
        both.exposure_ratio = 0.9;

        let decision = pipeline.validate(&both).unwrap();
        assert_eq!(decision.reason_code, ReasonCode::EpiRejection);
    }

    // ── 5. violations and sentiment ───────────────────────────────────────────

    #[test]
    fn test_past_violations_erode_trust() {
        let pipeline = PolicyPipeline::default();
        let mut tainted = intent(0.8, &[("env", 0.8)]);
        tainted.past_violations = vec![0.4, 0.3];

        let decision = pipeline.validate(&tainted).unwrap();
        let trace = decision.score_trace.unwrap();
        assert!((trace.trust - 0.42).abs() < 1e-12);
        assert_eq!(trace.verdict, Verdict::RejectedTrust);
    }

    #[test]
    fn test_sentiment_applied_when_configured() {
        let pipeline = PolicyPipeline::from_toml_str("include_sentiment = true").unwrap();
        let mut gloomy = intent(0.9, &[("env", 0.9)]);
        gloomy.sentiment = Some(0.5);

        let decision = pipeline.validate(&gloomy).unwrap();
        let trace = decision.score_trace.unwrap();
        assert!(trace.sentiment_applied);
        assert_eq!(decision.reason_code, ReasonCode::EpiRejection);
    }

    // ── 6. input contract ─────────────────────────────────────────────────────

    #[test]
    fn test_out_of_range_inputs_are_errors() {
        let pipeline = PolicyPipeline::default();

        match pipeline.validate(&intent(0.8, &[("env", 1.4)])) {
            Err(EthosError::InvalidInput { field, .. }) => {
                assert_eq!(field, "ethics_factors.env");
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let mut negative = intent(0.8, &[("env", 0.8)]);
        negative.exposure_ratio = -0.1;
        assert!(matches!(
            pipeline.validate(&negative),
            Err(EthosError::InvalidInput { .. })
        ));

        assert!(pipeline.validate(&intent(1.1, &[("env", 0.8)])).is_err());
    }

    // ── 7. configuration ──────────────────────────────────────────────────────

    #[test]
    fn test_toml_overrides_defaults() {
        let pipeline = PolicyPipeline::from_toml_str(
            r#"
            threshold = 0.5
            risk_cutoff = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(pipeline.config().threshold, 0.5);
        assert_eq!(pipeline.config().phi_weight, 1.0);
        assert_eq!(pipeline.engine().threshold(), 0.5);

        // 0.65/0.65 misses the default 0.7 but clears 0.5; risk 0.3 > 0.2.
        let mut marginal = intent(0.65, &[("env", 0.65)]);
        marginal.exposure_ratio = 0.7;
        assert!(pipeline.validate(&marginal).unwrap().approved);
    }

    #[test]
    fn test_toml_parse_error() {
        match PolicyPipeline::from_toml_str("this is not valid toml ][[[") {
            Err(EthosError::ConfigError { reason }) => {
                assert!(
                    reason.contains("failed to parse pipeline TOML"),
                    "expected parse error message, got: {reason}"
                );
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_toml_rejects_unknown_and_out_of_range_keys() {
        assert!(matches!(
            PolicyPipeline::from_toml_str("treshold = 0.7"),
            Err(EthosError::ConfigError { .. })
        ));
        match PolicyPipeline::from_toml_str("threshold = 1.7") {
            Err(EthosError::ConfigError { reason }) => assert!(reason.contains("threshold")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_intent_from_json() {
        let intent: Intent = serde_json::from_str(
            r#"{"action":"payment","roi_proxy":0.85,
                "ethics_factors":{"env":0.9,"equity":0.7},
                "exposure_ratio":0.1}"#,
        )
        .unwrap();
        let decision = PolicyPipeline::default().validate(&intent).unwrap();
        assert!(decision.approved);
        assert!((decision.risk_score.unwrap() - 0.9).abs() < 1e-12);
    }
}
