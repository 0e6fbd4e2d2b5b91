//! The Ethical Profitability Index (EPI) score engine.
//!
//! ```text
//! EPI = H(p, e) × B(p, e) × T(v) [× sentiment]
//!
//! H(p, e) = 2pe / (p + e)           harmonic mean, 0 if either side is 0
//! B(p, e) = max(0, 1 − w·φ·|p − e|)  balance penalty, φ = (√5 − 1) / 2
//! T(v)    = Π (1 − vᵢ)               trust decay, floored to 0 below 1e-6
//! ```
//!
//! The numeric helpers are pure and do not validate their arguments.
//! `ScoreEngine` is the boundary: it rejects any component outside
//! `[0, 1]` with `EthosError::InvalidInput` before computing anything.

use tracing::debug;

use ethos_contracts::{
    error::{ensure_unit, EthosError, EthosResult},
    score::{ScoreInput, ScoreTrace, Verdict},
};

/// Golden ratio conjugate, (√5 − 1) / 2.
pub const PHI: f64 = 0.618_033_988_749_894_9;

/// Golden ratio, (1 + √5) / 2.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Running trust products below this collapse to exactly zero.
pub const TRUST_FLOOR: f64 = 1e-6;

/// Harmonic mean below this names the rejection.
pub const MIN_HARMONIC_MEAN: f64 = 0.5;
/// Balance penalty below this names the rejection.
pub const MIN_BALANCE_PENALTY: f64 = 0.7;
/// Trust below this names the rejection.
pub const MIN_TRUST: f64 = 0.5;

/// Grid resolution of `optimize_for_target`.
pub const SEARCH_POINTS: usize = 100;
/// Lower bound of the profit search grid.
pub const SEARCH_MIN_PROFIT: f64 = 0.1;
/// Upper bound of the profit search grid.
pub const SEARCH_MAX_PROFIT: f64 = 1.0;
/// Maximum absolute index error for a grid point to qualify.
pub const SEARCH_TOLERANCE: f64 = 0.05;

/// Non-compensatory blend of profit and ethics.
///
/// Collapses to 0 when either side is 0: excellence in one dimension
/// cannot buy back the absence of the other.
pub fn harmonic_mean(p: f64, e: f64) -> f64 {
    if p == 0.0 || e == 0.0 {
        return 0.0;
    }
    2.0 * p * e / (p + e)
}

/// Penalty for divergence between profit and ethics, clamped to `[0, 1]`.
pub fn balance_penalty(p: f64, e: f64, weight: f64) -> f64 {
    (1.0 - weight * PHI * (p - e).abs()).clamp(0.0, 1.0)
}

/// Multiplicative trust decay over `violations`, applied in order.
///
/// Returns exactly 0 as soon as the running product drops below
/// `TRUST_FLOOR`; later violations are not applied.
pub fn trust_decay(violations: &[f64], initial: f64) -> f64 {
    let mut trust = initial;
    for severity in violations {
        trust *= 1.0 - severity;
        if trust < TRUST_FLOOR {
            return 0.0;
        }
    }
    trust
}

/// Distance of `p / e` from the golden ratio or its reciprocal, whichever
/// is closer. Returns `f64::INFINITY` when `e` is 0.
pub fn golden_ratio_deviation(p: f64, e: f64) -> f64 {
    if e == 0.0 {
        return f64::INFINITY;
    }
    let ratio = p / e;
    let to_phi = (ratio - GOLDEN_RATIO).abs();
    let to_inverse = (ratio - 1.0 / GOLDEN_RATIO).abs();
    to_phi.min(to_inverse)
}

/// Result of one `compute_index` call.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOutcome {
    pub index: f64,
    /// `index >= threshold`.
    pub valid: bool,
    pub trace: ScoreTrace,
}

/// Best grid point found by `optimize_for_target`.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetOptimum {
    pub optimal_profit: f64,
    pub achieved_index: f64,
    pub golden_ratio_deviation: f64,
    pub profit_ethics_ratio: f64,
    /// The golden ratio the search steers towards.
    pub ideal_ratio: f64,
}

/// Stateless calculator holding the approval threshold and penalty weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEngine {
    threshold: f64,
    phi_weight: f64,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            phi_weight: 1.0,
        }
    }
}

impl ScoreEngine {
    /// Build an engine.
    ///
    /// `threshold` must lie in `[0, 1]`; `phi_weight` must be finite and
    /// non-negative.
    pub fn new(threshold: f64, phi_weight: f64) -> EthosResult<Self> {
        ensure_unit("threshold", threshold)?;
        if !phi_weight.is_finite() || phi_weight < 0.0 {
            return Err(EthosError::InvalidInput {
                field: "phi_weight".to_string(),
                value: phi_weight,
            });
        }
        Ok(Self {
            threshold,
            phi_weight,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn phi_weight(&self) -> f64 {
        self.phi_weight
    }

    /// Compute the composite index for `input` and explain the verdict.
    ///
    /// When `include_sentiment` is set the index is further multiplied by
    /// `input.sentiment`. A failing index is attributed to the first factor
    /// under its floor: harmonic mean, then balance, then trust; otherwise
    /// it is simply below threshold.
    pub fn compute_index(
        &self,
        input: &ScoreInput,
        include_sentiment: bool,
    ) -> EthosResult<IndexOutcome> {
        input.validate()?;

        let sentiment = include_sentiment.then_some(input.sentiment);
        let trust = trust_decay(&input.violations, 1.0);
        let outcome = self.evaluate(input.profit, input.ethics, trust, sentiment);

        debug!(
            profit = input.profit,
            ethics = input.ethics,
            violations = input.violations.len(),
            index = outcome.index,
            verdict = ?outcome.trace.verdict,
            "computed index"
        );

        Ok(outcome)
    }

    /// Search the profit grid for the point whose index lands within
    /// `SEARCH_TOLERANCE` of `target` with the smallest golden-ratio
    /// deviation.
    ///
    /// The composite function is not smooth, so this is a brute-force scan
    /// over `SEARCH_POINTS` evenly spaced profits in
    /// `[SEARCH_MIN_PROFIT, SEARCH_MAX_PROFIT]`. Ties keep the lower profit.
    /// Returns `None` when no grid point qualifies.
    pub fn optimize_for_target(
        &self,
        target: f64,
        fixed_ethics: f64,
        violations: &[f64],
    ) -> EthosResult<Option<TargetOptimum>> {
        ensure_unit("target", target)?;
        ScoreInput::new(SEARCH_MIN_PROFIT, fixed_ethics)
            .with_violations(violations.to_vec())
            .validate()?;

        let trust = trust_decay(violations, 1.0);
        let step = (SEARCH_MAX_PROFIT - SEARCH_MIN_PROFIT) / (SEARCH_POINTS - 1) as f64;

        let mut best: Option<TargetOptimum> = None;
        for i in 0..SEARCH_POINTS {
            let profit = SEARCH_MIN_PROFIT + step * i as f64;
            let index = self.evaluate(profit, fixed_ethics, trust, None).index;
            if (index - target).abs() >= SEARCH_TOLERANCE {
                continue;
            }

            let deviation = golden_ratio_deviation(profit, fixed_ethics);
            let improves = best
                .as_ref()
                .map_or(deviation.is_finite(), |b| deviation < b.golden_ratio_deviation);
            if improves {
                best = Some(TargetOptimum {
                    optimal_profit: profit,
                    achieved_index: index,
                    golden_ratio_deviation: deviation,
                    profit_ethics_ratio: profit / fixed_ethics,
                    ideal_ratio: GOLDEN_RATIO,
                });
            }
        }

        debug!(
            target,
            fixed_ethics,
            found = best.is_some(),
            "target optimization finished"
        );

        Ok(best)
    }

    fn evaluate(&self, profit: f64, ethics: f64, trust: f64, sentiment: Option<f64>) -> IndexOutcome {
        let hmean = harmonic_mean(profit, ethics);
        let penalty = balance_penalty(profit, ethics, self.phi_weight);

        let mut index = hmean * penalty * trust;
        if let Some(s) = sentiment {
            index *= s;
        }

        let valid = index >= self.threshold;
        let verdict = if valid {
            Verdict::Approved
        } else if hmean < MIN_HARMONIC_MEAN {
            Verdict::RejectedHarmonic
        } else if penalty < MIN_BALANCE_PENALTY {
            Verdict::RejectedImbalance
        } else if trust < MIN_TRUST {
            Verdict::RejectedTrust
        } else {
            Verdict::RejectedBelowThreshold
        };

        let deviation = golden_ratio_deviation(profit, ethics);
        let trace = ScoreTrace {
            harmonic_mean: hmean,
            balance_penalty: penalty,
            trust,
            index,
            golden_ratio_deviation: deviation.is_finite().then_some(deviation),
            sentiment_applied: sentiment.is_some(),
            sentiment,
            threshold: self.threshold,
            verdict,
            reason: verdict.describe(index, self.threshold),
        };

        IndexOutcome {
            index,
            valid,
            trace,
        }
    }
}
