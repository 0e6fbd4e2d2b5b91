//! Stateful trust ledger driven by violation events.
//!
//! Trust decays geometrically: every recorded violation multiplies the
//! current trust by `1 − severity`. Once a step drives trust below the
//! ledger's `min_threshold` it is clamped to exactly zero and the ledger is
//! `Restricted` until an explicit `reset`.
//!
//! Mutation takes `&mut self`, so a ledger has one writer at a time. Share
//! one across threads through `Arc<Mutex<TrustLedger>>`; events are then
//! applied in lock-acquisition order.

use tracing::{info, warn};

use ethos_contracts::{
    error::{ensure_unit, EthosResult},
    trust::{TrustSnapshot, TrustStatus, ViolationEvent},
};

fn decay_step(trust: f64, severity: f64, min_threshold: f64) -> f64 {
    let next = trust * (1.0 - severity);
    if next < min_threshold {
        0.0
    } else {
        next
    }
}

/// Append-only violation history with a decaying current trust value.
#[derive(Debug, Clone)]
pub struct TrustLedger {
    initial_trust: f64,
    min_threshold: f64,
    /// Trust at the start of `history`: `initial_trust`, or the value of
    /// the last reset.
    baseline_trust: f64,
    current_trust: f64,
    history: Vec<ViolationEvent>,
}

impl Default for TrustLedger {
    fn default() -> Self {
        Self {
            initial_trust: 1.0,
            min_threshold: 0.1,
            baseline_trust: 1.0,
            current_trust: 1.0,
            history: Vec::new(),
        }
    }
}

impl TrustLedger {
    /// Create a ledger. Both arguments must lie in `[0, 1]`.
    pub fn new(initial_trust: f64, min_threshold: f64) -> EthosResult<Self> {
        ensure_unit("initial_trust", initial_trust)?;
        ensure_unit("min_threshold", min_threshold)?;
        Ok(Self {
            initial_trust,
            min_threshold,
            baseline_trust: initial_trust,
            current_trust: initial_trust,
            history: Vec::new(),
        })
    }

    pub fn initial_trust(&self) -> f64 {
        self.initial_trust
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    pub fn current_trust(&self) -> f64 {
        self.current_trust
    }

    pub fn history(&self) -> &[ViolationEvent] {
        &self.history
    }

    pub fn status(&self) -> TrustStatus {
        if self.current_trust > 0.0 {
            TrustStatus::Active
        } else {
            TrustStatus::Restricted
        }
    }

    /// Append `event` and apply its decay. Returns the updated trust.
    ///
    /// The severity must lie in `[0, 1]`; a rejected event is not appended.
    pub fn record_violation(&mut self, event: ViolationEvent) -> EthosResult<f64> {
        ensure_unit("severity", event.severity)?;

        let was_active = self.status() == TrustStatus::Active;
        self.current_trust = decay_step(self.current_trust, event.severity, self.min_threshold);

        if was_active && self.status() == TrustStatus::Restricted {
            warn!(
                severity = event.severity,
                note = %event.note,
                min_threshold = self.min_threshold,
                "trust collapsed below threshold; ledger restricted"
            );
        }

        self.history.push(event);
        Ok(self.current_trust)
    }

    /// Clear the history and restore trust to `new_trust`, or to the
    /// initial trust when `None`.
    ///
    /// This is the only way trust ever increases. It models an explicit
    /// administrative rehabilitation and is logged as such.
    pub fn reset(&mut self, new_trust: Option<f64>) -> EthosResult<f64> {
        let restored = match new_trust {
            Some(t) => ensure_unit("new_trust", t)?,
            None => self.initial_trust,
        };

        info!(
            previous_trust = self.current_trust,
            restored_trust = restored,
            cleared_events = self.history.len(),
            "trust ledger reset"
        );

        self.history.clear();
        self.baseline_trust = restored;
        self.current_trust = restored;
        Ok(restored)
    }

    /// Replay the stored events, yielding trust after each one.
    ///
    /// The iterator borrows the ledger, never mutates it, and can be cloned
    /// to restart the replay from any point.
    pub fn history_snapshot(&self) -> TrustReplay<'_> {
        TrustReplay {
            events: self.history.iter(),
            trust: self.baseline_trust,
            min_threshold: self.min_threshold,
        }
    }

    /// Trust after applying `severities` to the initial trust, without
    /// touching the ledger.
    pub fn compute_trust(&self, severities: &[f64]) -> f64 {
        let mut trust = self.initial_trust;
        for severity in severities {
            trust = decay_step(trust, *severity, self.min_threshold);
            if trust == 0.0 {
                break;
            }
        }
        trust
    }
}

/// Lazy replay of a ledger's history. See `TrustLedger::history_snapshot`.
#[derive(Debug, Clone)]
pub struct TrustReplay<'a> {
    events: std::slice::Iter<'a, ViolationEvent>,
    trust: f64,
    min_threshold: f64,
}

impl Iterator for TrustReplay<'_> {
    type Item = TrustSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;
        self.trust = decay_step(self.trust, event.severity, self.min_threshold);
        Some(TrustSnapshot {
            timestamp: event.occurred_at,
            trust_after_event: self.trust,
            severity: event.severity,
            note: event.note.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl ExactSizeIterator for TrustReplay<'_> {}
