//! # ethos-core
//!
//! The numeric and stateful core of the Ethos decision gate.
//!
//! This crate provides:
//! - `ScoreEngine`: the Ethical Profitability Index and its diagnostic trace
//! - `TrustLedger`: decaying trust driven by recorded violations
//! - The seam traits `DecisionPolicy` and `RecordStore`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ethos_contracts::score::ScoreInput;
//! use ethos_core::ScoreEngine;
//!
//! let engine = ScoreEngine::new(0.7, 1.0)?;
//! let outcome = engine.compute_index(&ScoreInput::new(0.9, 0.8), false)?;
//! assert!(outcome.valid);
//! ```

pub mod score;
pub mod traits;
pub mod trust;

pub use score::{IndexOutcome, ScoreEngine, TargetOptimum};
pub use trust::{TrustLedger, TrustReplay};
