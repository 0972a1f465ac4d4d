//! # SynthQuant Engine
//!
//! Deterministic synthetic price-path generation.
//!
//! ## Overview
//!
//! The engine is a set of pure, CPU-bound building blocks:
//!
//! - **Seeded RNG derivation**: one reproducible random stream per
//!   (seed, symbol, asset index) triple
//! - **GBM path generator**: geometric Brownian motion in log space, with
//!   daily calibration statistics rescaled to the sampling cadence
//! - **Event injector**: ordered shock events (IPO, crash, earnings gap)
//!   applied as pure transforms over a generated series
//! - **Realism scoring**: a summary heuristic attached to finished datasets
//!
//! Nothing here touches shared state or performs I/O; determinism is the
//! whole point. Given the same inputs, two runs produce identical series.

pub mod error;
pub mod events;
pub mod gbm;
pub mod realism;
pub mod rng;

pub use error::EngineError;
pub use events::{apply_events, EventSpec, DEFAULT_CRASH_DURATION};
pub use gbm::{generate_series, GbmParams, DEFAULT_DRIFT, DEFAULT_VOLATILITY};
pub use realism::realism_score;
pub use rng::{derive_seed, PathRng};
