//! # SynthQuant Service
//!
//! Multi-tenant service layer over the generation engine.
//!
//! ## Overview
//!
//! - **Request model**: wire shapes for dataset creation and profiling,
//!   validated before anything runs
//! - **Pipeline**: resolve assets (explicit or calibrated), generate paths,
//!   inject events, score, register
//! - **Dataset registry**: concurrency-safe in-memory store and single
//!   owner of every dataset
//! - **Rate limiter**: per-API-key fixed-window counter
//!
//! The registry and limiter are in-memory by design; everything is lost on
//! restart. HTTP routing and API-key issuance live outside this crate and
//! consume these types at the boundary.

pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod registry;
pub mod request;

pub use error::ServiceError;
pub use pipeline::{DatasetService, PREVIEW_ROWS};
pub use rate_limit::{ApiKeyRateLimiter, Decision, RateLimiterConfig};
pub use registry::{Dataset, DatasetRegistry, DatasetSummary};
pub use request::{
    AssetPreview, AssetSpec, CreateDatasetRequest, CreateDatasetResponse, DatasetPreview,
    ProfileRequest, ProfileResponse, ResolvedAsset, MAX_ASSETS_PER_DATASET, MAX_HORIZON_DAYS,
};
