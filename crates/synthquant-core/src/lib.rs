//! # SynthQuant Core
//!
//! Domain types and upstream market-data access for the SynthQuant toolkit.
//!
//! ## Overview
//!
//! This crate provides the foundational components shared by the generation
//! engine and the service layer:
//!
//! - **Canonical domain models** for symbols, regions, sampling frequencies,
//!   timestamps, and price series
//! - **History source trait** for upstream daily-close providers
//! - **Yahoo chart adapter** plus a deterministic fixture source for
//!   offline use and tests
//! - **Market profiler** that turns a real price history into GBM
//!   calibration statistics (mu, sigma, last price)
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | History source adapters (Yahoo, fixture) |
//! | [`domain`] | Domain models (Symbol, Region, Frequency, AssetSeries) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`profiler`] | Market profiler with TTL caching |
//! | [`source`] | History source trait and structured errors |
//! | [`throttling`] | Upstream request budget |
//!
//! ## Error Handling
//!
//! All operations return `Result` types with structured errors. Upstream
//! failures are classified by [`SourceErrorKind`] so callers can map them to
//! the service-level taxonomy (a timeout or empty response becomes
//! "data unavailable", never a silent truncation).
//!
//! ## Security
//!
//! - No credentials are required by the default adapters; nothing is logged
//!   beyond symbols and regions
//! - All HTTP requests carry an explicit timeout

pub mod adapters;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod profiler;
pub mod source;
pub mod throttling;

// Re-export commonly used types at crate root for convenience

pub use adapters::{FixtureHistorySource, YahooHistorySource};

pub use domain::{AssetSeries, Frequency, PricePoint, Region, Symbol, UtcDateTime};

pub use error::ValidationError;

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};

pub use profiler::{CacheStats, MarketProfiler, Profile, ProfilerConfig, TRADING_DAYS_PER_YEAR};

pub use source::{HistoryPoint, HistoryRequest, HistorySource, PriceHistory, SourceError, SourceErrorKind};

pub use throttling::UpstreamThrottle;
