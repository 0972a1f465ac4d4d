//! History source trait and request/response types.
//!
//! Calibration needs roughly a year of daily closes for one symbol. The
//! [`HistorySource`] contract keeps the profiler independent of any one
//! provider: the production adapter talks to Yahoo chart data, and tests use
//! an in-memory fixture source.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::domain::{Region, Symbol, UtcDateTime};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    NoData,
    UnsupportedRegion,
    InvalidRequest,
    Internal,
}

/// Structured source error surfaced through the profiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn no_data(symbol: &Symbol, region: Region) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: format!("no history available for '{symbol}' in region {region}"),
            retryable: false,
        }
    }

    pub fn unsupported_region(value: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::UnsupportedRegion,
            message: format!("region '{}' is not supported", value.into()),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::UnsupportedRegion => "source.unsupported_region",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for a daily-close history fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub region: Region,
    pub lookback_days: u32,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, region: Region, lookback_days: u32) -> Result<Self, SourceError> {
        if lookback_days == 0 {
            return Err(SourceError::invalid_request(
                "history lookback must cover at least one day",
            ));
        }
        Ok(Self {
            symbol,
            region,
            lookback_days,
        })
    }
}

/// One daily close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub ts: UtcDateTime,
    pub close: f64,
}

/// Daily closes in ascending timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub region: Region,
    pub points: Vec<HistoryPoint>,
}

impl PriceHistory {
    /// Closes in order, any non-finite values already filtered by the adapter.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|point| point.close)
    }
}

/// History source contract.
///
/// Implementations must be `Send + Sync` as they are shared behind an `Arc`.
pub trait HistorySource: Send + Sync {
    /// Stable identifier used in logs.
    fn id(&self) -> &'static str;

    /// Fetch daily closes for the requested symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider is unreachable, responds with a
    /// non-success status, or has no usable closes for the symbol.
    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>>;
}
