use thiserror::Error;

/// Parameter errors raised before any path is generated.
///
/// Every variant maps to the `invalid_parameter` class at the service
/// boundary; the variants exist so messages stay precise.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("start_price must be positive, got {value}")]
    NonPositiveStartPrice { value: f64 },

    #[error("drift must be finite, got {value}")]
    NonFiniteDrift { value: f64 },

    #[error("volatility must be finite and non-negative, got {value}")]
    InvalidVolatility { value: f64 },

    #[error("horizon_days must be at least 1, got {value}")]
    NonPositiveHorizon { value: i64 },

    #[error("crash magnitude must be in (0, 1], got {value}")]
    InvalidCrashMagnitude { value: f64 },

    #[error("crash duration must be at least 1")]
    ZeroCrashDuration,

    #[error("earnings magnitude must be finite and greater than -1, got {value}")]
    InvalidEarningsMagnitude { value: f64 },
}

impl EngineError {
    pub const fn code(&self) -> &'static str {
        "engine.invalid_parameter"
    }
}
