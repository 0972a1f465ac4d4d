use thiserror::Error;

use synthquant_core::{SourceError, SourceErrorKind, ValidationError};
use synthquant_engine::EngineError;

/// Service-level error taxonomy.
///
/// The boundary layer maps each variant to a transport response; within the
/// service only the kind and message matter. No variant is ever raised after
/// shared state has been mutated, so a failed request leaves no partial
/// dataset behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("unsupported region: {0}")]
    UnsupportedRegion(String),

    #[error("dataset '{0}' not found")]
    NotFound(String),

    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl ServiceError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::DataUnavailable(_) => "data_unavailable",
            Self::UnsupportedRegion(_) => "unsupported_region",
            Self::NotFound(_) => "not_found",
            Self::RateLimited { .. } => "rate_limited",
        }
    }
}

impl From<EngineError> for ServiceError {
    fn from(error: EngineError) -> Self {
        Self::InvalidParameter(error.to_string())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        match &error {
            ValidationError::UnsupportedRegion { value } => Self::UnsupportedRegion(value.clone()),
            _ => Self::InvalidParameter(error.to_string()),
        }
    }
}

impl From<SourceError> for ServiceError {
    fn from(error: SourceError) -> Self {
        match error.kind() {
            SourceErrorKind::UnsupportedRegion => Self::UnsupportedRegion(error.message().to_owned()),
            SourceErrorKind::InvalidRequest => Self::InvalidParameter(error.message().to_owned()),
            SourceErrorKind::NoData | SourceErrorKind::Unavailable | SourceErrorKind::Internal => {
                Self::DataUnavailable(error.message().to_owned())
            }
        }
    }
}
