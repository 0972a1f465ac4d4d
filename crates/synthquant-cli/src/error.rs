use thiserror::Error;

use synthquant_service::ServiceError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] synthquant_core::ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Service(error) => match error {
                ServiceError::InvalidParameter(_) | ServiceError::UnsupportedRegion(_) => 2,
                ServiceError::NotFound(_) => 3,
                ServiceError::DataUnavailable(_) => 6,
                ServiceError::RateLimited { .. } => 7,
            },
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
