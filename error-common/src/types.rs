use thiserror::Error;

use crate::codes;
use crate::reporting::{messages, UserFacing};

/// Process-level error enum for binaries and glue code
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Transport or protocol channel errors (stdio, sockets)
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

impl UserFacing for ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => codes::system::CONFIGURATION_INVALID,
            Self::TransportError(_) | Self::Other(_) => codes::system::INTERNAL,
        }
    }

    fn user_message(&self) -> &'static str {
        messages::INTERNAL
    }
}

/// Log an error together with the context it surfaced in
pub fn log_error(context: &str, error: &ServiceError) {
    tracing::error!(
        context = context,
        error_code = error.error_code(),
        error = %error,
        "service error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_map_to_internal() {
        let err = ServiceError::TransportError("stdout closed".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), codes::system::INTERNAL);
        assert_eq!(err.user_message(), messages::INTERNAL);
    }

    #[test]
    fn test_config_errors_are_not_retryable() {
        let err = ServiceError::ConfigError("STEDI_TIMEOUT_SECONDS must be a number".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), codes::system::CONFIGURATION_INVALID);
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ServiceError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ServiceError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
