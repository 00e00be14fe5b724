use error_common::{codes, messages, UserFacing};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsuranceError {
    #[error("Member ID normalization error: {0}")]
    Normalization(String),

    #[error("Invalid patient identity: {0}")]
    InvalidIdentity(String),

    #[error("Eligibility transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    #[error("Invalid eligibility response shape: {0}")]
    InvalidResponseShape(String),

    #[error("Eligibility lookup cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InsuranceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    /// HTTP status of a failed call, when the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl UserFacing for InsuranceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Normalization(_) => codes::eligibility::NORMALIZATION_FAILED,
            Self::InvalidIdentity(_) => codes::validation::INVALID_INPUT,
            Self::Transport { .. } => codes::eligibility::TRANSPORT_FAILED,
            Self::InvalidResponseShape(_) => codes::eligibility::INVALID_RESPONSE_SHAPE,
            Self::Cancelled => codes::eligibility::LOOKUP_CANCELLED,
            Self::Config(_) => codes::system::CONFIGURATION_INVALID,
            Self::Serialization(_) => codes::system::INTERNAL,
        }
    }

    fn user_message(&self) -> &'static str {
        match self {
            Self::Normalization(_) | Self::InvalidIdentity(_) => messages::ASK_TO_REPEAT,
            Self::Transport { .. } => messages::SERVICE_UNAVAILABLE,
            Self::InvalidResponseShape(_) => messages::CANNOT_VERIFY,
            Self::Cancelled => messages::CANCELLED,
            Self::Config(_) | Self::Serialization(_) => messages::INTERNAL,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::InvalidResponseShape(_))
    }
}

pub type InsuranceResult<T> = Result<T, InsuranceError>;
