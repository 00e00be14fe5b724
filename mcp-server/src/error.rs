use error_common::{codes, messages, UserFacing};
use serde_json::{error::Category, json};
use thiserror::Error;

use crate::protocol::{error_codes, McpProtocolError};

#[derive(Error, Debug)]
pub enum McpError {
    /// Line was not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Valid JSON that is not a JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Tool error: {0}")]
    Tool(String),

    /// Encoding a result failed on our side
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// Classify a failure to decode an incoming line
    pub fn from_request_error(error: serde_json::Error) -> Self {
        match error.classify() {
            Category::Data => Self::InvalidRequest(error.to_string()),
            Category::Syntax | Category::Eof | Category::Io => Self::Parse(error.to_string()),
        }
    }

    /// JSON-RPC error code for this failure
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::Parse(_) => error_codes::PARSE_ERROR,
            Self::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            Self::InvalidParams(_) | Self::Tool(_) => error_codes::INVALID_PARAMS,
            Self::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            Self::Serialization(_) | Self::Io(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Wire form sent back to the client
    pub fn to_protocol_error(&self) -> McpProtocolError {
        McpProtocolError {
            code: self.rpc_code(),
            message: self.to_string(),
            data: Some(json!({ "errorCode": self.error_code() })),
        }
    }
}

impl UserFacing for McpError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => codes::protocol::PARSE_ERROR,
            Self::InvalidRequest(_) => codes::protocol::INVALID_REQUEST,
            Self::InvalidParams(_) => codes::protocol::INVALID_PARAMS,
            Self::MethodNotFound(_) => codes::protocol::METHOD_NOT_FOUND,
            Self::Tool(_) => codes::protocol::TOOL_FAILED,
            Self::Serialization(_) | Self::Io(_) => codes::system::INTERNAL,
        }
    }

    fn user_message(&self) -> &'static str {
        messages::INTERNAL
    }
}

pub type McpResult<T> = Result<T, McpError>;
