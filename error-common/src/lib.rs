//! Common error handling utilities for the eligibility assistant
//!
//! Every crate in the workspace defines its own `thiserror` enum; this crate
//! gives them a shared vocabulary:
//!
//! - **Error Codes**: stable codes (`ELIG_2002`, `RPC_3002`, ...) returned to
//!   the agent next to each failure
//! - **User-facing phrasing**: the [`UserFacing`] trait maps a failure to the
//!   sentence the voice agent should speak ("please repeat", "service
//!   unavailable", "cannot verify right now")
//! - **Service errors**: [`ServiceError`] for binaries and glue code
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, messages, ServiceError, UserFacing};
//!
//! let err = ServiceError::ConfigError("STEDI_MAX_ATTEMPTS must be a number".to_string());
//! assert_eq!(err.error_code(), codes::system::CONFIGURATION_INVALID);
//! assert_eq!(err.user_message(), messages::INTERNAL);
//! assert!(!err.is_retryable());
//! ```

pub mod codes;
pub mod reporting;
pub mod types;

pub use reporting::*;
pub use types::*;
