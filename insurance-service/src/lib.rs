//! Insurance eligibility verification
//!
//! The pipeline a voice agent runs once it has a caller's name and member ID:
//! - Member ID normalization for speech-to-text output
//! - STEDI eligibility request construction
//! - HTTP lookup with bounded retry and cancellation
//! - Response shape validation
//! - Active-coverage and in-network office visit copay interpretation

pub mod cancellation;
pub mod client;
pub mod config;
pub mod constants;
pub mod copay;
pub mod eligibility;
pub mod error;
pub mod member_id;
pub mod models;
pub mod request;
pub mod service;

pub use cancellation::{CancellationHandle, CancellationSignal};
pub use client::{EligibilityApi, StediClient};
pub use config::{RequestDefaults, RetryPolicy, StediConfig};
pub use copay::CopayFinder;
pub use eligibility::EligibilityChecker;
pub use error::*;
pub use member_id::{is_canonical_member_id, normalize_member_id, spell_out};
pub use models::*;
pub use request::EligibilityRequestBuilder;
pub use service::EligibilityService;
