pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging setup with PHI redaction helpers for the eligibility assistant
///
/// Eligibility lookups carry protected health information: patient names,
/// insurance member IDs and dates of birth. None of these may reach a log
/// line in clear text. This crate provides two things:
///
/// - [`init`]: installs the global `tracing` subscriber. Output always goes
///   to **stderr**, because stdout is the JSON-RPC channel to the voice agent.
/// - Redaction helpers: [`redact_member_id`] and [`mask_name`] for structured
///   fields, and [`PiiRedactor`] for free-form text such as upstream error
///   bodies.
///
/// # Detected Data Types
///
/// - **Member IDs**: AETNA12345 → MEMBER[hash]
/// - **Dates of birth** (YYYYMMDD): 20040404 → DOB[hash]
/// - **Email Addresses**: user@example.com → EMAIL[hash]
/// - **Phone Numbers**: (555) 123-4567 → PHONE[hash]
/// - **SSN**: 123-45-6789 → SSN[hash]
///
/// Hashes are truncated SHA-256 digests, so the same member can be followed
/// across log lines without being identified.
///
/// # Example
///
/// ```rust
/// use logger_redacted::{mask_name, redact_member_id, PiiRedactor};
///
/// let member = redact_member_id("AETNA12345");
/// assert!(member.starts_with("MEMBER["));
/// assert_eq!(mask_name("Jane"), "J***");
///
/// let body = PiiRedactor::default().redact("subscriber AETNA12345 not found");
/// assert!(!body.contains("AETNA12345"));
/// ```
pub fn init(config: &LoggerConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", config.log_level, e))?;

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    Ok(())
}
