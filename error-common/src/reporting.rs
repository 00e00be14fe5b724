// Error reporting utilities
// Maps typed failures onto stable codes and the phrasing the voice agent speaks.

/// Spoken phrasing shared by every crate that surfaces errors to a caller.
pub mod messages {
    pub const ASK_TO_REPEAT: &str =
        "Sorry, I didn't catch that. Could you please repeat it for me?";
    pub const SERVICE_UNAVAILABLE: &str = "I'm having trouble connecting to the insurance system. \
         Would you like me to connect you with a representative?";
    pub const CANNOT_VERIFY: &str = "I'm having trouble reading your insurance information. \
         Let me verify your details again. Could you please confirm your name and member ID?";
    pub const NO_ELIGIBILITY_DATA: &str =
        "No eligibility data found. Let me check your information again.";
    pub const CANCELLED: &str = "The eligibility check was stopped before it finished.";
    pub const INTERNAL: &str =
        "Something went wrong on my side. Let me connect you with a representative.";
}

/// Errors that can be surfaced to an end user through the agent.
///
/// Implementors decide the stable error code, the sentence the agent should
/// speak, and whether re-invoking the failed operation may succeed.
pub trait UserFacing: std::error::Error {
    /// Stable machine-readable code from [`crate::codes`]
    fn error_code(&self) -> &'static str;

    /// Sentence the agent can speak verbatim
    fn user_message(&self) -> &'static str;

    /// Whether the caller may retry by re-invoking the operation
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Log a user-facing error at warn level with its code and retry hint
pub fn report<E: UserFacing + ?Sized>(operation: &str, error: &E) {
    tracing::warn!(
        operation = operation,
        error_code = error.error_code(),
        retryable = error.is_retryable(),
        error = %error,
        "operation failed"
    );
}
