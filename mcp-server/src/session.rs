//! Per-call session state
//!
//! One server process serves one voice session. Everything the tools collect
//! lives here in memory and is gone when the process exits.

use insurance_service::{
    ActiveCoverageResult, CancellationHandle, CancellationSignal, CopayResult,
    EligibilityResponse, PatientName, ValidatedResponse,
};
use tokio::sync::{Mutex, MutexGuard};

/// What the tools have collected and derived so far
#[derive(Debug, Default)]
pub struct SessionState {
    pub name: Option<PatientName>,
    /// Normalized member ID
    pub member_id: Option<String>,
    pub raw_response: Option<EligibilityResponse>,
    pub validated: Option<ValidatedResponse>,
    pub coverage: Option<ActiveCoverageResult>,
    pub copay: Option<CopayResult>,
}

impl SessionState {
    /// Drop everything derived from a previous lookup
    pub fn reset_lookup(&mut self) {
        self.raw_response = None;
        self.validated = None;
        self.coverage = None;
        self.copay = None;
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
    cancel: CancellationHandle,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    /// Signal handed to eligibility lookups
    pub fn cancellation(&self) -> CancellationSignal {
        self.cancel.signal()
    }

    /// Abandon any in-flight lookup; later lookups fail fast
    pub fn end(&self) {
        self.cancel.cancel();
    }

    pub fn is_ended(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_reset_lookup_keeps_identity() {
        let session = Session::new();
        {
            let mut state = session.state().await;
            state.name = Some(PatientName::new("John", "Doe").unwrap());
            state.member_id = Some("AETNA12345".into());
            state.raw_response = Some(EligibilityResponse::new(json!({ "subscriber": {} })));
            state.reset_lookup();
        }
        let state = session.state().await;
        assert!(state.raw_response.is_none());
        assert_eq!(state.member_id.as_deref(), Some("AETNA12345"));
    }

    #[test]
    fn test_end_fires_cancellation() {
        let session = Session::new();
        let signal = session.cancellation();
        assert!(!signal.is_cancelled());
        session.end();
        assert!(signal.is_cancelled());
        assert!(session.is_ended());
    }
}
