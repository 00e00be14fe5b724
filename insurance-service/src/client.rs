//! STEDI eligibility API client
use std::time::Duration;

use async_trait::async_trait;
use logger_redacted::{mask_name, redact_member_id, PiiRedactor};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::cancellation::CancellationSignal;
use crate::config::{RetryPolicy, StediConfig};
use crate::error::{InsuranceError, InsuranceResult};
use crate::models::{EligibilityRequest, EligibilityResponse};

/// Longest upstream error body kept in logs
const MAX_LOGGED_BODY: usize = 512;

/// One outbound eligibility check
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EligibilityApi: Send + Sync {
    /// Send `request` and return the raw response document.
    ///
    /// # Errors
    ///
    /// [`InsuranceError::Transport`] on network failure, non-2xx status or an
    /// unparseable body; [`InsuranceError::Cancelled`] when `cancel` fires first.
    async fn check_eligibility(
        &self,
        request: &EligibilityRequest,
        cancel: &CancellationSignal,
    ) -> InsuranceResult<EligibilityResponse>;
}

/// A failed attempt and whether another attempt may succeed
struct AttemptFailure {
    error: InsuranceError,
    retryable: bool,
}

/// HTTP client for the STEDI real-time eligibility endpoint
pub struct StediClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<SecretString>,
    retry: RetryPolicy,
    redactor: PiiRedactor,
}

impl StediClient {
    /// Create a client from resolved configuration
    pub fn new(config: &StediConfig) -> InsuranceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InsuranceError::Config(format!("failed to build HTTP client: {}", e)))?;

        if config.api_key.is_none() {
            warn!("STEDI_API_KEY not set in environment");
        }

        Ok(Self {
            client,
            url: config.eligibility_url(),
            api_key: config.api_key.clone(),
            retry: config.retry.clone(),
            redactor: PiiRedactor::default(),
        })
    }

    async fn send_once(
        &self,
        request: &EligibilityRequest,
    ) -> Result<EligibilityResponse, AttemptFailure> {
        let mut builder = self.client.post(&self.url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(reqwest::header::AUTHORIZATION, key.expose_secret().as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                error!(error = %e, "eligibility_check_timeout");
                AttemptFailure {
                    error: InsuranceError::transport("STEDI API request timed out"),
                    retryable: true,
                }
            } else {
                error!(error = %e, "eligibility_check_error");
                AttemptFailure {
                    error: InsuranceError::transport(format!("STEDI API request failed: {}", e)),
                    retryable: e.is_connect(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = self.redactor.redact(&body).chars().take(MAX_LOGGED_BODY).collect();
            error!(status_code = status.as_u16(), error = %body, "eligibility_check_failed");
            return Err(AttemptFailure {
                error: InsuranceError::http_status(
                    status.as_u16(),
                    format!("STEDI API returned status {}", status.as_u16()),
                ),
                retryable: status.is_server_error()
                    || status == reqwest::StatusCode::TOO_MANY_REQUESTS,
            });
        }

        let body = response.bytes().await.map_err(|e| AttemptFailure {
            error: InsuranceError::transport(format!("failed to read STEDI response: {}", e)),
            retryable: true,
        })?;

        let document: Value = serde_json::from_slice(&body).map_err(|e| {
            error!(status_code = status.as_u16(), error = %e, "eligibility_response_unparseable");
            AttemptFailure {
                error: InsuranceError::http_status(
                    status.as_u16(),
                    format!("STEDI API returned a malformed body: {}", e),
                ),
                retryable: false,
            }
        })?;

        Ok(EligibilityResponse::new(document))
    }

    /// Randomized wait in `[min_wait, backoff_ceiling(retry)]`
    fn jittered_backoff(&self, retry: u32) -> Duration {
        let floor = duration_millis(self.retry.min_wait);
        let ceiling = duration_millis(self.retry.backoff_ceiling(retry)).max(floor);
        Duration::from_millis(rand::thread_rng().gen_range(floor..=ceiling))
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl EligibilityApi for StediClient {
    async fn check_eligibility(
        &self,
        request: &EligibilityRequest,
        cancel: &CancellationSignal,
    ) -> InsuranceResult<EligibilityResponse> {
        info!(
            first_name = %mask_name(&request.subscriber.first_name),
            last_name = %mask_name(&request.subscriber.last_name),
            member_id = %redact_member_id(&request.subscriber.member_id),
            trading_partner = %request.trading_partner_service_id,
            "checking_eligibility"
        );

        let mut attempt: u32 = 1;
        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(attempt, "eligibility_check_cancelled");
                    return Err(InsuranceError::Cancelled);
                }
                outcome = self.send_once(request) => outcome,
            };

            match outcome {
                Ok(response) => {
                    info!(
                        member_id = %redact_member_id(&request.subscriber.member_id),
                        has_subscriber = response.as_value().get("subscriber").is_some(),
                        attempt,
                        "eligibility_check_success"
                    );
                    return Ok(response);
                }
                Err(failure) if failure.retryable && attempt < self.retry.max_attempts => {
                    let wait = self.jittered_backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        wait_ms = duration_millis(wait),
                        error = %failure.error,
                        "eligibility_check_retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            warn!(attempt, "eligibility_check_cancelled");
                            return Err(InsuranceError::Cancelled);
                        }
                        _ = tokio::time::sleep(wait) => {}
                    }
                    attempt = attempt.saturating_add(1);
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}
