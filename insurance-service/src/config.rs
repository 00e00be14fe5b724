use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::constants::*;
use crate::error::{InsuranceError, InsuranceResult};

/// Backoff settings for calls to the eligibility API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: STEDI_API_MAX_RETRIES,
            min_wait: Duration::from_secs(STEDI_RETRY_MIN_WAIT_SECS),
            max_wait: Duration::from_secs(STEDI_RETRY_MAX_WAIT_SECS),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            min_wait: Duration::ZERO,
            max_wait: Duration::ZERO,
        }
    }

    /// Upper bound of the wait before retry number `retry` (1-based):
    /// `min_wait * 2^(retry-1)`, clamped to `[min_wait, max_wait]`.
    pub fn backoff_ceiling(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.min_wait
            .checked_mul(factor)
            .unwrap_or(self.max_wait)
            .clamp(self.min_wait, self.max_wait.max(self.min_wait))
    }
}

/// Payer/provider identifiers placed into every eligibility request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub control_number: String,
    pub trading_partner_service_id: String,
    pub provider_npi: String,
    pub provider_organization_name: String,
    /// Sent when the caller has no date of birth (sandbox payers accept it)
    pub fallback_date_of_birth: String,
    pub service_type_codes: Vec<String>,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            control_number: STEDI_CONTROL_NUMBER.to_string(),
            trading_partner_service_id: STEDI_TRADING_PARTNER_SERVICE_ID.to_string(),
            provider_npi: STEDI_PROVIDER_NPI.to_string(),
            provider_organization_name: STEDI_PROVIDER_ORG_NAME.to_string(),
            fallback_date_of_birth: STEDI_TEST_DATE_OF_BIRTH.to_string(),
            service_type_codes: vec![
                SERVICE_TYPE_CODE_HEALTH_BENEFIT.to_string(),
                SERVICE_TYPE_CODE_OFFICE_VISIT.to_string(),
            ],
        }
    }
}

/// Resolved STEDI configuration
#[derive(Debug, Clone)]
pub struct StediConfig {
    pub api_url: String,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub request: RequestDefaults,
}

impl Default for StediConfig {
    fn default() -> Self {
        Self {
            api_url: STEDI_DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(STEDI_API_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            request: RequestDefaults::default(),
        }
    }
}

impl StediConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> InsuranceResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> InsuranceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // === Endpoint & credentials ===
        if let Some(url) = non_empty(lookup("STEDI_API_URL")) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        config.api_key = non_empty(lookup("STEDI_API_KEY")).map(SecretString::new);

        // === Timeouts & retry ===
        if let Some(secs) = parse_var::<u64>(&lookup, "STEDI_TIMEOUT_SECONDS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, "STEDI_MAX_RETRIES")? {
            if attempts == 0 {
                return Err(InsuranceError::Config(
                    "STEDI_MAX_RETRIES must be at least 1".to_string(),
                ));
            }
            config.retry.max_attempts = attempts;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "STEDI_RETRY_MIN_WAIT_SECONDS")? {
            config.retry.min_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "STEDI_RETRY_MAX_WAIT_SECONDS")? {
            config.retry.max_wait = Duration::from_secs(secs);
        }

        // === Request identifiers ===
        let request = &mut config.request;
        if let Some(value) = non_empty(lookup("STEDI_CONTROL_NUMBER")) {
            request.control_number = value;
        }
        if let Some(value) = non_empty(lookup("STEDI_TRADING_PARTNER_SERVICE_ID")) {
            request.trading_partner_service_id = value;
        }
        if let Some(value) = non_empty(lookup("STEDI_PROVIDER_NPI")) {
            request.provider_npi = value;
        }
        if let Some(value) = non_empty(lookup("STEDI_PROVIDER_ORG_NAME")) {
            request.provider_organization_name = value;
        }
        if let Some(value) = non_empty(lookup("STEDI_TEST_DATE_OF_BIRTH")) {
            request.fallback_date_of_birth = value;
        }

        Ok(config)
    }

    /// Full eligibility endpoint URL
    pub fn eligibility_url(&self) -> String {
        format!("{}{}", self.api_url, STEDI_ELIGIBILITY_ENDPOINT)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> InsuranceResult<Option<T>> {
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| InsuranceError::Config(format!("{} must be a number, got '{}'", key, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_target_aetna_sandbox() {
        let config = StediConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.request.trading_partner_service_id, "60054");
        assert_eq!(config.request.provider_npi, "1999999984");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.api_key.is_none());
        assert_eq!(
            config.eligibility_url(),
            "https://healthcare.us.stedi.com/2024-04-01/change/medicalnetwork/eligibility/v3"
        );
    }

    #[test]
    fn test_environment_overrides() {
        let config = StediConfig::from_lookup(lookup_from(&[
            ("STEDI_API_URL", "http://localhost:9999/"),
            ("STEDI_API_KEY", "test-key"),
            ("STEDI_TIMEOUT_SECONDS", "5"),
            ("STEDI_MAX_RETRIES", "1"),
            ("STEDI_PROVIDER_NPI", "1234567893"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:9999");
        assert_eq!(config.api_key.unwrap().expose_secret(), "test-key");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.request.provider_npi, "1234567893");
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = StediConfig::from_lookup(lookup_from(&[("STEDI_API_KEY", "   ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_numbers_are_config_errors() {
        let err = StediConfig::from_lookup(lookup_from(&[("STEDI_TIMEOUT_SECONDS", "thirty")]))
            .unwrap_err();
        assert!(matches!(err, InsuranceError::Config(msg) if msg.contains("STEDI_TIMEOUT_SECONDS")));

        let err = StediConfig::from_lookup(lookup_from(&[("STEDI_MAX_RETRIES", "0")])).unwrap_err();
        assert!(matches!(err, InsuranceError::Config(_)));
    }

    #[test]
    fn test_backoff_ceiling_grows_and_clamps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_ceiling(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_ceiling(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_ceiling(3), Duration::from_secs(8));
        assert_eq!(policy.backoff_ceiling(4), Duration::from_secs(10));
        assert_eq!(policy.backoff_ceiling(40), Duration::from_secs(10));
    }
}
