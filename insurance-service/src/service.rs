use std::sync::Arc;

use logger_redacted::redact_member_id;
use tracing::{info, instrument};

use crate::cancellation::CancellationSignal;
use crate::client::{EligibilityApi, StediClient};
use crate::config::StediConfig;
use crate::copay::CopayFinder;
use crate::eligibility::EligibilityChecker;
use crate::error::InsuranceResult;
use crate::models::{EligibilityResponse, EligibilityResult, PatientIdentity, ValidatedResponse};
use crate::request::EligibilityRequestBuilder;

/// End-to-end eligibility pipeline: build, send, validate, interpret.
pub struct EligibilityService {
    api: Arc<dyn EligibilityApi>,
    builder: EligibilityRequestBuilder,
    checker: EligibilityChecker,
    finder: CopayFinder,
}

impl EligibilityService {
    /// Create a service over any eligibility API implementation
    pub fn new(api: Arc<dyn EligibilityApi>, builder: EligibilityRequestBuilder) -> Self {
        Self {
            api,
            builder,
            checker: EligibilityChecker::new(),
            finder: CopayFinder::new(),
        }
    }

    /// Create a service backed by the STEDI HTTP client
    pub fn from_config(config: &StediConfig) -> InsuranceResult<Self> {
        let client = StediClient::new(config)?;
        Ok(Self::new(
            Arc::new(client),
            EligibilityRequestBuilder::new(config.request.clone()),
        ))
    }

    pub fn checker(&self) -> &EligibilityChecker {
        &self.checker
    }

    pub fn copay_finder(&self) -> &CopayFinder {
        &self.finder
    }

    /// Build and send the request, returning the raw document unvalidated
    #[instrument(skip_all, fields(member_id = %redact_member_id(identity.member_id())))]
    pub async fn lookup(
        &self,
        identity: &PatientIdentity,
        cancel: &CancellationSignal,
    ) -> InsuranceResult<EligibilityResponse> {
        let request = self.builder.build(identity);
        self.api.check_eligibility(&request, cancel).await
    }

    /// Full pipeline for one identity.
    ///
    /// Transport and shape failures are returned as errors; a response that
    /// validates always yields a result, even when coverage or copay is unknown.
    #[instrument(skip_all, fields(member_id = %redact_member_id(identity.member_id())))]
    pub async fn verify(
        &self,
        identity: &PatientIdentity,
        cancel: &CancellationSignal,
    ) -> InsuranceResult<EligibilityResult> {
        let response = self.lookup(identity, cancel).await?;
        let validated = self.checker.validate_response(response)?;
        Ok(self.interpret(&validated))
    }

    /// Derive coverage and office visit copay from a validated document
    pub fn interpret(&self, response: &ValidatedResponse) -> EligibilityResult {
        let coverage = self.checker.check_active_coverage(response);
        let copay = self.finder.find_office_visit_copay(response);

        let result = EligibilityResult {
            is_valid_structure: true,
            coverage: coverage.status,
            copay_amount: copay.amount,
            network_status: copay.network_status,
        };
        info!(
            coverage = ?result.coverage,
            copay_found = result.copay_amount.is_some(),
            network_status = ?result.network_status,
            "eligibility_interpreted"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockEligibilityApi;
    use crate::error::InsuranceError;
    use crate::models::{CoverageStatus, NetworkStatus, PatientName};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn identity() -> PatientIdentity {
        PatientIdentity::new(
            PatientName::new("John", "Doe").unwrap(),
            "A E T N A one two three four five",
        )
        .unwrap()
    }

    fn service_returning(
        response: impl Fn() -> InsuranceResult<EligibilityResponse> + Send + Sync + 'static,
    ) -> EligibilityService {
        let mut api = MockEligibilityApi::new();
        api.expect_check_eligibility()
            .withf(|request, _| {
                request.subscriber.member_id == "AETNA12345"
                    && request.subscriber.first_name == "John"
                    && request.trading_partner_service_id == "60054"
            })
            .times(1)
            .returning(move |_, _| response());
        EligibilityService::new(Arc::new(api), EligibilityRequestBuilder::default())
    }

    #[tokio::test]
    async fn test_verify_active_with_copay() {
        let service = service_returning(|| {
            Ok(EligibilityResponse::new(json!({
                "subscriber": { "memberId": "AETNA12345" },
                "benefitsInformation": [
                    { "code": "1", "name": "Active Coverage", "serviceTypeCodes": ["30"] },
                    {
                        "code": "B",
                        "serviceTypeCodes": ["98"],
                        "benefitAmount": "25",
                        "inPlanNetworkIndicatorCode": "Y"
                    }
                ]
            })))
        });

        let result = service
            .verify(&identity(), &CancellationSignal::never())
            .await
            .unwrap();
        assert!(result.is_valid_structure);
        assert_eq!(result.is_active(), Some(true));
        assert_eq!(result.copay_amount, Some(Decimal::from(25)));
        assert!(result.is_in_network());
    }

    #[tokio::test]
    async fn test_verify_surfaces_shape_errors() {
        let service = service_returning(|| Ok(EligibilityResponse::new(json!({}))));
        let err = service
            .verify(&identity(), &CancellationSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, InsuranceError::InvalidResponseShape(_)));
    }

    #[tokio::test]
    async fn test_verify_surfaces_transport_errors() {
        let service = service_returning(|| Err(InsuranceError::http_status(503, "unavailable")));
        let err = service
            .verify(&identity(), &CancellationSignal::never())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
    }

    #[tokio::test]
    async fn test_verify_unknown_coverage_without_benefits() {
        let service = service_returning(|| {
            Ok(EligibilityResponse::new(json!({
                "subscriber": { "memberId": "AETNA12345" },
                "benefitsInformation": []
            })))
        });
        let result = service
            .verify(&identity(), &CancellationSignal::never())
            .await
            .unwrap();
        assert_eq!(result.coverage, CoverageStatus::Unknown);
        assert_eq!(result.is_active(), None);
        assert_eq!(result.copay_amount, None);
        assert_eq!(result.network_status, NetworkStatus::Unknown);
    }

    #[tokio::test]
    async fn test_lookup_returns_raw_document() {
        let service = service_returning(|| Ok(EligibilityResponse::new(json!({ "raw": true }))));
        let response = service
            .lookup(&identity(), &CancellationSignal::never())
            .await
            .unwrap();
        assert_eq!(response.as_value()["raw"], true);
    }
}
