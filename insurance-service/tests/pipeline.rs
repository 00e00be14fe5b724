//! End-to-end pipeline tests with canned clearinghouse documents
//!
//! A scripted `EligibilityApi` stands in for the network so each fixture runs
//! through request building, validation and both interpreter passes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use insurance_service::{
    normalize_member_id, CancellationSignal, CopayFinder, CoverageStatus, EligibilityApi,
    EligibilityChecker, EligibilityRequest, EligibilityRequestBuilder, EligibilityResponse,
    EligibilityService, InsuranceError, InsuranceResult, NetworkStatus, PatientIdentity,
    PatientName,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Replies with a fixed document or a fixed HTTP failure
struct ScriptedApi {
    reply: Result<Value, u16>,
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn document(document: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(document),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl EligibilityApi for ScriptedApi {
    async fn check_eligibility(
        &self,
        request: &EligibilityRequest,
        _cancel: &CancellationSignal,
    ) -> InsuranceResult<EligibilityResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(request.subscriber.member_id, "AETNA12345");
        match &self.reply {
            Ok(document) => Ok(EligibilityResponse::new(document.clone())),
            Err(status) => Err(InsuranceError::http_status(*status, "scripted failure")),
        }
    }
}

fn identity() -> PatientIdentity {
    let name = PatientName::new("John", "Doe").expect("Failed to build name");
    PatientIdentity::new(name, "A E T N A one two three four five")
        .expect("Failed to build identity")
}

fn service(api: Arc<ScriptedApi>) -> EligibilityService {
    EligibilityService::new(api, EligibilityRequestBuilder::default())
}

#[test]
fn test_spoken_member_id_normalizes() {
    assert_eq!(
        normalize_member_id("A E T N A one two three four five").expect("Failed to normalize"),
        "AETNA12345"
    );
}

#[tokio::test]
async fn test_no_benefit_entries_is_unknown_never_false() {
    let api = ScriptedApi::document(json!({
        "subscriber": { "memberId": "AETNA12345" },
        "benefitsInformation": []
    }));
    let result = service(api)
        .verify(&identity(), &CancellationSignal::never())
        .await
        .expect("Verification should succeed");

    assert_eq!(result.coverage, CoverageStatus::Unknown);
    assert_eq!(result.is_active(), None);
}

#[tokio::test]
async fn test_in_network_office_visit_copay() {
    let api = ScriptedApi::document(json!({
        "subscriber": { "memberId": "AETNA12345" },
        "benefitsInformation": [
            { "code": "1", "name": "Active Coverage", "serviceTypeCodes": ["30"] },
            {
                "code": "B",
                "name": "Co-Payment",
                "serviceTypeCodes": ["98"],
                "benefitAmount": "25.00",
                "inPlanNetworkIndicatorCode": "Y"
            }
        ]
    }));
    let result = service(api)
        .verify(&identity(), &CancellationSignal::never())
        .await
        .expect("Verification should succeed");

    assert_eq!(result.is_active(), Some(true));
    assert_eq!(result.copay_amount, Some(Decimal::new(2500, 2)));
    assert!(result.is_in_network());
}

#[tokio::test]
async fn test_out_of_network_only_copay_is_absent() {
    let api = ScriptedApi::document(json!({
        "subscriber": { "memberId": "AETNA12345" },
        "benefitsInformation": [
            {
                "code": "B",
                "serviceTypeCodes": ["98"],
                "benefitAmount": "50.00",
                "inPlanNetworkIndicatorCode": "N"
            }
        ]
    }));
    let result = service(api)
        .verify(&identity(), &CancellationSignal::never())
        .await
        .expect("Out-of-network only is not an error");

    assert_eq!(result.copay_amount, None);
    assert!(!result.is_in_network());
    assert_eq!(result.network_status, NetworkStatus::OutOfNetwork);
}

#[tokio::test]
async fn test_missing_subscriber_stops_before_extraction() {
    let api = ScriptedApi::document(json!({
        "benefitsInformation": [
            { "code": "1", "serviceTypeCodes": ["30"] }
        ]
    }));
    let err = service(api.clone())
        .verify(&identity(), &CancellationSignal::never())
        .await
        .expect_err("Validation should fail");

    assert!(matches!(err, InsuranceError::InvalidResponseShape(_)));
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_http_500_surfaces_as_transport_error() {
    let api = ScriptedApi::failing(500);
    let err = service(api)
        .verify(&identity(), &CancellationSignal::never())
        .await
        .expect_err("Lookup should fail");

    assert!(matches!(err, InsuranceError::Transport { status: Some(500), .. }));
}

#[tokio::test]
async fn test_stages_compose_manually() {
    let api = ScriptedApi::document(json!({
        "subscriber": { "memberId": "AETNA12345" },
        "benefitsInformation": [
            { "code": "6", "name": "Inactive", "serviceTypeCodes": ["30"] }
        ],
        "planStatus": [
            { "statusCode": "6", "status": "Inactive", "serviceTypeCodes": ["30"] }
        ]
    }));
    let service = service(api);

    let raw = service
        .lookup(&identity(), &CancellationSignal::never())
        .await
        .expect("Lookup should succeed");
    let validated = EligibilityChecker::new()
        .validate_response(raw)
        .expect("Validation should succeed");

    let coverage = EligibilityChecker::new().check_active_coverage(&validated);
    assert_eq!(coverage.status, CoverageStatus::Inactive);
    assert!(!coverage.is_active());

    let copay = CopayFinder::new().find_office_visit_copay(&validated);
    assert!(!copay.found());
}
