use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::{
    BENEFIT_CODE_ACTIVE_COVERAGE, SERVICE_TYPE_CODE_HEALTH_BENEFIT, STATUS_ACTIVE_COVERAGE,
    STATUS_CODE_ACTIVE,
};
use crate::error::{InsuranceError, InsuranceResult};
use crate::models::{
    ActiveCoverageResult, CoverageStatus, EligibilityResponse, StatusSource, ValidatedResponse,
};

/// Shape validation and active-coverage interpretation
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityChecker;

impl EligibilityChecker {
    /// Create a new eligibility checker
    pub fn new() -> Self {
        Self
    }

    /// Check that the response carries enough structure for interpretation.
    ///
    /// Requires a non-empty object with no payer `errors`, a non-empty
    /// `subscriber` object and a `benefitsInformation` array (possibly empty).
    ///
    /// # Errors
    ///
    /// [`InsuranceError::InvalidResponseShape`] describing the first missing piece.
    pub fn validate_response(
        &self,
        response: EligibilityResponse,
    ) -> InsuranceResult<ValidatedResponse> {
        let document = response.into_value();
        debug!(has_response = !document.is_null(), "validating_response");

        let object = match document.as_object() {
            Some(object) if !object.is_empty() => object,
            _ => return Err(invalid("Empty response from STEDI API")),
        };

        if let Some(errors) = object.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let summary = summarize_errors(errors);
                warn!(errors = %summary, "validation_failed_errors");
                return Err(invalid(format!("STEDI API returned errors: {}", summary)));
            }
        }

        match object.get("subscriber") {
            Some(Value::Object(subscriber)) if !subscriber.is_empty() => {}
            _ => {
                warn!("validation_failed_no_subscriber");
                return Err(invalid("No subscriber information in response"));
            }
        }

        if !object
            .get("benefitsInformation")
            .is_some_and(Value::is_array)
        {
            warn!("validation_failed_no_benefits_information");
            return Err(invalid("No benefits information list in response"));
        }

        info!("validation_success");
        Ok(ValidatedResponse::new(document))
    }

    /// Decide whether coverage is active.
    ///
    /// Benefit lines carrying an eligibility code decide first: any `"1"`
    /// (Active Coverage) means active, codes without a `"1"` mean inactive.
    /// Without coded benefit lines the health-benefit-plan entry of
    /// `planStatus` decides. With neither, the status is `Unknown`.
    pub fn check_active_coverage(&self, response: &ValidatedResponse) -> ActiveCoverageResult {
        debug!("checking_active_coverage");

        if let Some(result) = from_benefits(response.benefits()) {
            info!(
                status = ?result.status,
                status_code = ?result.status_code,
                source = "benefits_information",
                "coverage_status_determined"
            );
            return result;
        }

        if let Some(result) = from_plan_status(response.plan_statuses()) {
            info!(
                status = ?result.status,
                status_code = ?result.status_code,
                service_type_codes = ?result.service_type_codes,
                source = "plan_status",
                "found_health_benefit_plan"
            );
            return result;
        }

        warn!("coverage_status_unknown");
        ActiveCoverageResult::unknown()
    }
}

fn invalid(reason: impl Into<String>) -> InsuranceError {
    InsuranceError::InvalidResponseShape(reason.into())
}

fn summarize_errors(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|error| {
            let code = error.get("code").and_then(Value::as_str).unwrap_or("?");
            let description = error
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("no description");
            format!("{}: {}", code, description)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn string_field(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn service_type_codes(entry: &Value) -> Vec<String> {
    entry
        .get("serviceTypeCodes")
        .and_then(Value::as_array)
        .map(|codes| {
            codes
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn from_benefits(benefits: &[Value]) -> Option<ActiveCoverageResult> {
    let mut first_coded: Option<&Value> = None;

    for entry in benefits {
        let Some(code) = entry.get("code").and_then(Value::as_str) else {
            continue;
        };
        if code == BENEFIT_CODE_ACTIVE_COVERAGE {
            return Some(benefit_result(entry, CoverageStatus::Active));
        }
        first_coded.get_or_insert(entry);
    }

    first_coded.map(|entry| benefit_result(entry, CoverageStatus::Inactive))
}

fn benefit_result(entry: &Value, status: CoverageStatus) -> ActiveCoverageResult {
    ActiveCoverageResult {
        status,
        status_text: string_field(entry, "name"),
        status_code: string_field(entry, "code"),
        service_type_codes: service_type_codes(entry),
        source: StatusSource::BenefitsInformation,
    }
}

fn from_plan_status(plan_statuses: &[Value]) -> Option<ActiveCoverageResult> {
    plan_statuses.iter().find_map(|plan| {
        let codes = service_type_codes(plan);
        if !codes.iter().any(|c| c == SERVICE_TYPE_CODE_HEALTH_BENEFIT) {
            return None;
        }

        let status_text = string_field(plan, "status");
        let status_code = string_field(plan, "statusCode");
        if status_text.is_none() && status_code.is_none() {
            return None;
        }

        let active = status_text.as_deref() == Some(STATUS_ACTIVE_COVERAGE)
            || status_code.as_deref() == Some(STATUS_CODE_ACTIVE);

        Some(ActiveCoverageResult {
            status: if active {
                CoverageStatus::Active
            } else {
                CoverageStatus::Inactive
            },
            status_text,
            status_code,
            service_type_codes: codes,
            source: StatusSource::PlanStatus,
        })
    })
}
