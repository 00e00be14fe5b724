use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::{
    BENEFIT_CODE_COPAY, NETWORK_IN_NETWORK, NETWORK_OUT_OF_NETWORK, SERVICE_TYPE_CODE_OFFICE_VISIT,
};
use crate::eligibility::{service_type_codes, string_field};
use crate::models::{CopayResult, NetworkStatus, ValidatedResponse};

/// Locates the in-network copay for a service type.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopayFinder;

impl CopayFinder {
    pub fn new() -> Self {
        Self
    }

    /// In-network office visit (STC 98) copay
    pub fn find_office_visit_copay(&self, response: &ValidatedResponse) -> CopayResult {
        self.find_copay(response, SERVICE_TYPE_CODE_OFFICE_VISIT)
    }

    /// Find the in-network copay for `service_type_code`.
    ///
    /// Candidates are co-payment lines (`code == "B"`) listing the service
    /// type. The first in-network candidate whose `benefitAmount` parses as a
    /// decimal wins. Without one, the amount is absent and the network status
    /// reports `OutOfNetwork` if only out-of-network copays were seen.
    pub fn find_copay(&self, response: &ValidatedResponse, service_type_code: &str) -> CopayResult {
        debug!(service_type_code, "finding_copay");

        let mut saw_out_of_network = false;

        for entry in response
            .benefits()
            .iter()
            .filter(|entry| is_copay_for(entry, service_type_code))
        {
            match entry.get("inPlanNetworkIndicatorCode").and_then(Value::as_str) {
                Some(NETWORK_IN_NETWORK) => {
                    let Some(amount) = parse_amount(entry) else {
                        warn!(
                            service_type_code,
                            benefit_amount = ?entry.get("benefitAmount"),
                            "copay_amount_unparseable"
                        );
                        continue;
                    };
                    info!(
                        service_type_code,
                        copay_amount = %amount,
                        benefit_name = ?string_field(entry, "name"),
                        "copay_found"
                    );
                    return CopayResult {
                        amount: Some(amount),
                        network_status: NetworkStatus::InNetwork,
                        service_type_code: service_type_code.to_string(),
                    };
                }
                Some(NETWORK_OUT_OF_NETWORK) => saw_out_of_network = true,
                _ => {}
            }
        }

        let network_status = if saw_out_of_network {
            NetworkStatus::OutOfNetwork
        } else {
            NetworkStatus::Unknown
        };
        warn!(service_type_code, network_status = ?network_status, "copay_not_found");

        CopayResult {
            amount: None,
            network_status,
            service_type_code: service_type_code.to_string(),
        }
    }
}

fn is_copay_for(entry: &Value, service_type_code: &str) -> bool {
    entry.get("code").and_then(Value::as_str) == Some(BENEFIT_CODE_COPAY)
        && service_type_codes(entry)
            .iter()
            .any(|code| code == service_type_code)
}

/// `benefitAmount` arrives as a string; tolerate bare numbers too
fn parse_amount(entry: &Value) -> Option<Decimal> {
    match entry.get("benefitAmount")? {
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EligibilityResponse;
    use crate::EligibilityChecker;
    use serde_json::json;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn validated(benefits: Value) -> ValidatedResponse {
        EligibilityChecker::new()
            .validate_response(EligibilityResponse::new(json!({
                "subscriber": { "memberId": "AETNA12345" },
                "benefitsInformation": benefits
            })))
            .unwrap()
    }

    #[test]
    fn test_finds_in_network_office_visit_copay() {
        let response = validated(json!([
            { "code": "1", "name": "Active Coverage", "serviceTypeCodes": ["30"] },
            {
                "code": "B",
                "name": "Co-Payment",
                "serviceTypeCodes": ["98"],
                "benefitAmount": "25",
                "inPlanNetworkIndicatorCode": "Y"
            }
        ]));
        let result = CopayFinder::new().find_office_visit_copay(&response);
        assert_eq!(result.amount, Some(dec("25")));
        assert!(result.found());
        assert!(result.is_in_network());
        assert_eq!(result.service_type_code, "98");
    }

    #[test]
    fn test_first_in_network_entry_wins() {
        let response = validated(json!([
            { "code": "B", "serviceTypeCodes": ["98"], "benefitAmount": "40", "inPlanNetworkIndicatorCode": "N" },
            { "code": "B", "serviceTypeCodes": ["98"], "benefitAmount": "20.50", "inPlanNetworkIndicatorCode": "Y" },
            { "code": "B", "serviceTypeCodes": ["98"], "benefitAmount": "35", "inPlanNetworkIndicatorCode": "Y" }
        ]));
        let result = CopayFinder::new().find_office_visit_copay(&response);
        assert_eq!(result.amount, Some(dec("20.50")));
        assert_eq!(result.network_status, NetworkStatus::InNetwork);
    }

    #[test]
    fn test_out_of_network_only_has_no_amount() {
        let response = validated(json!([
            { "code": "B", "serviceTypeCodes": ["98"], "benefitAmount": "60", "inPlanNetworkIndicatorCode": "N" }
        ]));
        let result = CopayFinder::new().find_office_visit_copay(&response);
        assert_eq!(result.amount, None);
        assert_eq!(result.network_status, NetworkStatus::OutOfNetwork);
    }

    #[test]
    fn test_unparseable_amount_is_skipped() {
        let response = validated(json!([
            { "code": "B", "serviceTypeCodes": ["98"], "benefitAmount": "N/A", "inPlanNetworkIndicatorCode": "Y" },
            { "code": "B", "serviceTypeCodes": ["98"], "benefitAmount": 15, "inPlanNetworkIndicatorCode": "Y" }
        ]));
        let result = CopayFinder::new().find_office_visit_copay(&response);
        assert_eq!(result.amount, Some(dec("15")));
    }

    #[test]
    fn test_only_unparseable_amounts_is_not_found() {
        let response = validated(json!([
            { "code": "B", "serviceTypeCodes": ["98"], "benefitAmount": "twenty", "inPlanNetworkIndicatorCode": "Y" }
        ]));
        let result = CopayFinder::new().find_office_visit_copay(&response);
        assert!(!result.found());
        assert_eq!(result.network_status, NetworkStatus::Unknown);
    }

    #[test]
    fn test_ignores_other_service_types_and_benefit_codes() {
        let response = validated(json!([
            { "code": "B", "serviceTypeCodes": ["30"], "benefitAmount": "10", "inPlanNetworkIndicatorCode": "Y" },
            { "code": "C", "serviceTypeCodes": ["98"], "benefitAmount": "500", "inPlanNetworkIndicatorCode": "Y" },
            { "code": "A", "serviceTypeCodes": ["98"], "benefitPercent": "0.2", "inPlanNetworkIndicatorCode": "Y" }
        ]));
        let result = CopayFinder::new().find_office_visit_copay(&response);
        assert_eq!(result.amount, None);
        assert_eq!(result.network_status, NetworkStatus::Unknown);

        let result = CopayFinder::new().find_copay(&response, "30");
        assert_eq!(result.amount, Some(dec("10")));
    }

    #[test]
    fn test_empty_benefits_is_not_found() {
        let result = CopayFinder::new().find_office_visit_copay(&validated(json!([])));
        assert_eq!(result.amount, None);
        assert_eq!(result.network_status, NetworkStatus::Unknown);
    }
}
