use crate::config::RequestDefaults;
use crate::constants::DATE_OF_BIRTH_FORMAT;
use crate::models::{
    EligibilityRequest, EncounterInfo, PatientIdentity, ProviderInfo, SubscriberInfo,
};

/// Builds eligibility request bodies from a patient identity.
///
/// Payer and provider identifiers come from configuration; the member ID is
/// taken as already normalized by [`PatientIdentity`].
#[derive(Debug, Clone, Default)]
pub struct EligibilityRequestBuilder {
    defaults: RequestDefaults,
}

impl EligibilityRequestBuilder {
    pub fn new(defaults: RequestDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    pub fn build(&self, identity: &PatientIdentity) -> EligibilityRequest {
        let date_of_birth = identity
            .date_of_birth()
            .map(|dob| dob.format(DATE_OF_BIRTH_FORMAT).to_string())
            .unwrap_or_else(|| self.defaults.fallback_date_of_birth.clone());

        EligibilityRequest {
            control_number: self.defaults.control_number.clone(),
            trading_partner_service_id: self.defaults.trading_partner_service_id.clone(),
            subscriber: SubscriberInfo {
                first_name: identity.name().first.clone(),
                last_name: identity.name().last.clone(),
                member_id: identity.member_id().to_string(),
                date_of_birth,
            },
            provider: ProviderInfo {
                npi: self.defaults.provider_npi.clone(),
                organization_name: self.defaults.provider_organization_name.clone(),
            },
            encounter: EncounterInfo {
                service_type_codes: self.defaults.service_type_codes.clone(),
            },
        }
    }
}
