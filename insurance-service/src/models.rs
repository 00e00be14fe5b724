use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InsuranceError, InsuranceResult};
use crate::member_id::{is_canonical_member_id, normalize_member_id};

/// Patient name as collected by the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientName {
    pub first: String,
    pub last: String,
}

impl PatientName {
    /// Trim both parts; either part blank is an error
    pub fn new(first: &str, last: &str) -> InsuranceResult<Self> {
        let first = first.trim();
        let last = last.trim();
        if first.is_empty() {
            return Err(InsuranceError::InvalidIdentity("first name is empty".to_string()));
        }
        if last.is_empty() {
            return Err(InsuranceError::InvalidIdentity("last name is empty".to_string()));
        }
        Ok(Self {
            first: first.to_string(),
            last: last.to_string(),
        })
    }
}

impl std::fmt::Display for PatientName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// Who is being looked up, as collected during one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIdentity {
    name: PatientName,
    raw_member_id_utterance: String,
    normalized_member_id: String,
    date_of_birth: Option<NaiveDate>,
}

impl PatientIdentity {
    /// Normalize the spoken member ID and enforce the `[A-Z]+[0-9]+` shape
    pub fn new(name: PatientName, member_id_utterance: &str) -> InsuranceResult<Self> {
        let normalized = normalize_member_id(member_id_utterance)?;
        if !is_canonical_member_id(&normalized) {
            return Err(InsuranceError::Normalization(format!(
                "member ID must be letters followed by digits, got {} characters",
                normalized.len()
            )));
        }
        Ok(Self {
            name,
            raw_member_id_utterance: member_id_utterance.to_string(),
            normalized_member_id: normalized,
            date_of_birth: None,
        })
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn name(&self) -> &PatientName {
        &self.name
    }

    pub fn raw_member_id_utterance(&self) -> &str {
        &self.raw_member_id_utterance
    }

    pub fn member_id(&self) -> &str {
        &self.normalized_member_id
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }
}

/// STEDI eligibility request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    pub control_number: String,
    pub trading_partner_service_id: String,
    pub subscriber: SubscriberInfo,
    pub provider: ProviderInfo,
    pub encounter: EncounterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberInfo {
    pub first_name: String,
    pub last_name: String,
    pub member_id: String,
    /// `YYYYMMDD`
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub npi: String,
    pub organization_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterInfo {
    pub service_type_codes: Vec<String>,
}

/// Raw eligibility document as returned by the clearinghouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EligibilityResponse(Value);

impl EligibilityResponse {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for EligibilityResponse {
    fn from(document: Value) -> Self {
        Self(document)
    }
}

/// Eligibility document that passed shape validation.
///
/// Only [`crate::EligibilityChecker::validate_response`] constructs this, so the
/// interpreters can never run against an unvalidated document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedResponse {
    document: Value,
}

impl ValidatedResponse {
    pub(crate) fn new(document: Value) -> Self {
        Self { document }
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    pub fn subscriber(&self) -> Option<&Value> {
        self.document.get("subscriber")
    }

    /// `benefitsInformation` entries in document order
    pub fn benefits(&self) -> &[Value] {
        self.document
            .get("benefitsInformation")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `planStatus` entries in document order, empty when absent
    pub fn plan_statuses(&self) -> &[Value] {
        self.document
            .get("planStatus")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Coverage status; `Unknown` is never collapsed into `Inactive`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Active,
    Inactive,
    Unknown,
}

impl CoverageStatus {
    /// `Some(true|false)` when known
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Active => Some(true),
            Self::Inactive => Some(false),
            Self::Unknown => None,
        }
    }
}

/// Network tier of a benefit line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    InNetwork,
    OutOfNetwork,
    Unknown,
}

/// Where an active-status decision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    BenefitsInformation,
    PlanStatus,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCoverageResult {
    pub status: CoverageStatus,
    /// Payer's status text, e.g. "Active Coverage"
    pub status_text: Option<String>,
    pub status_code: Option<String>,
    pub service_type_codes: Vec<String>,
    pub source: StatusSource,
}

impl ActiveCoverageResult {
    pub fn unknown() -> Self {
        Self {
            status: CoverageStatus::Unknown,
            status_text: None,
            status_code: None,
            service_type_codes: Vec::new(),
            source: StatusSource::None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CoverageStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopayResult {
    /// In-network copay, absent when none was found
    pub amount: Option<Decimal>,
    pub network_status: NetworkStatus,
    pub service_type_code: String,
}

impl CopayResult {
    pub fn found(&self) -> bool {
        self.amount.is_some()
    }

    pub fn is_in_network(&self) -> bool {
        self.network_status == NetworkStatus::InNetwork
    }
}

/// Everything one lookup derives from a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub is_valid_structure: bool,
    pub coverage: CoverageStatus,
    pub copay_amount: Option<Decimal>,
    pub network_status: NetworkStatus,
}

impl EligibilityResult {
    pub fn is_active(&self) -> Option<bool> {
        self.coverage.as_bool()
    }

    pub fn is_in_network(&self) -> bool {
        self.network_status == NetworkStatus::InNetwork
    }
}
