//! Fixed codes and defaults for the STEDI eligibility API

// Service type codes
pub const SERVICE_TYPE_CODE_HEALTH_BENEFIT: &str = "30";
pub const SERVICE_TYPE_CODE_OFFICE_VISIT: &str = "98";

// Eligibility/benefit codes (X12 EB01)
pub const BENEFIT_CODE_ACTIVE_COVERAGE: &str = "1";
pub const BENEFIT_CODE_COPAY: &str = "B";

// Plan status
pub const STATUS_CODE_ACTIVE: &str = "1";
pub const STATUS_ACTIVE_COVERAGE: &str = "Active Coverage";

// Network indicators
pub const NETWORK_IN_NETWORK: &str = "Y";
pub const NETWORK_OUT_OF_NETWORK: &str = "N";

// API
pub const STEDI_DEFAULT_API_URL: &str = "https://healthcare.us.stedi.com";
pub const STEDI_ELIGIBILITY_ENDPOINT: &str = "/2024-04-01/change/medicalnetwork/eligibility/v3";
pub const STEDI_API_TIMEOUT_SECS: u64 = 30;
pub const STEDI_API_MAX_RETRIES: u32 = 3;
pub const STEDI_RETRY_MIN_WAIT_SECS: u64 = 2;
pub const STEDI_RETRY_MAX_WAIT_SECS: u64 = 10;

// Request defaults for the Aetna sandbox payer
pub const STEDI_CONTROL_NUMBER: &str = "000000001";
pub const STEDI_TRADING_PARTNER_SERVICE_ID: &str = "60054";
pub const STEDI_PROVIDER_NPI: &str = "1999999984";
pub const STEDI_PROVIDER_ORG_NAME: &str = "Paratus Health";
pub const STEDI_TEST_DATE_OF_BIRTH: &str = "20040404";
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y%m%d";

/// Shortest member ID accepted from a caller
pub const MIN_MEMBER_ID_LEN: usize = 5;
