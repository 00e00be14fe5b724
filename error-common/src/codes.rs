// Error codes implementation
// Stable codes surfaced to the voice agent alongside user-facing messages.

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
}

pub mod eligibility {
    pub const NORMALIZATION_FAILED: &str = "ELIG_2001";
    pub const TRANSPORT_FAILED: &str = "ELIG_2002";
    pub const INVALID_RESPONSE_SHAPE: &str = "ELIG_2003";
    pub const LOOKUP_CANCELLED: &str = "ELIG_2004";
    pub const NO_ELIGIBILITY_DATA: &str = "ELIG_2005";
}

pub mod protocol {
    pub const PARSE_ERROR: &str = "RPC_3001";
    pub const INVALID_REQUEST: &str = "RPC_3005";
    pub const METHOD_NOT_FOUND: &str = "RPC_3002";
    pub const INVALID_PARAMS: &str = "RPC_3003";
    pub const TOOL_FAILED: &str = "RPC_3004";
}

pub mod system {
    pub const CONFIGURATION_INVALID: &str = "SYS_4001";
    pub const INTERNAL: &str = "SYS_4002";
}
