use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use sha2::{Digest, Sha256};

#[allow(clippy::unwrap_used)]
mod patterns {
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
        pub static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap();
        pub static ref PHONE_REGEX: Regex = Regex::new(r"\b(?:\+1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})\b").unwrap();
        // YYYYMMDD as sent to the clearinghouse
        pub static ref DOB_REGEX: Regex = Regex::new(r"\b(?:19|20)\d{2}(?:0[1-9]|1[0-2])(?:0[1-9]|[12]\d|3[01])\b").unwrap();
        // Payer prefix followed by digits, e.g. AETNA12345 or W123456789
        pub static ref MEMBER_ID_REGEX: Regex = Regex::new(r"\b[A-Z]+[0-9]{4,}\b").unwrap();
    }
}

use patterns::{DOB_REGEX, EMAIL_REGEX, MEMBER_ID_REGEX, PHONE_REGEX, SSN_REGEX};

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_dates_of_birth: bool,
    pub redact_member_ids: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_dates_of_birth: true,
            redact_member_ids: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// PII redactor for free-form log text
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl Default for PiiRedactor {
    fn default() -> Self {
        Self::new(RedactionConfig::default())
    }
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", "***@***");
        }

        // SSN before phone: the phone pattern also matches dashed digit runs
        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", "***-**-****");
        }

        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", "(***) ***-****");
        }

        if self.config.redact_dates_of_birth {
            result = self.replace(&DOB_REGEX, &result, "DOB", "********");
        }

        if self.config.redact_member_ids {
            result = self.replace(&MEMBER_ID_REGEX, &result, "MEMBER", "[MEMBER_ID]");
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures| {
                if self.config.hash_for_correlation {
                    let matched = caps.get(0).map_or("", |m| m.as_str());
                    format!("{}[{}]", label, hash_value(matched))
                } else {
                    mask.to_string()
                }
            })
            .to_string()
    }
}

/// Short, stable digest so redacted values can still be correlated across log lines
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let prefix: Vec<u8> = digest.iter().take(8).copied().collect();
    general_purpose::URL_SAFE_NO_PAD.encode(prefix)
}

/// Render a member ID for structured log fields
pub fn redact_member_id(member_id: &str) -> String {
    let trimmed = member_id.trim();
    if trimmed.is_empty() {
        return "MEMBER[empty]".to_string();
    }
    format!("MEMBER[{}]", hash_value(trimmed))
}

/// Keep the first letter of a name and mask the rest: "John" -> "J***"
pub fn mask_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.count();
            format!("{}{}", first, "*".repeat(rest))
        }
        None => String::new(),
    }
}
