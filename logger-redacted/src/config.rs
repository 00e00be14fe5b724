// Logger configuration
use serde::{Deserialize, Serialize};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines for local development
    Pretty,
    /// One JSON object per line for log shippers
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Fallback filter directive when `RUST_LOG` is not set
    pub log_level: String,
    pub format: LogFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggerConfig {
    /// Load configuration from `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_level = std::env::var("LOG_LEVEL")
            .map(|level| level.to_lowercase())
            .unwrap_or(defaults.log_level);

        let format = match std::env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => defaults.format,
        };

        Self { log_level, format }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = LoggerConfig::default()
            .with_level("debug")
            .with_format(LogFormat::Json);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.format, LogFormat::Json);
    }
}
