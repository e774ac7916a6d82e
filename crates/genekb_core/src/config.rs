//! Process configuration read once at startup.
//!
//! # Responsibility
//! - Resolve output directories and summarizer settings from environment.
//! - Keep lookups injectable so configuration is testable without touching
//!   the real process environment.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - A missing API key disables the summarizer; it is never an error.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_KEY: &str = "GENAI_API_KEY";
pub const ENV_SUMMARY_MODEL: &str = "GENEKB_SUMMARY_MODEL";
pub const ENV_SUMMARY_ENDPOINT: &str = "GENEKB_SUMMARY_ENDPOINT";
pub const ENV_SUMMARY_TIMEOUT_SECS: &str = "GENEKB_SUMMARY_TIMEOUT_SECS";
pub const ENV_OUTPUT_DIR: &str = "GENEKB_OUTPUT_DIR";
pub const ENV_DATA_DIR: &str = "GENEKB_DATA_DIR";

pub const DEFAULT_SUMMARY_MODEL: &str = "gemini-2.0-flash-001";
pub const DEFAULT_SUMMARY_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Settings for the external summarization call.
#[derive(Clone, PartialEq, Eq)]
pub struct SummarizerConfig {
    /// `None` disables the summarizer.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without trailing slash.
    pub endpoint: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_SUMMARY_MODEL.to_string(),
            endpoint: DEFAULT_SUMMARY_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_SUMMARY_TIMEOUT_SECS),
        }
    }
}

/// Top-level configuration handed to the host operation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenekbConfig {
    /// Directory receiving human-readable reports.
    pub report_dir: PathBuf,
    /// Directory receiving knowledge (`.metta`) files.
    pub knowledge_dir: PathBuf,
    pub summarizer: SummarizerConfig,
}

impl Default for GenekbConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            knowledge_dir: PathBuf::from(DEFAULT_DATA_DIR),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl GenekbConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults.
    ///
    /// # Errors
    /// - `ConfigError::InvalidTimeout` when the timeout is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        let timeout = match value(ENV_SUMMARY_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => defaults.summarizer.timeout,
        };

        Ok(Self {
            report_dir: value(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
            knowledge_dir: value(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.knowledge_dir),
            summarizer: SummarizerConfig {
                api_key: value(ENV_API_KEY),
                model: value(ENV_SUMMARY_MODEL).unwrap_or(defaults.summarizer.model),
                endpoint: value(ENV_SUMMARY_ENDPOINT)
                    .map(|raw| raw.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.summarizer.endpoint),
                timeout,
            },
        })
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeout(value) => write!(
                f,
                "{ENV_SUMMARY_TIMEOUT_SECS} must be a positive integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GenekbConfig, DEFAULT_SUMMARY_MODEL};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = GenekbConfig::from_lookup(lookup(&[])).expect("defaults are valid");
        assert_eq!(config, GenekbConfig::default());
        assert_eq!(config.summarizer.api_key, None);
        assert_eq!(config.summarizer.model, DEFAULT_SUMMARY_MODEL);
    }

    #[test]
    fn reads_overrides_and_ignores_blank_values() {
        let config = GenekbConfig::from_lookup(lookup(&[
            ("GENAI_API_KEY", " secret "),
            ("GENEKB_OUTPUT_DIR", "/tmp/reports"),
            ("GENEKB_DATA_DIR", "   "),
            ("GENEKB_SUMMARY_ENDPOINT", "http://localhost:9000/v1/"),
            ("GENEKB_SUMMARY_TIMEOUT_SECS", "5"),
        ]))
        .expect("valid overrides");
        assert_eq!(config.summarizer.api_key.as_deref(), Some("secret"));
        assert_eq!(config.report_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.knowledge_dir, PathBuf::from("data"));
        assert_eq!(config.summarizer.endpoint, "http://localhost:9000/v1");
        assert_eq!(config.summarizer.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_invalid_timeout() {
        for raw in ["0", "soon"] {
            let err = GenekbConfig::from_lookup(lookup(&[("GENEKB_SUMMARY_TIMEOUT_SECS", raw)]))
                .expect_err("invalid timeout");
            assert_eq!(err, ConfigError::InvalidTimeout(raw.to_string()));
        }
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = GenekbConfig::from_lookup(lookup(&[("GENAI_API_KEY", "secret")]))
            .expect("valid config");
        let rendered = format!("{:?}", config.summarizer);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
