//! Analysis client configuration.

use planovate_core::defaults;
use planovate_core::{Error, Result};
use std::env;

/// Connection settings for the analysis service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Base URL of the analysis service, without trailing slash.
    pub base_url: String,
    /// Request timeout for `POST /analyze`, in seconds.
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::ANALYSIS_URL.to_string(),
            timeout_secs: defaults::ANALYSIS_TIMEOUT_SECS,
        }
    }
}

impl AnalysisConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `PLANOVATE_ANALYSIS_URL` | `http://localhost:8000` | Service base URL |
    /// | `PLANOVATE_ANALYSIS_TIMEOUT_SECS` | `120` | Analysis request timeout |
    pub fn from_env() -> Self {
        let base_url = env::var(defaults::ENV_ANALYSIS_URL)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults::ANALYSIS_URL.to_string());

        let timeout_secs = env::var(defaults::ENV_ANALYSIS_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::ANALYSIS_TIMEOUT_SECS);

        Self {
            base_url,
            timeout_secs,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config(
                "Analysis base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Analysis base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "Analysis timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Join a path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = AnalysisConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let err = AnalysisConfig::new("ftp://analysis").validate().unwrap_err();
        assert!(err.to_string().contains("must start with http"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = AnalysisConfig::default().with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = AnalysisConfig::new("https://api.example.com/");
        assert_eq!(
            config.endpoint("/analyze"),
            "https://api.example.com/analyze"
        );
    }
}
