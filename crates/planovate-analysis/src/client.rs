//! HTTP analysis backend.
//!
//! Sends the two room photos as `multipart/form-data` to `POST /analyze`:
//!
//! | Field | Kind | Sent when |
//! |-------|------|-----------|
//! | `old_image` | file | always (current room) |
//! | `new_image` | file | always (ideal room) |
//! | `budget` | text | a budget was entered |
//! | `location` | text | a city was entered |

use std::time::{Duration, Instant};

use async_trait::async_trait;
use planovate_core::defaults;
use planovate_core::{AnalysisBackend, AnalysisRequest, AnalysisResult, Error, ImagePayload, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::AnalysisConfig;
use crate::status::to_analysis_error;

/// Analysis backend that talks to the remote service over HTTP.
pub struct HttpAnalysisBackend {
    config: AnalysisConfig,
    client: reqwest::Client,
}

impl HttpAnalysisBackend {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(AnalysisConfig::from_env())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

fn image_part(image: &ImagePayload) -> Part {
    let part = || Part::bytes(image.data.clone()).file_name(image.file_name.clone());
    // An unparseable content type is sent as the client default instead.
    part()
        .mime_str(&image.content_type)
        .unwrap_or_else(|_| part())
}

fn build_form(request: &AnalysisRequest) -> Form {
    let mut form = Form::new()
        .part("old_image", image_part(&request.current_image))
        .part("new_image", image_part(&request.ideal_image));

    if let Some(budget) = request.budget {
        form = form.text("budget", budget.to_string());
    }
    if let Some(location) = &request.location {
        form = form.text("location", location.clone());
    }
    form
}

/// Pull the human-readable message out of an error body.
///
/// Handles `{"detail": "..."}` and validation-style
/// `{"detail": [{"msg": "..."}, ...]}`. Anything else yields `None`.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    #[instrument(skip(self, request), fields(
        subsystem = "analysis",
        component = "http_client",
        op = "analyze",
        current_len = request.current_image.len(),
        ideal_len = request.ideal_image.len(),
        budget = ?request.budget,
    ))]
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let start = Instant::now();
        let url = self.config.endpoint(defaults::ANALYZE_PATH);

        let response = self
            .client
            .post(&url)
            .multipart(build_form(request))
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Analysis {
                status: None,
                detail: format!("Analysis request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            warn!(
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                duration_ms = start.elapsed().as_millis() as u64,
                "Analysis service returned an error"
            );
            return Err(to_analysis_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status"),
                detail,
            ));
        }

        let body = response.text().await.map_err(|e| Error::Analysis {
            status: Some(status.as_u16()),
            detail: format!("Failed to read analysis response: {}", e),
        })?;
        let result: AnalysisResult = serde_json::from_str(&body).map_err(|e| Error::Analysis {
            status: Some(status.as_u16()),
            detail: format!("Failed to parse analysis response: {}", e),
        })?;
        result.validate()?;

        debug!(plan = ?result.plan, "Analysis plan received");
        info!(
            score = result.score,
            estimated_cost = result.estimated_cost,
            optimized = result.optimized,
            plan_items = result.plan.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Analysis complete"
        );
        Ok(result)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = self.config.endpoint(defaults::ANALYSIS_HEALTH_PATH);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(defaults::HEALTH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(HttpAnalysisBackend::new(AnalysisConfig::new("not-a-url")).is_err());
    }

    #[test]
    fn test_new_keeps_config() {
        let backend = HttpAnalysisBackend::new(AnalysisConfig::new("http://test:8000")).unwrap();
        assert_eq!(backend.config().base_url, "http://test:8000");
        assert_eq!(backend.config().timeout_secs, 120);
    }

    #[test]
    fn test_extract_detail_string() {
        let body = r#"{"detail": "Unsupported file type: .gif"}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Unsupported file type: .gif")
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "old_image"], "msg": "field required"},
            {"loc": ["body", "new_image"], "msg": "field required"}
        ]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; field required")
        );
    }

    #[test]
    fn test_extract_detail_absent() {
        assert!(extract_detail("<html>502</html>").is_none());
        assert!(extract_detail(r#"{"error": "x"}"#).is_none());
        assert!(extract_detail(r#"{"detail": []}"#).is_none());
    }
}
