//! Storage collaborator configuration.

use planovate_core::defaults;
use planovate_core::{Error, Result};
use std::env;

/// Connection settings for the bucket/table REST API.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// API endpoint, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub table_id: String,
    pub bucket_id: String,
    /// Server API key. Optional for session-authenticated deployments.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl StoreConfig {
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        table_id: impl Into<String>,
        bucket_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            table_id: table_id.into(),
            bucket_id: bucket_id.into(),
            api_key: None,
            timeout_secs: defaults::STORE_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Required | Description |
    /// |----------|----------|-------------|
    /// | `PLANOVATE_STORE_ENDPOINT` | yes | API endpoint |
    /// | `PLANOVATE_STORE_PROJECT_ID` | yes | Project identifier |
    /// | `PLANOVATE_STORE_DATABASE_ID` | yes | Database holding the project table |
    /// | `PLANOVATE_STORE_TABLE_ID` | yes | Project table |
    /// | `PLANOVATE_STORE_BUCKET_ID` | yes | Bucket for room photos |
    /// | `PLANOVATE_STORE_API_KEY` | no | Server API key |
    /// | `PLANOVATE_STORE_TIMEOUT_SECS` | no (30) | Request timeout |
    pub fn from_env() -> Result<Self> {
        let config = Self {
            endpoint: required(defaults::ENV_STORE_ENDPOINT)?,
            project_id: required(defaults::ENV_STORE_PROJECT_ID)?,
            database_id: required(defaults::ENV_STORE_DATABASE_ID)?,
            table_id: required(defaults::ENV_STORE_TABLE_ID)?,
            bucket_id: required(defaults::ENV_STORE_BUCKET_ID)?,
            api_key: env::var(defaults::ENV_STORE_API_KEY)
                .ok()
                .filter(|v| !v.is_empty()),
            timeout_secs: env::var(defaults::ENV_STORE_TIMEOUT_SECS)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults::STORE_TIMEOUT_SECS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(Error::Config(format!(
                "Store endpoint must start with http:// or https://, got: {}",
                self.endpoint
            )));
        }

        for (name, value) in [
            ("project_id", &self.project_id),
            ("database_id", &self.database_id),
            ("table_id", &self.table_id),
            ("bucket_id", &self.bucket_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("Store {} cannot be empty", name)));
            }
        }

        Ok(())
    }

    pub(crate) fn base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub(crate) fn files_url(&self) -> String {
        format!("{}/storage/buckets/{}/files", self.base(), self.bucket_id)
    }

    pub(crate) fn rows_url(&self) -> String {
        format!(
            "{}/tablesdb/databases/{}/tables/{}/rows",
            self.base(),
            self.database_id,
            self.table_id
        )
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} is not set", name)))
}
