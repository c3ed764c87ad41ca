//! Project repository over an Appwrite-compatible REST API.
//!
//! Room photos go to a storage bucket and project records to a table:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | upload asset | `POST {endpoint}/storage/buckets/{bucket}/files` (multipart `fileId`, `file`) |
//! | create project | `POST {endpoint}/tablesdb/databases/{db}/tables/{table}/rows` |
//! | get project | `GET .../rows/{id}` |
//! | list projects | `GET .../rows?queries[]={"method":"equal","attribute":"UserId",...}` |
//!
//! Every request carries `X-Appwrite-Project` and, when configured,
//! `X-Appwrite-Key`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use planovate_core::defaults;
use planovate_core::{
    AssetId, CreateProjectRequest, Error, ImagePayload, ProjectId, ProjectRecord,
    ProjectRepository, RawProjectList, Result, UserId,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::StoreConfig;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct FileResponse {
    #[serde(rename = "$id")]
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateRowBody<'a> {
    #[serde(rename = "rowId")]
    row_id: &'a str,
    data: RowData<'a>,
}

/// Column layout of the project table.
#[derive(Debug, Serialize)]
struct RowData<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "CurrentPhoto")]
    current_photo: &'a str,
    #[serde(rename = "Idealphoto")]
    ideal_photo: &'a str,
    #[serde(rename = "Budget")]
    budget: Option<i64>,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "UserId")]
    user_id: &'a str,
}

impl<'a> From<&'a CreateProjectRequest> for RowData<'a> {
    fn from(req: &'a CreateProjectRequest) -> Self {
        Self {
            title: &req.title,
            city: &req.city,
            current_photo: req.current_photo.as_str(),
            ideal_photo: req.ideal_photo.as_str(),
            budget: req.budget,
            description: &req.description,
            user_id: req.user_id.as_str(),
        }
    }
}

/// Build the `queries[]` filter selecting one user's rows.
fn user_filter(user_id: &UserId) -> String {
    serde_json::json!({
        "method": "equal",
        "attribute": "UserId",
        "values": [user_id.as_str()],
    })
    .to_string()
}

// =============================================================================
// REPOSITORY
// =============================================================================

/// Repository backed by the bucket/table REST API.
pub struct RestProjectRepository {
    config: StoreConfig,
    client: reqwest::Client,
}

impl RestProjectRepository {
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(PROJECT_HEADER, &self.config.project_id);
        match &self.config.api_key {
            Some(key) => builder.header(KEY_HEADER, key),
            None => builder,
        }
    }

    fn row_url(&self, id: &ProjectId) -> String {
        format!("{}/{}", self.config.rows_url(), id)
    }
}

/// Read a JSON body, turning non-success statuses into errors.
async fn read_json(response: Response, what: &str) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized(format!(
            "Storage rejected credentials while trying to {}",
            what
        )));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());
        return Err(Error::Request(format!(
            "Failed to {} ({}): {}",
            what,
            status.as_u16(),
            message
        )));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Request(format!("Failed to {}: invalid response: {}", what, e)))
}

#[async_trait]
impl ProjectRepository for RestProjectRepository {
    #[instrument(skip(self, asset), fields(
        subsystem = "store",
        component = "rest_repository",
        op = "upload_asset",
        file_name = %asset.file_name,
        payload_len = asset.len(),
    ))]
    async fn upload_asset(&self, asset: &ImagePayload) -> Result<AssetId> {
        let start = Instant::now();
        let part = Part::bytes(asset.data.clone())
            .file_name(asset.file_name.clone())
            .mime_str(&asset.content_type)
            .map_err(|e| {
                Error::Request(format!("Invalid content type {}: {}", asset.content_type, e))
            })?;
        let form = Form::new()
            .text("fileId", defaults::UNIQUE_ID)
            .part("file", part);

        let response = self
            .request(Method::POST, &self.config.files_url())
            .multipart(form)
            .send()
            .await?;
        let body = read_json(response, "upload asset").await?;
        let file: FileResponse = serde_json::from_value(body)?;

        info!(
            asset_id = %file.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Asset uploaded"
        );
        Ok(AssetId(file.id))
    }

    #[instrument(skip(self, req), fields(
        subsystem = "store",
        component = "rest_repository",
        op = "create_project",
        user_id = %req.user_id,
    ))]
    async fn create_project(&self, req: CreateProjectRequest) -> Result<ProjectRecord> {
        let start = Instant::now();
        let body = CreateRowBody {
            row_id: defaults::UNIQUE_ID,
            data: RowData::from(&req),
        };

        let response = self
            .request(Method::POST, &self.config.rows_url())
            .json(&body)
            .send()
            .await?;
        let row = read_json(response, "create project").await?;
        let record: ProjectRecord = serde_json::from_value(row)?;

        info!(
            project_id = %record.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Project created"
        );
        Ok(record)
    }

    #[instrument(skip(self), fields(
        subsystem = "store",
        component = "rest_repository",
        op = "get_project",
    ))]
    async fn get_project(&self, id: &ProjectId) -> Result<ProjectRecord> {
        let response = self.request(Method::GET, &self.row_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(project_id = %id, "Project not found");
            return Err(Error::NotFound(format!("Project {} not found", id)));
        }
        let row = read_json(response, "fetch project").await?;
        Ok(serde_json::from_value(row)?)
    }

    #[instrument(skip(self), fields(
        subsystem = "store",
        component = "rest_repository",
        op = "list_projects",
    ))]
    async fn list_projects_for_user(&self, user_id: &UserId) -> Result<RawProjectList> {
        let start = Instant::now();
        let response = self
            .request(Method::GET, &self.config.rows_url())
            .query(&[("queries[]", user_filter(user_id))])
            .send()
            .await?;
        let body = read_json(response, "list projects").await.map_err(|e| {
            warn!(error = %e, "Project list request failed");
            e
        })?;

        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Project list fetched"
        );
        Ok(RawProjectList(body))
    }

    fn asset_url(&self, asset_id: &AssetId) -> Option<String> {
        Some(format!(
            "{}/{}/view?project={}",
            self.config.files_url(),
            asset_id,
            self.config.project_id
        ))
    }

    /// Thumbnail sized for project cards.
    fn asset_preview_url(&self, asset_id: &AssetId) -> Option<String> {
        Some(format!(
            "{}/{}/preview?width={}&height={}&gravity=center&quality={}&project={}",
            self.config.files_url(),
            asset_id,
            defaults::PREVIEW_WIDTH,
            defaults::PREVIEW_HEIGHT,
            defaults::PREVIEW_QUALITY,
            self.config.project_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RestProjectRepository {
        RestProjectRepository::new(StoreConfig::new(
            "https://store.example/v1",
            "proj",
            "db",
            "projects",
            "photos",
        ))
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = StoreConfig::new("ftp://x", "p", "d", "t", "b");
        assert!(RestProjectRepository::new(config).is_err());
    }

    #[test]
    fn test_asset_url() {
        assert_eq!(
            repo().asset_url(&AssetId::new("file-1")).as_deref(),
            Some("https://store.example/v1/storage/buckets/photos/files/file-1/view?project=proj")
        );
    }

    #[test]
    fn test_asset_preview_url() {
        let url = repo().asset_preview_url(&AssetId::new("file-1")).unwrap();
        assert!(url.starts_with("https://store.example/v1/storage/buckets/photos/files/file-1/preview?"));
        assert!(url.contains("width=400"));
        assert!(url.contains("height=300"));
        assert!(url.contains("gravity=center"));
        assert!(url.contains("quality=80"));
    }

    #[test]
    fn test_user_filter() {
        let filter: Value = serde_json::from_str(&user_filter(&UserId::new("u-1"))).unwrap();
        assert_eq!(filter["method"], "equal");
        assert_eq!(filter["attribute"], "UserId");
        assert_eq!(filter["values"][0], "u-1");
    }

    #[test]
    fn test_row_data_column_names() {
        let req = CreateProjectRequest {
            title: "Kitchen".to_string(),
            city: "Pune".to_string(),
            current_photo: AssetId::new("a1"),
            ideal_photo: AssetId::new("a2"),
            budget: None,
            description: "plan".to_string(),
            user_id: UserId::new("u-1"),
        };
        let body = serde_json::to_value(CreateRowBody {
            row_id: defaults::UNIQUE_ID,
            data: RowData::from(&req),
        })
        .unwrap();

        assert_eq!(body["rowId"], "unique()");
        assert_eq!(body["data"]["Title"], "Kitchen");
        assert_eq!(body["data"]["CurrentPhoto"], "a1");
        assert_eq!(body["data"]["Idealphoto"], "a2");
        assert!(body["data"]["Budget"].is_null());
        assert_eq!(body["data"]["UserId"], "u-1");
    }
}
