//! In-process project repository.
//!
//! Keeps assets and records in memory and serves list calls in a selectable
//! envelope shape. Failures can be injected per call so workflow tests can
//! exercise partial commits.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use planovate_core::{
    AssetId, CreateProjectRequest, Error, ImagePayload, ProjectId, ProjectRecord,
    ProjectRepository, RawProjectList, Result, UserId,
};
use serde_json::Value;
use tokio::sync::{Notify, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Shape of the list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListEnvelope {
    /// `{"total": n, "rows": [...]}`
    #[default]
    Rows,
    /// `{"total": n, "documents": [...]}`
    Documents,
    /// `[...]`
    Bare,
}

impl ListEnvelope {
    fn wrap(&self, items: Vec<Value>) -> Value {
        let total = items.len();
        match self {
            Self::Rows => serde_json::json!({ "total": total, "rows": items }),
            Self::Documents => serde_json::json!({ "total": total, "documents": items }),
            Self::Bare => Value::Array(items),
        }
    }
}

/// A recorded repository call.
#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryCall {
    UploadAsset { file_name: String },
    CreateProject(CreateProjectRequest),
    GetProject(ProjectId),
    ListProjects(UserId),
}

#[derive(Default)]
struct MemoryState {
    assets: HashMap<AssetId, ImagePayload>,
    projects: Vec<ProjectRecord>,
    calls: Vec<RepositoryCall>,
    upload_attempts: usize,
    create_failures: usize,
}

/// Repository that keeps everything in memory.
#[derive(Default)]
pub struct MemoryProjectRepository {
    state: RwLock<MemoryState>,
    envelope: ListEnvelope,
    failing_uploads: HashSet<usize>,
    upload_gate: Option<Arc<Notify>>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve list calls in the given envelope.
    pub fn with_envelope(mut self, envelope: ListEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Fail the `n`th upload attempt (1-based, counted across all uploads).
    pub fn with_upload_failure(mut self, n: usize) -> Self {
        self.failing_uploads.insert(n);
        self
    }

    /// Fail the next `count` record creations.
    pub fn with_create_failures(mut self, count: usize) -> Self {
        self.state.get_mut().create_failures = count;
        self
    }

    /// Hold every upload until the gate is notified.
    pub fn with_upload_gate(mut self, gate: Arc<Notify>) -> Self {
        self.upload_gate = Some(gate);
        self
    }

    /// Seed a record directly, bypassing the call log.
    pub async fn insert(&self, record: ProjectRecord) {
        self.state.write().await.projects.push(record);
    }

    pub async fn calls(&self) -> Vec<RepositoryCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn projects(&self) -> Vec<ProjectRecord> {
        self.state.read().await.projects.clone()
    }

    pub async fn asset_count(&self) -> usize {
        self.state.read().await.assets.len()
    }

    pub async fn upload_count(&self) -> usize {
        self.count(|c| matches!(c, RepositoryCall::UploadAsset { .. }))
            .await
    }

    pub async fn create_count(&self) -> usize {
        self.count(|c| matches!(c, RepositoryCall::CreateProject(_)))
            .await
    }

    async fn count(&self, pred: impl Fn(&RepositoryCall) -> bool) -> usize {
        self.state.read().await.calls.iter().filter(|c| pred(c)).count()
    }
}

fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn upload_asset(&self, asset: &ImagePayload) -> Result<AssetId> {
        let attempt = {
            let mut state = self.state.write().await;
            state.upload_attempts += 1;
            state.calls.push(RepositoryCall::UploadAsset {
                file_name: asset.file_name.clone(),
            });
            state.upload_attempts
        };

        if let Some(gate) = &self.upload_gate {
            gate.notified().await;
        }

        if self.failing_uploads.contains(&attempt) {
            return Err(Error::Request(format!(
                "Injected failure for upload #{}",
                attempt
            )));
        }

        let id = AssetId(new_id());
        self.state
            .write()
            .await
            .assets
            .insert(id.clone(), asset.clone());
        debug!(asset_id = %id, attempt, "Stored asset in memory");
        Ok(id)
    }

    async fn create_project(&self, req: CreateProjectRequest) -> Result<ProjectRecord> {
        let mut state = self.state.write().await;
        state.calls.push(RepositoryCall::CreateProject(req.clone()));

        if state.create_failures > 0 {
            state.create_failures -= 1;
            return Err(Error::Request("Injected failure for create".to_string()));
        }

        let now = Utc::now();
        let record = ProjectRecord {
            id: ProjectId(new_id()),
            title: Some(req.title),
            city: Some(req.city),
            current_photo: Some(req.current_photo),
            ideal_photo: Some(req.ideal_photo),
            budget: req.budget,
            description: Some(req.description),
            user_id: Some(req.user_id),
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.projects.push(record.clone());
        debug!(project_id = %record.id, "Stored project in memory");
        Ok(record)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<ProjectRecord> {
        let mut state = self.state.write().await;
        state.calls.push(RepositoryCall::GetProject(id.clone()));
        state
            .projects
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Project {} not found", id)))
    }

    async fn list_projects_for_user(&self, user_id: &UserId) -> Result<RawProjectList> {
        let mut state = self.state.write().await;
        state.calls.push(RepositoryCall::ListProjects(user_id.clone()));
        let items = state
            .projects
            .iter()
            .filter(|p| p.user_id.as_ref() == Some(user_id))
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(RawProjectList(self.envelope.wrap(items)))
    }
}
