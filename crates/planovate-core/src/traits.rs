//! Core traits for planovate's external collaborators.
//!
//! The workflow only talks to the analysis service and the storage
//! collaborator through these traits, so concrete HTTP clients and in-memory
//! test doubles are interchangeable.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ANALYSIS BACKEND
// =============================================================================

/// Remote image-analysis service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze a current/ideal image pair and return a renovation plan.
    ///
    /// Implementations return `Error::Analysis` for every failure, carrying
    /// the service's HTTP status when one was received.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult>;

    /// Check if the analysis service is reachable.
    async fn health_check(&self) -> Result<bool>;
}

// =============================================================================
// PROJECT REPOSITORY
// =============================================================================

/// Persistence façade over asset storage and the project table.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Upload a binary asset and return its stable identifier.
    async fn upload_asset(&self, asset: &ImagePayload) -> Result<AssetId>;

    /// Create a project record.
    async fn create_project(&self, req: CreateProjectRequest) -> Result<ProjectRecord>;

    /// Fetch one project. Missing records are `Error::NotFound`.
    async fn get_project(&self, id: &ProjectId) -> Result<ProjectRecord>;

    /// List a user's projects.
    ///
    /// The response envelope is not guaranteed; run it through
    /// [`crate::normalize_project_list`].
    async fn list_projects_for_user(&self, user_id: &UserId) -> Result<RawProjectList>;

    /// URL at which an uploaded asset can be viewed, if the backend exposes one.
    fn asset_url(&self, _asset_id: &AssetId) -> Option<String> {
        None
    }

    /// Thumbnail URL for an uploaded asset, if the backend renders previews.
    fn asset_preview_url(&self, _asset_id: &AssetId) -> Option<String> {
        None
    }
}
