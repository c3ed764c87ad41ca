//! Project history for the signed-in user.

use planovate_core::{normalize_project_list, ProjectRecord, ProjectRepository, Result, UserSession};
use tracing::{debug, instrument};

/// Load the user's projects in the order the repository returned them.
///
/// Only the list call itself can fail; an unrecognized response shape
/// yields an empty history.
#[instrument(skip(repo, session), fields(
    subsystem = "workflow",
    component = "history",
    op = "load_history",
    user_id = %session.user_id,
))]
pub async fn load_history(
    repo: &dyn ProjectRepository,
    session: &UserSession,
) -> Result<Vec<ProjectRecord>> {
    let raw = repo.list_projects_for_user(&session.user_id).await?;
    let projects = normalize_project_list(raw);
    debug!(result_count = projects.len(), "History loaded");
    Ok(projects)
}
