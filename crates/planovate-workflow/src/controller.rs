//! Workflow controller state machine.
//!
//! One controller drives one project submission for one user session. State
//! lives behind a mutex that is only held between suspension points, never
//! across a call to a collaborator. Each analysis and commit gets a run
//! number; a response whose run is no longer current is discarded with
//! [`Error::Superseded`] instead of touching state.

use std::sync::Arc;
use std::time::Instant;

use planovate_core::{
    resolve_budget, synthesize_description, AnalysisBackend, AnalysisResult, AssetId,
    AssetRole, CreateProjectRequest, Error, ImagePayload, MissingField, ProjectInput,
    ProjectRecord, ProjectRepository, Result, UserSession, WorkflowPhase,
};
use tokio::sync::Mutex;
use tracing::{debug, field, info, instrument, warn, Span};

use crate::config::WorkflowConfig;

// =============================================================================
// PUBLIC TYPES
// =============================================================================

/// What the user reviews after a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// The entries the analysis was run with.
    pub input: ProjectInput,
    pub result: AnalysisResult,
    /// Synthesized from `result`; the default project description.
    pub description: String,
}

impl Review {
    /// Commit fields pre-filled from the draft budget and synthesized text.
    pub fn commit_input(&self) -> CommitInput {
        CommitInput {
            budget: self.input.budget,
            description: Some(self.description.clone()),
        }
    }
}

/// Review-stage edits applied at commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitInput {
    /// Edited budget. `None` keeps the budget entered before analysis; a
    /// value below the minimum falls back to the analysis estimate.
    pub budget: Option<f64>,
    /// Edited description. `None` or blank keeps the synthesized text.
    pub description: Option<String>,
}

impl CommitInput {
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug)]
enum State {
    Collecting(ProjectInput),
    Analyzing { draft: ProjectInput, run: u64 },
    Reviewing(Review),
    Committing { review: Review, run: u64 },
    Done(ProjectRecord),
}

impl State {
    fn phase(&self) -> WorkflowPhase {
        match self {
            Self::Collecting(_) => WorkflowPhase::Collecting,
            Self::Analyzing { .. } => WorkflowPhase::Analyzing,
            Self::Reviewing(_) => WorkflowPhase::Reviewing,
            Self::Committing { .. } => WorkflowPhase::Committing,
            Self::Done(_) => WorkflowPhase::Done,
        }
    }

    fn run(&self) -> Option<u64> {
        match self {
            Self::Analyzing { run, .. } | Self::Committing { run, .. } => Some(*run),
            _ => None,
        }
    }

    /// Reject an operation that is not allowed in this phase.
    fn reject(&self, operation: &'static str) -> Error {
        let phase = self.phase();
        if phase.is_busy() {
            Error::Busy(phase)
        } else {
            Error::InvalidState { operation, phase }
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: State,
    last_run: u64,
}

impl Inner {
    fn next_run(&mut self) -> u64 {
        self.last_run += 1;
        self.last_run
    }

    fn is_current(&self, run: u64) -> bool {
        self.state.run() == Some(run)
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Drives one project from photo selection to a saved record.
pub struct WorkflowController {
    session: UserSession,
    analysis: Arc<dyn AnalysisBackend>,
    repository: Arc<dyn ProjectRepository>,
    config: WorkflowConfig,
    inner: Mutex<Inner>,
}

impl WorkflowController {
    pub fn new(
        session: UserSession,
        analysis: Arc<dyn AnalysisBackend>,
        repository: Arc<dyn ProjectRepository>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            session,
            analysis,
            repository,
            config,
            inner: Mutex::new(Inner {
                state: State::Collecting(ProjectInput::default()),
                last_run: 0,
            }),
        }
    }

    pub fn session(&self) -> &UserSession {
        &self.session
    }

    pub async fn phase(&self) -> WorkflowPhase {
        self.inner.lock().await.state.phase()
    }

    /// The review surface, while reviewing or committing.
    pub async fn review(&self) -> Option<Review> {
        match &self.inner.lock().await.state {
            State::Reviewing(review) | State::Committing { review, .. } => Some(review.clone()),
            _ => None,
        }
    }

    /// The entries the user has made so far.
    pub async fn draft(&self) -> Option<ProjectInput> {
        match &self.inner.lock().await.state {
            State::Collecting(draft) | State::Analyzing { draft, .. } => Some(draft.clone()),
            State::Reviewing(review) | State::Committing { review, .. } => {
                Some(review.input.clone())
            }
            State::Done(_) => None,
        }
    }

    /// The saved record once the workflow is done.
    pub async fn committed(&self) -> Option<ProjectRecord> {
        match &self.inner.lock().await.state {
            State::Done(record) => Some(record.clone()),
            _ => None,
        }
    }

    /// Analyze the current and ideal photos.
    ///
    /// Both photos are required; a validation failure names every missing
    /// one and leaves the workflow collecting with `input` as the draft. On
    /// analysis failure the workflow returns to collecting and nothing from
    /// the failed run is kept.
    #[instrument(skip(self, input), fields(
        subsystem = "workflow",
        component = "controller",
        op = "request_analysis",
        user_id = %self.session.user_id,
        run_id = field::Empty,
    ))]
    pub async fn request_analysis(&self, input: ProjectInput) -> Result<Review> {
        let (run, request) = {
            let mut inner = self.inner.lock().await;
            if !matches!(inner.state, State::Collecting(_)) {
                return Err(inner.state.reject("request analysis"));
            }

            let request = match input.to_analysis_request() {
                Ok(request) => request,
                Err(e) => {
                    debug!(error = %e, "Analysis input incomplete");
                    inner.state = State::Collecting(input);
                    return Err(e);
                }
            };

            let run = inner.next_run();
            inner.state = State::Analyzing { draft: input, run };
            (run, request)
        };
        Span::current().record("run_id", run);

        let start = Instant::now();
        let outcome = self.analysis.analyze(&request).await;

        let mut inner = self.inner.lock().await;
        if !inner.is_current(run) {
            debug!("Discarding analysis response for superseded run");
            return Err(Error::Superseded);
        }
        let draft = match std::mem::replace(
            &mut inner.state,
            State::Collecting(ProjectInput::default()),
        ) {
            State::Analyzing { draft, .. } => draft,
            other => {
                // Only reachable if a run number is reused, which next_run prevents.
                inner.state = other;
                return Err(Error::Superseded);
            }
        };

        match outcome {
            Ok(result) => {
                let description = synthesize_description(&result);
                let review = Review {
                    input: draft,
                    result,
                    description,
                };
                info!(
                    plan_items = review.result.plan.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Analysis ready for review"
                );
                inner.state = State::Reviewing(review.clone());
                Ok(review)
            }
            Err(e) => {
                let e = match e {
                    Error::Analysis { .. } => e,
                    other => Error::Analysis {
                        status: None,
                        detail: other.to_string(),
                    },
                };
                warn!(error = %e, "Analysis failed, back to collecting");
                inner.state = State::Collecting(draft);
                Err(e)
            }
        }
    }

    /// Discard the review and go back to collecting with the same entries.
    #[instrument(skip(self), fields(
        subsystem = "workflow",
        component = "controller",
        op = "reanalyze",
    ))]
    pub async fn reanalyze(&self) -> Result<ProjectInput> {
        let mut inner = self.inner.lock().await;
        let review = match &inner.state {
            State::Reviewing(review) => review.clone(),
            other => return Err(other.reject("reanalyze")),
        };
        debug!("Review discarded");
        inner.state = State::Collecting(review.input.clone());
        Ok(review.input)
    }

    /// Drop everything and start over.
    ///
    /// A call still in flight for the old run completes against the
    /// collaborator but its response is discarded.
    pub async fn abandon(&self) {
        let mut inner = self.inner.lock().await;
        debug!(phase = %inner.state.phase(), "Workflow abandoned");
        inner.state = State::Collecting(ProjectInput::default());
    }

    /// Save the reviewed project.
    ///
    /// Uploads the current photo, then the ideal photo, then creates the
    /// record. A failed upload aborts before anything else is attempted and
    /// a failed create reports the two orphaned assets; both return the
    /// workflow to reviewing so the commit can be retried without a new
    /// analysis.
    #[instrument(skip(self, edits), fields(
        subsystem = "workflow",
        component = "controller",
        op = "commit",
        user_id = %self.session.user_id,
        run_id = field::Empty,
    ))]
    pub async fn commit(&self, edits: CommitInput) -> Result<ProjectRecord> {
        let (run, review) = {
            let mut inner = self.inner.lock().await;
            let review = match &inner.state {
                State::Reviewing(review) => review.clone(),
                other => return Err(other.reject("commit")),
            };

            let missing = review.input.missing_for_commit();
            if !missing.is_empty() {
                return Err(Error::Validation { missing });
            }

            let run = inner.next_run();
            inner.state = State::Committing {
                review: review.clone(),
                run,
            };
            (run, review)
        };
        Span::current().record("run_id", run);

        let start = Instant::now();
        let input = &review.input;
        let budget = resolve_budget(
            edits.budget.or(input.budget),
            Some(review.result.estimated_cost),
            self.config.min_budget,
        );
        let description = edits
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| review.description.clone());

        let current_photo = self
            .upload(run, AssetRole::Current, input.current_image.as_ref())
            .await?;
        let ideal_photo = self
            .upload(run, AssetRole::Ideal, input.ideal_image.as_ref())
            .await?;

        let request = CreateProjectRequest {
            title: trimmed(&input.title),
            city: trimmed(&input.city),
            current_photo: current_photo.clone(),
            ideal_photo: ideal_photo.clone(),
            budget,
            description,
            user_id: self.session.user_id.clone(),
        };

        match self.repository.create_project(request).await {
            Ok(record) => {
                let mut inner = self.inner.lock().await;
                if !inner.is_current(run) {
                    warn!(
                        project_id = %record.id,
                        "Project created for a superseded run"
                    );
                    return Err(Error::Superseded);
                }
                info!(
                    project_id = %record.id,
                    budget = ?record.budget,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Project committed"
                );
                inner.state = State::Done(record.clone());
                Ok(record)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    current_asset = %current_photo,
                    ideal_asset = %ideal_photo,
                    "Project create failed, uploaded assets orphaned"
                );
                self.back_to_review(
                    run,
                    Error::Persistence {
                        message: e.to_string(),
                        orphaned: vec![current_photo, ideal_photo],
                    },
                )
                .await
            }
        }
    }

    /// Upload one photo for the commit in progress.
    async fn upload(
        &self,
        run: u64,
        role: AssetRole,
        image: Option<&ImagePayload>,
    ) -> Result<AssetId> {
        let Some(image) = image else {
            let missing = match role {
                AssetRole::Current => MissingField::CurrentImage,
                AssetRole::Ideal => MissingField::IdealImage,
            };
            return self
                .back_to_review(run, Error::Validation { missing: vec![missing] })
                .await;
        };

        match self.repository.upload_asset(image).await {
            Ok(asset_id) => {
                if !self.inner.lock().await.is_current(run) {
                    return Err(Error::Superseded);
                }
                debug!(asset_role = %role, asset_id = %asset_id, "Asset uploaded");
                Ok(asset_id)
            }
            Err(e) => {
                warn!(asset_role = %role, error = %e, "Asset upload failed");
                self.back_to_review(
                    run,
                    Error::Upload {
                        asset: role,
                        message: e.to_string(),
                    },
                )
                .await
            }
        }
    }

    /// Return a failed commit to reviewing, unless the run was superseded.
    async fn back_to_review<T>(&self, run: u64, error: Error) -> Result<T> {
        let mut inner = self.inner.lock().await;
        if !inner.is_current(run) {
            return Err(Error::Superseded);
        }
        if let State::Committing { review, .. } = std::mem::replace(
            &mut inner.state,
            State::Collecting(ProjectInput::default()),
        ) {
            inner.state = State::Reviewing(review);
        }
        Err(error)
    }
}

fn trimmed(text: &Option<String>) -> String {
    text.as_deref().map(str::trim).unwrap_or_default().to_string()
}
