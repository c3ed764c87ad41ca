//! planovate: renovation planning from the terminal.
//!
//! Submits a current and an ideal room photo for analysis, prints the
//! synthesized renovation plan, and optionally saves it as a project.

mod images;
mod logging;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use planovate_analysis::HttpAnalysisBackend;
use planovate_core::{
    AnalysisBackend, ProjectId, ProjectInput, ProjectRepository, UserSession,
};
use planovate_store::{MemoryProjectRepository, RestProjectRepository};
use planovate_workflow::{load_history, WorkflowConfig, WorkflowController};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "planovate")]
#[command(author, version, about = "Plan a room renovation from two photos")]
#[command(propagate_version = true)]
struct Cli {
    /// Signed-in user id
    #[arg(long, global = true, env = "PLANOVATE_USER_ID")]
    user_id: Option<String>,

    /// Signed-in user display name
    #[arg(long, global = true, env = "PLANOVATE_USER_NAME")]
    user_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a current/ideal photo pair and print the plan
    Analyze {
        /// Photo of the room as it is now
        #[arg(long)]
        current: PathBuf,

        /// Photo of the room as you want it
        #[arg(long)]
        ideal: PathBuf,

        /// Budget in the project currency
        #[arg(long)]
        budget: Option<f64>,

        /// City the room is in
        #[arg(long)]
        city: Option<String>,

        /// Project title
        #[arg(long)]
        title: Option<String>,

        /// Save the project after analysis
        #[arg(long)]
        commit: bool,

        /// Save this file's text as the description instead of the plan
        #[arg(long, requires = "commit")]
        description_file: Option<PathBuf>,
    },

    /// List your saved projects
    History,

    /// Show one saved project
    Show {
        /// Project id
        id: String,
    },

    /// Check that the analysis service is reachable
    Health,
}

impl Cli {
    fn session(&self) -> anyhow::Result<UserSession> {
        let user_id = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .context("No signed-in user: pass --user-id or set PLANOVATE_USER_ID")?;

        let session = UserSession::new(user_id);
        Ok(match self.user_name.as_deref() {
            Some(name) if !name.trim().is_empty() => session.with_display_name(name.trim()),
            _ => session,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Analyze {
            current,
            ideal,
            budget,
            city,
            title,
            commit,
            description_file,
        } => {
            let mut input = ProjectInput::new(
                Some(images::load_image(current).await?),
                Some(images::load_image(ideal).await?),
            );
            input.budget = *budget;
            input.city = city.clone();
            input.title = title.clone();

            cmd_analyze(&cli, input, *commit, description_file.as_deref()).await
        }
        Commands::History => cmd_history(&cli.session()?).await,
        Commands::Show { id } => cmd_show(&cli.session()?, id).await,
        Commands::Health => cmd_health().await,
    }
}

async fn cmd_analyze(
    cli: &Cli,
    input: ProjectInput,
    commit: bool,
    description_file: Option<&Path>,
) -> anyhow::Result<()> {
    let analysis: Arc<dyn AnalysisBackend> = Arc::new(HttpAnalysisBackend::from_env()?);

    // Without --commit nothing is stored, so no storage configuration is needed.
    let (session, repository): (UserSession, Arc<dyn ProjectRepository>) = if commit {
        (cli.session()?, Arc::new(RestProjectRepository::from_env()?))
    } else {
        let session = cli
            .session()
            .unwrap_or_else(|_| UserSession::new("anonymous"));
        (session, Arc::new(MemoryProjectRepository::new()))
    };

    let workflow =
        WorkflowController::new(session, analysis, repository, WorkflowConfig::from_env());

    let review = workflow.request_analysis(input).await?;
    println!("{}", review.description);

    if !commit {
        return Ok(());
    }

    let mut edits = review.commit_input();
    if let Some(path) = description_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(path = %path.display(), "Using description from file");
        edits.description = Some(text);
    }

    let record = workflow.commit(edits).await?;
    info!(project_id = %record.id, "Project saved");
    println!();
    println!("Saved project {}", record.id);
    Ok(())
}

async fn cmd_history(session: &UserSession) -> anyhow::Result<()> {
    let repo = RestProjectRepository::from_env()?;
    let projects = load_history(&repo, session).await?;

    if projects.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }
    for project in &projects {
        println!("{}", render::project_line(project));
    }
    Ok(())
}

async fn cmd_show(session: &UserSession, id: &str) -> anyhow::Result<()> {
    let repo = RestProjectRepository::from_env()?;
    let record = repo.get_project(&ProjectId::new(id)).await?;

    // Records belong to one user; treat someone else's as missing.
    if record
        .user_id
        .as_ref()
        .is_some_and(|owner| owner != &session.user_id)
    {
        anyhow::bail!("Project {} not found", id);
    }

    println!("{}", render::project_detail(&record, &repo));
    Ok(())
}

async fn cmd_health() -> anyhow::Result<()> {
    let backend = HttpAnalysisBackend::from_env()?;
    let url = backend.config().base_url.clone();
    if backend.health_check().await? {
        println!("Analysis service at {} is healthy", url);
        Ok(())
    } else {
        anyhow::bail!("Analysis service at {} is not responding", url)
    }
}
