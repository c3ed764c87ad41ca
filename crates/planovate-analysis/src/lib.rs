//! # planovate-analysis
//!
//! Client for the remote renovation analysis service.
//!
//! This crate provides:
//! - [`HttpAnalysisBackend`], a multipart/form-data client for `POST /analyze`
//! - Environment-driven [`AnalysisConfig`]
//! - HTTP status classification for analysis failures
//! - A scripted mock backend (feature `mock`) for workflow tests
//!
//! # Example
//!
//! ```rust,no_run
//! use planovate_analysis::{AnalysisConfig, HttpAnalysisBackend};
//! use planovate_core::{AnalysisBackend, ImagePayload, ProjectInput};
//!
//! #[tokio::main]
//! async fn main() -> planovate_core::Result<()> {
//!     let backend = HttpAnalysisBackend::new(AnalysisConfig::from_env())?;
//!     let input = ProjectInput::new(
//!         Some(ImagePayload::new("before.jpg", "image/jpeg", std::fs::read("before.jpg")?)),
//!         Some(ImagePayload::new("after.jpg", "image/jpeg", std::fs::read("after.jpg")?)),
//!     );
//!     let result = backend.analyze(&input.to_analysis_request()?).await?;
//!     println!("{} plan items", result.plan.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod status;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::HttpAnalysisBackend;
pub use config::AnalysisConfig;
pub use status::AnalysisStatus;
