//! # planovate-core
//!
//! Core types, traits, and pure logic for the planovate renovation planner.
//!
//! This crate provides the domain model shared by every other planovate crate:
//! - Analysis request/result types and project records
//! - Collaborator traits for the analysis service and project storage
//! - The deterministic description synthesizer
//! - The project list normalizer used by history views
//! - Budget resolution and money formatting

pub mod budget;
pub mod defaults;
pub mod description;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod money;
pub mod normalize;
pub mod traits;

// Re-export commonly used types at crate root
pub use budget::resolve_budget;
pub use description::synthesize_description;
pub use display::ProjectDisplay;
pub use error::{Error, ErrorKind, Result};
pub use models::*;
pub use money::{currency_symbol, format_amount, format_money};
pub use normalize::{normalize_project_list, ProjectListEnvelope};
pub use traits::*;
