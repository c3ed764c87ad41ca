//! # planovate-workflow
//!
//! The renovation project workflow: collect two room photos, analyze them,
//! review the synthesized plan, and commit the project.
//!
//! ```text
//! Collecting ──request_analysis──▶ Analyzing ──ok──▶ Reviewing ──commit──▶ Committing ──ok──▶ Done
//!     ▲                               │                 │  ▲                  │
//!     └────────── analysis error ─────┘                 │  └─ upload/create ──┘
//!     └──────────────────── reanalyze ──────────────────┘        error
//! ```
//!
//! `Analyzing` and `Committing` are busy phases: a second request while one
//! is in flight is rejected with [`planovate_core::Error::Busy`].

pub mod config;
pub mod controller;
pub mod history;

// Re-export core types
pub use planovate_core::*;

pub use config::WorkflowConfig;
pub use controller::{CommitInput, Review, WorkflowController};
pub use history::load_history;
