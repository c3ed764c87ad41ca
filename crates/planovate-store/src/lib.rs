//! # planovate-store
//!
//! Implementations of [`planovate_core::ProjectRepository`].
//!
//! This crate provides:
//! - [`RestProjectRepository`], a client for an Appwrite-compatible bucket
//!   and table REST API (asset upload, row create/get/list)
//! - [`MemoryProjectRepository`], an in-process repository with failure
//!   injection and selectable list envelopes, used by workflow tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use planovate_store::{RestProjectRepository, StoreConfig};
//! use planovate_core::{normalize_project_list, ProjectRepository, UserId};
//!
//! let repo = RestProjectRepository::new(StoreConfig::from_env()?)?;
//! let raw = repo.list_projects_for_user(&UserId::new("user-1")).await?;
//! for project in normalize_project_list(raw) {
//!     println!("{}", project.id);
//! }
//! ```

pub mod config;
pub mod memory;
pub mod rest;

// Re-export core types
pub use planovate_core::*;

pub use config::StoreConfig;
pub use memory::{ListEnvelope, MemoryProjectRepository, RepositoryCall};
pub use rest::RestProjectRepository;
