// src/config/mod.rs

//! Project file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a project file from disk (`loader.rs`).
//! - Validate references and subtask nesting (`validate.rs`).
//! - Turn a validated project into a scheduler (`project.rs`).

pub mod loader;
pub mod model;
pub mod project;
pub mod validate;

pub use loader::{default_project_path, load_and_validate, load_from_path, parse_raw};
pub use model::{DefaultSection, ProjectFile, RawProjectFile, TaskConfig};
pub use project::{ProjectPolicy, ProjectScheduler, ProjectTask};
