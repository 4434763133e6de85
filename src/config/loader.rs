// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::Result;

/// Load a project file from a given path and return the raw `RawProjectFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// reference and nesting checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_raw(&contents)
}

/// Deserialize project TOML held in memory.
pub fn parse_raw(contents: &str) -> Result<RawProjectFile> {
    let project: RawProjectFile = toml::from_str(contents)?;
    Ok(project)
}

/// Load a project file from path and validate it.
///
/// This is the entry point the binary uses:
///
/// - Reads TOML.
/// - Applies `[default]` pyorities where tasks leave them out.
/// - Checks for unknown or self references, tasks with two parents, nesting
///   loops and invalid pyorities.
///
/// Dependency cycles through `after` are not checked here; the scheduler
/// reports them when it resolves.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let raw = load_from_path(&path)?;
    ProjectFile::try_from(raw)
}

/// `Pyority.toml` in the current working directory.
pub fn default_project_path() -> PathBuf {
    PathBuf::from("Pyority.toml")
}
