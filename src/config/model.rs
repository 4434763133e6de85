// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level project file as read from TOML, before validation.
///
/// ```toml
/// [default]
/// pyority = 0.0
///
/// [task.A]
/// pyority = 2.0
/// subtasks = ["A1", "A2"]
///
/// [task.A1]
///
/// [task.A2]
/// after = ["A1"]
/// ```
///
/// All sections are optional at the serde level; [`ProjectFile`] is the
/// validated form the rest of the crate works with.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectFile {
    /// Fallback pyorities from `[default]`.
    #[serde(default)]
    pub default: DefaultSection,

    /// All tasks from `[task.<name>]`, keyed by name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A validated project file.
///
/// Obtained through `ProjectFile::try_from(raw)` (see `validate.rs`), which
/// guarantees that every reference resolves and that subtask nesting forms
/// a forest.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub default: DefaultSection,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(default: DefaultSection, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { default, task }
    }

    /// Tasks that are nobody's subtask, in name order.
    pub fn root_tasks(&self) -> Vec<&str> {
        self.task
            .keys()
            .filter(|name| !self.task.values().any(|t| t.subtasks.contains(*name)))
            .map(|s| s.as_str())
            .collect()
    }

    /// Start pyority of a task, after applying `[default]`.
    pub fn start_pyority_of(&self, name: &str) -> f64 {
        self.task
            .get(name)
            .and_then(|t| t.pyority)
            .unwrap_or(self.default.pyority)
    }

    /// End pyority of a task, after applying `[default]`.
    pub fn end_pyority_of(&self, name: &str) -> f64 {
        self.task
            .get(name)
            .and_then(|t| t.end_pyority)
            .unwrap_or(self.default.end_pyority)
    }
}

/// `[default]` section.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct DefaultSection {
    /// Start pyority for tasks that don't set `pyority`.
    #[serde(default)]
    pub pyority: f64,

    /// End pyority for tasks that don't set `end_pyority`.
    #[serde(default)]
    pub end_pyority: f64,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    /// Own pyority of the task's start point.
    #[serde(default)]
    pub pyority: Option<f64>,

    /// Own pyority of the task's end point.
    #[serde(default)]
    pub end_pyority: Option<f64>,

    /// Tasks nested inside this one. A task may have at most one parent.
    #[serde(default)]
    pub subtasks: Vec<String>,

    /// This task cannot start before every task listed here has ended.
    #[serde(default)]
    pub after: Vec<String>,
}
