#![allow(dead_code)]

use std::collections::BTreeMap;

use pyority::config::{DefaultSection, ProjectFile, RawProjectFile, TaskConfig};

/// Builder for `ProjectFile` to simplify test setup.
pub struct ProjectFileBuilder {
    project: RawProjectFile,
}

impl ProjectFileBuilder {
    pub fn new() -> Self {
        Self {
            project: RawProjectFile {
                default: DefaultSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.project.task.insert(name.to_string(), task);
        self
    }

    pub fn with_default_pyority(mut self, val: f64) -> Self {
        self.project.default.pyority = val;
        self
    }

    pub fn with_default_end_pyority(mut self, val: f64) -> Self {
        self.project.default.end_pyority = val;
        self
    }

    /// The unvalidated form, for tests that expect validation to fail.
    pub fn build_raw(self) -> RawProjectFile {
        self.project
    }

    pub fn build(self) -> ProjectFile {
        ProjectFile::try_from(self.project).expect("Failed to build valid project from builder")
    }
}

impl Default for ProjectFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
#[derive(Default)]
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pyority(mut self, val: f64) -> Self {
        self.task.pyority = Some(val);
        self
    }

    pub fn end_pyority(mut self, val: f64) -> Self {
        self.task.end_pyority = Some(val);
        self
    }

    pub fn subtask(mut self, name: &str) -> Self {
        self.task.subtasks.push(name.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
