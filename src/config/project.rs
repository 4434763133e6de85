// src/config/project.rs

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use tracing::{debug, info};

use crate::config::model::ProjectFile;
use crate::dag::policy::{PyorityPolicy, TaskData};
use crate::dag::scheduler::Scheduler;
use crate::errors::{PyorityError, Result};
use crate::types::TaskId;

/// Task payload built from a `[task.<name>]` section, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTask {
    pub name: String,
    pub pyority: f64,
    pub end_pyority: f64,
}

impl TaskData for ProjectTask {
    fn pyority(&self) -> f64 {
        self.pyority
    }
}

impl fmt::Display for ProjectTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reads both roles from the task itself, unlike [`crate::DefaultPolicy`]
/// which leaves end points at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectPolicy;

impl PyorityPolicy<ProjectTask, f64> for ProjectPolicy {
    fn start_pyority(&self, data: &ProjectTask) -> f64 {
        data.pyority
    }

    fn end_pyority(&self, data: &ProjectTask) -> f64 {
        data.end_pyority
    }
}

pub type ProjectScheduler = Scheduler<ProjectTask, f64, ProjectPolicy>;

impl ProjectFile {
    fn project_task(&self, name: &str) -> ProjectTask {
        ProjectTask {
            name: name.to_string(),
            pyority: self.start_pyority_of(name),
            end_pyority: self.end_pyority_of(name),
        }
    }

    /// Build a scheduler holding every task of the project.
    ///
    /// Root tasks are added in name order and their subtasks breadth-first in
    /// declaration order, so task ids are stable for a given file. `after`
    /// entries become task dependencies once every task exists.
    ///
    /// Also returns the name to task id map.
    pub fn build_scheduler(&self) -> Result<(ProjectScheduler, BTreeMap<String, TaskId>)> {
        let mut scheduler = ProjectScheduler::with_policy(ProjectPolicy);
        let mut ids: BTreeMap<String, TaskId> = BTreeMap::new();
        let mut queue: VecDeque<(&str, TaskId)> = VecDeque::new();

        for root in self.root_tasks() {
            let (id, _) = scheduler.add_task(self.project_task(root), [])?;
            ids.insert(root.to_string(), id);
            queue.push_back((root, id));
        }

        while let Some((name, id)) = queue.pop_front() {
            let Some(cfg) = self.task.get(name) else {
                continue;
            };
            let children = scheduler.add_subtasks(
                id,
                cfg.subtasks.iter().map(|sub| self.project_task(sub)),
            )?;
            for (sub, child) in cfg.subtasks.iter().zip(children) {
                ids.insert(sub.clone(), child);
                queue.push_back((sub.as_str(), child));
            }
        }

        for (name, cfg) in self.task.iter() {
            let this = lookup(&ids, name)?;
            for dep in cfg.after.iter() {
                let that = lookup(&ids, dep)?;
                debug!(task = %name, after = %dep, "adding project dependency");
                scheduler.add_task_dependency(this, that)?;
            }
        }

        info!(
            tasks = scheduler.task_count(),
            edges = scheduler.edge_count(),
            "project scheduler built"
        );
        Ok((scheduler, ids))
    }
}

fn lookup(ids: &BTreeMap<String, TaskId>, name: &str) -> Result<TaskId> {
    ids.get(name).copied().ok_or_else(|| {
        PyorityError::ConfigError(format!(
            "task '{}' is not reachable from any root task",
            name
        ))
    })
}
