// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::{PyorityError, Result};

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = crate::errors::PyorityError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_project(&raw)?;
        Ok(ProjectFile::new_unchecked(raw.default, raw.task))
    }
}

fn validate_raw_project(cfg: &RawProjectFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_pyorities(cfg)?;
    validate_references(cfg)?;
    validate_nesting(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawProjectFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(PyorityError::ConfigError(
            "project must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn check_pyority(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PyorityError::ConfigError(format!(
            "{what} must be a finite number >= 0 (got {value})"
        )));
    }
    Ok(())
}

fn validate_pyorities(cfg: &RawProjectFile) -> Result<()> {
    check_pyority("[default].pyority", cfg.default.pyority)?;
    check_pyority("[default].end_pyority", cfg.default.end_pyority)?;

    for (name, task) in cfg.task.iter() {
        if let Some(p) = task.pyority {
            check_pyority(&format!("[task.{name}].pyority"), p)?;
        }
        if let Some(p) = task.end_pyority {
            check_pyority(&format!("[task.{name}].end_pyority"), p)?;
        }
    }
    Ok(())
}

fn validate_references(cfg: &RawProjectFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for (field, refs) in [("subtasks", &task.subtasks), ("after", &task.after)] {
            for other in refs.iter() {
                if !cfg.task.contains_key(other) {
                    return Err(PyorityError::ConfigError(format!(
                        "task '{}' has unknown task '{}' in `{}`",
                        name, other, field
                    )));
                }
                if other == name {
                    return Err(PyorityError::ConfigError(format!(
                        "task '{}' cannot reference itself in `{}`",
                        name, field
                    )));
                }
            }
        }
    }
    Ok(())
}

fn validate_nesting(cfg: &RawProjectFile) -> Result<()> {
    let mut parents: BTreeMap<&str, &str> = BTreeMap::new();
    for (name, task) in cfg.task.iter() {
        for child in task.subtasks.iter() {
            if let Some(previous) = parents.insert(child.as_str(), name.as_str()) {
                let msg = if previous == name {
                    format!("task '{}' is listed twice in `subtasks` of '{}'", child, name)
                } else {
                    format!(
                        "task '{}' is a subtask of both '{}' and '{}'",
                        child, previous, name
                    )
                };
                return Err(PyorityError::ConfigError(msg));
            }
        }
    }

    // Edge direction: parent -> child. With at most one parent per task, a
    // topological sort only fails if the nesting loops back on itself.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for name in cfg.task.keys() {
        graph.add_node(name.as_str());
    }
    for (child, parent) in parents.iter() {
        graph.add_edge(*parent, *child, ());
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(PyorityError::ConfigError(format!(
            "subtask nesting loops back on itself at task '{}'",
            cycle.node_id()
        ))),
    }
}
