// src/lib.rs

//! Deterministic, dependency-respecting ordering of task start and end
//! points, greedily led by total pyority.
//!
//! ```
//! use pyority::Scheduler;
//!
//! let mut scheduler: Scheduler<&str> = Scheduler::new();
//! let (a, _) = scheduler.add_task("A", ["A1", "A2"]).unwrap();
//! let (b, _) = scheduler.add_task("B", []).unwrap();
//! scheduler.add_task_dependency(b, a).unwrap();
//!
//! let order: Vec<String> = scheduler
//!     .traverse()
//!     .map(|visit| visit.map(|v| v.to_string()))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(order.first().map(String::as_str), Some("Start: A"));
//! assert_eq!(order.last().map(String::as_str), Some("End  : B"));
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod types;

use std::fmt;
use std::io::{self, Write};

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ProjectFile;

pub use crate::dag::{
    DefaultPolicy, PyorityPolicy, Resolution, RolePolicy, Scheduler, TaskData, Traversal, Visit,
    ZeroPolicy,
};
pub use crate::errors::PyorityError;
pub use crate::types::{Handle, PointId, Role, TaskId, Weight};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the project file, then either prints the task list
/// (`--dry-run`) or the full point order.
pub fn run(args: CliArgs) -> Result<()> {
    let project_path = args.project.as_path();
    let project = load_and_validate(project_path)?;
    info!(path = %project_path.display(), tasks = project.task.len(), "project loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.dry_run {
        print_dry_run(&mut out, &project)?;
        return Ok(());
    }

    let (mut scheduler, _ids) = project.build_scheduler()?;
    let written = write_schedule(&mut out, &mut scheduler, args.details)?;
    debug!(points = written, "schedule written");
    Ok(())
}

/// Drive a scheduler to completion, writing one line per point.
///
/// Lines look like `Start: A` / `End  : A`; with `details` the total
/// pyority and dependent count follow. Returns the number of points
/// written. Any scheduling error stops the output and is returned.
pub fn write_schedule<T, W, P>(
    out: &mut impl Write,
    scheduler: &mut Scheduler<T, W, P>,
    details: bool,
) -> Result<usize>
where
    T: fmt::Display,
    W: Weight + fmt::Display,
    P: PyorityPolicy<T, W>,
{
    let mut written = 0;
    for visit in scheduler.traverse() {
        let visit = visit?;
        if details {
            writeln!(
                out,
                "{visit}  (total {}, dependents {})",
                visit.total_pyority(),
                visit.dependent_count()
            )?;
        } else {
            writeln!(out, "{visit}")?;
        }
        written += 1;
    }
    Ok(written)
}

/// Dry-run output: tasks with their effective pyorities, subtasks and
/// `after` lists.
pub fn print_dry_run(out: &mut impl Write, project: &ProjectFile) -> Result<()> {
    writeln!(out, "pyority dry-run")?;
    writeln!(out, "  default.pyority = {}", project.default.pyority)?;
    writeln!(out, "  default.end_pyority = {}", project.default.end_pyority)?;
    writeln!(out)?;

    writeln!(out, "tasks ({}):", project.task.len())?;
    for (name, task) in project.task.iter() {
        writeln!(out, "  - {name}")?;
        writeln!(
            out,
            "      pyority: {} / end {}",
            project.start_pyority_of(name),
            project.end_pyority_of(name)
        )?;
        if !task.subtasks.is_empty() {
            writeln!(out, "      subtasks: {:?}", task.subtasks)?;
        }
        if !task.after.is_empty() {
            writeln!(out, "      after: {:?}", task.after)?;
        }
    }

    debug!("dry-run complete (nothing scheduled)");
    Ok(())
}
