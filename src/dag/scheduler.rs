// src/dag/scheduler.rs

use tracing::{debug, warn};

use crate::dag::graph::PointGraph;
use crate::dag::policy::{DefaultPolicy, PyorityPolicy};
use crate::dag::resolver::Resolution;
use crate::dag::traversal::{Phase, Traversal};
use crate::errors::{PyorityError, Result};
use crate::types::{Handle, PointId, Role, TaskId, Weight};

/// Scheduler holds the point graph, the pyority policy and the session state.
///
/// It is responsible for:
/// - recording tasks, subtasks and dependencies while the graph is open
/// - freezing the graph and resolving total pyorities exactly once
/// - handing out points in dependency order through [`Scheduler::traverse`]
///
/// A scheduler is single-use: once resolved it rejects every mutation with
/// [`PyorityError::GraphFrozen`], and its traversal cannot be restarted.
#[derive(Debug)]
pub struct Scheduler<T, W = f64, P = DefaultPolicy> {
    graph: PointGraph<T>,
    policy: P,
    phase: Phase<W>,
}

impl<T> Scheduler<T> {
    /// Scheduler with `f64` pyorities and the [`DefaultPolicy`].
    pub fn new() -> Self {
        Self {
            graph: PointGraph::new(),
            policy: DefaultPolicy,
            phase: Phase::Building,
        }
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, W, P> Scheduler<T, W, P>
where
    W: Weight,
    P: PyorityPolicy<T, W>,
{
    /// Scheduler using a caller-supplied pyority policy.
    pub fn with_policy(policy: P) -> Self {
        Self {
            graph: PointGraph::new(),
            policy,
            phase: Phase::Building,
        }
    }

    /// Freeze the graph and compute total pyorities, or return the memoized
    /// result of an earlier resolution.
    pub fn resolve(&mut self) -> Result<&Resolution<W>> {
        if matches!(self.phase, Phase::Building) {
            self.phase = Phase::resolve(&self.graph, &self.policy);
        }

        match &self.phase {
            Phase::Running(run) => Ok(&run.resolution),
            Phase::Failed(failure) => Err(failure.to_error()),
            Phase::Building => Err(PyorityError::Invariant(
                "graph still open after resolution".to_string(),
            )),
        }
    }

    /// Own pyority of a point, as assigned by the policy.
    pub fn pyority(&mut self, point: PointId) -> Result<W> {
        self.graph.check_point(point)?;
        let resolution = self.resolve()?;
        resolution
            .pyority(point)
            .ok_or(PyorityError::InvalidHandle(Handle::Point(point)))
    }

    /// Own pyority plus that of every point transitively depending on `point`.
    pub fn total_pyority(&mut self, point: PointId) -> Result<W> {
        self.graph.check_point(point)?;
        let resolution = self.resolve()?;
        resolution
            .total_pyority(point)
            .ok_or(PyorityError::InvalidHandle(Handle::Point(point)))
    }

    /// Number of points transitively depending on `point`.
    pub fn dependent_count(&mut self, point: PointId) -> Result<usize> {
        self.graph.check_point(point)?;
        let resolution = self.resolve()?;
        resolution
            .dependent_count(point)
            .ok_or(PyorityError::InvalidHandle(Handle::Point(point)))
    }

    /// Points that must be visited before `point`, directly or not.
    pub fn transitive_dependencies(&mut self, point: PointId) -> Result<Vec<PointId>> {
        self.graph.check_point(point)?;
        Ok(self.resolve()?.transitive_dependencies(point))
    }

    /// Points that cannot be visited before `point`, directly or not.
    pub fn transitive_dependents(&mut self, point: PointId) -> Result<Vec<PointId>> {
        self.graph.check_point(point)?;
        Ok(self.resolve()?.transitive_dependents(point))
    }

    /// Iterate the points in schedule order.
    ///
    /// The traversal state lives in the scheduler: calling this again resumes
    /// where the previous traversal stopped, and yields nothing once every
    /// point has been visited.
    pub fn traverse(&mut self) -> Traversal<'_, T, W, P> {
        Traversal::new(&self.graph, &self.policy, &mut self.phase)
    }
}

impl<T, W, P> Scheduler<T, W, P> {
    /// Add a task and, optionally, subtasks nested inside it.
    ///
    /// Returns the task handle and one handle per subtask, in order.
    pub fn add_task(
        &mut self,
        data: T,
        subtasks: impl IntoIterator<Item = T>,
    ) -> Result<(TaskId, Vec<TaskId>)> {
        self.ensure_open("add a task")?;
        let task = self.graph.add_task(data);
        debug!(%task, "added task");
        let children = self.nest_new(task, subtasks)?;
        Ok((task, children))
    }

    /// Add new tasks nested inside an existing one.
    ///
    /// `add_task(data, subs)` is the same as `add_task(data, [])` followed by
    /// `add_subtasks(task, subs)`.
    pub fn add_subtasks(
        &mut self,
        parent: TaskId,
        subtasks: impl IntoIterator<Item = T>,
    ) -> Result<Vec<TaskId>> {
        self.ensure_open("add subtasks")?;
        self.graph.check_task(parent)?;
        self.nest_new(parent, subtasks)
    }

    /// Make `to` wait for `from`.
    ///
    /// Either side may be a point or a task. A task passed as `to` means its
    /// start; a task passed as `from` means its end.
    pub fn add_dependency(&mut self, to: impl Into<Handle>, from: impl Into<Handle>) -> Result<()> {
        self.ensure_open("add a dependency")?;
        let to = self.graph.dependent_point(to.into())?;
        let from = self.graph.dependency_point(from.into())?;
        if self.graph.add_edge(from, to)? {
            debug!(%from, %to, "added dependency");
        } else {
            debug!(%from, %to, "dependency already present");
        }
        Ok(())
    }

    /// `this` cannot start before `depends_on_that` has ended.
    pub fn add_task_dependency(&mut self, this: TaskId, depends_on_that: TaskId) -> Result<()> {
        self.add_dependency(this, depends_on_that)
    }

    /// Whether the graph has been frozen by resolution or traversal.
    pub fn is_frozen(&self) -> bool {
        !matches!(self.phase, Phase::Building)
    }

    pub fn task_count(&self) -> usize {
        self.graph.task_count()
    }

    pub fn point_count(&self) -> usize {
        self.graph.point_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All tasks, in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.graph.tasks()
    }

    pub fn start(&self, task: TaskId) -> Result<PointId> {
        self.graph.check_task(task)?;
        Ok(task.start())
    }

    pub fn end(&self, task: TaskId) -> Result<PointId> {
        self.graph.check_task(task)?;
        Ok(task.end())
    }

    pub fn task_data(&self, task: TaskId) -> Result<&T> {
        self.graph
            .task_data(task)
            .ok_or(PyorityError::InvalidHandle(Handle::Task(task)))
    }

    /// Subtasks of `task`, in the order they were added.
    pub fn subtasks(&self, task: TaskId) -> Result<&[TaskId]> {
        self.graph.check_task(task)?;
        Ok(self.graph.subtasks_of(task))
    }

    pub fn parent(&self, task: TaskId) -> Result<Option<TaskId>> {
        self.graph.check_task(task)?;
        Ok(self.graph.parent_of(task))
    }

    pub fn role(&self, point: PointId) -> Result<Role> {
        self.graph.check_point(point)?;
        Ok(point.role())
    }

    pub fn task_of(&self, point: PointId) -> Result<TaskId> {
        self.graph.check_point(point)?;
        Ok(point.task())
    }

    /// Points `point` directly waits for.
    pub fn direct_dependencies(&self, point: PointId) -> Result<&[PointId]> {
        self.graph.check_point(point)?;
        Ok(self.graph.dependencies_of(point))
    }

    /// Points directly waiting for `point`.
    pub fn direct_dependents(&self, point: PointId) -> Result<&[PointId]> {
        self.graph.check_point(point)?;
        Ok(self.graph.dependents_of(point))
    }

    /// Whether `point` has already been handed out by a traversal.
    pub fn is_visited(&self, point: PointId) -> Result<bool> {
        self.graph.check_point(point)?;
        Ok(match &self.phase {
            Phase::Running(run) => run.is_visited(point),
            Phase::Building | Phase::Failed(_) => false,
        })
    }

    /// Number of points not yet handed out.
    pub fn remaining(&self) -> usize {
        match &self.phase {
            Phase::Running(run) => run.remaining(),
            Phase::Building | Phase::Failed(_) => self.graph.point_count(),
        }
    }

    /// Read-only access to the underlying point graph.
    pub fn graph(&self) -> &PointGraph<T> {
        &self.graph
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.is_frozen() {
            warn!(operation, "graph is frozen; rejecting mutation");
            return Err(PyorityError::GraphFrozen(operation));
        }
        Ok(())
    }

    fn nest_new(
        &mut self,
        parent: TaskId,
        subtasks: impl IntoIterator<Item = T>,
    ) -> Result<Vec<TaskId>> {
        let mut children = Vec::new();
        for data in subtasks {
            let child = self.graph.add_task(data);
            self.graph.nest(parent, child)?;
            debug!(%parent, %child, "added subtask");
            children.push(child);
        }
        Ok(children)
    }
}
