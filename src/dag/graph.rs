// src/dag/graph.rs

use std::collections::HashSet;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::errors::{PyorityError, Result};
use crate::types::{Handle, PointId, Role, TaskId};

/// Internal task record: payload plus nesting information.
#[derive(Debug, Clone)]
struct TaskNode<T> {
    data: T,
    parent: Option<TaskId>,
    subtasks: Vec<TaskId>,
}

/// Adjacency for a single point.
#[derive(Debug, Clone, Default)]
struct PointNode {
    /// Direct dependencies: points that must be visited before this one.
    deps: Vec<PointId>,
    /// Direct dependents: points waiting on this one.
    dependents: Vec<PointId>,
}

/// Arena-backed DAG of task start/end points.
///
/// Every task owns exactly two points and the `start -> end` edge between
/// them; nesting and explicit dependencies add further edges. The graph does
/// not check for cycles on insertion (apart from self-edges); that happens
/// once, in the resolver, over the finished graph.
#[derive(Debug, Clone)]
pub struct PointGraph<T> {
    tasks: Vec<TaskNode<T>>,
    points: Vec<PointNode>,
    /// Every `(from, to)` edge, for constant-time duplicate checks.
    edges: HashSet<(PointId, PointId)>,
}

impl<T> Default for PointGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PointGraph<T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            points: Vec::new(),
            edges: HashSet::new(),
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of distinct edges, implicit ones included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Add a task with its two points and the `start -> end` edge.
    pub fn add_task(&mut self, data: T) -> TaskId {
        let id = TaskId::new(self.tasks.len());
        self.tasks.push(TaskNode {
            data,
            parent: None,
            subtasks: Vec::new(),
        });
        self.points.push(PointNode::default());
        self.points.push(PointNode::default());
        self.insert_edge(id.start(), id.end());
        id
    }

    /// Nest `child` inside `parent`: the child starts after the parent starts
    /// and the parent ends after the child ends.
    ///
    /// Callers nest freshly added tasks only, so a task has at most one parent.
    pub fn nest(&mut self, parent: TaskId, child: TaskId) -> Result<()> {
        self.check_task(parent)?;
        self.check_task(child)?;

        if let Some(node) = self.tasks.get_mut(child.index()) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.tasks.get_mut(parent.index()) {
            node.subtasks.push(child);
        }

        self.insert_edge(parent.start(), child.start());
        self.insert_edge(child.end(), parent.end());
        Ok(())
    }

    /// Record `from -> to`. Returns `false` if the edge already existed.
    ///
    /// Self-edges are rejected here, since they can never be scheduled.
    pub fn add_edge(&mut self, from: PointId, to: PointId) -> Result<bool> {
        self.check_point(from)?;
        self.check_point(to)?;
        if from == to {
            return Err(PyorityError::CyclicDependency { from, to });
        }
        Ok(self.insert_edge(from, to))
    }

    /// Resolve a handle used as the waiting side of a dependency.
    pub fn dependent_point(&self, handle: Handle) -> Result<PointId> {
        self.check_handle(handle)?;
        Ok(handle.as_dependent())
    }

    /// Resolve a handle used as the side being waited on.
    pub fn dependency_point(&self, handle: Handle) -> Result<PointId> {
        self.check_handle(handle)?;
        Ok(handle.as_dependency())
    }

    pub fn contains_task(&self, task: TaskId) -> bool {
        task.index() < self.tasks.len()
    }

    pub fn contains_point(&self, point: PointId) -> bool {
        point.index() < self.points.len()
    }

    pub fn check_task(&self, task: TaskId) -> Result<()> {
        if self.contains_task(task) {
            Ok(())
        } else {
            Err(PyorityError::InvalidHandle(Handle::Task(task)))
        }
    }

    pub fn check_point(&self, point: PointId) -> Result<()> {
        if self.contains_point(point) {
            Ok(())
        } else {
            Err(PyorityError::InvalidHandle(Handle::Point(point)))
        }
    }

    fn check_handle(&self, handle: Handle) -> Result<()> {
        match handle {
            Handle::Task(task) => self.check_task(task),
            Handle::Point(point) => self.check_point(point),
        }
    }

    /// Payload of a task, if the id is valid.
    pub fn task_data(&self, task: TaskId) -> Option<&T> {
        self.tasks.get(task.index()).map(|n| &n.data)
    }

    pub fn parent_of(&self, task: TaskId) -> Option<TaskId> {
        self.tasks.get(task.index()).and_then(|n| n.parent)
    }

    /// Subtasks of a task, in the order they were added.
    pub fn subtasks_of(&self, task: TaskId) -> &[TaskId] {
        self.tasks
            .get(task.index())
            .map(|n| n.subtasks.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependencies of a point (points with an edge into it).
    pub fn dependencies_of(&self, point: PointId) -> &[PointId] {
        self.points
            .get(point.index())
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a point (points with an edge out of it).
    pub fn dependents_of(&self, point: PointId) -> &[PointId] {
        self.points
            .get(point.index())
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// All points, in arena order.
    pub fn points(&self) -> impl Iterator<Item = PointId> + '_ {
        (0..self.points.len()).map(PointId::new)
    }

    /// All tasks, in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        (0..self.tasks.len()).map(TaskId::new)
    }

    /// Payload behind a point along with its role.
    pub fn point_data(&self, point: PointId) -> Option<(Role, &T)> {
        self.task_data(point.task()).map(|data| (point.role(), data))
    }

    /// Mirror the point graph into a `petgraph` graph whose node indices match
    /// the point arena indices.
    pub fn to_petgraph(&self) -> DiGraph<(), ()> {
        let mut graph = DiGraph::with_capacity(self.points.len(), self.edges.len());
        for _ in &self.points {
            graph.add_node(());
        }
        for (from, node) in self.points.iter().enumerate() {
            for to in &node.dependents {
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(to.index()), ());
            }
        }
        graph
    }

    fn insert_edge(&mut self, from: PointId, to: PointId) -> bool {
        if !self.edges.insert((from, to)) {
            return false;
        }

        if let Some(node) = self.points.get_mut(from.index()) {
            node.dependents.push(to);
        }
        if let Some(node) = self.points.get_mut(to.index()) {
            node.deps.push(from);
        }
        true
    }
}
