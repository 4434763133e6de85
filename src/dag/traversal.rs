// src/dag/traversal.rs

//! Pull-based traversal state machine.
//!
//! - [`Phase`] is the per-session state kept inside the scheduler: still
//!   building, running (resolved, with a live frontier), or failed.
//! - [`Traversal`] borrows that state and advances it one point per
//!   `next()` call.
//! - [`Visit`] is what the caller sees for each point.

use std::fmt;
use std::iter::FusedIterator;

use fixedbitset::FixedBitSet;
use tracing::{debug, error, trace};

use crate::dag::graph::PointGraph;
use crate::dag::policy::PyorityPolicy;
use crate::dag::ready_set::ReadySet;
use crate::dag::resolver::{self, Resolution, ResolveFailure};
use crate::errors::{PyorityError, Result};
use crate::types::{PointId, Role, TaskId, Weight};

/// Session state of a scheduler.
#[derive(Debug, Clone)]
pub(crate) enum Phase<W> {
    /// Graph still accepts tasks and dependencies.
    Building,
    /// Graph is frozen and resolved; points are being handed out.
    Running(Run<W>),
    /// Resolution or traversal failed; the session cannot continue.
    Failed(ResolveFailure),
}

impl<W: Weight> Phase<W> {
    /// Resolve the graph and seed the frontier.
    pub(crate) fn resolve<T, P>(graph: &PointGraph<T>, policy: &P) -> Self
    where
        P: PyorityPolicy<T, W>,
    {
        match resolver::resolve(graph, policy) {
            Ok(resolution) => Phase::Running(Run::start(graph, resolution)),
            Err(failure) => Phase::Failed(failure),
        }
    }
}

/// Frontier, pending-dependency counts and visited flags of a running session.
#[derive(Debug, Clone)]
pub(crate) struct Run<W> {
    pub(crate) resolution: Resolution<W>,
    pending: Vec<usize>,
    visited: FixedBitSet,
    visited_count: usize,
    ready: ReadySet<W>,
}

/// Values of a point handed out by [`Run::step`].
struct Stepped<W> {
    point: PointId,
    pyority: W,
    total: W,
    dependents: usize,
}

impl<W> Run<W> {
    pub(crate) fn is_visited(&self, point: PointId) -> bool {
        self.visited.contains(point.index())
    }

    pub(crate) fn remaining(&self) -> usize {
        self.pending.len().saturating_sub(self.visited_count)
    }
}

impl<W: Weight> Run<W> {
    fn start<T>(graph: &PointGraph<T>, resolution: Resolution<W>) -> Self {
        let n = graph.point_count();
        let mut run = Self {
            resolution,
            pending: graph
                .points()
                .map(|p| graph.dependencies_of(p).len())
                .collect(),
            visited: FixedBitSet::with_capacity(n),
            visited_count: 0,
            ready: ReadySet::new(),
        };

        for point in graph.points() {
            if graph.dependencies_of(point).is_empty() {
                run.make_ready(point);
            }
        }
        debug!(ready = run.ready.len(), points = n, "traversal frontier seeded");
        run
    }

    fn make_ready(&mut self, point: PointId) {
        let total = self.resolution.total_pyority(point).unwrap_or_default();
        let dependents = self.resolution.dependent_count(point).unwrap_or(0);
        self.ready.push(point, total, dependents);
    }

    /// Pop the best ready point, mark it visited and release its dependents.
    ///
    /// `Ok(None)` means every point has been visited.
    fn step<T>(
        &mut self,
        graph: &PointGraph<T>,
    ) -> std::result::Result<Option<Stepped<W>>, ResolveFailure> {
        let Some(point) = self.ready.pop() else {
            let remaining = self.remaining();
            if remaining > 0 {
                error!(remaining, "ready set starved with unvisited points");
                return Err(ResolveFailure::Starved { remaining });
            }
            return Ok(None);
        };

        self.visited.insert(point.index());
        self.visited_count += 1;

        for dependent in graph.dependents_of(point) {
            let Some(count) = self.pending.get_mut(dependent.index()) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.make_ready(*dependent);
            }
        }

        Ok(Some(Stepped {
            point,
            pyority: self.resolution.pyority(point).unwrap_or_default(),
            total: self.resolution.total_pyority(point).unwrap_or_default(),
            dependents: self.resolution.dependent_count(point).unwrap_or(0),
        }))
    }
}

/// One point of the schedule, as yielded by [`Traversal`].
#[derive(Debug)]
pub struct Visit<'a, T, W> {
    point: PointId,
    data: &'a T,
    pyority: W,
    total_pyority: W,
    dependent_count: usize,
}

impl<'a, T, W: Weight> Visit<'a, T, W> {
    pub fn point(&self) -> PointId {
        self.point
    }

    pub fn task(&self) -> TaskId {
        self.point.task()
    }

    pub fn role(&self) -> Role {
        self.point.role()
    }

    pub fn is_start(&self) -> bool {
        self.role() == Role::Start
    }

    pub fn is_end(&self) -> bool {
        self.role() == Role::End
    }

    /// Payload of the task this point belongs to.
    pub fn task_data(&self) -> &'a T {
        self.data
    }

    pub fn pyority(&self) -> W {
        self.pyority
    }

    pub fn total_pyority(&self) -> W {
        self.total_pyority
    }

    pub fn dependent_count(&self) -> usize {
        self.dependent_count
    }
}

impl<T, W: Copy> Clone for Visit<'_, T, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, W: Copy> Copy for Visit<'_, T, W> {}

impl<T: fmt::Display, W> fmt::Display for Visit<'_, T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.point.role().label(), self.data)
    }
}

/// Lazy, one-shot iteration over the points of a scheduler.
///
/// The first call to `next()` resolves (and freezes) the graph. A resolution
/// failure is reported once as `Some(Err(..))`, after which the iterator is
/// exhausted without having yielded any point.
pub struct Traversal<'a, T, W, P> {
    graph: &'a PointGraph<T>,
    policy: &'a P,
    phase: &'a mut Phase<W>,
    done: bool,
}

impl<'a, T, W, P> Traversal<'a, T, W, P> {
    pub(crate) fn new(graph: &'a PointGraph<T>, policy: &'a P, phase: &'a mut Phase<W>) -> Self {
        Self {
            graph,
            policy,
            phase,
            done: false,
        }
    }
}

impl<'a, T, W, P> Traversal<'a, T, W, P>
where
    W: Weight,
    P: PyorityPolicy<T, W>,
{
    fn advance(&mut self) -> Result<Option<Visit<'a, T, W>>> {
        if matches!(self.phase, Phase::Building) {
            *self.phase = Phase::resolve(self.graph, self.policy);
        }

        let outcome = match &mut *self.phase {
            Phase::Running(run) => run.step(self.graph),
            Phase::Failed(failure) => return Err(failure.to_error()),
            Phase::Building => {
                return Err(PyorityError::Invariant(
                    "traversal started without resolving the graph".to_string(),
                ));
            }
        };

        let stepped = match outcome {
            Ok(Some(stepped)) => stepped,
            Ok(None) => return Ok(None),
            Err(failure) => {
                let err = failure.to_error();
                *self.phase = Phase::Failed(failure);
                return Err(err);
            }
        };

        let graph: &'a PointGraph<T> = self.graph;
        let data = graph.task_data(stepped.point.task()).ok_or_else(|| {
            PyorityError::Invariant(format!("{} has no task payload", stepped.point))
        })?;

        trace!(
            point = %stepped.point,
            dependents = stepped.dependents,
            "visiting point"
        );

        Ok(Some(Visit {
            point: stepped.point,
            data,
            pyority: stepped.pyority,
            total_pyority: stepped.total,
            dependent_count: stepped.dependents,
        }))
    }
}

impl<'a, T, W, P> Iterator for Traversal<'a, T, W, P>
where
    W: Weight,
    P: PyorityPolicy<T, W>,
{
    type Item = Result<Visit<'a, T, W>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(visit)) => Some(Ok(visit)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<T, W, P> FusedIterator for Traversal<'_, T, W, P>
where
    W: Weight,
    P: PyorityPolicy<T, W>,
{
}
