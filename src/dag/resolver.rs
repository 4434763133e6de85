// src/dag/resolver.rs

//! One-shot computation of total pyorities and dependent counts.
//!
//! The resolver runs over the finished point graph:
//! 1. evaluate every point's own pyority through the policy;
//! 2. topologically sort the graph (this is where cycles are detected);
//! 3. walk the order backwards, building each point's set of transitive
//!    dependents from its direct dependents' sets.
//!
//! Totals are summed over the *set* of reachable points, so a point reached
//! through several paths (a diamond) contributes once. Sets are sorted index
//! lists, so memory follows the size of the transitive closure rather than
//! the square of the point count.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, warn};

use crate::dag::graph::PointGraph;
use crate::dag::policy::PyorityPolicy;
use crate::errors::PyorityError;
use crate::types::{PointId, Weight};

/// Why a graph could not be resolved.
///
/// Kept separate from [`PyorityError`] so a failed session can report the
/// same failure again on later queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    Cycle { from: PointId, to: PointId },
    Pyority { point: PointId, value: String },
    Overflow { point: PointId },
    Starved { remaining: usize },
}

impl ResolveFailure {
    pub fn to_error(&self) -> PyorityError {
        match self {
            ResolveFailure::Cycle { from, to } => PyorityError::CyclicDependency {
                from: *from,
                to: *to,
            },
            ResolveFailure::Pyority { point, value } => PyorityError::InvalidPyority {
                point: *point,
                value: value.clone(),
            },
            ResolveFailure::Overflow { point } => PyorityError::PyorityOverflow { point: *point },
            ResolveFailure::Starved { remaining } => PyorityError::Invariant(format!(
                "ready set is empty but {remaining} point(s) were never visited"
            )),
        }
    }
}

/// Memoized per-point values for a frozen graph.
#[derive(Debug, Clone)]
pub struct Resolution<W> {
    own: Vec<W>,
    total: Vec<W>,
    /// Sorted arena indices of each point's transitive dependents.
    reach: Vec<Vec<usize>>,
}

impl<W: Weight> Resolution<W> {
    pub fn point_count(&self) -> usize {
        self.own.len()
    }

    /// Own pyority of a point, as produced by the policy.
    pub fn pyority(&self, point: PointId) -> Option<W> {
        self.own.get(point.index()).copied()
    }

    /// Own pyority plus the pyority of every transitive dependent.
    pub fn total_pyority(&self, point: PointId) -> Option<W> {
        self.total.get(point.index()).copied()
    }

    /// Number of points that transitively depend on `point`.
    pub fn dependent_count(&self, point: PointId) -> Option<usize> {
        self.reach.get(point.index()).map(Vec::len)
    }

    /// Points that transitively depend on `point`, in arena order.
    pub fn transitive_dependents(&self, point: PointId) -> Vec<PointId> {
        self.reach
            .get(point.index())
            .map(|set| set.iter().copied().map(PointId::new).collect())
            .unwrap_or_default()
    }

    /// Points `point` transitively depends on, in arena order.
    pub fn transitive_dependencies(&self, point: PointId) -> Vec<PointId> {
        self.reach
            .iter()
            .enumerate()
            .filter(|(_, set)| set.binary_search(&point.index()).is_ok())
            .map(|(idx, _)| PointId::new(idx))
            .collect()
    }
}

/// Resolve a finished graph.
pub fn resolve<T, W, P>(
    graph: &PointGraph<T>,
    policy: &P,
) -> std::result::Result<Resolution<W>, ResolveFailure>
where
    W: Weight,
    P: PyorityPolicy<T, W>,
{
    let own = own_pyorities(graph, policy)?;

    let pg = graph.to_petgraph();
    let order = match toposort(&pg, None) {
        Ok(order) => order,
        Err(cycle) => {
            let (from, to) = cycle_edge(&pg, cycle.node_id());
            warn!(%from, %to, "cycle detected in point graph");
            return Err(ResolveFailure::Cycle { from, to });
        }
    };

    let n = graph.point_count();
    let mut reach: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut total = own.clone();

    for node in order.iter().rev() {
        let point = PointId::new(node.index());
        let set = merge_reach(graph.dependents_of(point), &reach);

        let mine = own.get(point.index()).copied().unwrap_or_default();
        let sum = set
            .iter()
            .filter_map(|idx| own.get(*idx).copied())
            .try_fold(mine, |acc, w| acc.checked_sum(w))
            .ok_or_else(|| {
                warn!(%point, "total pyority does not fit the weight type");
                ResolveFailure::Overflow { point }
            })?;

        if let Some(slot) = total.get_mut(point.index()) {
            *slot = sum;
        }
        if let Some(slot) = reach.get_mut(point.index()) {
            *slot = set;
        }
    }

    let sources = graph
        .points()
        .filter(|p| graph.dependencies_of(*p).is_empty())
        .count();
    info!(
        points = n,
        edges = graph.edge_count(),
        sources,
        "resolved total pyorities"
    );

    Ok(Resolution { own, total, reach })
}

/// Union of the direct dependents and their reach sets, sorted and deduplicated.
fn merge_reach(dependents: &[PointId], reach: &[Vec<usize>]) -> Vec<usize> {
    let mut set: Vec<usize> = Vec::new();
    for dependent in dependents {
        set.push(dependent.index());
        if let Some(theirs) = reach.get(dependent.index()) {
            set.extend_from_slice(theirs);
        }
    }
    set.sort_unstable();
    set.dedup();
    set
}

fn own_pyorities<T, W, P>(
    graph: &PointGraph<T>,
    policy: &P,
) -> std::result::Result<Vec<W>, ResolveFailure>
where
    W: Weight,
    P: PyorityPolicy<T, W>,
{
    let zero = W::default();
    let mut own = Vec::with_capacity(graph.point_count());

    for point in graph.points() {
        let value = match graph.point_data(point) {
            Some((role, data)) => policy.pyority(role, data),
            None => zero,
        };
        // `!(a >= b)` also catches NaN.
        if !(value >= zero) {
            warn!(%point, ?value, "policy produced an invalid pyority");
            return Err(ResolveFailure::Pyority {
                point,
                value: format!("{value:?}"),
            });
        }
        own.push(value);
    }

    Ok(own)
}

/// Pick an edge lying on a cycle through `node`.
fn cycle_edge(pg: &DiGraph<(), ()>, node: NodeIndex) -> (PointId, PointId) {
    let components = tarjan_scc(pg);

    let on_cycle = |component: &Vec<NodeIndex>, start: NodeIndex| {
        pg.neighbors(start)
            .find(|next| component.contains(next))
            .map(|next| (PointId::new(start.index()), PointId::new(next.index())))
    };

    if let Some(component) = components.iter().find(|c| c.len() > 1 && c.contains(&node)) {
        if let Some(edge) = on_cycle(component, node) {
            return edge;
        }
    }

    // Fall back to any non-trivial component.
    for component in components.iter().filter(|c| c.len() > 1) {
        for start in component {
            if let Some(edge) = on_cycle(component, *start) {
                debug!(node = node.index(), "reported cycle node not in a component");
                return edge;
            }
        }
    }

    let point = PointId::new(node.index());
    (point, point)
}
