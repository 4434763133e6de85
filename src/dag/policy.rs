// src/dag/policy.rs

//! Pluggable pyority policies.
//!
//! A policy maps the payload of a task to the own pyority of its start and
//! end points. The scheduler takes the policy as a value at construction, so
//! overriding one role never touches the graph store or the resolver.

use crate::types::{Role, Weight};

/// Optional capability of task payloads: their own pyority.
///
/// The provided method returns zero, so a payload without a meaningful
/// pyority only needs an empty `impl`.
pub trait TaskData<W: Weight = f64> {
    fn pyority(&self) -> W {
        W::default()
    }
}

impl TaskData for &str {}

impl TaskData for String {}

/// Maps a point to its own pyority.
pub trait PyorityPolicy<T, W: Weight> {
    fn start_pyority(&self, data: &T) -> W;

    fn end_pyority(&self, data: &T) -> W;

    fn pyority(&self, role: Role, data: &T) -> W {
        match role {
            Role::Start => self.start_pyority(data),
            Role::End => self.end_pyority(data),
        }
    }
}

/// Start points take the payload's [`TaskData::pyority`]; end points are zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl<T, W> PyorityPolicy<T, W> for DefaultPolicy
where
    T: TaskData<W>,
    W: Weight,
{
    fn start_pyority(&self, data: &T) -> W {
        data.pyority()
    }

    fn end_pyority(&self, _data: &T) -> W {
        W::default()
    }
}

/// Every point has pyority zero; ordering falls back to dependent counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroPolicy;

impl<T, W: Weight> PyorityPolicy<T, W> for ZeroPolicy {
    fn start_pyority(&self, _data: &T) -> W {
        W::default()
    }

    fn end_pyority(&self, _data: &T) -> W {
        W::default()
    }
}

/// Policy built from one function per role.
///
/// ```
/// use pyority::dag::{RolePolicy, Scheduler};
///
/// struct Job {
///     days: u32,
/// }
///
/// // Weigh starts by duration, keep ends at zero.
/// let policy = RolePolicy::new(|job: &Job| job.days, |_: &Job| 0);
/// let mut scheduler = Scheduler::with_policy(policy);
/// scheduler.add_task(Job { days: 3 }, []).unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy<S, E> {
    start: S,
    end: E,
}

impl<S, E> RolePolicy<S, E> {
    pub fn new(start: S, end: E) -> Self {
        Self { start, end }
    }
}

impl<T, W, S, E> PyorityPolicy<T, W> for RolePolicy<S, E>
where
    W: Weight,
    S: Fn(&T) -> W,
    E: Fn(&T) -> W,
{
    fn start_pyority(&self, data: &T) -> W {
        (self.start)(data)
    }

    fn end_pyority(&self, data: &T) -> W {
        (self.end)(data)
    }
}
