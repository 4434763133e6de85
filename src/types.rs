// src/types.rs

//! Handle and role types shared by the graph store, resolver and traversal.
//!
//! Tasks and points live in the same arena index space: task `i` owns
//! point `2i` (its start) and point `2i + 1` (its end). Handles are thin
//! `Copy` wrappers over those indices and are only minted by a
//! [`Scheduler`](crate::dag::Scheduler).

use std::fmt;
use std::ops::Add;

/// Which end of a task a point stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Start,
    End,
}

impl Role {
    /// Label used in rendered schedules (`Start:` / `End  :`).
    pub fn label(self) -> &'static str {
        match self {
            Role::Start => "Start",
            Role::End => "End  ",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Start => f.write_str("start"),
            Role::End => f.write_str("end"),
        }
    }
}

/// Handle to a task stored in a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the task in insertion order.
    pub fn index(self) -> usize {
        self.0
    }

    /// The task's start point.
    pub fn start(self) -> PointId {
        PointId(self.0 * 2)
    }

    /// The task's end point.
    pub fn end(self) -> PointId {
        PointId(self.0 * 2 + 1)
    }

    pub fn point(self, role: Role) -> PointId {
        match role {
            Role::Start => self.start(),
            Role::End => self.end(),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task #{}", self.0)
    }
}

/// Handle to a point (the start or end of one task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(usize);

impl PointId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index of the point.
    pub fn index(self) -> usize {
        self.0
    }

    /// The task this point belongs to.
    pub fn task(self) -> TaskId {
        TaskId(self.0 / 2)
    }

    pub fn role(self) -> Role {
        if self.0 % 2 == 0 { Role::Start } else { Role::End }
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.role(), self.task())
    }
}

/// Either side of a dependency declaration.
///
/// A task handle is shorthand for one of its points, depending on which side
/// of the dependency it appears on:
/// - as the *dependent* (`to`), a task means its start: the task cannot begin
///   before the dependency is met;
/// - as the *dependency* (`from`), a task means its end: the dependent waits
///   for the task to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Task(TaskId),
    Point(PointId),
}

impl Handle {
    /// Point this handle stands for when used as the waiting side.
    pub fn as_dependent(self) -> PointId {
        match self {
            Handle::Task(task) => task.start(),
            Handle::Point(point) => point,
        }
    }

    /// Point this handle stands for when used as the side being waited on.
    pub fn as_dependency(self) -> PointId {
        match self {
            Handle::Task(task) => task.end(),
            Handle::Point(point) => point,
        }
    }
}

impl From<TaskId> for Handle {
    fn from(task: TaskId) -> Self {
        Handle::Task(task)
    }
}

impl From<PointId> for Handle {
    fn from(point: PointId) -> Self {
        Handle::Point(point)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Task(task) => task.fmt(f),
            Handle::Point(point) => point.fmt(f),
        }
    }
}

/// Numeric weight usable as a pyority.
///
/// `Default::default()` must be the additive zero. Ordering only needs to be
/// partial so that `f32` and `f64` work, but values that compare as unordered
/// (NaN) are rejected when a schedule is resolved.
///
/// Totals are sums over every transitive dependent, so the type has to hold
/// those sums. Integer types detect when it doesn't and the resolution fails
/// with [`PyorityError::PyorityOverflow`](crate::errors::PyorityError);
/// floats saturate to infinity. Custom weights get a plain `+` unless they
/// override [`Weight::checked_sum`]:
///
/// ```
/// use std::ops::Add;
/// use pyority::Weight;
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
/// struct Days(u16);
///
/// impl Add for Days {
///     type Output = Days;
///     fn add(self, rhs: Days) -> Days {
///         Days(self.0 + rhs.0)
///     }
/// }
///
/// impl Weight for Days {
///     fn checked_sum(self, rhs: Days) -> Option<Days> {
///         self.0.checked_add(rhs.0).map(Days)
///     }
/// }
///
/// assert_eq!(Days(u16::MAX).checked_sum(Days(1)), None);
/// ```
pub trait Weight: Copy + PartialOrd + Add<Output = Self> + Default + fmt::Debug {
    /// `self + rhs`, or `None` if the sum does not fit.
    fn checked_sum(self, rhs: Self) -> Option<Self> {
        Some(self + rhs)
    }
}

macro_rules! integer_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                fn checked_sum(self, rhs: Self) -> Option<Self> {
                    self.checked_add(rhs)
                }
            }
        )*
    };
}

integer_weight!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Weight for f32 {}

impl Weight for f64 {}
