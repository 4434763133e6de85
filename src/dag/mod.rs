// src/dag/mod.rs

//! Point graph construction, pyority resolution and scheduling.
//!
//! - [`graph`] holds the arena of task start/end points and their edges.
//! - [`policy`] maps task payloads to the own pyority of their points.
//! - [`resolver`] computes total pyorities and dependent counts, and detects
//!   cycles.
//! - [`ready_set`] is the priority-ordered frontier of schedulable points.
//! - [`traversal`] contains the pull-based state machine that hands out
//!   points one at a time.
//! - [`scheduler`] ties these together behind the public construction and
//!   iteration API.

pub mod graph;
pub mod policy;
pub mod ready_set;
pub mod resolver;
pub mod scheduler;
pub mod traversal;

pub use graph::PointGraph;
pub use policy::{DefaultPolicy, PyorityPolicy, RolePolicy, TaskData, ZeroPolicy};
pub use resolver::Resolution;
pub use scheduler::Scheduler;
pub use traversal::{Traversal, Visit};
