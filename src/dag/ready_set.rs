// src/dag/ready_set.rs

//! Priority-ordered frontier of points whose dependencies are all visited.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::{PointId, Weight};

#[derive(Debug, Clone, Copy)]
struct ReadyEntry<W> {
    total: W,
    dependents: usize,
    /// Insertion sequence; earlier entries win exact ties.
    seq: u64,
    point: PointId,
}

impl<W: Weight> Ord for ReadyEntry<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total
            .partial_cmp(&other.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.dependents.cmp(&other.dependents))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<W: Weight> PartialOrd for ReadyEntry<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: Weight> PartialEq for ReadyEntry<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: Weight> Eq for ReadyEntry<W> {}

/// Max-heap over `(total pyority, dependent count, -insertion order)`.
#[derive(Debug, Clone)]
pub struct ReadySet<W> {
    heap: BinaryHeap<ReadyEntry<W>>,
    next_seq: u64,
}

impl<W: Weight> Default for ReadySet<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight> ReadySet<W> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, point: PointId, total: W, dependents: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ReadyEntry {
            total,
            dependents,
            seq,
            point,
        });
    }

    /// Remove and return the highest-ranked point.
    pub fn pop(&mut self) -> Option<PointId> {
        self.heap.pop().map(|entry| entry.point)
    }

    pub fn peek(&self) -> Option<PointId> {
        self.heap.peek().map(|entry| entry.point)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
