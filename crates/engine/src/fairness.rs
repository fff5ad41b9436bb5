// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fair scheduling across routines: no single routine's backlog can starve
//! another's. Tasks are bucketed per `(flow, routine)`; the scheduler hands
//! out at most `quantum` consecutive tasks from one bucket before moving on
//! to the next non-empty one, round-robin.

use crate::task::Task;
use flowmesh_core::{FlowId, RoutineId};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Default number of consecutive tasks a routine's bucket may be drained of
/// before the scheduler rotates to the next one.
pub const DEFAULT_FAIRNESS_QUANTUM: usize = 4;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct BucketKey(FlowId, RoutineId);

/// Round-robin, quantum-based task scheduler.
pub struct FairnessScheduler {
    quantum: usize,
    buckets: IndexMap<BucketKey, VecDeque<Task>>,
    cursor: usize,
    served_in_current_quantum: usize,
}

impl FairnessScheduler {
    pub fn new(quantum: usize) -> Self {
        Self { quantum, buckets: IndexMap::new(), cursor: 0, served_in_current_quantum: 0 }
    }

    pub fn push(&mut self, task: Task) {
        let key = BucketKey(task.flow_id().clone(), task.routine().clone());
        self.buckets.entry(key).or_default().push_back(task);
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(VecDeque::is_empty)
    }

    /// Total number of tasks currently queued across every bucket.
    pub fn len(&self) -> usize {
        self.buckets.values().map(VecDeque::len).sum()
    }

    /// Pops the next task to run, rotating buckets fairly. Empty buckets
    /// are dropped as they're encountered so the map doesn't grow unbounded.
    pub fn pop(&mut self) -> Option<Task> {
        if self.buckets.is_empty() {
            return None;
        }
        let n = self.buckets.len();
        for _ in 0..n {
            if self.cursor >= self.buckets.len() {
                self.cursor = 0;
            }
            let (_, queue) = self.buckets.get_index_mut(self.cursor)?;
            if let Some(task) = queue.pop_front() {
                self.served_in_current_quantum += 1;
                if queue.is_empty() || self.served_in_current_quantum >= self.quantum {
                    self.served_in_current_quantum = 0;
                    self.advance_cursor();
                }
                self.prune_empty();
                return Some(task);
            }
            self.advance_cursor();
        }
        self.prune_empty();
        None
    }

    fn advance_cursor(&mut self) {
        if !self.buckets.is_empty() {
            self.cursor = (self.cursor + 1) % self.buckets.len();
        }
    }

    fn prune_empty(&mut self) {
        self.buckets.retain(|_, q| !q.is_empty());
        if self.cursor >= self.buckets.len() {
            self.cursor = 0;
        }
    }
}

impl Default for FairnessScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FAIRNESS_QUANTUM)
    }
}

#[cfg(test)]
#[path = "fairness_tests.rs"]
mod tests;
