// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slot: a bounded, ordered queue of data points with consume/watermark
//! semantics and a pluggable merge strategy.
//!
//! A single `Slot` belongs to one routine *instance*. Because a routine
//! instance may in principle be shared across concurrently running jobs
//! (spec.md §3.1 recommends, but does not require, per-job instances), every
//! data point carries the `JobId` that pushed it, and `unconsumed_count`,
//! `consume_all_new`, `peek_unconsumed`, `consume_n` are all scoped to one
//! job — the dispatcher only ever runs an activation check for a specific
//! `(routine, job)` pair, so that is the granularity the policy engine needs.
//! See DESIGN.md for why this resolves the spec's "sharing across
//! concurrent jobs" ambiguity without requiring a new Slot per job.

use crate::error::CoreError;
use crate::ids::JobId;
use crate::routine::RoutineId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default bound on the number of unconsumed data points a slot may hold
/// for a single job.
pub const DEFAULT_MAX_QUEUE_LENGTH: usize = 1000;

/// How accumulated unconsumed values are presented to routine logic.
///
/// This affects only how a policy *presents* data to the logic, never how
/// the queue stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Only the most recent unconsumed value is passed.
    Override,
    /// The whole unconsumed list is passed, in order.
    Append,
    /// Values are folded into a running accumulator stored in WorkerState
    /// under a reserved key (`"__accumulate__{routine}__{slot}"`).
    Accumulate,
}

/// One value pushed into a slot, with its sequence number, owning job, and
/// consumption state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    pub job_id: JobId,
    pub value: serde_json::Value,
    pub sequence_number: u64,
    pub consumed: bool,
    pub timestamp_ms: u64,
}

/// A named input port on a routine: a bounded, per-job queue of data points.
///
/// Invariants:
/// - sequence numbers are strictly monotonic for the lifetime of the slot
///   (shared across all jobs), even across compaction;
/// - `unconsumed_count(job) <= max_queue_length` for every job at all times;
/// - a given job's consumed entries always form a prefix of that job's
///   entries in push order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    name: String,
    routine: RoutineId,
    merge_strategy: MergeStrategy,
    max_queue_length: usize,
    consume_watermark: usize,
    points: VecDeque<DataPoint>,
    next_sequence: u64,
}

impl Slot {
    pub fn new(
        name: impl Into<String>,
        routine: RoutineId,
        merge_strategy: MergeStrategy,
        max_queue_length: usize,
        consume_watermark: usize,
    ) -> Self {
        Self {
            name: name.into(),
            routine,
            merge_strategy,
            max_queue_length,
            consume_watermark,
            points: VecDeque::new(),
            next_sequence: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routine(&self) -> &RoutineId {
        &self.routine
    }

    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge_strategy
    }

    pub fn max_queue_length(&self) -> usize {
        self.max_queue_length
    }

    /// Appends a value for `job_id` with the next (slot-wide) sequence
    /// number. Returns `SlotOverflow` if that job's unconsumed count in
    /// this slot is already at `max_queue_length`.
    pub fn push(
        &mut self,
        job_id: JobId,
        value: serde_json::Value,
        now_ms: u64,
    ) -> Result<(), CoreError> {
        if self.unconsumed_count(&job_id) >= self.max_queue_length {
            return Err(CoreError::SlotOverflow {
                routine: self.routine.clone(),
                slot: self.name.clone(),
                max: self.max_queue_length,
            });
        }
        let point = DataPoint {
            job_id,
            value,
            sequence_number: self.next_sequence,
            consumed: false,
            timestamp_ms: now_ms,
        };
        self.next_sequence += 1;
        self.points.push_back(point);
        Ok(())
    }

    /// Number of data points belonging to `job_id` not yet consumed. O(n)
    /// in the slot's total (usually small, bounded) backlog.
    pub fn unconsumed_count(&self, job_id: &JobId) -> usize {
        self.points.iter().filter(|p| &p.job_id == job_id && !p.consumed).count()
    }

    /// Whether any unconsumed point in this slot belongs to `job_id`.
    pub fn has_unconsumed_for(&self, job_id: &JobId) -> bool {
        self.points.iter().any(|p| &p.job_id == job_id && !p.consumed)
    }

    /// Non-destructive view of `job_id`'s unconsumed values, oldest first.
    pub fn peek_unconsumed(&self, job_id: &JobId) -> Vec<serde_json::Value> {
        self.points
            .iter()
            .filter(|p| &p.job_id == job_id && !p.consumed)
            .map(|p| p.value.clone())
            .collect()
    }

    /// Marks every unconsumed point belonging to `job_id` as consumed and
    /// returns their values, oldest first.
    pub fn consume_all_new(&mut self, job_id: &JobId) -> Vec<serde_json::Value> {
        let n = self.unconsumed_count(job_id);
        self.consume_n(job_id, n)
    }

    /// Marks the first `n` unconsumed points belonging to `job_id` (oldest
    /// first) as consumed and returns their values. Used by `batch_size`.
    pub fn consume_n(&mut self, job_id: &JobId, n: usize) -> Vec<serde_json::Value> {
        let mut out = Vec::with_capacity(n);
        let mut taken = 0;
        for point in self.points.iter_mut() {
            if taken >= n {
                break;
            }
            if &point.job_id == job_id && !point.consumed {
                point.consumed = true;
                out.push(point.value.clone());
                taken += 1;
            }
        }
        self.maybe_compact(job_id);
        out
    }

    /// Empties every point belonging to `job_id`. Used by the breakpoint
    /// policy, which drains and discards rather than delivering to logic.
    pub fn clear(&mut self, job_id: &JobId) {
        self.points.retain(|p| &p.job_id != job_id);
    }

    /// Compacts `job_id`'s consumed entries out of the backing queue once
    /// either its remaining unconsumed backlog has dropped to the
    /// watermark, or its consumed backlog has grown past
    /// `max(32, max_queue_length/4)` — the recommendation adopted for the
    /// open compaction-frequency question (see DESIGN.md).
    fn maybe_compact(&mut self, job_id: &JobId) {
        let consumed_count = self.points.iter().filter(|p| &p.job_id == job_id && p.consumed).count();
        if consumed_count == 0 {
            return;
        }
        let backlog_threshold = (self.max_queue_length / 4).max(32);
        if self.unconsumed_count(job_id) <= self.consume_watermark
            || consumed_count >= backlog_threshold
        {
            self.points.retain(|p| &p.job_id != job_id || !p.consumed);
        }
    }
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;
