// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WorkerState: long-lived, per-routine keyed state that outlives any
//! single job.
//!
//! Distinct from [`crate::job_context::JobContext`]: a `WorkerState` is
//! created once when a worker starts hosting a flow and is read/written by
//! every job that passes through it. The dispatcher guarantees at most one
//! activation of a given routine runs at a time, so in practice writes to a
//! routine's key are already serialized by that mutex; the internal lock
//! here exists for readers (e.g. a monitoring snapshot) that run
//! concurrently with an activation.

use crate::ids::WorkerId;
use crate::routine::RoutineId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Lifecycle of a worker hosting a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Starting,
    Running,
    Stopped,
}

/// Keyed, per-routine persistent state for one worker.
pub struct WorkerState {
    worker_id: WorkerId,
    flow_id: String,
    status: RwLock<WorkerStatus>,
    entries: RwLock<HashMap<RoutineId, serde_json::Value>>,
}

impl WorkerState {
    pub fn new(worker_id: WorkerId, flow_id: impl Into<String>) -> Self {
        Self {
            worker_id,
            flow_id: flow_id.into(),
            status: RwLock::new(WorkerStatus::Starting),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn worker_id(&self) -> &WorkerId {
        &self.worker_id
    }

    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn status(&self) -> WorkerStatus {
        *self.status.read()
    }

    pub fn set_status(&self, status: WorkerStatus) {
        *self.status.write() = status;
    }

    pub fn get(&self, routine: &RoutineId) -> Option<serde_json::Value> {
        self.entries.read().get(routine).cloned()
    }

    pub fn set(&self, routine: RoutineId, value: serde_json::Value) {
        self.entries.write().insert(routine, value);
    }

    /// Reads, transforms, and writes back under a single write-lock hold —
    /// the primitive `MergeStrategy::Accumulate` builds on.
    pub fn update<F>(&self, routine: RoutineId, f: F)
    where
        F: FnOnce(Option<serde_json::Value>) -> serde_json::Value,
    {
        let mut entries = self.entries.write();
        let current = entries.get(&routine).cloned();
        let next = f(current);
        entries.insert(routine, next);
    }

    pub fn remove(&self, routine: &RoutineId) -> Option<serde_json::Value> {
        self.entries.write().remove(routine)
    }
}

#[cfg(test)]
#[path = "worker_state_tests.rs"]
mod tests;
