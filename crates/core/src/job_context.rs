// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JobContext: per-job, ephemeral state that travels with one execution of
//! a flow from `post` to terminal status.

use crate::ids::JobId;
use crate::routine::RoutineId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle state of a job. Transitions: `Pending -> Running`,
/// `Running -> Idle` (no routine has unconsumed data, job may yet receive
/// more), `Idle -> Running` (new external data arrives), `Running -> Completed`,
/// `Running -> Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Idle,
    Completed,
    Failed,
}

impl JobStatus {
    fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, Running)
                | (Running, Idle)
                | (Idle, Running)
                | (Running, Completed)
                | (Running, Failed)
                | (Idle, Completed)
                | (Idle, Failed)
        )
    }
}

/// One entry in a job's trace log: a routine activation or lifecycle event,
/// recorded for post-hoc debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub routine: Option<RoutineId>,
    pub action: String,
    pub details: serde_json::Value,
    pub at_ms: u64,
}

/// A captured snapshot of a routine's slots, taken by the breakpoint policy
/// in place of running the routine's logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugCapture {
    pub slot_data: HashMap<String, Vec<serde_json::Value>>,
    pub captured_at_ms: u64,
}

/// Per-job ephemeral execution state.
///
/// Distinct from [`crate::worker_state::WorkerState`]: `JobContext` lives
/// only for the duration of one job and is owned by it; `WorkerState` is
/// long-lived, keyed per routine, and persists across jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobContext {
    job_id: JobId,
    flow_id: String,
    status: JobStatus,
    created_at_ms: u64,
    completed_at_ms: Option<u64>,
    metadata: HashMap<String, serde_json::Value>,
    data: HashMap<String, serde_json::Value>,
    trace_log: Vec<TraceEntry>,
    debug_data: HashMap<RoutineId, DebugCapture>,
    error: Option<String>,
}

impl JobContext {
    pub fn new(job_id: JobId, flow_id: impl Into<String>, now_ms: u64) -> Self {
        Self {
            job_id,
            flow_id: flow_id.into(),
            status: JobStatus::Pending,
            created_at_ms: now_ms,
            completed_at_ms: None,
            metadata: HashMap::new(),
            data: HashMap::new(),
            trace_log: Vec::new(),
            debug_data: HashMap::new(),
            error: None,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    pub fn completed_at_ms(&self) -> Option<u64> {
        self.completed_at_ms
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn trace_log(&self) -> &[TraceEntry] {
        &self.trace_log
    }

    pub fn metadata(&self) -> &HashMap<String, serde_json::Value> {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.insert(key.into(), value);
    }

    pub fn get_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Records a trace entry. Never fails: tracing is best-effort bookkeeping,
    /// not part of the job's success/failure outcome.
    pub fn trace(&mut self, routine: Option<RoutineId>, action: impl Into<String>, details: serde_json::Value, now_ms: u64) {
        self.trace_log.push(TraceEntry { routine, action: action.into(), details, at_ms: now_ms });
    }

    pub fn debug_data(&self) -> &HashMap<RoutineId, DebugCapture> {
        &self.debug_data
    }

    /// Overwrites the captured slot snapshot for `routine`, as the
    /// breakpoint policy does each time its routine's activation fires.
    pub fn set_debug_data(&mut self, routine: RoutineId, capture: DebugCapture) {
        self.debug_data.insert(routine, capture);
    }

    /// Transitions `Pending -> Running` or `Idle -> Running`. Returns a
    /// `StateError` if the job is already terminal or already running.
    pub fn mark_running(&mut self) -> Result<(), crate::error::CoreError> {
        self.transition(JobStatus::Running)
    }

    /// Transitions `Running -> Idle`: no routine of this job's flow has
    /// unconsumed data and none is currently executing.
    pub fn mark_idle(&mut self) -> Result<(), crate::error::CoreError> {
        self.transition(JobStatus::Idle)
    }

    pub fn complete(&mut self, now_ms: u64) -> Result<(), crate::error::CoreError> {
        self.transition(JobStatus::Completed)?;
        self.completed_at_ms = Some(now_ms);
        Ok(())
    }

    pub fn fail(&mut self, error: impl Into<String>, now_ms: u64) -> Result<(), crate::error::CoreError> {
        self.transition(JobStatus::Failed)?;
        self.completed_at_ms = Some(now_ms);
        self.error = Some(error.into());
        Ok(())
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), crate::error::CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(crate::error::CoreError::StateError(format!(
                "job `{}` cannot transition from {:?} to {:?}",
                self.job_id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "job_context_tests.rs"]
mod tests;
