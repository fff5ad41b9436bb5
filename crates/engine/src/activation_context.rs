// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete [`ActivationContext`] handed to routine logic while it runs:
//! the data its policy consumed, read/write access to `WorkerState` and
//! `JobContext`, and a non-blocking `emit` that fans out across every
//! connection wired to the named event.
//!
//! Routing is captured as an owned snapshot (`EventRouting`) rather than a
//! borrow into the live `Flow`, so the dispatcher can run logic without
//! holding the flow lock for the duration of the activation.

use crate::task::Task;
use flowmesh_core::{ActivationContext, CoreError, Event, FlowId, JobContext, JobId, RoutineId, SlotRef, WorkerState};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// What one event is allowed to carry and where it fans out to, snapshotted
/// from the live `Event` before the flow lock is released.
#[derive(Debug, Clone)]
pub struct EventRouting {
    pub params: Vec<String>,
    pub outgoing: Vec<SlotRef>,
}

impl EventRouting {
    pub fn from_events(events: &IndexMap<String, Event>) -> HashMap<String, EventRouting> {
        events
            .values()
            .map(|e| {
                (
                    e.name().to_string(),
                    EventRouting { params: e.params().to_vec(), outgoing: e.outgoing().to_vec() },
                )
            })
            .collect()
    }
}

pub struct RuntimeActivationContext<'a> {
    consumed_data: HashMap<String, Vec<serde_json::Value>>,
    policy_message: serde_json::Value,
    worker_state: Arc<WorkerState>,
    job: &'a mut JobContext,
    flow_id: FlowId,
    routine_id: RoutineId,
    job_id: JobId,
    events: HashMap<String, EventRouting>,
    emitted: Vec<Task>,
}

impl<'a> RuntimeActivationContext<'a> {
    pub fn new(
        consumed_data: HashMap<String, Vec<serde_json::Value>>,
        policy_message: serde_json::Value,
        worker_state: Arc<WorkerState>,
        job: &'a mut JobContext,
        flow_id: FlowId,
        routine_id: RoutineId,
        job_id: JobId,
        events: HashMap<String, EventRouting>,
    ) -> Self {
        Self {
            consumed_data,
            policy_message,
            worker_state,
            job,
            flow_id,
            routine_id,
            job_id,
            events,
            emitted: Vec::new(),
        }
    }

    /// Drains the `SlotPush` tasks accumulated by `emit` calls, to be handed
    /// to the event queue once the activation has finished running.
    pub fn into_emitted_tasks(self) -> Vec<Task> {
        self.emitted
    }
}

impl<'a> ActivationContext for RuntimeActivationContext<'a> {
    fn consumed_data(&self) -> &HashMap<String, Vec<serde_json::Value>> {
        &self.consumed_data
    }

    fn policy_message(&self) -> &serde_json::Value {
        &self.policy_message
    }

    fn worker_state(&self) -> &WorkerState {
        &self.worker_state
    }

    fn job(&mut self) -> &mut JobContext {
        self.job
    }

    fn emit(&mut self, event: &str, mut params: HashMap<String, serde_json::Value>) -> Result<(), CoreError> {
        let routing = self.events.get(event).ok_or_else(|| {
            CoreError::ValidationError(format!("routine `{}` has no event named `{event}`", self.routine_id))
        })?;
        let mut obj = serde_json::Map::with_capacity(routing.params.len());
        for p in &routing.params {
            obj.insert(p.clone(), params.remove(p).unwrap_or(serde_json::Value::Null));
        }
        if !params.is_empty() {
            let mut unexpected: Vec<&str> = params.keys().map(String::as_str).collect();
            unexpected.sort_unstable();
            return Err(CoreError::ValidationError(format!(
                "event `{event}` on routine `{}` received unexpected params: {}",
                self.routine_id,
                unexpected.join(", ")
            )));
        }
        let payload = serde_json::Value::Object(obj);
        for target in &routing.outgoing {
            self.emitted.push(Task::SlotPush {
                flow_id: self.flow_id.clone(),
                routine: target.routine.clone(),
                slot: target.slot.clone(),
                job_id: self.job_id,
                payload: payload.clone(),
            });
        }
        Ok(())
    }
}
