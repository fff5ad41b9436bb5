// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit of work flowing through the event queue.

use flowmesh_core::{FlowId, JobId, RoutineId};
use std::collections::HashMap;

/// One unit of dispatcher work.
///
/// A `SlotPush` is emitted by `Event::build_payload` + connection routing
/// (or by an external `post`) and always causes exactly one `ActivationCheck`
/// to be scheduled once the push itself has been applied — never two checks
/// for one push, and never a check with no corresponding push.
#[derive(Debug, Clone)]
pub enum Task {
    SlotPush {
        flow_id: FlowId,
        routine: RoutineId,
        slot: String,
        job_id: JobId,
        payload: serde_json::Value,
    },
    ActivationCheck {
        flow_id: FlowId,
        routine: RoutineId,
        job_id: JobId,
    },
    /// Re-run after a `Retry` error policy's backoff delay has elapsed, with
    /// the same consumed data and policy message the failed attempt saw —
    /// a retry does not re-consult the activation policy.
    RetryActivation {
        flow_id: FlowId,
        routine: RoutineId,
        job_id: JobId,
        attempt: u32,
        consumed_data: HashMap<String, Vec<serde_json::Value>>,
        policy_message: serde_json::Value,
    },
}

impl Task {
    pub fn flow_id(&self) -> &FlowId {
        match self {
            Task::SlotPush { flow_id, .. } => flow_id,
            Task::ActivationCheck { flow_id, .. } => flow_id,
            Task::RetryActivation { flow_id, .. } => flow_id,
        }
    }

    pub fn routine(&self) -> &RoutineId {
        match self {
            Task::SlotPush { routine, .. } => routine,
            Task::ActivationCheck { routine, .. } => routine,
            Task::RetryActivation { routine, .. } => routine,
        }
    }

    pub fn job_id(&self) -> &JobId {
        match self {
            Task::SlotPush { job_id, .. } => job_id,
            Task::ActivationCheck { job_id, .. } => job_id,
            Task::RetryActivation { job_id, .. } => job_id,
        }
    }
}
