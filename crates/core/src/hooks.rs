// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ExecutionHooks: the thin seam monitoring and logging observe the
//! dispatcher through. The core has no compile-time dependency on any
//! concrete monitoring implementation — only this trait, and the no-op
//! default every routine runs with unless a caller installs something else.

use crate::ids::JobId;
use crate::routine::RoutineId;
use std::collections::HashMap;

/// Outcome of one activation, as reported to `on_activation_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Ok,
    Error,
}

/// Observes dispatcher events without being able to alter the common-case
/// path: only `on_slot_before_enqueue` returns a verdict, and only to let an
/// observer substitute a replacement payload or veto the push outright (the
/// breakpoint engine does not use this path — see `BreakpointPolicy` — but a
/// future monitoring hook could).
pub trait ExecutionHooks: Send + Sync {
    fn on_slot_before_enqueue(
        &self,
        flow: &str,
        routine: &RoutineId,
        slot: &str,
        payload: &serde_json::Value,
        job_id: &JobId,
    ) -> HookVerdict {
        let _ = (flow, routine, slot, payload, job_id);
        HookVerdict::allow()
    }

    fn on_activation_start(
        &self,
        flow: &str,
        routine: &RoutineId,
        job_id: &JobId,
        consumed_data: &HashMap<String, Vec<serde_json::Value>>,
        message: &serde_json::Value,
    ) {
        let _ = (flow, routine, job_id, consumed_data, message);
    }

    fn on_activation_end(
        &self,
        flow: &str,
        routine: &RoutineId,
        job_id: &JobId,
        outcome: ActivationOutcome,
        error: Option<&str>,
    ) {
        let _ = (flow, routine, job_id, outcome, error);
    }

    fn on_emit(&self, flow: &str, routine: &RoutineId, event: &str, payload: &serde_json::Value, job_id: &JobId) {
        let _ = (flow, routine, event, payload, job_id);
    }
}

/// What `on_slot_before_enqueue` decided.
#[derive(Debug, Clone)]
pub struct HookVerdict {
    pub allow: bool,
    pub replacement_payload: Option<serde_json::Value>,
}

impl HookVerdict {
    pub fn allow() -> Self {
        Self { allow: true, replacement_payload: None }
    }

    pub fn deny() -> Self {
        Self { allow: false, replacement_payload: None }
    }

    pub fn replace(payload: serde_json::Value) -> Self {
        Self { allow: true, replacement_payload: Some(payload) }
    }
}

/// Default hook set: every call is a no-op. Installed unless a runtime
/// caller provides something else.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl ExecutionHooks for NullHooks {}

/// Records every dispatcher event as a `tracing` span/event, the same
/// pattern the teacher's executor uses to wrap each effect with
/// `tracing::info!`/`tracing::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl ExecutionHooks for TracingHooks {
    fn on_slot_before_enqueue(
        &self,
        flow: &str,
        routine: &RoutineId,
        slot: &str,
        payload: &serde_json::Value,
        job_id: &JobId,
    ) -> HookVerdict {
        tracing::debug!(%flow, %routine, %slot, %job_id, ?payload, "slot push");
        HookVerdict::allow()
    }

    fn on_activation_start(
        &self,
        flow: &str,
        routine: &RoutineId,
        job_id: &JobId,
        consumed_data: &HashMap<String, Vec<serde_json::Value>>,
        message: &serde_json::Value,
    ) {
        tracing::info!(%flow, %routine, %job_id, slots = consumed_data.len(), ?message, "activation start");
    }

    fn on_activation_end(
        &self,
        flow: &str,
        routine: &RoutineId,
        job_id: &JobId,
        outcome: ActivationOutcome,
        error: Option<&str>,
    ) {
        match outcome {
            ActivationOutcome::Ok => tracing::info!(%flow, %routine, %job_id, "activation end"),
            ActivationOutcome::Error => {
                tracing::error!(%flow, %routine, %job_id, ?error, "activation failed")
            }
        }
    }

    fn on_emit(&self, flow: &str, routine: &RoutineId, event: &str, payload: &serde_json::Value, job_id: &JobId) {
        tracing::debug!(%flow, %routine, %event, %job_id, ?payload, "emit");
    }
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
