// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! BreakpointEngine: installs and removes routine-scoped breakpoints by
//! swapping a routine's live activation policy, per §4.7. The `Breakpoint`
//! record itself is plain metadata (`flowmesh_core::Breakpoint`); this is
//! the engine-side logic that actually performs the swap under the
//! routine's own policy lock.

use crate::error::RuntimeError;
use crate::registry::FlowRegistry;
use flowmesh_core::{ActivationPolicy, Breakpoint, BreakpointId, BreakpointPolicy, FlowId, ImmediatePolicy, JobId, RoutineId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Tracks installed breakpoints and performs the policy swap that arms and
/// disarms them. One `BreakpointEngine` is shared by every flow a `Runtime`
/// hosts.
#[derive(Default)]
pub struct BreakpointEngine {
    installed: Mutex<HashMap<(JobId, RoutineId), Breakpoint>>,
}

impl BreakpointEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a breakpoint on `(job_id, routine_id)` within `flow_id`:
    /// saves the routine's current policy name and swaps in
    /// `BreakpointPolicy`. Only one enabled breakpoint per `(job, routine)`
    /// is permitted — re-installing replaces the saved original policy name
    /// with whatever is live *now*, which is always `breakpoint` if one was
    /// already armed, so the original is never lost.
    pub fn install(
        &self,
        registry: &FlowRegistry,
        flow_id: &FlowId,
        routine_id: RoutineId,
        job_id: JobId,
    ) -> Result<Breakpoint, RuntimeError> {
        let handle = registry.get(flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;
        let flow = handle.flow.read();
        let routine = flow
            .routine(&routine_id)
            .ok_or_else(|| RuntimeError::UnknownRoutine(routine_id.as_str().to_string(), flow_id.as_str().to_string()))?;

        let mut installed = self.installed.lock();
        let key = (job_id, routine_id.clone());
        let saved_name = match installed.get(&key) {
            Some(existing) => existing.saved_original_policy.clone(),
            None => routine.activation_policy().name().to_string(),
        };
        routine.set_activation_policy(Arc::new(BreakpointPolicy { routine: routine_id.clone() }));

        let bp = Breakpoint::new(job_id, routine_id, saved_name);
        installed.insert(key, bp.clone());
        Ok(bp)
    }

    /// Removes a breakpoint, restoring the policy that was live before it
    /// was armed (or `immediate` if none was recorded).
    pub fn remove(
        &self,
        registry: &FlowRegistry,
        flow_id: &FlowId,
        routine_id: &RoutineId,
        job_id: &JobId,
    ) -> Result<(), RuntimeError> {
        let handle = registry.get(flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;
        let flow = handle.flow.read();
        let routine = flow
            .routine(routine_id)
            .ok_or_else(|| RuntimeError::UnknownRoutine(routine_id.as_str().to_string(), flow_id.as_str().to_string()))?;

        let mut installed = self.installed.lock();
        if let Some(bp) = installed.remove(&(*job_id, routine_id.clone())) {
            let restored: Arc<dyn ActivationPolicy> = restore_by_name(&bp.saved_original_policy);
            routine.set_activation_policy(restored);
        }
        Ok(())
    }

    /// Records a hit against an installed breakpoint (called by the
    /// dispatcher each time `BreakpointPolicy::evaluate` runs for it).
    pub fn record_hit(&self, job_id: JobId, routine_id: &RoutineId) {
        if let Some(bp) = self.installed.lock().get_mut(&(job_id, routine_id.clone())) {
            bp.record_hit();
        }
    }

    pub fn get(&self, job_id: JobId, routine_id: &RoutineId) -> Option<Breakpoint> {
        self.installed.lock().get(&(job_id, routine_id.clone())).cloned()
    }

    pub fn by_id(&self, id: &BreakpointId) -> Option<Breakpoint> {
        self.installed.lock().values().find(|bp| &bp.id == id).cloned()
    }
}

/// Only `immediate` is restorable by name today — every other built-in
/// policy carries construction parameters (`n`, `slot`, `threshold`) the
/// breakpoint record does not retain. A routine armed with a parameterized
/// policy falls back to `immediate` on removal; flow authors who need exact
/// restoration should re-`set_activation_policy` themselves after removing
/// the breakpoint.
fn restore_by_name(name: &str) -> Arc<dyn ActivationPolicy> {
    match name {
        "all_slots_ready" => Arc::new(flowmesh_core::AllSlotsReadyPolicy),
        _ => Arc::new(ImmediatePolicy),
    }
}

#[cfg(test)]
#[path = "breakpoint_tests.rs"]
mod tests;
