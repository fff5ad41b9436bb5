// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activation policies: pluggable predicates deciding whether a routine's
//! logic should run for a given job, and which data it should see.

use crate::job_context::{DebugCapture, JobContext};
use crate::routine::RoutineId;
use crate::slot::Slot;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// A view over one routine's slots, scoped to a single job, handed to
/// [`ActivationPolicy::evaluate`]. Wraps the slot map so a policy can only
/// reach the per-job consume/peek operations, never another job's data.
pub struct SlotTable<'a> {
    slots: &'a mut IndexMap<String, Slot>,
    job_id: crate::ids::JobId,
}

impl<'a> SlotTable<'a> {
    pub fn new(slots: &'a mut IndexMap<String, Slot>, job_id: crate::ids::JobId) -> Self {
        Self { slots, job_id }
    }

    pub fn job_id(&self) -> &crate::ids::JobId {
        &self.job_id
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn unconsumed_count(&self, name: &str) -> usize {
        self.slots.get(name).map(|s| s.unconsumed_count(&self.job_id)).unwrap_or(0)
    }

    pub fn peek(&self, name: &str) -> Vec<serde_json::Value> {
        self.slots.get(name).map(|s| s.peek_unconsumed(&self.job_id)).unwrap_or_default()
    }

    pub fn consume_all_new(&mut self, name: &str) -> Vec<serde_json::Value> {
        self.slots.get_mut(name).map(|s| s.consume_all_new(&self.job_id)).unwrap_or_default()
    }

    pub fn consume_n(&mut self, name: &str, n: usize) -> Vec<serde_json::Value> {
        self.slots.get_mut(name).map(|s| s.consume_n(&self.job_id, n)).unwrap_or_default()
    }

    pub fn clear(&mut self, name: &str) {
        if let Some(s) = self.slots.get_mut(name) {
            s.clear(&self.job_id);
        }
    }

    pub fn all_ready(&self) -> bool {
        !self.slots.is_empty() && self.slots.values().all(|s| s.unconsumed_count(&self.job_id) > 0)
    }
}

/// Result of evaluating an activation policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyOutcome {
    pub should_activate: bool,
    pub consumed_data: HashMap<String, Vec<serde_json::Value>>,
    pub policy_message: serde_json::Value,
}

impl PolicyOutcome {
    pub fn skip() -> Self {
        Self { should_activate: false, consumed_data: HashMap::new(), policy_message: serde_json::Value::Null }
    }

    pub fn activate(consumed_data: HashMap<String, Vec<serde_json::Value>>) -> Self {
        Self { should_activate: true, consumed_data, policy_message: serde_json::Value::Null }
    }
}

/// A pluggable predicate deciding whether a routine should activate.
pub trait ActivationPolicy: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, slots: &mut SlotTable<'_>, job: &mut JobContext, now_ms: u64) -> PolicyOutcome;
}

/// Activates on every delivery that adds at least one unconsumed point to
/// any slot, consuming everything new across all slots.
pub struct ImmediatePolicy;

impl ActivationPolicy for ImmediatePolicy {
    fn name(&self) -> &str {
        "immediate"
    }

    fn evaluate(&self, slots: &mut SlotTable<'_>, _job: &mut JobContext, _now_ms: u64) -> PolicyOutcome {
        let names: Vec<String> = slots.names().map(str::to_string).collect();
        let mut consumed = HashMap::new();
        let mut any = false;
        for name in names {
            let values = slots.consume_all_new(&name);
            if !values.is_empty() {
                any = true;
            }
            consumed.insert(name, values);
        }
        if any {
            PolicyOutcome::activate(consumed)
        } else {
            PolicyOutcome::skip()
        }
    }
}

/// Activates once `slot` holds at least `n` unconsumed points, consuming
/// exactly the first `n` (oldest first).
pub struct BatchSizePolicy {
    pub n: usize,
    pub slot: String,
}

impl ActivationPolicy for BatchSizePolicy {
    fn name(&self) -> &str {
        "batch_size"
    }

    fn evaluate(&self, slots: &mut SlotTable<'_>, _job: &mut JobContext, _now_ms: u64) -> PolicyOutcome {
        if slots.unconsumed_count(&self.slot) < self.n {
            return PolicyOutcome::skip();
        }
        let values = slots.consume_n(&self.slot, self.n);
        let mut consumed = HashMap::new();
        consumed.insert(self.slot.clone(), values);
        PolicyOutcome::activate(consumed)
    }
}

/// Activates once `slot`'s unconsumed count reaches `threshold`, consuming
/// everything unconsumed in every slot.
pub struct WatermarkPolicy {
    pub threshold: usize,
    pub slot: String,
}

impl ActivationPolicy for WatermarkPolicy {
    fn name(&self) -> &str {
        "watermark"
    }

    fn evaluate(&self, slots: &mut SlotTable<'_>, _job: &mut JobContext, _now_ms: u64) -> PolicyOutcome {
        if slots.unconsumed_count(&self.slot) < self.threshold {
            return PolicyOutcome::skip();
        }
        let names: Vec<String> = slots.names().map(str::to_string).collect();
        let mut consumed = HashMap::new();
        for name in names {
            consumed.insert(name.clone(), slots.consume_all_new(&name));
        }
        PolicyOutcome::activate(consumed)
    }
}

/// Activates only once every declared slot has at least one unconsumed point.
pub struct AllSlotsReadyPolicy;

impl ActivationPolicy for AllSlotsReadyPolicy {
    fn name(&self) -> &str {
        "all_slots_ready"
    }

    fn evaluate(&self, slots: &mut SlotTable<'_>, _job: &mut JobContext, _now_ms: u64) -> PolicyOutcome {
        if !slots.all_ready() {
            return PolicyOutcome::skip();
        }
        let names: Vec<String> = slots.names().map(str::to_string).collect();
        let mut consumed = HashMap::new();
        for name in names {
            consumed.insert(name.clone(), slots.consume_all_new(&name));
        }
        PolicyOutcome::activate(consumed)
    }
}

type CustomFn = dyn Fn(&mut SlotTable<'_>, &mut JobContext, u64) -> PolicyOutcome + Send + Sync;

/// User-supplied predicate for activation logic the built-ins don't cover.
pub struct CustomPolicy {
    name: String,
    f: Arc<CustomFn>,
}

impl CustomPolicy {
    pub fn new(name: impl Into<String>, f: impl Fn(&mut SlotTable<'_>, &mut JobContext, u64) -> PolicyOutcome + Send + Sync + 'static) -> Self {
        Self { name: name.into(), f: Arc::new(f) }
    }
}

impl ActivationPolicy for CustomPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, slots: &mut SlotTable<'_>, job: &mut JobContext, now_ms: u64) -> PolicyOutcome {
        (self.f)(slots, job, now_ms)
    }
}

/// Never activates the underlying logic. Instead drains every slot and
/// records the values into the job's `debug_data` for the owning routine,
/// so an operator can inspect what the routine would have seen.
///
/// Installed by swapping a routine's live policy (see
/// `flowmesh-engine::breakpoint`), not constructed directly by flow authors.
pub struct BreakpointPolicy {
    pub routine: RoutineId,
}

impl ActivationPolicy for BreakpointPolicy {
    fn name(&self) -> &str {
        "breakpoint"
    }

    fn evaluate(&self, slots: &mut SlotTable<'_>, job: &mut JobContext, now_ms: u64) -> PolicyOutcome {
        let names: Vec<String> = slots.names().map(str::to_string).collect();
        let mut slot_data = HashMap::new();
        for name in names {
            let values = slots.consume_all_new(&name);
            slot_data.insert(name, values);
        }
        job.set_debug_data(self.routine.clone(), DebugCapture { slot_data, captured_at_ms: now_ms });
        PolicyOutcome::skip()
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
