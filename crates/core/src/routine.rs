// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routine: one node of a flow graph — its slots, its events, the logic
//! that runs when its activation policy fires, and the error handling that
//! applies when that logic (or the policy itself) fails.

use crate::error::{CoreError, LogicError};
use crate::error_policy::ErrorPolicy;
use crate::event::Event;
use crate::job_context::JobContext;
use crate::policy::{ActivationPolicy, ImmediatePolicy, SlotTable};
use crate::slot::{MergeStrategy, Slot};
use crate::worker_state::WorkerState;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

crate::string_id! {
    /// Author-chosen identifier for a routine, unique within its flow.
    pub struct RoutineId;
}

/// What a running activation can see and do: the data its policy consumed,
/// the policy's side message, read/write access to long-lived per-routine
/// state, read/write access to the job's ephemeral context, and the ability
/// to emit on any of its declared events.
pub trait ActivationContext {
    fn consumed_data(&self) -> &HashMap<String, Vec<serde_json::Value>>;
    fn policy_message(&self) -> &serde_json::Value;
    fn worker_state(&self) -> &WorkerState;
    fn job(&mut self) -> &mut JobContext;
    fn emit(&mut self, event: &str, params: HashMap<String, serde_json::Value>) -> Result<(), CoreError>;
}

/// User-supplied behavior that runs each time a routine activates.
pub trait RoutineLogic: Send + Sync {
    fn run(&self, ctx: &mut dyn ActivationContext) -> Result<(), LogicError>;
}

/// Adapts a plain closure to [`RoutineLogic`].
pub struct FnRoutineLogic<F>(pub F)
where
    F: Fn(&mut dyn ActivationContext) -> Result<(), LogicError> + Send + Sync;

impl<F> RoutineLogic for FnRoutineLogic<F>
where
    F: Fn(&mut dyn ActivationContext) -> Result<(), LogicError> + Send + Sync,
{
    fn run(&self, ctx: &mut dyn ActivationContext) -> Result<(), LogicError> {
        (self.0)(ctx)
    }
}

/// Counters tracked per routine instance, surfaced through the Prometheus
/// exporter and `flow status` queries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RoutineStats {
    pub activations: u64,
    pub errors: u64,
    pub retries: u64,
    pub last_activated_at_ms: Option<u64>,
}

/// One node of a flow graph.
///
/// `Clone` is intentionally not derived: a `Routine` holds trait objects
/// (`logic`, `activation_policy`) that are not meaningfully cloneable —
/// flows are built once via the builder methods below and then shared by
/// `Arc`.
pub struct Routine {
    id: RoutineId,
    slots: IndexMap<String, Slot>,
    events: IndexMap<String, Event>,
    logic: Option<Arc<dyn RoutineLogic>>,
    logic_name: Option<String>,
    activation_policy: Mutex<Arc<dyn ActivationPolicy>>,
    error_policy: Option<ErrorPolicy>,
    config: HashMap<String, serde_json::Value>,
    stats: Mutex<RoutineStats>,
}

impl Routine {
    pub fn new(id: impl Into<RoutineId>) -> Self {
        Self {
            id: id.into(),
            slots: IndexMap::new(),
            events: IndexMap::new(),
            logic: None,
            logic_name: None,
            activation_policy: Mutex::new(Arc::new(ImmediatePolicy)),
            error_policy: None,
            config: HashMap::new(),
            stats: Mutex::new(RoutineStats::default()),
        }
    }

    pub fn id(&self) -> &RoutineId {
        &self.id
    }

    pub fn add_slot(
        &mut self,
        name: impl Into<String>,
        merge_strategy: MergeStrategy,
        max_queue_length: usize,
        consume_watermark: usize,
    ) -> Result<(), CoreError> {
        let name = name.into();
        if self.slots.contains_key(&name) {
            return Err(CoreError::ValidationError(format!(
                "routine `{}` already has a slot named `{name}`",
                self.id
            )));
        }
        self.slots.insert(
            name.clone(),
            Slot::new(name, self.id.clone(), merge_strategy, max_queue_length, consume_watermark),
        );
        Ok(())
    }

    pub fn add_event(&mut self, name: impl Into<String>, params: Vec<String>) -> Result<(), CoreError> {
        let name = name.into();
        if self.events.contains_key(&name) {
            return Err(CoreError::ValidationError(format!(
                "routine `{}` already has an event named `{name}`",
                self.id
            )));
        }
        self.events.insert(name.clone(), Event::new(name, self.id.clone(), params));
        Ok(())
    }

    pub fn set_logic(&mut self, name: impl Into<String>, logic: Arc<dyn RoutineLogic>) {
        self.logic_name = Some(name.into());
        self.logic = Some(logic);
    }

    pub fn logic(&self) -> Option<&Arc<dyn RoutineLogic>> {
        self.logic.as_ref()
    }

    pub fn logic_name(&self) -> Option<&str> {
        self.logic_name.as_deref()
    }

    pub fn set_activation_policy(&self, policy: Arc<dyn ActivationPolicy>) {
        *self.activation_policy.lock() = policy;
    }

    pub fn activation_policy(&self) -> Arc<dyn ActivationPolicy> {
        self.activation_policy.lock().clone()
    }

    pub fn set_error_handler(&mut self, policy: ErrorPolicy) {
        self.error_policy = Some(policy);
    }

    pub fn error_policy(&self) -> Option<&ErrorPolicy> {
        self.error_policy.as_ref()
    }

    pub fn set_config(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.config.insert(key.into(), value);
    }

    pub fn config(&self, key: &str) -> Option<&serde_json::Value> {
        self.config.get(key)
    }

    pub fn all_config(&self) -> &HashMap<String, serde_json::Value> {
        &self.config
    }

    pub fn slots(&self) -> &IndexMap<String, Slot> {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut IndexMap<String, Slot> {
        &mut self.slots
    }

    pub fn events(&self) -> &IndexMap<String, Event> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut IndexMap<String, Event> {
        &mut self.events
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    pub fn stats(&self) -> RoutineStats {
        *self.stats.lock()
    }

    pub fn record_activation(&self, now_ms: u64) {
        let mut s = self.stats.lock();
        s.activations += 1;
        s.last_activated_at_ms = Some(now_ms);
    }

    pub fn record_error(&self) {
        self.stats.lock().errors += 1;
    }

    pub fn record_retry(&self) {
        self.stats.lock().retries += 1;
    }

    /// Runs this routine's activation policy for `job_id`, scoping the slot
    /// view to that job. Returns `None` if the routine has no slots at all
    /// (a pure source routine, which activates only via external `post`).
    pub fn evaluate_policy(&mut self, job_id: crate::ids::JobId, job: &mut JobContext, now_ms: u64) -> crate::policy::PolicyOutcome {
        let policy = self.activation_policy();
        let mut table = SlotTable::new(&mut self.slots, job_id);
        policy.evaluate(&mut table, job, now_ms)
    }
}

#[cfg(test)]
#[path = "routine_tests.rs"]
mod tests;
