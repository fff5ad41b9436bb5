// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatcher: the central loop that turns queued [`Task`]s into slot
//! pushes, activation checks, and routine logic runs. One dispatcher is
//! shared by every flow a `Runtime` hosts; fairness and per-(routine, job)
//! mutual exclusion are both enforced here, not per-flow.

use crate::activation_context::{EventRouting, RuntimeActivationContext};
use crate::breakpoint::BreakpointEngine;
use crate::error::RuntimeError;
use crate::fairness::FairnessScheduler;
use crate::metrics::MetricsRegistry;
use crate::queue::EventQueue;
use crate::registry::FlowRegistry;
use crate::task::Task;
use flowmesh_core::{ActivationOutcome, Clock, ErrorPolicy, ExecutionHooks, JobId, LogicError, RoutineId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Owns the fairness scheduler and the bookkeeping needed to run queued
/// tasks against a [`FlowRegistry`]. Generic over `Clock` so tests can drive
/// it with a `FakeClock` without touching wall-clock time.
///
/// The receiving half of the event queue lives here, behind an async mutex,
/// so `Runtime` can spawn `thread_pool_size` workers that all call
/// [`Dispatcher::run`] against the same `Dispatcher` rather than each owning
/// a private receiver.
pub struct Dispatcher<C: Clock> {
    registry: Arc<FlowRegistry>,
    queue: EventQueue,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Task>>,
    scheduler: Mutex<FairnessScheduler>,
    hooks: Arc<dyn ExecutionHooks>,
    clock: C,
    metrics: Arc<MetricsRegistry>,
    breakpoints: Arc<BreakpointEngine>,
    in_flight: Mutex<HashSet<(RoutineId, JobId)>>,
}

impl<C: Clock + 'static> Dispatcher<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<FlowRegistry>,
        queue: EventQueue,
        rx: mpsc::UnboundedReceiver<Task>,
        quantum: usize,
        hooks: Arc<dyn ExecutionHooks>,
        clock: C,
        metrics: Arc<MetricsRegistry>,
        breakpoints: Arc<BreakpointEngine>,
    ) -> Self {
        Self {
            registry,
            queue,
            rx: tokio::sync::Mutex::new(rx),
            scheduler: Mutex::new(FairnessScheduler::new(quantum)),
            hooks,
            clock,
            metrics,
            breakpoints,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Drives the dispatcher loop until `shutdown` is signalled or the
    /// queue's sender side is fully dropped. Safe to call concurrently from
    /// several worker tasks sharing one `Dispatcher`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return;
                    }
                }
                task = self.next_task() => {
                    match task {
                        Some(task) => {
                            if let Err(err) = self.process_task(task).await {
                                tracing::error!(%err, "dispatcher task failed");
                            }
                        }
                        None => return,
                    }
                }
            }
        }
    }

    /// Pops the next fairly-scheduled task, pulling fresh tasks off the
    /// channel (and into the scheduler's buckets) as needed. Several
    /// workers may call this concurrently; only one at a time drains the
    /// channel into the scheduler, the rest simply wait on the scheduler
    /// lock or the channel mutex.
    async fn next_task(&self) -> Option<Task> {
        loop {
            if let Some(task) = self.scheduler.lock().pop() {
                return Some(task);
            }
            let mut rx = self.rx.lock().await;
            let first = rx.recv().await?;
            let mut scheduler = self.scheduler.lock();
            scheduler.push(first);
            while let Ok(task) = rx.try_recv() {
                scheduler.push(task);
            }
            drop(rx);
        }
    }

    pub(crate) async fn process_task(&self, task: Task) -> Result<(), RuntimeError> {
        match task {
            Task::SlotPush { flow_id, routine, slot, job_id, payload } => {
                self.handle_slot_push(flow_id, routine, slot, job_id, payload).await
            }
            Task::ActivationCheck { flow_id, routine, job_id } => {
                self.handle_activation_check(flow_id, routine, job_id).await
            }
            Task::RetryActivation { flow_id, routine, job_id, attempt, consumed_data, policy_message } => {
                self.run_activation(flow_id, routine, job_id, consumed_data, policy_message, attempt).await
            }
        }
    }

    async fn handle_slot_push(
        &self,
        flow_id: flowmesh_core::FlowId,
        routine: RoutineId,
        slot: String,
        job_id: JobId,
        payload: serde_json::Value,
    ) -> Result<(), RuntimeError> {
        let handle = self.registry.get(&flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;

        let verdict = self.hooks.on_slot_before_enqueue(flow_id.as_str(), &routine, &slot, &payload, &job_id);
        if !verdict.allow {
            return Ok(());
        }
        let payload = verdict.replacement_payload.unwrap_or(payload);

        let now_ms = self.clock.epoch_ms();
        let push_result = {
            let mut flow = handle.flow.write();
            let r = flow
                .routine_mut(&routine)
                .ok_or_else(|| RuntimeError::UnknownRoutine(routine.as_str().to_string(), flow_id.as_str().to_string()))?;
            let error_policy = r.error_policy().cloned().or_else(|| flow.error_policy().cloned()).unwrap_or_default();
            let s = r
                .slots_mut()
                .get_mut(&slot)
                .ok_or_else(|| RuntimeError::UnknownRoutine(format!("{routine}.{slot}"), flow_id.as_str().to_string()))?;
            (s.push(job_id, payload, now_ms), error_policy)
        };

        // A slot overflow is an error "raised by a slot" (spec's error-handler
        // paragraph) — it goes through the same routine/flow error-policy
        // precedence as a logic failure, not straight to the dispatcher log.
        // `Retry` has no activation-run to re-schedule here, so it is treated
        // like `Continue`: the push is simply dropped.
        if let (Err(core_err), error_policy) = push_result {
            let mut jobs = handle.jobs.lock();
            let job = jobs.get_mut(&job_id);
            match error_policy {
                ErrorPolicy::Stop => {
                    if let Some(job) = job {
                        job.fail(core_err.to_string(), now_ms)?;
                    }
                }
                ErrorPolicy::Continue | ErrorPolicy::Skip | ErrorPolicy::Retry { .. } => {
                    if let Some(job) = job {
                        job.trace(Some(routine.clone()), "slot_push_dropped", serde_json::json!({"error": core_err.to_string()}), now_ms);
                    }
                }
            }
            return Ok(());
        }

        {
            let mut jobs = handle.jobs.lock();
            if let Some(job) = jobs.get_mut(&job_id) {
                if job.status() == flowmesh_core::JobStatus::Idle {
                    job.mark_running()?;
                }
                job.trace(Some(routine.clone()), "slot_push", serde_json::json!({"slot": slot}), now_ms);
            }
        }

        self.metrics.set_gauge("event_queue_depth", self.scheduler.lock().len() as f64);
        self.queue.push(Task::ActivationCheck { flow_id, routine, job_id })?;
        Ok(())
    }

    async fn handle_activation_check(
        &self,
        flow_id: flowmesh_core::FlowId,
        routine: RoutineId,
        job_id: JobId,
    ) -> Result<(), RuntimeError> {
        let key = (routine.clone(), job_id);
        if !self.in_flight.lock().insert(key.clone()) {
            // Another worker is already running this (routine, job) pair —
            // re-enqueue and let it be retried once that activation finishes.
            self.queue.push(Task::ActivationCheck { flow_id, routine, job_id })?;
            return Ok(());
        }

        let result = self.evaluate_and_maybe_run(&flow_id, &routine, job_id).await;
        self.in_flight.lock().remove(&key);
        result
    }

    async fn evaluate_and_maybe_run(
        &self,
        flow_id: &flowmesh_core::FlowId,
        routine: &RoutineId,
        job_id: JobId,
    ) -> Result<(), RuntimeError> {
        let handle = self.registry.get(flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;
        let now_ms = self.clock.epoch_ms();

        let outcome = {
            let mut flow = handle.flow.write();
            let r = flow
                .routine_mut(routine)
                .ok_or_else(|| RuntimeError::UnknownRoutine(routine.as_str().to_string(), flow_id.as_str().to_string()))?;
            let mut jobs = handle.jobs.lock();
            let job = jobs.get_mut(&job_id).ok_or_else(|| RuntimeError::UnknownJob(job_id.to_string()))?;
            let outcome = r.evaluate_policy(job_id, job, now_ms);
            if r.activation_policy().name() == "breakpoint" {
                self.breakpoints.record_hit(job_id, routine);
            }
            outcome
        };

        if !outcome.should_activate {
            self.maybe_mark_idle(&handle, job_id, now_ms);
            return Ok(());
        }

        self.run_activation(flow_id.clone(), routine.clone(), job_id, outcome.consumed_data, outcome.policy_message, 0)
            .await
    }

    /// Runs a routine's logic with already-consumed data — shared by a
    /// fresh activation (`attempt == 0`) and a `Retry` re-run.
    async fn run_activation(
        &self,
        flow_id: flowmesh_core::FlowId,
        routine: RoutineId,
        job_id: JobId,
        consumed_data: std::collections::HashMap<String, Vec<serde_json::Value>>,
        policy_message: serde_json::Value,
        attempt: u32,
    ) -> Result<(), RuntimeError> {
        let handle = self.registry.get(&flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;

        self.hooks.on_activation_start(flow_id.as_str(), &routine, &job_id, &consumed_data, &policy_message);

        let (logic, events, error_policy, worker_state) = {
            let flow = handle.flow.read();
            let r = flow
                .routine(&routine)
                .ok_or_else(|| RuntimeError::UnknownRoutine(routine.as_str().to_string(), flow_id.as_str().to_string()))?;
            let logic = r.logic().cloned();
            let events = EventRouting::from_events(r.events());
            let error_policy = r.error_policy().cloned().or_else(|| flow.error_policy().cloned()).unwrap_or_default();
            (logic, events, error_policy, handle.worker_state.clone())
        };

        let start = std::time::Instant::now();
        let logic = match logic {
            Some(logic) => logic,
            None => return Ok(()), // no logic attached: a pure data sink with no-op activation.
        };

        let result = {
            let mut jobs = handle.jobs.lock();
            let job = jobs.get_mut(&job_id).ok_or_else(|| RuntimeError::UnknownJob(job_id.to_string()))?;
            let mut ctx = RuntimeActivationContext::new(
                consumed_data.clone(),
                policy_message.clone(),
                worker_state,
                job,
                flow_id.clone(),
                routine.clone(),
                job_id,
                events,
            );
            let result = logic.run(&mut ctx);
            (result, ctx.into_emitted_tasks())
        };
        let (result, emitted) = result;

        {
            let flow = handle.flow.read();
            if let Some(r) = flow.routine(&routine) {
                r.record_activation(self.clock.epoch_ms());
            }
        }
        self.metrics.observe_duration("routine_duration_seconds", start.elapsed().as_secs_f64());

        match result {
            Ok(()) => {
                self.metrics.incr_counter("routine_executions_total", &[("status", "ok")]);
                self.hooks.on_activation_end(flow_id.as_str(), &routine, &job_id, ActivationOutcome::Ok, None);
                for task in emitted {
                    self.queue.push(task)?;
                }
                // A successful activation is itself a fairness-yield point: if
                // nothing downstream left unconsumed data for this job, it is
                // idle now rather than waiting for some later activation check
                // that may never come.
                self.maybe_mark_idle(&handle, job_id, self.clock.epoch_ms());
                Ok(())
            }
            Err(err) => self.handle_activation_error(flow_id, routine, job_id, err, error_policy, consumed_data, policy_message, attempt).await,
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn handle_activation_error(
        &self,
        flow_id: flowmesh_core::FlowId,
        routine: RoutineId,
        job_id: JobId,
        err: LogicError,
        error_policy: ErrorPolicy,
        consumed_data: std::collections::HashMap<String, Vec<serde_json::Value>>,
        policy_message: serde_json::Value,
        attempt: u32,
    ) -> Result<(), RuntimeError> {
        let handle = self.registry.get(&flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;
        {
            let flow = handle.flow.read();
            if let Some(r) = flow.routine(&routine) {
                r.record_error();
            }
        }
        self.metrics.incr_counter("routine_executions_total", &[("status", "error")]);
        self.hooks.on_activation_end(flow_id.as_str(), &routine, &job_id, ActivationOutcome::Error, Some(&err.to_string()));

        match error_policy {
            ErrorPolicy::Stop => {
                let now_ms = self.clock.epoch_ms();
                let mut jobs = handle.jobs.lock();
                if let Some(job) = jobs.get_mut(&job_id) {
                    job.fail(err.to_string(), now_ms)?;
                }
                Ok(())
            }
            ErrorPolicy::Continue => {
                let now_ms = self.clock.epoch_ms();
                let mut jobs = handle.jobs.lock();
                if let Some(job) = jobs.get_mut(&job_id) {
                    job.trace(Some(routine.clone()), "activation_error", serde_json::json!({"error": err.to_string()}), now_ms);
                }
                Ok(())
            }
            ErrorPolicy::Skip => {
                let now_ms = self.clock.epoch_ms();
                {
                    let mut flow = handle.flow.write();
                    if let Some(r) = flow.routine_mut(&routine) {
                        let names: Vec<String> = r.slots().keys().cloned().collect();
                        for name in names {
                            if let Some(s) = r.slots_mut().get_mut(&name) {
                                s.clear(&job_id);
                            }
                        }
                    }
                }
                let mut jobs = handle.jobs.lock();
                if let Some(job) = jobs.get_mut(&job_id) {
                    job.trace(Some(routine.clone()), "activation_skipped", serde_json::json!({"error": err.to_string()}), now_ms);
                }
                Ok(())
            }
            ErrorPolicy::Retry { .. } => {
                if let Some(delay_ms) = error_policy.retry_delay_ms(attempt) {
                    {
                        let flow = handle.flow.read();
                        if let Some(r) = flow.routine(&routine) {
                            r.record_retry();
                        }
                    }
                    let queue = self.queue.clone();
                    let next_attempt = attempt + 1;
                    tokio::spawn(async move {
                        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                        let _ = queue.push(Task::RetryActivation {
                            flow_id,
                            routine,
                            job_id,
                            attempt: next_attempt,
                            consumed_data,
                            policy_message,
                        });
                    });
                    Ok(())
                } else {
                    // Retries exhausted: fall through to `Stop`.
                    let now_ms = self.clock.epoch_ms();
                    let mut jobs = handle.jobs.lock();
                    if let Some(job) = jobs.get_mut(&job_id) {
                        job.fail(err.to_string(), now_ms)?;
                    }
                    Ok(())
                }
            }
        }
    }

    /// Number of tasks currently sitting in the fairness scheduler's
    /// buckets. Does not see tasks still in the channel that haven't been
    /// drained into a bucket yet — `Runtime::wait_until_all_jobs_finished`
    /// treats that gap as acceptable slack, polling rather than demanding
    /// an exact zero.
    pub(crate) fn queued_task_count(&self) -> usize {
        self.scheduler.lock().len()
    }

    /// Best-effort idle detection: if no slot anywhere in the flow still
    /// holds unconsumed data for this job, the job is marked `idle`. This
    /// does not check whether other tasks for the job remain queued
    /// elsewhere in the scheduler — a revival via a later `post` simply
    /// transitions the job back to `running`, so a spurious idle mark here
    /// is harmless, only momentarily inaccurate.
    fn maybe_mark_idle(&self, handle: &crate::registry::FlowHandle, job_id: JobId, now_ms: u64) {
        let flow = handle.flow.read();
        let any_unconsumed = flow.routines().any(|r| r.slots().values().any(|s| s.has_unconsumed_for(&job_id)));
        if any_unconsumed {
            return;
        }
        let mut jobs = handle.jobs.lock();
        if let Some(job) = jobs.get_mut(&job_id) {
            if job.status() == flowmesh_core::JobStatus::Running {
                let _ = job.mark_idle();
                job.trace(None, "job_idle", serde_json::Value::Null, now_ms);
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
