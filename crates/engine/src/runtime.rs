// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime: the process-wide object embedders construct once. Owns the
//! flow registry, the event queue, the worker pool, the breakpoint engine,
//! and the metrics registry.

use crate::breakpoint::BreakpointEngine;
use crate::config::RuntimeConfig;
use crate::dispatcher::Dispatcher;
use crate::error::RuntimeError;
use crate::metrics::MetricsRegistry;
use crate::queue::EventQueue;
use crate::registry::FlowRegistry;
use crate::task::Task;
use flowmesh_core::{
    Clock, CoreError, ExecutionHooks, Flow, FlowId, JobContext, JobId, JobStatus, NullHooks, RoutineId, ValidationIssue,
    WorkerId, WorkerState,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns every long-lived piece of the engine: the registry of hosted flows,
/// the worker pool draining the event queue, and the cross-cutting
/// breakpoint/metrics/hooks seams. One `Runtime` serves every flow an
/// embedder registers with it.
pub struct Runtime<C: Clock> {
    registry: Arc<FlowRegistry>,
    queue: EventQueue,
    dispatcher: Arc<Dispatcher<C>>,
    clock: C,
    metrics: Arc<MetricsRegistry>,
    breakpoints: Arc<BreakpointEngine>,
    active_flows: Mutex<HashSet<FlowId>>,
    shutdown_tx: watch::Sender<bool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl<C: Clock + 'static> Runtime<C> {
    /// Builds the runtime and immediately spawns `config.thread_pool_size`
    /// worker tasks draining the shared dispatcher. No flow is hosted or
    /// accepting `post`s yet — each must be `register`ed then `exec`ed.
    pub fn new(config: RuntimeConfig, hooks: Arc<dyn ExecutionHooks>, clock: C) -> Self {
        let registry = Arc::new(FlowRegistry::new());
        let (queue, rx) = EventQueue::new();
        let metrics = Arc::new(MetricsRegistry::new());
        let breakpoints = Arc::new(BreakpointEngine::new());
        let dispatcher = Arc::new(Dispatcher::new(
            registry.clone(),
            queue.clone(),
            rx,
            config.fairness_quantum,
            hooks,
            clock.clone(),
            metrics.clone(),
            breakpoints.clone(),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut workers = Vec::with_capacity(config.thread_pool_size.max(1));
        for _ in 0..config.thread_pool_size.max(1) {
            let dispatcher = dispatcher.clone();
            let shutdown_rx = shutdown_rx.clone();
            workers.push(tokio::spawn(async move { dispatcher.run(shutdown_rx).await }));
        }

        Self {
            registry,
            queue,
            dispatcher,
            clock,
            metrics,
            breakpoints,
            active_flows: Mutex::new(HashSet::new()),
            shutdown_tx,
            workers: Mutex::new(workers),
        }
    }

    /// Builds a runtime with [`NullHooks`] and default configuration —
    /// the common case for embedders that don't need monitoring.
    pub fn with_defaults(clock: C) -> Self {
        Self::new(RuntimeConfig::default(), Arc::new(NullHooks), clock)
    }

    /// Registers a flow, hosting it under a freshly generated `WorkerId`.
    /// The flow does not accept `post`s until [`Runtime::exec`] validates
    /// and activates it.
    pub fn register(&self, flow: Flow) -> FlowId {
        let flow_id = flow.id().clone();
        self.registry.register(flow, WorkerId::new());
        flow_id
    }

    /// Validates `flow_id`'s graph and, if no blocking issue is found,
    /// marks it active so `post` will accept work for it. A reported
    /// `Cycle` does not block activation — cyclic graphs are expected
    /// (retry loops); every other `ValidationIssue` does.
    pub fn exec(&self, flow_id: &FlowId) -> Result<(), RuntimeError> {
        let handle = self.registry.get(flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;
        let issues: Vec<ValidationIssue> = handle.flow.read().validate().into_iter().filter(|i| !matches!(i, ValidationIssue::Cycle { .. })).collect();
        if !issues.is_empty() {
            return Err(RuntimeError::Core(CoreError::ValidationError(format!(
                "flow `{flow_id}` failed validation: {issues:?}"
            ))));
        }
        handle.worker_state.set_status(flowmesh_core::WorkerStatus::Running);
        self.active_flows.lock().insert(flow_id.clone());
        Ok(())
    }

    /// Delivers `payload` to `routine_id.slot_name`, creating a new job or
    /// reviving an idle one named by `job_id`. Non-blocking: only enqueues
    /// a slot-push task.
    pub fn post(
        &self,
        flow_id: &FlowId,
        routine_id: RoutineId,
        slot_name: impl Into<String>,
        payload: serde_json::Value,
        job_id: Option<JobId>,
    ) -> Result<(WorkerId, JobId), RuntimeError> {
        let handle = self.registry.get(flow_id).ok_or_else(|| RuntimeError::UnknownFlow(flow_id.as_str().to_string()))?;
        if !self.active_flows.lock().contains(flow_id) {
            return Err(RuntimeError::FlowNotStarted(flow_id.as_str().to_string()));
        }

        let now_ms = self.clock.epoch_ms();
        let job_id = {
            let mut jobs = handle.jobs.lock();
            match job_id {
                Some(id) => {
                    let job = jobs.entry(id).or_insert_with(|| JobContext::new(id, flow_id.as_str(), now_ms));
                    if job.status() == JobStatus::Idle {
                        job.mark_running()?;
                    } else if job.status() == JobStatus::Pending {
                        job.mark_running()?;
                    }
                    id
                }
                None => {
                    let id = JobId::new();
                    let mut job = JobContext::new(id, flow_id.as_str(), now_ms);
                    job.mark_running()?;
                    jobs.insert(id, job);
                    id
                }
            }
        };

        self.queue.push(Task::SlotPush { flow_id: flow_id.clone(), routine: routine_id, slot: slot_name.into(), job_id, payload })?;
        Ok((*handle.worker_state.worker_id(), job_id))
    }

    /// Polls until no registered flow has a `running` job and the
    /// dispatcher's scheduler has drained, or `timeout` elapses first.
    /// Returns whether completion was observed.
    pub async fn wait_until_all_jobs_finished(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.dispatcher.queued_task_count() == 0 && !self.any_job_running() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn any_job_running(&self) -> bool {
        for flow_id in self.registry.flow_ids() {
            let Some(handle) = self.registry.get(&flow_id) else { continue };
            if handle.jobs.lock().values().any(|j| j.status() == JobStatus::Running) {
                return true;
            }
        }
        false
    }

    /// Stops accepting new `post`s (by signalling all workers to return at
    /// their next select) and, if `graceful`, waits for them to actually
    /// finish their in-flight task before returning. A non-graceful
    /// shutdown does not force-kill running user logic — it only stops
    /// scheduling new tasks.
    pub async fn shutdown(&self, graceful: bool) {
        self.active_flows.lock().clear();
        let _ = self.shutdown_tx.send(true);
        if graceful {
            let mut workers = self.workers.lock();
            let handles = std::mem::take(&mut *workers);
            drop(workers);
            for handle in handles {
                let _ = handle.await;
            }
        }
    }

    /// Snapshot of every job across every hosted flow.
    pub fn job_registry(&self) -> HashMap<JobId, JobContext> {
        let mut out = HashMap::new();
        for flow_id in self.registry.flow_ids() {
            let Some(handle) = self.registry.get(&flow_id) else { continue };
            out.extend(handle.jobs.lock().iter().map(|(id, job)| (*id, job.clone())));
        }
        out
    }

    /// The long-lived per-routine state for one hosted flow.
    pub fn worker_state(&self, flow_id: &FlowId) -> Option<Arc<WorkerState>> {
        self.registry.get(flow_id).map(|h| h.worker_state.clone())
    }

    pub fn registry(&self) -> &Arc<FlowRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    pub fn breakpoints(&self) -> &Arc<BreakpointEngine> {
        &self.breakpoints
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
