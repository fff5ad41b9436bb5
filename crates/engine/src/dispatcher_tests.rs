// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use flowmesh_core::test_support::two_routine_flow;
use flowmesh_core::{FakeClock, JobContext, JobStatus, WorkerId};
use std::sync::Arc;

fn dispatcher_with_flow(flow_id: &str) -> (Arc<Dispatcher<FakeClock>>, Arc<FlowRegistry>, flowmesh_core::FlowId, EventQueue, Arc<crate::registry::FlowHandle>) {
    let registry = Arc::new(FlowRegistry::new());
    let flow = two_routine_flow(flow_id);
    let flow_id = flow.id().clone();
    let handle = registry.register(flow, WorkerId::new());

    let (queue, rx) = EventQueue::new();
    let clock = FakeClock::new();
    let metrics = Arc::new(MetricsRegistry::new());
    let breakpoints = Arc::new(BreakpointEngine::new());
    let dispatcher = Arc::new(Dispatcher::new(
        registry.clone(),
        queue.clone(),
        rx,
        4,
        Arc::new(flowmesh_core::NullHooks),
        clock,
        metrics,
        breakpoints,
    ));
    (dispatcher, registry, flow_id, queue, handle)
}

#[tokio::test]
async fn slot_push_then_activation_check_runs_sink_logic() {
    let (dispatcher, _registry, flow_id, _queue, handle) = dispatcher_with_flow("d1");
    let job_id = JobId::new();
    handle.jobs.lock().insert(job_id, JobContext::new(job_id, flow_id.as_str(), 0));

    dispatcher
        .process_task(Task::SlotPush {
            flow_id: flow_id.clone(),
            routine: RoutineId::new("sink"),
            slot: "input".into(),
            job_id,
            payload: serde_json::json!({"value": 1}),
        })
        .await
        .unwrap();

    // SlotPush enqueues an ActivationCheck rather than running it inline.
    assert_eq!(dispatcher.queued_task_count(), 1);
    let task = { dispatcher.next_task().await.unwrap() };
    dispatcher.process_task(task).await.unwrap();

    let jobs = handle.jobs.lock();
    let job = jobs.get(&job_id).unwrap();
    assert_eq!(job.status(), JobStatus::Running);
}

#[tokio::test]
async fn in_flight_guard_requeues_a_duplicate_activation_check() {
    let (dispatcher, _registry, flow_id, _queue, handle) = dispatcher_with_flow("d2");
    let job_id = JobId::new();
    handle.jobs.lock().insert(job_id, JobContext::new(job_id, flow_id.as_str(), 0));

    let routine = RoutineId::new("sink");
    dispatcher.in_flight.lock().insert((routine.clone(), job_id));

    dispatcher
        .process_task(Task::ActivationCheck { flow_id, routine, job_id })
        .await
        .unwrap();

    assert_eq!(dispatcher.queued_task_count(), 1);
}

#[tokio::test]
async fn unknown_flow_is_reported_rather_than_panicking() {
    let (dispatcher, _registry, _flow_id, _queue, _handle) = dispatcher_with_flow("d3");
    let err = dispatcher
        .process_task(Task::ActivationCheck {
            flow_id: flowmesh_core::FlowId::new("nope"),
            routine: RoutineId::new("sink"),
            job_id: JobId::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownFlow(_)));
}
