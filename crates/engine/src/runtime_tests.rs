// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use flowmesh_core::test_support::two_routine_flow;
use flowmesh_core::FakeClock;
use std::time::Duration;

fn runtime_with_flow(flow_id: &str) -> (Runtime<FakeClock>, FlowId) {
    let runtime = Runtime::with_defaults(FakeClock::new());
    let flow = two_routine_flow(flow_id);
    let id = runtime.register(flow);
    runtime.exec(&id).unwrap();
    (runtime, id)
}

#[tokio::test]
async fn post_without_job_id_creates_a_running_job() {
    let (runtime, flow_id) = runtime_with_flow("r1");
    let (_, job_id) = runtime
        .post(&flow_id, RoutineId::new("sink"), "input", serde_json::json!({"value": 1}), None)
        .unwrap();

    let finished = runtime.wait_until_all_jobs_finished(Duration::from_secs(2)).await;
    assert!(finished);

    let jobs = runtime.job_registry();
    let job = jobs.get(&job_id).unwrap();
    assert!(matches!(job.status(), JobStatus::Idle | JobStatus::Completed));
}

#[tokio::test]
async fn post_to_unregistered_flow_is_an_error() {
    let runtime: Runtime<FakeClock> = Runtime::with_defaults(FakeClock::new());
    let err = runtime.post(&FlowId::new("nope"), RoutineId::new("sink"), "input", serde_json::json!({}), None).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownFlow(_)));
}

#[tokio::test]
async fn post_before_exec_is_rejected() {
    let runtime: Runtime<FakeClock> = Runtime::with_defaults(FakeClock::new());
    let flow = two_routine_flow("r3");
    let id = runtime.register(flow);
    let err = runtime.post(&id, RoutineId::new("sink"), "input", serde_json::json!({}), None).unwrap_err();
    assert!(matches!(err, RuntimeError::FlowNotStarted(_)));
}

#[tokio::test]
async fn posting_a_known_job_id_twice_revives_it_from_idle() {
    let (runtime, flow_id) = runtime_with_flow("r4");
    let (_, job_id) = runtime
        .post(&flow_id, RoutineId::new("sink"), "input", serde_json::json!({"value": 1}), None)
        .unwrap();
    assert!(runtime.wait_until_all_jobs_finished(Duration::from_secs(2)).await);

    runtime
        .post(&flow_id, RoutineId::new("sink"), "input", serde_json::json!({"value": 2}), Some(job_id))
        .unwrap();
    assert!(runtime.wait_until_all_jobs_finished(Duration::from_secs(2)).await);

    let jobs = runtime.job_registry();
    assert!(jobs.contains_key(&job_id));
}

#[tokio::test]
async fn shutdown_stops_the_workers() {
    let (runtime, _flow_id) = runtime_with_flow("r5");
    runtime.shutdown(true).await;
}
