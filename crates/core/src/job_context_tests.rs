// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_job_starts_pending() {
    let job = JobContext::new(JobId::new(), "etl", 0);
    assert_eq!(job.status(), JobStatus::Pending);
    assert!(job.completed_at_ms().is_none());
}

#[test]
fn pending_to_running_to_completed() {
    let mut job = JobContext::new(JobId::new(), "etl", 0);
    job.mark_running().unwrap();
    assert_eq!(job.status(), JobStatus::Running);
    job.complete(100).unwrap();
    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.completed_at_ms(), Some(100));
}

#[test]
fn idle_can_return_to_running() {
    let mut job = JobContext::new(JobId::new(), "etl", 0);
    job.mark_running().unwrap();
    job.mark_idle().unwrap();
    assert_eq!(job.status(), JobStatus::Idle);
    job.mark_running().unwrap();
    assert_eq!(job.status(), JobStatus::Running);
}

#[test]
fn completed_is_terminal() {
    let mut job = JobContext::new(JobId::new(), "etl", 0);
    job.mark_running().unwrap();
    job.complete(50).unwrap();
    assert!(job.mark_running().is_err());
    assert!(job.mark_idle().is_err());
}

#[test]
fn fail_records_error_and_completion_time() {
    let mut job = JobContext::new(JobId::new(), "etl", 0);
    job.mark_running().unwrap();
    job.fail("boom", 75).unwrap();
    assert_eq!(job.status(), JobStatus::Failed);
    assert_eq!(job.error(), Some("boom"));
    assert_eq!(job.completed_at_ms(), Some(75));
}

#[test]
fn data_round_trips() {
    let mut job = JobContext::new(JobId::new(), "etl", 0);
    job.set_data("rows_seen", serde_json::json!(42));
    assert_eq!(job.get_data("rows_seen"), Some(&serde_json::json!(42)));
    assert_eq!(job.get_data("missing"), None);
}

#[test]
fn trace_entries_append_in_order() {
    let mut job = JobContext::new(JobId::new(), "etl", 0);
    job.trace(Some(RoutineId::from("extract")), "activated", serde_json::json!({}), 1);
    job.trace(None, "job_created", serde_json::json!({}), 0);
    assert_eq!(job.trace_log().len(), 2);
    assert_eq!(job.trace_log()[0].action, "activated");
}

#[test]
fn debug_data_overwrites_per_routine() {
    let mut job = JobContext::new(JobId::new(), "etl", 0);
    let routine = RoutineId::from("breakpointed");
    job.set_debug_data(
        routine.clone(),
        DebugCapture { slot_data: HashMap::new(), captured_at_ms: 1 },
    );
    job.set_debug_data(
        routine.clone(),
        DebugCapture { slot_data: HashMap::new(), captured_at_ms: 2 },
    );
    assert_eq!(job.debug_data().len(), 1);
    assert_eq!(job.debug_data().get(&routine).unwrap().captured_at_ms, 2);
}
