// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use flowmesh_core::SlotRef;

#[test]
fn job_summary_round_trips_through_json() {
    let summary = JobSummary {
        job_id: JobId::new(),
        flow_id: "etl".to_string(),
        status: JobStatus::Idle,
        created_at_ms: 10,
        completed_at_ms: None,
    };
    let json = serde_json::to_string(&summary).unwrap();
    let back: JobSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn validation_report_is_clean_ignores_cycles_only() {
    let clean = ValidationReport {
        flow_id: FlowId::new("etl"),
        issues: vec![ValidationIssue::Cycle { routines: vec![RoutineId::from("a")] }],
    };
    assert!(clean.is_clean());

    let dirty = ValidationReport {
        flow_id: FlowId::new("etl"),
        issues: vec![ValidationIssue::DanglingConnectionTarget { target: SlotRef::new("a", "in") }],
    };
    assert!(!dirty.is_clean());
}

#[test]
fn debug_data_response_serializes_slot_data() {
    let resp = DebugDataResponse {
        routine: RoutineId::from("p"),
        slot_data: HashMap::from([("input".to_string(), vec![serde_json::json!(1)])]),
        captured_at_ms: 42,
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["captured_at_ms"], 42);
    assert_eq!(json["slot_data"]["input"][0], 1);
}
