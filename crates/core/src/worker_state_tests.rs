// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn starts_in_starting_status() {
    let ws = WorkerState::new(WorkerId::new(), "etl");
    assert_eq!(ws.status(), WorkerStatus::Starting);
}

#[test]
fn set_and_get_round_trip_per_routine() {
    let ws = WorkerState::new(WorkerId::new(), "etl");
    let r1 = RoutineId::from("extract");
    let r2 = RoutineId::from("load");
    ws.set(r1.clone(), serde_json::json!({"count": 1}));
    ws.set(r2.clone(), serde_json::json!({"count": 2}));
    assert_eq!(ws.get(&r1), Some(serde_json::json!({"count": 1})));
    assert_eq!(ws.get(&r2), Some(serde_json::json!({"count": 2})));
    assert_eq!(ws.get(&RoutineId::from("missing")), None);
}

#[test]
fn update_folds_over_prior_value() {
    let ws = WorkerState::new(WorkerId::new(), "etl");
    let r = RoutineId::from("accumulator");
    ws.update(r.clone(), |prev| {
        let n = prev.and_then(|v| v.as_i64()).unwrap_or(0);
        serde_json::json!(n + 1)
    });
    ws.update(r.clone(), |prev| {
        let n = prev.and_then(|v| v.as_i64()).unwrap_or(0);
        serde_json::json!(n + 1)
    });
    assert_eq!(ws.get(&r), Some(serde_json::json!(2)));
}

#[test]
fn remove_clears_entry() {
    let ws = WorkerState::new(WorkerId::new(), "etl");
    let r = RoutineId::from("extract");
    ws.set(r.clone(), serde_json::json!(1));
    assert!(ws.remove(&r).is_some());
    assert_eq!(ws.get(&r), None);
}
