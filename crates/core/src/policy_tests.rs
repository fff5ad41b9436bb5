// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::slot::MergeStrategy;

fn table(routine: &str, names: &[&str]) -> IndexMap<String, Slot> {
    let mut m = IndexMap::new();
    for name in names {
        m.insert(
            name.to_string(),
            Slot::new(*name, RoutineId::from(routine), MergeStrategy::Append, 100, 4),
        );
    }
    m
}

#[test]
fn immediate_activates_when_any_slot_has_new_data() {
    let mut slots = table("r", &["input"]);
    let job_id = crate::ids::JobId::new();
    slots.get_mut("input").unwrap().push(job_id, serde_json::json!(1), 0).unwrap();
    let mut job = JobContext::new(job_id, "f", 0);
    let mut view = SlotTable::new(&mut slots, job_id);
    let outcome = ImmediatePolicy.evaluate(&mut view, &mut job, 0);
    assert!(outcome.should_activate);
    assert_eq!(outcome.consumed_data["input"], vec![serde_json::json!(1)]);
}

#[test]
fn immediate_skips_when_nothing_new() {
    let mut slots = table("r", &["input"]);
    let job_id = crate::ids::JobId::new();
    let mut job = JobContext::new(job_id, "f", 0);
    let mut view = SlotTable::new(&mut slots, job_id);
    let outcome = ImmediatePolicy.evaluate(&mut view, &mut job, 0);
    assert!(!outcome.should_activate);
}

#[test]
fn batch_size_waits_for_threshold_then_consumes_exactly_n() {
    let mut slots = table("r", &["input"]);
    let job_id = crate::ids::JobId::new();
    for i in 0..3 {
        slots.get_mut("input").unwrap().push(job_id, serde_json::json!(i), i as u64).unwrap();
    }
    let mut job = JobContext::new(job_id, "f", 0);
    let policy = BatchSizePolicy { n: 5, slot: "input".into() };
    let mut view = SlotTable::new(&mut slots, job_id);
    assert!(!policy.evaluate(&mut view, &mut job, 0).should_activate);

    view.consume_all_new("nonexistent"); // no-op, just exercising the API safely
    drop(view);
    for i in 3..5 {
        slots.get_mut("input").unwrap().push(job_id, serde_json::json!(i), i as u64).unwrap();
    }
    let mut view = SlotTable::new(&mut slots, job_id);
    let outcome = policy.evaluate(&mut view, &mut job, 0);
    assert!(outcome.should_activate);
    assert_eq!(outcome.consumed_data["input"].len(), 5);
}

#[test]
fn watermark_activates_once_threshold_reached_and_drains_all_slots() {
    let mut slots = table("r", &["a", "b"]);
    let job_id = crate::ids::JobId::new();
    slots.get_mut("a").unwrap().push(job_id, serde_json::json!(1), 0).unwrap();
    slots.get_mut("b").unwrap().push(job_id, serde_json::json!(2), 0).unwrap();
    slots.get_mut("a").unwrap().push(job_id, serde_json::json!(3), 1).unwrap();
    let mut job = JobContext::new(job_id, "f", 0);
    let policy = WatermarkPolicy { threshold: 2, slot: "a".into() };
    let mut view = SlotTable::new(&mut slots, job_id);
    let outcome = policy.evaluate(&mut view, &mut job, 0);
    assert!(outcome.should_activate);
    assert_eq!(outcome.consumed_data["a"].len(), 2);
    assert_eq!(outcome.consumed_data["b"].len(), 1);
}

#[test]
fn all_slots_ready_requires_every_slot_nonempty() {
    let mut slots = table("r", &["a", "b"]);
    let job_id = crate::ids::JobId::new();
    slots.get_mut("a").unwrap().push(job_id, serde_json::json!(1), 0).unwrap();
    let mut job = JobContext::new(job_id, "f", 0);
    {
        let mut view = SlotTable::new(&mut slots, job_id);
        assert!(!AllSlotsReadyPolicy.evaluate(&mut view, &mut job, 0).should_activate);
    }
    slots.get_mut("b").unwrap().push(job_id, serde_json::json!(2), 1).unwrap();
    let mut view = SlotTable::new(&mut slots, job_id);
    let outcome = AllSlotsReadyPolicy.evaluate(&mut view, &mut job, 0);
    assert!(outcome.should_activate);
}

#[test]
fn breakpoint_policy_never_activates_and_captures_debug_data() {
    let mut slots = table("r", &["input"]);
    let job_id = crate::ids::JobId::new();
    slots.get_mut("input").unwrap().push(job_id, serde_json::json!("secret"), 0).unwrap();
    let mut job = JobContext::new(job_id, "f", 0);
    let policy = BreakpointPolicy { routine: RoutineId::from("r") };
    let mut view = SlotTable::new(&mut slots, job_id);
    let outcome = policy.evaluate(&mut view, &mut job, 42);
    assert!(!outcome.should_activate);
    let capture = job.debug_data().get(&RoutineId::from("r")).unwrap();
    assert_eq!(capture.slot_data["input"], vec![serde_json::json!("secret")]);
    assert_eq!(capture.captured_at_ms, 42);
}

#[test]
fn custom_policy_delegates_to_closure() {
    let mut slots = table("r", &["input"]);
    let job_id = crate::ids::JobId::new();
    let mut job = JobContext::new(job_id, "f", 0);
    let policy = CustomPolicy::new("always-on", |_slots, _job, _now| PolicyOutcome::activate(HashMap::new()));
    let mut view = SlotTable::new(&mut slots, job_id);
    assert!(policy.evaluate(&mut view, &mut job, 0).should_activate);
    assert_eq!(policy.name(), "always-on");
}
