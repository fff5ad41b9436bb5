// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use flowmesh_core::test_support::two_routine_flow;

fn registry_with_flow(flow_id: &str) -> (FlowRegistry, FlowId) {
    let registry = FlowRegistry::new();
    let flow = two_routine_flow(flow_id);
    let id = flow.id().clone();
    registry.register(flow, flowmesh_core::WorkerId::new());
    (registry, id)
}

#[test]
fn install_swaps_the_routines_policy_to_breakpoint() {
    let (registry, flow_id) = registry_with_flow("bp");
    let engine = BreakpointEngine::new();
    let job_id = JobId::new();
    let sink = RoutineId::new("sink");

    engine.install(&registry, &flow_id, sink.clone(), job_id).unwrap();

    let handle = registry.get(&flow_id).unwrap();
    let flow = handle.flow.read();
    assert_eq!(flow.routine(&sink).unwrap().activation_policy().name(), "breakpoint");
}

#[test]
fn install_remembers_the_policy_that_was_live_before() {
    let (registry, flow_id) = registry_with_flow("bp2");
    let engine = BreakpointEngine::new();
    let job_id = JobId::new();
    let sink = RoutineId::new("sink");

    {
        let handle = registry.get(&flow_id).unwrap();
        let flow = handle.flow.read();
        flow.routine(&sink).unwrap().set_activation_policy(Arc::new(flowmesh_core::AllSlotsReadyPolicy));
    }

    let bp = engine.install(&registry, &flow_id, sink, job_id).unwrap();
    assert_eq!(bp.saved_original_policy, "all_slots_ready");
}

#[test]
fn remove_restores_the_saved_policy() {
    let (registry, flow_id) = registry_with_flow("bp3");
    let engine = BreakpointEngine::new();
    let job_id = JobId::new();
    let sink = RoutineId::new("sink");

    engine.install(&registry, &flow_id, sink.clone(), job_id).unwrap();
    engine.remove(&registry, &flow_id, &sink, &job_id).unwrap();

    let handle = registry.get(&flow_id).unwrap();
    let flow = handle.flow.read();
    assert_eq!(flow.routine(&sink).unwrap().activation_policy().name(), "immediate");
    assert!(engine.get(job_id, &sink).is_none());
}

#[test]
fn record_hit_increments_the_installed_breakpoints_counter() {
    let (registry, flow_id) = registry_with_flow("bp4");
    let engine = BreakpointEngine::new();
    let job_id = JobId::new();
    let sink = RoutineId::new("sink");

    engine.install(&registry, &flow_id, sink.clone(), job_id).unwrap();
    engine.record_hit(job_id, &sink);
    engine.record_hit(job_id, &sink);

    assert_eq!(engine.get(job_id, &sink).unwrap().hit_count, 2);
}
