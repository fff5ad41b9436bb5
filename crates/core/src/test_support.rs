// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only helpers shared across crates. Enabled for this crate's own
//! `cfg(test)` builds and, for other crates' integration tests, via the
//! `test-support` feature.

use crate::connection::{EventRef, SlotRef};
use crate::flow::Flow;
use crate::routine::{FnRoutineLogic, Routine, RoutineLogic};
use crate::slot::MergeStrategy;
use std::sync::Arc;

pub fn noop_logic() -> Arc<dyn RoutineLogic> {
    Arc::new(FnRoutineLogic(|_ctx| Ok(())))
}

/// Builds a two-routine `source -> sink` flow wired end to end: a minimal
/// fixture for engine/dsl/storage tests that don't care about the specific
/// graph shape.
pub fn two_routine_flow(flow_id: &str) -> Flow {
    let mut flow = Flow::new(flow_id);

    let mut source = Routine::new("source");
    source.add_event("out", vec!["value".into()]).expect("add_event");
    source.set_logic("source", noop_logic());
    flow.add_routine(source).expect("add_routine source");

    let mut sink = Routine::new("sink");
    sink.add_slot("input", MergeStrategy::Append, 100, 4).expect("add_slot");
    sink.set_logic("sink", noop_logic());
    flow.add_routine(sink).expect("add_routine sink");

    flow.connect(EventRef::new("source", "out"), SlotRef::new("sink", "input"))
        .expect("connect source to sink");
    flow
}

/// Property-based strategies for the invariants in [`crate::slot::Slot`]
/// that are easiest to get wrong under arbitrary push/consume interleaving:
/// monotonic sequence numbers and the overflow bound.
pub mod strategies {
    use proptest::prelude::*;

    /// A small, readable JSON scalar.
    pub fn json_scalar() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::Bool),
            any::<i32>().prop_map(|n| serde_json::json!(n)),
            "[a-z]{1,8}".prop_map(serde_json::Value::String),
        ]
    }

    /// A sequence of push/consume instructions to replay against one slot,
    /// as `(is_push, batch_n)`.
    pub fn push_consume_script(max_ops: usize) -> impl Strategy<Value = Vec<(bool, usize)>> {
        prop::collection::vec((any::<bool>(), 0..8usize), 1..max_ops)
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
