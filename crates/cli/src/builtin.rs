// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in demo routine classes used by `flowmesh validate`/`flowmesh run`.
//!
//! A generic CLI cannot load arbitrary compiled `RoutineLogic` from a DSL
//! file — that would require a plugin system, explicitly out of scope (see
//! spec.md §1's exclusion of "a factory/prototype object registry" from the
//! core). These two classes are enough to validate wiring and exercise a
//! real `Runtime` end to end without any embedder-supplied Rust code:
//!
//! - `passthrough`: one slot `input`, one event `output` (param `value`);
//!   re-emits every value it consumes, unchanged.
//! - `sink`: one slot `input`, no event; appends every value it consumes to
//!   `JobContext.data["<routine>"]`.
use flowmesh_core::{ActivationContext, FnRoutineLogic, LogicError, MergeStrategy, Routine};
use flowmesh_dsl::{DslError, RoutineFactory};
use std::sync::Arc;

pub fn demo_factory() -> RoutineFactory {
    let mut factory = RoutineFactory::new();
    factory.register("passthrough", |id| {
        let mut routine = Routine::new(id);
        routine.add_slot("input", MergeStrategy::Append, 1000, 0).map_err(DslError::Graph)?;
        routine.add_event("output", vec!["value".to_string()]).map_err(DslError::Graph)?;
        let routine_id = id.to_string();
        routine.set_logic(
            "passthrough",
            Arc::new(FnRoutineLogic(move |ctx: &mut dyn ActivationContext| {
                let values = ctx.consumed_data().get("input").cloned().unwrap_or_default();
                for value in values {
                    ctx.emit("output", std::collections::HashMap::from([("value".to_string(), value)]))
                        .map_err(|e| LogicError::new(routine_id.clone(), e.to_string()))?;
                }
                Ok(())
            })),
        );
        Ok(routine)
    });
    factory.register("sink", |id| {
        let mut routine = Routine::new(id);
        routine.add_slot("input", MergeStrategy::Append, 1000, 0).map_err(DslError::Graph)?;
        let routine_id = id.to_string();
        routine.set_logic(
            "sink",
            Arc::new(FnRoutineLogic(move |ctx: &mut dyn ActivationContext| {
                let values = ctx.consumed_data().get("input").cloned().unwrap_or_default();
                let job = ctx.job();
                let mut collected = job.get_data(&routine_id).cloned().unwrap_or_else(|| serde_json::json!([]));
                if let serde_json::Value::Array(arr) = &mut collected {
                    arr.extend(values);
                }
                job.set_data(routine_id.clone(), collected);
                Ok(())
            })),
        );
        Ok(routine)
    });
    factory
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
