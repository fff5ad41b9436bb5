// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses a [`FlowDocument`] (from YAML or JSON text) into a live `Flow`
//! via a [`RoutineFactory`], and serializes a `Flow` back to the same
//! shape.

use flowmesh_core::{EventRef, Flow, SlotRef};

use crate::document::{ConnectionDocument, Format, FlowDocument, RoutineDocument};
use crate::error::DslError;
use crate::factory::RoutineFactory;

/// Parses `content` in `format` and builds it into a `Flow` using `factory`
/// to construct each routine by its declared `class`.
pub fn parse(content: &str, format: Format, factory: &RoutineFactory) -> Result<Flow, DslError> {
    let doc = parse_document(content, format)?;
    build(&doc, factory)
}

pub fn parse_document(content: &str, format: Format) -> Result<FlowDocument, DslError> {
    match format {
        Format::Yaml => Ok(serde_yaml::from_str(content)?),
        Format::Json => Ok(serde_json::from_str(content)?),
    }
}

/// Builds `doc` into a `Flow`: each routine is constructed by `factory`
/// from its `class`, then `config` entries are applied, then connections
/// are wired in document order.
pub fn build(doc: &FlowDocument, factory: &RoutineFactory) -> Result<Flow, DslError> {
    let mut flow = Flow::new(doc.flow_id.clone());
    for (id, routine_doc) in &doc.routines {
        let mut routine = factory.build(id, &routine_doc.class)?;
        for (key, value) in &routine_doc.config {
            routine.set_config(key.clone(), value.clone());
        }
        flow.add_routine(routine)?;
    }
    for conn in &doc.connections {
        flow.connect(
            EventRef::new(conn.source_routine.clone(), conn.source_event.clone()),
            SlotRef::new(conn.target_routine.clone(), conn.target_slot.clone()),
        )?;
    }
    Ok(flow)
}

/// Serializes `flow` back to the document shape. A routine's `class` is
/// recovered from its `logic_name` — the nearest equivalent the core model
/// retains, since `Routine` has no stored "class" field of its own (class
/// is a factory input, not state the routine carries after construction).
pub fn to_document(flow: &Flow) -> FlowDocument {
    let mut routines = indexmap::IndexMap::new();
    for routine in flow.routines() {
        routines.insert(
            routine.id().as_str().to_string(),
            RoutineDocument {
                class: routine.logic_name().unwrap_or("unknown").to_string(),
                config: routine.all_config().clone(),
            },
        );
    }
    let connections = flow
        .connections()
        .iter()
        .map(|c| ConnectionDocument {
            source_routine: c.source.routine.as_str().to_string(),
            source_event: c.source.event.clone(),
            target_routine: c.target.routine.as_str().to_string(),
            target_slot: c.target.slot.clone(),
        })
        .collect();
    FlowDocument { flow_id: flow.id().as_str().to_string(), routines, connections }
}

pub fn serialize(flow: &Flow, format: Format) -> Result<String, DslError> {
    let doc = to_document(flow);
    match format {
        Format::Yaml => Ok(serde_yaml::to_string(&doc)?),
        Format::Json => Ok(serde_json::to_string_pretty(&doc)?),
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
