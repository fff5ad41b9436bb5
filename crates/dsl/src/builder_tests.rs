// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use flowmesh_core::{MergeStrategy, Routine};

fn factory() -> RoutineFactory {
    let mut f = RoutineFactory::new();
    f.register("source", |id| {
        let mut r = Routine::new(id);
        r.add_event("out", vec!["rows".to_string()]).map_err(DslError::Graph)?;
        Ok(r)
    });
    f.register("sink", |id| {
        let mut r = Routine::new(id);
        r.add_slot("input", MergeStrategy::Append, 100, 0).map_err(DslError::Graph)?;
        Ok(r)
    });
    f
}

fn yaml_doc() -> &'static str {
    r#"
flow_id: etl
routines:
  extract:
    class: source
  load:
    class: sink
    config:
      batch_label: rows
connections:
  - source_routine: extract
    source_event: out
    target_routine: load
    target_slot: input
"#
}

#[test]
fn parse_builds_flow_with_wiring_and_config() {
    let flow = parse(yaml_doc(), Format::Yaml, &factory()).unwrap();
    assert_eq!(flow.id().as_str(), "etl");
    assert_eq!(flow.connections().len(), 1);
    let load = flow.routine(&flowmesh_core::RoutineId::from("load")).unwrap();
    assert_eq!(load.config("batch_label"), Some(&serde_json::json!("rows")));
}

#[test]
fn parse_rejects_unknown_class() {
    let bad = r#"
flow_id: etl
routines:
  mystery:
    class: does_not_exist
connections: []
"#;
    let err = parse(bad, Format::Yaml, &factory()).unwrap_err();
    assert!(matches!(err, DslError::UnknownClass { class, .. } if class == "does_not_exist"));
}

#[test]
fn round_trips_flow_through_json_serialize_and_parse() {
    let flow = parse(yaml_doc(), Format::Yaml, &factory()).unwrap();
    let json = serialize(&flow, Format::Json).unwrap();
    let doc = parse_document(&json, Format::Json).unwrap();
    assert_eq!(doc.flow_id, "etl");
    assert_eq!(doc.connections.len(), 1);
    // class is recovered from logic_name, which neither fixture routine set,
    // so it round-trips as the "unknown" placeholder rather than "source"/"sink".
    assert_eq!(doc.routines["extract"].class, "unknown");
}
