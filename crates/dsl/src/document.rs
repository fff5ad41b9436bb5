// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external flow definition shape (spec.md §6.3): a mapping
//! `{flow_id, routines: {id -> {class, config?}}, connections: [...]}`.
//! No parameter mapping on connections — event payloads reach slots
//! verbatim, so a connection is just four routine/port names.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineDocument {
    pub class: String,
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDocument {
    pub source_routine: String,
    pub source_event: String,
    pub target_routine: String,
    pub target_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowDocument {
    pub flow_id: String,
    pub routines: IndexMap<String, RoutineDocument>,
    #[serde(default)]
    pub connections: Vec<ConnectionDocument>,
}

/// Serialization format a `FlowDocument` can round-trip through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
