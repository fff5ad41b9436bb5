// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event: a named output port a routine's logic emits through.

use crate::connection::SlotRef;
use crate::error::CoreError;
use crate::routine::RoutineId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named output port on a routine.
///
/// `params` is advisory: it documents which keys logic is expected to pass
/// to [`Event::build_payload`], but an omitted key is filled with `null`
/// rather than rejected — only an *unexpected* key is an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    name: String,
    routine: RoutineId,
    params: Vec<String>,
    outgoing: Vec<SlotRef>,
}

impl Event {
    pub fn new(name: impl Into<String>, routine: RoutineId, params: Vec<String>) -> Self {
        Self { name: name.into(), routine, params, outgoing: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routine(&self) -> &RoutineId {
        &self.routine
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn outgoing(&self) -> &[SlotRef] {
        &self.outgoing
    }

    pub(crate) fn add_connection(&mut self, target: SlotRef) {
        self.outgoing.push(target);
    }

    /// Builds the JSON payload for one `emit` call: declared params missing
    /// from `provided` become `null`; any key in `provided` that is not a
    /// declared param is a [`CoreError::ValidationError`].
    pub fn build_payload(
        &self,
        mut provided: HashMap<String, serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError> {
        let mut obj = serde_json::Map::with_capacity(self.params.len());
        for p in &self.params {
            let value = provided.remove(p).unwrap_or(serde_json::Value::Null);
            obj.insert(p.clone(), value);
        }
        if !provided.is_empty() {
            let mut unexpected: Vec<&str> = provided.keys().map(String::as_str).collect();
            unexpected.sort_unstable();
            return Err(CoreError::ValidationError(format!(
                "event `{}` on routine `{}` received unexpected params: {}",
                self.name,
                self.routine,
                unexpected.join(", ")
            )));
        }
        Ok(serde_json::Value::Object(obj))
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
