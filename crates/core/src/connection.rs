// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edges of the flow graph: one routine's event output wired to another
//! routine's slot input.

use crate::routine::RoutineId;
use serde::{Deserialize, Serialize};

/// Address of an event output port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRef {
    pub routine: RoutineId,
    pub event: String,
}

impl EventRef {
    pub fn new(routine: impl Into<RoutineId>, event: impl Into<String>) -> Self {
        Self { routine: routine.into(), event: event.into() }
    }
}

/// Address of a slot input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub routine: RoutineId,
    pub slot: String,
}

impl SlotRef {
    pub fn new(routine: impl Into<RoutineId>, slot: impl Into<String>) -> Self {
        Self { routine: routine.into(), slot: slot.into() }
    }
}

/// A directed edge from one routine's event to another routine's slot.
///
/// `Flow` is the authoritative owner of the connection list (used by
/// `validate` and graph-shaped queries); each source `Event` additionally
/// caches its outgoing `SlotRef`s so that `emit` can route without walking
/// the whole flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: EventRef,
    pub target: SlotRef,
}

impl Connection {
    pub fn new(source: EventRef, target: SlotRef) -> Self {
        Self { source, target }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
