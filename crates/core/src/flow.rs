// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flow: the static graph of routines and connections shared by every job
//! that runs through it.

use crate::connection::{Connection, EventRef, SlotRef};
use crate::error::CoreError;
use crate::error_policy::ErrorPolicy;
use crate::routine::{Routine, RoutineId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

crate::string_id! {
    /// Author-chosen identifier for a flow definition.
    pub struct FlowId;
}

/// A defect `Flow::validate` can report. Validation never mutates the
/// graph and a cycle is reported, not rejected — event-driven graphs are
/// routinely cyclic (e.g. a retry loop back into an earlier routine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValidationIssue {
    DanglingConnectionSource { source: EventRef },
    DanglingConnectionTarget { target: SlotRef },
    RoutineWithNoLogic { routine: RoutineId },
    Cycle { routines: Vec<RoutineId> },
}

/// The static graph of a workflow: routines, their wiring, and the
/// flow-level error policy routines fall back to when they declare none of
/// their own.
pub struct Flow {
    id: FlowId,
    routines: IndexMap<RoutineId, Routine>,
    connections: Vec<Connection>,
    error_policy: Option<ErrorPolicy>,
}

impl Flow {
    pub fn new(id: impl Into<FlowId>) -> Self {
        Self { id: id.into(), routines: IndexMap::new(), connections: Vec::new(), error_policy: None }
    }

    pub fn id(&self) -> &FlowId {
        &self.id
    }

    pub fn set_error_handler(&mut self, policy: ErrorPolicy) {
        self.error_policy = Some(policy);
    }

    pub fn error_policy(&self) -> Option<&ErrorPolicy> {
        self.error_policy.as_ref()
    }

    /// Rebuilds a `Flow` from already-validated parts — used by
    /// `flowmesh-storage` to restore a snapshot without re-running
    /// `connect`'s checks or re-pushing to each event's cached outgoing
    /// list, since the routines being passed in already carry their own
    /// connection caches from before the snapshot was taken.
    pub fn from_parts(
        id: FlowId,
        routines: IndexMap<RoutineId, Routine>,
        connections: Vec<Connection>,
        error_policy: Option<ErrorPolicy>,
    ) -> Self {
        Self { id, routines, connections, error_policy }
    }

    pub fn add_routine(&mut self, routine: Routine) -> Result<(), CoreError> {
        let id = routine.id().clone();
        if self.routines.contains_key(&id) {
            return Err(CoreError::ValidationError(format!(
                "flow `{}` already has a routine named `{id}`",
                self.id
            )));
        }
        self.routines.insert(id, routine);
        Ok(())
    }

    pub fn routine(&self, id: &RoutineId) -> Option<&Routine> {
        self.routines.get(id)
    }

    pub fn routine_mut(&mut self, id: &RoutineId) -> Option<&mut Routine> {
        self.routines.get_mut(id)
    }

    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.routines.values()
    }

    pub fn routine_ids(&self) -> impl Iterator<Item = &RoutineId> {
        self.routines.keys()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Wires `source` to `target`. Both endpoints must already exist on
    /// routines previously added with [`Flow::add_routine`].
    pub fn connect(&mut self, source: EventRef, target: SlotRef) -> Result<(), CoreError> {
        let source_ok = self
            .routines
            .get(&source.routine)
            .map(|r| r.has_event(&source.event))
            .unwrap_or(false);
        if !source_ok {
            return Err(CoreError::ValidationError(format!(
                "connection source `{}.{}` does not exist",
                source.routine, source.event
            )));
        }
        let target_ok = self
            .routines
            .get(&target.routine)
            .map(|r| r.has_slot(&target.slot))
            .unwrap_or(false);
        if !target_ok {
            return Err(CoreError::ValidationError(format!(
                "connection target `{}.{}` does not exist",
                target.routine, target.slot
            )));
        }
        self.connections.push(Connection::new(source.clone(), target.clone()));
        if let Some(routine) = self.routines.get_mut(&source.routine) {
            if let Some(event) = routine.events_mut().get_mut(&source.event) {
                event.add_connection(target);
            }
        }
        Ok(())
    }

    /// Structural checks over the whole graph: dangling connections (should
    /// never occur if only [`Flow::connect`] was used, but a flow can also
    /// be rehydrated from a snapshot), routines with no logic attached, and
    /// a report (not a rejection) of any cycle.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for conn in &self.connections {
            let source_ok = self
                .routines
                .get(&conn.source.routine)
                .map(|r| r.has_event(&conn.source.event))
                .unwrap_or(false);
            if !source_ok {
                issues.push(ValidationIssue::DanglingConnectionSource { source: conn.source.clone() });
            }
            let target_ok = self
                .routines
                .get(&conn.target.routine)
                .map(|r| r.has_slot(&conn.target.slot))
                .unwrap_or(false);
            if !target_ok {
                issues.push(ValidationIssue::DanglingConnectionTarget { target: conn.target.clone() });
            }
        }
        for routine in self.routines.values() {
            if routine.logic().is_none() {
                issues.push(ValidationIssue::RoutineWithNoLogic { routine: routine.id().clone() });
            }
        }
        if let Some(cycle) = self.find_cycle() {
            issues.push(ValidationIssue::Cycle { routines: cycle });
        }
        issues
    }

    fn find_cycle(&self) -> Option<Vec<RoutineId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }
        let mut marks: std::collections::HashMap<&RoutineId, Mark> = std::collections::HashMap::new();
        let mut stack = Vec::new();

        fn visit<'a>(
            flow: &'a Flow,
            id: &'a RoutineId,
            marks: &mut std::collections::HashMap<&'a RoutineId, Mark>,
            stack: &mut Vec<&'a RoutineId>,
        ) -> Option<Vec<RoutineId>> {
            match marks.get(id) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|r| *r == id).unwrap_or(0);
                    return Some(stack[start..].iter().map(|r| (*r).clone()).collect());
                }
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            stack.push(id);
            if let Some(routine) = flow.routines.get(id) {
                let targets: HashSet<&RoutineId> = flow
                    .connections
                    .iter()
                    .filter(|c| &c.source.routine == id)
                    .map(|c| &c.target.routine)
                    .collect();
                let _ = routine;
                for target in targets {
                    if let Some(cycle) = visit(flow, target, marks, stack) {
                        return Some(cycle);
                    }
                }
            }
            stack.pop();
            marks.insert(id, Mark::Done);
            None
        }

        for id in self.routines.keys() {
            if let Some(cycle) = visit(self, id, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
