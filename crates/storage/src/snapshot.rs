// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot snapshot/restore of a [`Flow`]'s static graph and its in-flight
//! [`JobContext`]s.
//!
//! This is deliberately not a write-ahead log: spec.md's explicit Non-goal
//! rules out durability beyond explicit snapshots, so there is no replay
//! machinery here, only a point-in-time capture an embedder can call
//! whenever it chooses (on a timer, before a restart, ...) and a restore
//! that hands back a `Flow` plus its job table.
//!
//! `logic` and `activation_policy` are trait objects and cannot be
//! serialized. A `RoutineSnapshot` instead carries the routine's
//! `logic_name`/`policy_name` strings so an embedder can look them back up
//! in whatever `RoutineFactory`-style registry built the flow in the first
//! place (see `flowmesh-dsl`) and re-attach them after `restore` returns.

use flowmesh_core::{Connection, ErrorPolicy, Event, Flow, FlowId, JobContext, JobId, Routine, RoutineId, Slot};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::StorageError;

/// Snapshot compression level, chosen for fast round-trips over ratio —
/// snapshots are taken far more often than they're restored.
const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineSnapshot {
    pub slots: IndexMap<String, Slot>,
    pub events: IndexMap<String, Event>,
    pub logic_name: Option<String>,
    pub policy_name: String,
    pub error_policy: Option<ErrorPolicy>,
    pub config: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub flow_id: FlowId,
    pub routines: IndexMap<RoutineId, RoutineSnapshot>,
    pub connections: Vec<Connection>,
    pub error_policy: Option<ErrorPolicy>,
    pub jobs: HashMap<JobId, JobContext>,
    pub taken_at_ms: u64,
}

/// Captures `flow`'s graph and the supplied job table into a `FlowSnapshot`.
///
/// The caller supplies `jobs` rather than this function reaching into a
/// `Runtime` itself: `flowmesh-storage` does not depend on `flowmesh-engine`,
/// so the registry's job map is handed in already collected (e.g. from
/// `Runtime::job_registry()`).
pub fn snapshot(flow: &Flow, jobs: HashMap<JobId, JobContext>, now_ms: u64) -> FlowSnapshot {
    let routines = flow.routines().map(|routine| (routine.id().clone(), routine_snapshot(routine))).collect();
    FlowSnapshot {
        flow_id: flow.id().clone(),
        routines,
        connections: flow.connections().to_vec(),
        error_policy: flow.error_policy().cloned(),
        jobs,
        taken_at_ms: now_ms,
    }
}

fn routine_snapshot(routine: &Routine) -> RoutineSnapshot {
    RoutineSnapshot {
        slots: routine.slots().clone(),
        events: routine.events().clone(),
        logic_name: routine.logic_name().map(str::to_string),
        policy_name: routine.activation_policy().name().to_string(),
        error_policy: routine.error_policy().cloned(),
        config: routine.all_config().clone(),
    }
}

/// Serializes `snapshot` to JSON and zstd-compresses the result.
pub fn encode(snapshot: &FlowSnapshot) -> Result<Vec<u8>, StorageError> {
    let json = serde_json::to_vec(snapshot)?;
    let mut encoder = zstd::Encoder::new(Vec::new(), ZSTD_LEVEL).map_err(StorageError::CompressionError)?;
    encoder.write_all(&json).map_err(StorageError::CompressionError)?;
    encoder.finish().map_err(StorageError::CompressionError)
}

/// Inverse of [`encode`].
pub fn decode(bytes: &[u8]) -> Result<FlowSnapshot, StorageError> {
    let mut decoder = zstd::Decoder::new(bytes).map_err(StorageError::CompressionError)?;
    let mut json = Vec::new();
    decoder.read_to_end(&mut json).map_err(StorageError::CompressionError)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Rebuilds a `Flow` from `snapshot`, including every slot's buffered (and
/// already-consumed) data points and every event's cached outgoing wiring —
/// restored by direct insertion rather than by replaying `add_slot`/
/// `add_event`/`connect`, since those would start each slot empty and
/// double-register each connection. `logic`/`activation_policy` are left at
/// `Routine::new`'s defaults (no logic, `ImmediatePolicy`) for the caller to
/// re-attach using `logic_name`/`policy_name`.
pub fn restore(snapshot: &FlowSnapshot) -> Flow {
    let mut routines = IndexMap::new();
    for (id, rs) in &snapshot.routines {
        let mut routine = Routine::new(id.clone());
        for (name, slot) in &rs.slots {
            routine.slots_mut().insert(name.clone(), slot.clone());
        }
        for (name, event) in &rs.events {
            routine.events_mut().insert(name.clone(), event.clone());
        }
        if let Some(policy) = &rs.error_policy {
            routine.set_error_handler(policy.clone());
        }
        for (k, v) in &rs.config {
            routine.set_config(k.clone(), v.clone());
        }
        routines.insert(id.clone(), routine);
    }
    Flow::from_parts(snapshot.flow_id.clone(), routines, snapshot.connections.clone(), snapshot.error_policy.clone())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
