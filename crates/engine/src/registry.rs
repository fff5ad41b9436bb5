// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FlowRegistry: where running flows, their worker state, and their live
//! jobs are looked up by id.

use flowmesh_core::{Flow, FlowId, JobContext, JobId, WorkerId, WorkerState};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything the dispatcher needs to run one flow: the graph itself
/// (behind an `RwLock` since connections/routines may be added while jobs
/// are in flight — spec.md's flow-level mutation-during-execution case),
/// the worker hosting it, and its live jobs.
pub struct FlowHandle {
    pub flow: RwLock<Flow>,
    pub worker_state: Arc<WorkerState>,
    pub jobs: Mutex<HashMap<JobId, JobContext>>,
}

impl FlowHandle {
    fn new(flow: Flow, worker_id: WorkerId) -> Self {
        let flow_id = flow.id().as_str().to_string();
        Self {
            flow: RwLock::new(flow),
            worker_state: Arc::new(WorkerState::new(worker_id, flow_id)),
            jobs: Mutex::new(HashMap::new()),
        }
    }
}

/// Registry of every flow currently hosted by this runtime.
#[derive(Default)]
pub struct FlowRegistry {
    flows: RwLock<HashMap<FlowId, Arc<FlowHandle>>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, flow: Flow, worker_id: WorkerId) -> Arc<FlowHandle> {
        let id = flow.id().clone();
        let handle = Arc::new(FlowHandle::new(flow, worker_id));
        self.flows.write().insert(id, handle.clone());
        handle
    }

    pub fn get(&self, flow_id: &FlowId) -> Option<Arc<FlowHandle>> {
        self.flows.read().get(flow_id).cloned()
    }

    pub fn remove(&self, flow_id: &FlowId) -> Option<Arc<FlowHandle>> {
        self.flows.write().remove(flow_id)
    }

    pub fn flow_ids(&self) -> Vec<FlowId> {
        self.flows.read().keys().cloned().collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
