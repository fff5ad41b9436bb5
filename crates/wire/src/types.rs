// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response DTOs for a monitoring surface (REST/WebSocket) external to this
//! workspace. No transport is implemented here — these are plain,
//! independently testable serde types an embedder's server would serialize.

use flowmesh_core::{FlowId, JobId, JobStatus, RoutineId, TraceEntry, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a flow listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowSummary {
    pub flow_id: FlowId,
    pub routine_count: usize,
    pub connection_count: usize,
    pub active: bool,
}

/// One row of a job listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSummary {
    pub job_id: JobId,
    pub flow_id: String,
    pub status: JobStatus,
    pub created_at_ms: u64,
    pub completed_at_ms: Option<u64>,
}

/// Full detail for a single job, including its trace log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobDetail {
    pub job_id: JobId,
    pub flow_id: String,
    pub status: JobStatus,
    pub created_at_ms: u64,
    pub completed_at_ms: Option<u64>,
    pub error: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub data: HashMap<String, serde_json::Value>,
    pub trace_log: Vec<TraceEntry>,
}

/// What a routine's installed breakpoint captured the last time it fired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebugDataResponse {
    pub routine: RoutineId,
    pub slot_data: HashMap<String, Vec<serde_json::Value>>,
    pub captured_at_ms: u64,
}

/// Result of `Flow::validate`, shaped for a monitoring endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub flow_id: FlowId,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.iter().all(|issue| matches!(issue, ValidationIssue::Cycle { .. }))
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
