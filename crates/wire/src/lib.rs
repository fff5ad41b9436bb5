// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! flowmesh-wire: serde DTOs for a monitoring surface, mirroring the JSON
//! shapes an external REST/WebSocket server would expose over a `Runtime`.
//!
//! No transport is implemented in this crate — see SPEC_FULL.md §6.2. These
//! types exist so such a server (or a `flowmesh-cli` subcommand) can build
//! and serialize a response without redefining the shape itself.

mod types;

pub use types::{DebugDataResponse, FlowSummary, JobDetail, JobSummary, ValidationReport};
