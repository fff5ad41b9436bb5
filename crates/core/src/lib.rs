// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! flowmesh-core: the data model of a concurrent, event-driven workflow
//! engine — slots, events, connections, routines, flows, activation
//! policies, and the two kinds of state (per-worker, per-job) routine logic
//! sees while running.
//!
//! This crate is deliberately free of any async runtime or dispatch
//! mechanics: [`routine::ActivationContext`] is the seam where
//! `flowmesh-engine` plugs in a live dispatcher. Everything here is plain,
//! synchronous, and unit-testable in isolation.

pub mod macros;

pub mod breakpoint;
pub mod clock;
pub mod connection;
pub mod error;
pub mod error_policy;
pub mod event;
pub mod flow;
pub mod hooks;
pub mod id;
pub mod ids;
pub mod job_context;
pub mod policy;
pub mod routine;
pub mod slot;
pub mod worker_state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use breakpoint::Breakpoint;
pub use clock::{Clock, FakeClock, SystemClock};
pub use connection::{Connection, EventRef, SlotRef};
pub use error::{CoreError, LogicError};
pub use error_policy::ErrorPolicy;
pub use event::Event;
pub use flow::{Flow, FlowId, ValidationIssue};
pub use hooks::{ActivationOutcome, ExecutionHooks, HookVerdict, NullHooks, TracingHooks};
pub use ids::{BreakpointId, JobId, WorkerId};
pub use job_context::{DebugCapture, JobContext, JobStatus, TraceEntry};
pub use policy::{
    ActivationPolicy, AllSlotsReadyPolicy, BatchSizePolicy, BreakpointPolicy, CustomPolicy,
    ImmediatePolicy, PolicyOutcome, SlotTable, WatermarkPolicy,
};
pub use routine::{ActivationContext, FnRoutineLogic, Routine, RoutineId, RoutineLogic, RoutineStats};
pub use slot::{DataPoint, MergeStrategy, Slot, DEFAULT_MAX_QUEUE_LENGTH};
pub use worker_state::{WorkerState, WorkerStatus};
