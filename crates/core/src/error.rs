// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core error kinds shared by the data model and the dispatcher.

use crate::routine::RoutineId;
use thiserror::Error;

/// Errors raised by the data model itself (slots, policies, validation).
///
/// Routed through the per-routine error handler (see `flowmesh-engine::error_policy`)
/// the same way user logic errors are: the core never decides retry/stop/skip,
/// it only classifies what went wrong.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Pushing into a slot whose unconsumed count is already at `max_queue_length`.
    #[error("slot `{slot}` on routine `{routine}` overflowed (max_queue_length={max})")]
    SlotOverflow { routine: RoutineId, slot: String, max: usize },

    /// An activation policy raised an error while evaluating or consuming.
    #[error("activation policy for routine `{routine}` failed: {message}")]
    PolicyError { routine: RoutineId, message: String },

    /// `Flow::validate` or a connection/routine builder invariant was violated.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// WorkerState or JobContext was asked to do something its state machine
    /// forbids (e.g. reviving a job that is `completed`).
    #[error("state error: {0}")]
    StateError(String),
}

/// Error raised by user-supplied routine logic.
#[derive(Debug, Error, Clone)]
#[error("logic error in routine `{routine}`: {message}")]
pub struct LogicError {
    pub routine: RoutineId,
    pub message: String,
}

impl LogicError {
    pub fn new(routine: impl Into<RoutineId>, message: impl Into<String>) -> Self {
        Self { routine: routine.into(), message: message.into() }
    }
}
