// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the dispatch fabric itself, distinct from
//! [`flowmesh_core::CoreError`] (data-model invariants) and
//! [`flowmesh_core::LogicError`] (routine logic failures) — both of which
//! this error wraps so callers have one type to match on.

use flowmesh_core::{CoreError, LogicError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("flow `{0}` is not registered")]
    UnknownFlow(String),

    #[error("routine `{0}` is not part of flow `{1}`")]
    UnknownRoutine(String, String),

    #[error("job `{0}` is not known to this runtime")]
    UnknownJob(String),

    #[error("flow `{0}` has not been started with `Runtime::exec`")]
    FlowNotStarted(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("routine logic failed: {0}")]
    Logic(#[from] LogicError),

    #[error("event queue closed unexpectedly")]
    QueueClosed,
}
