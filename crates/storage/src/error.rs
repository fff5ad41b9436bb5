// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while snapshotting or restoring flow/job state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to serialize snapshot: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("snapshot compression failed: {0}")]
    CompressionError(std::io::Error),

    #[error("io error reading/writing snapshot: {0}")]
    Io(std::io::Error),

    #[error("unknown routine `{0}` in snapshot: no logic registered for it")]
    UnknownLogic(String),
}
