// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while parsing a flow document or building it into a `Flow`.

use flowmesh_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DslError {
    #[error("failed to parse YAML flow document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON flow document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("routine `{routine}` declares unknown class `{class}`")]
    UnknownClass { routine: String, class: String },

    #[error("flow graph error: {0}")]
    Graph(#[from] CoreError),
}
