// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration: thread pool sizing, fairness quantum, slot
//! defaults, idle-job GC, and execution timeout — constructed
//! programmatically or loaded from a TOML file, mirroring the teacher's
//! `RuntimeConfig { state_dir, log_dir }` shape.

use crate::fairness::DEFAULT_FAIRNESS_QUANTUM;
use flowmesh_core::DEFAULT_MAX_QUEUE_LENGTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read { path: String, #[source] source: std::io::Error },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse { path: String, #[source] source: toml::de::Error },
}

/// Tunables for one `Runtime` instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of worker tasks draining each flow's dispatcher queue.
    /// Defaults to the logical CPU count.
    pub thread_pool_size: usize,
    /// Consecutive tasks drained from one routine's bucket before the
    /// fairness scheduler rotates to the next.
    pub fairness_quantum: usize,
    /// Default `max_queue_length` for slots that don't specify one.
    pub default_max_queue_length: usize,
    /// Default `consume_watermark` for slots that don't specify one.
    pub default_consume_watermark: usize,
    /// How long an `idle` job survives before the GC sweep removes it.
    pub idle_job_ttl: Duration,
    /// Default per-job execution timeout, if a flow declares none of its own.
    pub execution_timeout: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thread_pool_size: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
            fairness_quantum: DEFAULT_FAIRNESS_QUANTUM,
            default_max_queue_length: DEFAULT_MAX_QUEUE_LENGTH,
            default_consume_watermark: 32,
            idle_job_ttl: Duration::from_secs(3600),
            execution_timeout: None,
        }
    }
}

impl RuntimeConfig {
    /// Loads a config from a TOML file, falling back to `Default::default()`
    /// for any field the file omits.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
