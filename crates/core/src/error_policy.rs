// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! What a routine (or a flow, as a fallback) wants done when its logic or
//! the activation policy itself raises an error.

use serde::{Deserialize, Serialize};

/// Disposition for a routine activation that failed.
///
/// Precedence when a job is running: the routine's own `ErrorPolicy` wins
/// if set, otherwise the owning flow's, otherwise [`ErrorPolicy::Stop`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ErrorPolicy {
    /// Fail the job immediately; no further routines of it are scheduled.
    Stop,
    /// Log the error, mark this activation failed, and let the job carry on.
    Continue,
    /// Treat the activation as if it had produced no events and no error.
    Skip,
    /// Retry the same activation up to `max` times with exponential backoff
    /// starting at `delay_ms`, multiplied by `backoff` each attempt.
    Retry { max: u32, delay_ms: u64, backoff: f64 },
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Stop
    }
}

impl ErrorPolicy {
    pub fn retry(max: u32, delay_ms: u64, backoff: f64) -> Self {
        ErrorPolicy::Retry { max, delay_ms, backoff }
    }

    /// Delay before the `attempt`th retry (0-indexed), or `None` once
    /// `attempt` has exhausted the configured `max`.
    pub fn retry_delay_ms(&self, attempt: u32) -> Option<u64> {
        match self {
            ErrorPolicy::Retry { max, delay_ms, backoff } if attempt < *max => {
                let factor = backoff.powi(attempt as i32);
                Some((*delay_ms as f64 * factor) as u64)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_policy_tests.rs"]
mod tests;
