// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event queue: the single non-blocking entry point for handing a
//! [`Task`] to the dispatcher. `emit` never awaits — it is safe to call
//! from inside routine logic, a connection fan-out, or an external `post`.

use crate::error::RuntimeError;
use crate::task::Task;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<Task>,
}

impl EventQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Task>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Hands `task` to the dispatcher. Non-blocking: backed by an unbounded
    /// channel so a burst of `emit` calls from one activation never stalls
    /// the caller waiting on queue capacity.
    pub fn push(&self, task: Task) -> Result<(), RuntimeError> {
        self.tx.send(task).map_err(|_| RuntimeError::QueueClosed)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
