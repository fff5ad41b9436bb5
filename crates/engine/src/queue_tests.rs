// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use flowmesh_core::{FlowId, JobId, RoutineId};

fn sample_task() -> Task {
    Task::ActivationCheck {
        flow_id: FlowId::from("f"),
        routine: RoutineId::from("r"),
        job_id: JobId::new(),
    }
}

#[test]
fn push_delivers_to_the_receiver() {
    let (queue, mut rx) = EventQueue::new();
    queue.push(sample_task()).unwrap();
    assert!(rx.try_recv().is_ok());
}

#[test]
fn push_after_receiver_dropped_reports_queue_closed() {
    let (queue, rx) = EventQueue::new();
    drop(rx);
    let err = queue.push(sample_task()).unwrap_err();
    assert!(matches!(err, RuntimeError::QueueClosed));
}

#[test]
fn clones_share_the_same_channel() {
    let (queue, mut rx) = EventQueue::new();
    let clone = queue.clone();
    clone.push(sample_task()).unwrap();
    queue.push(sample_task()).unwrap();
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_ok());
}
