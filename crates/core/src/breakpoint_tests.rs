// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_breakpoint_starts_enabled_with_zero_hits() {
    let bp = Breakpoint::new(JobId::new(), RoutineId::from("transform"), "immediate");
    assert!(bp.enabled);
    assert_eq!(bp.hit_count, 0);
    assert_eq!(bp.saved_original_policy, "immediate");
}

#[test]
fn record_hit_increments_counter() {
    let mut bp = Breakpoint::new(JobId::new(), RoutineId::from("transform"), "batch_size");
    bp.record_hit();
    bp.record_hit();
    assert_eq!(bp.hit_count, 2);
}
