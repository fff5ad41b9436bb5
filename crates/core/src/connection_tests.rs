// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn connection_carries_both_endpoint_addresses() {
    let c = Connection::new(
        EventRef::new("extract", "extracted"),
        SlotRef::new("transform", "input"),
    );
    assert_eq!(c.source.routine.as_str(), "extract");
    assert_eq!(c.source.event, "extracted");
    assert_eq!(c.target.routine.as_str(), "transform");
    assert_eq!(c.target.slot, "input");
}

#[test]
fn event_refs_with_same_fields_are_equal() {
    let a = EventRef::new("extract", "extracted");
    let b = EventRef::new("extract", "extracted");
    assert_eq!(a, b);
}
