// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn no_color_env_disables_colorizing() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");
    assert!(!should_colorize());
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn color_env_forces_colorizing() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("COLOR", "1");
    assert!(should_colorize());
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn header_is_plain_text_without_color() {
    std::env::set_var("NO_COLOR", "1");
    assert_eq!(header("label"), "label");
    std::env::remove_var("NO_COLOR");
}
