// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_is_stop() {
    assert_eq!(ErrorPolicy::default(), ErrorPolicy::Stop);
}

#[test]
fn retry_delay_grows_with_backoff() {
    let p = ErrorPolicy::retry(3, 100, 2.0);
    assert_eq!(p.retry_delay_ms(0), Some(100));
    assert_eq!(p.retry_delay_ms(1), Some(200));
    assert_eq!(p.retry_delay_ms(2), Some(400));
}

#[test]
fn retry_delay_none_once_exhausted() {
    let p = ErrorPolicy::retry(2, 100, 2.0);
    assert!(p.retry_delay_ms(2).is_none());
    assert!(p.retry_delay_ms(10).is_none());
}

#[test]
fn stop_continue_skip_have_no_retry_delay() {
    assert!(ErrorPolicy::Stop.retry_delay_ms(0).is_none());
    assert!(ErrorPolicy::Continue.retry_delay_ms(0).is_none());
    assert!(ErrorPolicy::Skip.retry_delay_ms(0).is_none());
}
