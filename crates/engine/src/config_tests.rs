// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_fairness_quantum_matches_the_scheduler_default() {
    assert_eq!(RuntimeConfig::default().fairness_quantum, DEFAULT_FAIRNESS_QUANTUM);
}

#[test]
fn default_idle_job_ttl_is_one_hour() {
    assert_eq!(RuntimeConfig::default().idle_job_ttl, Duration::from_secs(3600));
}

#[test]
fn from_toml_file_overrides_only_the_fields_present() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime.toml");
    std::fs::write(&path, "fairness_quantum = 8\n").unwrap();
    let config = RuntimeConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.fairness_quantum, 8);
    assert_eq!(config.thread_pool_size, RuntimeConfig::default().thread_pool_size);
}

#[test]
fn from_toml_file_reports_a_read_error_for_a_missing_file() {
    let err = RuntimeConfig::from_toml_file("/nonexistent/runtime.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn from_toml_file_reports_a_parse_error_for_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "not valid = [toml").unwrap();
    let err = RuntimeConfig::from_toml_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
