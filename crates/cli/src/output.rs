// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use flowmesh_wire::{JobDetail, ValidationReport};
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format-branch helper shared by every command: JSON prints the payload
/// verbatim, text defers to the caller's renderer.
pub fn format_or_json<T: Serialize>(format: OutputFormat, data: &T, text_fn: impl FnOnce()) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => text_fn(),
    }
    Ok(())
}

pub fn print_validation_report(report: &ValidationReport, format: OutputFormat) -> anyhow::Result<()> {
    format_or_json(format, report, || {
        println!("{}", crate::color::header(report.flow_id.as_str()));
        if report.issues.is_empty() {
            println!("  no issues found");
            return;
        }
        for issue in &report.issues {
            println!("  {issue:?}");
        }
        let verdict = if report.is_clean() { "no blocking issues" } else { "blocking issues present" };
        println!("\n{} issue(s) — {}", report.issues.len(), crate::color::muted(verdict));
    })
}

pub fn print_job_detail(detail: &JobDetail, format: OutputFormat) -> anyhow::Result<()> {
    format_or_json(format, detail, || {
        println!("{}", crate::color::header(detail.job_id.as_str()));
        println!("  flow: {}", detail.flow_id);
        println!("  status: {:?}", detail.status);
        if let Some(error) = &detail.error {
            println!("  error: {}", crate::color::literal(error));
        }
        println!("  trace entries: {}", detail.trace_log.len());
        for entry in &detail.trace_log {
            let routine = entry.routine.as_ref().map(|r| r.as_str()).unwrap_or("-");
            println!("    {} {}", crate::color::muted(&entry.action), routine);
        }
    })
}
