// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use flowmesh_wire::ValidationReport;

use crate::builtin::demo_factory;
use crate::cli::{infer_format, ValidateArgs};
use crate::output::{print_validation_report, OutputFormat};

pub fn run(args: ValidateArgs, output: OutputFormat) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", args.path.display()))?;
    let format = infer_format(&args.path);
    let factory = demo_factory();
    let flow = flowmesh_dsl::parse(&content, format, &factory)?;
    let issues = flow.validate();
    let report = ValidationReport { flow_id: flow.id().clone(), issues };
    print_validation_report(&report, output)?;
    if !report.is_clean() {
        anyhow::bail!("flow `{}` has blocking validation issues", report.flow_id.as_str());
    }
    Ok(())
}
