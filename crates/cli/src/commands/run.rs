// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use flowmesh_core::{NullHooks, RoutineId, SystemClock};
use flowmesh_engine::{Runtime, RuntimeConfig};
use flowmesh_wire::JobDetail;

use crate::builtin::demo_factory;
use crate::cli::{infer_format, RunArgs};
use crate::output::{print_job_detail, OutputFormat};

pub async fn run(args: RunArgs, output: OutputFormat) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", args.path.display()))?;
    let format = infer_format(&args.path);
    let factory = demo_factory();
    let flow = flowmesh_dsl::parse(&content, format, &factory)?;
    let payload: serde_json::Value = serde_json::from_str(&args.input)
        .map_err(|e| anyhow::anyhow!("--input is not valid JSON: {e}"))?;

    let runtime = Runtime::new(RuntimeConfig::default(), Arc::new(NullHooks), SystemClock);
    let flow_id = runtime.register(flow);
    runtime.exec(&flow_id)?;

    let (_worker_id, job_id) = runtime.post(&flow_id, RoutineId::from(args.routine.as_str()), args.slot.clone(), payload, None)?;

    runtime.wait_until_all_jobs_finished(Duration::from_millis(args.wait_ms)).await;

    let job = runtime
        .job_registry()
        .remove(&job_id)
        .ok_or_else(|| anyhow::anyhow!("job `{job_id}` vanished from the registry"))?;

    let detail = JobDetail {
        job_id: *job.job_id(),
        flow_id: job.flow_id().to_string(),
        status: job.status(),
        created_at_ms: job.created_at_ms(),
        completed_at_ms: job.completed_at_ms(),
        error: job.error().map(str::to_string),
        metadata: job.metadata().clone(),
        data: std::collections::HashMap::new(),
        trace_log: job.trace_log().to_vec(),
    };
    print_job_detail(&detail, output)?;

    runtime.shutdown(true).await;
    Ok(())
}
