// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use flowmesh_dsl::Format;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "flowmesh", version, about = "FlowMesh — a concurrent, event-driven workflow engine")]
pub struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a flow document and report graph validation issues
    Validate(ValidateArgs),
    /// Parse a flow document, run it against the engine, and post one input
    Run(RunArgs),
    /// Convert a flow document between YAML and JSON
    Convert(ConvertArgs),
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to a flow document (.yaml/.yml/.json)
    pub path: PathBuf,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to a flow document (.yaml/.yml/.json)
    pub path: PathBuf,
    /// Routine to post the input to
    #[arg(long)]
    pub routine: String,
    /// Slot on that routine to post the input to
    #[arg(long)]
    pub slot: String,
    /// JSON payload to post
    #[arg(long)]
    pub input: String,
    /// Milliseconds to wait for the job to settle before reporting its status
    #[arg(long, default_value_t = 500)]
    pub wait_ms: u64,
}

#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Path to a flow document (.yaml/.yml/.json)
    pub path: PathBuf,
    /// Target format
    #[arg(long = "to", value_enum)]
    pub to: TargetFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TargetFormat {
    Yaml,
    Json,
}

impl From<TargetFormat> for Format {
    fn from(value: TargetFormat) -> Self {
        match value {
            TargetFormat::Yaml => Format::Yaml,
            TargetFormat::Json => Format::Json,
        }
    }
}

/// Infers a document's format from its file extension, defaulting to YAML
/// for anything unrecognized (mirroring FlowMesh's own YAML-first examples).
pub fn infer_format(path: &Path) -> Format {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Format::Json,
        _ => Format::Yaml,
    }
}
