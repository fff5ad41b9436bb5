// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use flowmesh_dsl::parse_document;

use crate::cli::{infer_format, ConvertArgs};

/// Converts a flow document between YAML and JSON. Operates on the document
/// shape directly rather than round-tripping through a `Flow` — a `Routine`
/// factory is only needed to *execute* a document, not to reformat it, so
/// this conversion is lossless regardless of which classes it declares.
pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", args.path.display()))?;
    let from = infer_format(&args.path);
    let doc = parse_document(&content, from)?;
    let rendered = match args.to.into() {
        flowmesh_dsl::Format::Yaml => serde_yaml::to_string(&doc)?,
        flowmesh_dsl::Format::Json => serde_json::to_string_pretty(&doc)?,
    };
    print!("{rendered}");
    Ok(())
}
