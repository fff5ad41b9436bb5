// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! flowmesh — a thin CLI driving `flowmesh_engine::Runtime` through its
//! public API: parse a flow document, validate its graph, run it against
//! two built-in demo routine classes, or convert it between YAML and JSON.

mod builtin;
mod cli;
mod color;
mod commands;
mod exit_error;
mod output;

use clap::Parser;
use exit_error::ExitError;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run(args, cli.output),
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Run(args) => commands::run::run(args, cli.output).await,
    };

    if let Err(err) = result {
        let exit = err.downcast_ref::<ExitError>().map(|e| e.code).unwrap_or(1);
        eprintln!("error: {err}");
        std::process::exit(exit);
    }
}
