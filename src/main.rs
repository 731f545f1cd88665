//! Layer Runner - test-layer orchestration CLI
//!
//! Runs named test suites ("layers") as independent external processes,
//! honoring declared inter-layer dependencies, with per-layer environment
//! composition and a pass/fail summary.
//!
//! ## Features
//!
//! - Dependency-ordered sequential execution with cycle detection
//! - Unordered parallel execution with live tagged output
//! - Dry-run planning, fail-fast abort, tiered environment overrides
//! - Optional YAML layer catalog, JSON summary export
//!
//! ## Usage
//!
//! ```bash
//! # Run all layers in dependency order
//! layer-runner
//!
//! # Run specific layers
//! layer-runner domain application
//!
//! # Run everything except e2e, stop on first failure
//! layer-runner -e e2e --fail-fast
//!
//! # Parallel execution with an environment override
//! layer-runner -p -E SQLITE_FILE=:memory:
//!
//! # Show the execution plan without running anything
//! layer-runner --dry-run
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

mod cli;
mod config;
mod error;
mod executor;
mod models;
mod orchestrator;
mod output;
mod registry;
mod resolver;
mod utils;

use cli::{Args, ExecutionOptions};
use config::CatalogFile;
use orchestrator::Orchestrator;
use registry::LayerRegistry;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    utils::logger::init(args.verbose);
    spawn_signal_handlers();

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("\x1b[31mError:\x1b[0m {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    let options = ExecutionOptions::from_args(args)?;
    let registry = load_registry(&options)?;

    let output_path = options.output.clone();
    let orchestrator = Orchestrator::new(registry, options);
    let summary = orchestrator.run().await?;

    if let Some(path) = output_path {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write summary: {}", path.display()))?;
        println!("\x1b[90mSummary saved to: {}\x1b[0m", path.display());
    }

    Ok(summary.exit_code())
}

/// Explicit catalog beats a discovered one; otherwise the built-in
/// registry is used.
fn load_registry(options: &ExecutionOptions) -> Result<LayerRegistry> {
    if let Some(path) = &options.config {
        return Ok(CatalogFile::load(path)?.into_registry());
    }

    if let Some(path) = CatalogFile::find() {
        debug!("using layer catalog: {}", path.display());
        return Ok(CatalogFile::load(path)?.into_registry());
    }

    Ok(LayerRegistry::builtin())
}

/// Abrupt shutdown on signals; in-flight children are not drained.
fn spawn_signal_handlers() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n\n\x1b[33m🛑 Test runner interrupted\x1b[0m");
            std::process::exit(130);
        }
    });

    #[cfg(unix)]
    tokio::spawn(async {
        use tokio::signal::unix::{signal, SignalKind};

        if let Ok(mut term) = signal(SignalKind::terminate()) {
            term.recv().await;
            println!("\n\n\x1b[33m🛑 Test runner terminated\x1b[0m");
            std::process::exit(143);
        }
    });
}
