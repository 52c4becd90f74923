//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads engine configuration
//! 2. Reads the object graph
//! 3. Resolves retained sizes and builds aggregates
//! 4. Writes the JSON report and/or prints a summary

use super::models::AnalyzeArgs;
use crate::engine::HeapEngine;
use crate::output::{render_terminal_summary, to_report, write_report};
use crate::progress::LogProgress;
use crate::utils::config::{load_config, EngineConfig};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::time::Instant;

/// Execute the analyze command
///
/// # Errors
/// * Config read or validation failures
/// * Graph parse failures
/// * Breakdown resolution failures
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Loading heap graph from {}", args.input.display());
    let config = resolve_config(args.config.as_deref())?;
    let engine = HeapEngine::new(config);
    let mut progress = LogProgress::new(engine.config().progress_every);

    let snapshot = engine
        .load_file(&args.input, &mut progress)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    info!("Step 2/3: Building report...");
    let source = args.input.display().to_string();
    let report = to_report(&snapshot, &source, Some(args.top_prototypes));

    info!("Step 3/3: Writing outputs...");
    if let Some(path) = &args.output {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    if args.print_summary {
        println!("{}", render_terminal_summary(&report, 10));
    }

    info!(
        "Analyze completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Load the config file if one was given, otherwise use defaults
pub fn resolve_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Validate analyze arguments
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.output.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: pass --output and/or --summary");
    }

    if args.top_prototypes == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    Ok(())
}
