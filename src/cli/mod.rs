//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler loads its inputs, runs one pipeline stage and writes the
//! report, returning the exit code for the caller to use.

mod catalog;
mod filter;
mod orders;

pub use catalog::run_catalog_breakout;
pub use filter::run_order_filter;
pub use orders::run_order_breakout;

// Re-export config types used by handlers
pub use crate::config::{AppConfig, RunPaths};

use crate::pipeline::{exit_code_for, write_output, OutputTarget, PipelineError};
use crate::reports::ReportError;
use crate::scheduler::SchedulerReport;
use anyhow::Result;

/// Write a rendered report and derive the exit code from the run.
fn emit<T>(
    rendered: std::result::Result<String, ReportError>,
    report: &SchedulerReport<T>,
    config: &AppConfig,
) -> Result<i32> {
    let content = rendered.map_err(|e| PipelineError::ReportFailed { source: e.into() })?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&content, &target, config.behavior.quiet)?;

    if let Some(warning) = &report.warning {
        tracing::warn!(
            completed = report.completed,
            total = report.total,
            "Run incomplete: {warning}"
        );
    } else if !config.behavior.quiet {
        tracing::info!(
            completed = report.completed,
            cancelled = report.cancelled,
            "Run finished"
        );
    }

    Ok(exit_code_for(report))
}
