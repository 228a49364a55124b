//! Pipeline orchestration for kit breakout operations.
//!
//! Shared load → run → report logic used by the CLI command handlers.

mod load;
mod output;
mod stages;

pub use load::{load_kit_graph, load_orders, LoadedKits};
pub use output::{write_output, OutputTarget};
pub use stages::{run_catalog, run_filter, run_orders, RunControl};

use crate::scheduler::SchedulerReport;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read an input table or build the kit graph from it
    #[error("Load failed for {path}: {source}")]
    LoadFailed {
        path: String,
        source: anyhow::Error,
    },

    /// The worker pool could not be built or rejected the submitted units
    #[error("Stage failed: {source}")]
    StageFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report rendering or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for scripted use
pub mod exit_codes {
    /// Every unit completed
    pub const SUCCESS: i32 = 0;
    /// The run stopped early; output holds partial results
    pub const INCOMPLETE: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 2;
}

/// Exit code for a finished run.
#[must_use]
pub fn exit_code_for<T>(report: &SchedulerReport<T>) -> i32 {
    if report.is_complete() {
        exit_codes::SUCCESS
    } else {
        exit_codes::INCOMPLETE
    }
}
