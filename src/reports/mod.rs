//! Report generation for breakout and filter results.
//!
//! This module renders scheduler results in two formats:
//! - CSV: one table per report, suitable for spreadsheet import
//! - JSON: structured data for programmatic integration

mod csv;
mod json;
mod types;

pub use self::csv::CsvReporter;
pub use json::JsonReporter;
pub use types::{ReportFormat, RunSummary};

use crate::explode::OrderBreakout;
use crate::model::{BreakoutRow, LineItem};
use crate::scheduler::SchedulerReport;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a whole-catalog breakout, one group per root assembly
    fn catalog_report(&self, report: &SchedulerReport<BreakoutRow>) -> Result<String, ReportError>;

    /// Render per-order breakouts with their totals sections
    fn order_report(&self, report: &SchedulerReport<OrderBreakout>)
        -> Result<String, ReportError>;

    /// Render filtered order lines, preceded by the source header if any
    fn filtered_report(
        &self,
        header: Option<&LineItem>,
        report: &SchedulerReport<LineItem>,
    ) -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Csv => Box::new(CsvReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}

/// Render a quantity without trailing zeros (`2`, `0.5`).
pub(crate) fn format_quantity(quantity: f64) -> String {
    format!("{quantity}")
}
