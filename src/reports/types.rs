//! Report type definitions.

use crate::scheduler::{SchedulerReport, SchedulerWarning};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// CSV for spreadsheet import
    #[default]
    Csv,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Run-level counts carried into every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_units: usize,
    pub completed_units: usize,
    pub cancelled_units: usize,
    /// Present when the run stopped before every unit reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RunSummary {
    pub fn from_report<T>(report: &SchedulerReport<T>) -> Self {
        Self {
            total_units: report.total,
            completed_units: report.completed,
            cancelled_units: report.cancelled,
            warning: report.warning.as_ref().map(SchedulerWarning::to_string),
        }
    }
}
