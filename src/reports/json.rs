//! JSON report generator.

use super::{ReportError, ReportFormat, ReportGenerator, RunSummary};
use crate::explode::OrderBreakout;
use crate::model::{BreakoutRow, LineItem};
use crate::scheduler::SchedulerReport;
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
#[derive(Debug, Clone, Copy)]
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(
        &self,
        report_type: &'static str,
        summary: RunSummary,
        groups: T,
    ) -> Result<String, ReportError> {
        let document = JsonReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                generated_at: Utc::now().to_rfc3339(),
                report_type,
            },
            summary,
            groups,
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        rendered.map_err(|e| ReportError::SerializationError(e.to_string()))
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn catalog_report(&self, report: &SchedulerReport<BreakoutRow>) -> Result<String, ReportError> {
        let groups: Vec<_> = report
            .results
            .iter()
            .map(|(group_id, rows)| CatalogGroup { group_id, rows })
            .collect();
        self.render("catalog", RunSummary::from_report(report), groups)
    }

    fn order_report(
        &self,
        report: &SchedulerReport<OrderBreakout>,
    ) -> Result<String, ReportError> {
        let orders: Vec<&OrderBreakout> = report.values().collect();
        self.render("orders", RunSummary::from_report(report), orders)
    }

    fn filtered_report(
        &self,
        header: Option<&LineItem>,
        report: &SchedulerReport<LineItem>,
    ) -> Result<String, ReportError> {
        let groups = FilteredDocument {
            header,
            orders: report
                .results
                .iter()
                .map(|(group_id, lines)| FilteredGroup { group_id, lines })
                .collect(),
        };
        self.render("filtered", RunSummary::from_report(report), groups)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// ============================================================================
// Document shape
// ============================================================================

#[derive(Serialize)]
struct JsonReport<T> {
    metadata: JsonReportMetadata,
    summary: RunSummary,
    #[serde(rename = "results")]
    groups: T,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    report_type: &'static str,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct CatalogGroup<'a> {
    group_id: &'a str,
    rows: &'a [BreakoutRow],
}

#[derive(Serialize)]
struct FilteredDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<&'a LineItem>,
    orders: Vec<FilteredGroup<'a>>,
}

#[derive(Serialize)]
struct FilteredGroup<'a> {
    group_id: &'a str,
    lines: &'a [LineItem],
}
