//! CSV report generator.
//!
//! Generates comma-separated breakout and filter reports suitable for
//! spreadsheet import and data analysis pipelines.

use super::{format_quantity, ReportError, ReportFormat, ReportGenerator};
use crate::explode::OrderBreakout;
use crate::model::{BreakoutRow, BreakoutRowKind, LineItem, TotalRow};
use crate::scheduler::SchedulerReport;

const BREAKOUT_HEADER: [&str; 9] = [
    "Group",
    "Parent",
    "Subassembly",
    "Item",
    "Name",
    "Unit Qty",
    "Total Qty",
    "Depth",
    "Kind",
];

/// CSV report generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReporter;

impl CsvReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

type CsvWriter = ::csv::Writer<Vec<u8>>;

fn writer() -> CsvWriter {
    ::csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new())
}

fn finish(writer: CsvWriter) -> Result<String, ReportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::SerializationError(e.to_string()))
}

fn breakout_record(row: &BreakoutRow) -> [String; 9] {
    let kind = match row.kind {
        BreakoutRowKind::Root => "root",
        BreakoutRowKind::Component => "component",
    };
    [
        row.group_id.clone(),
        row.parent_key.clone(),
        row.subassembly_key.clone(),
        row.item_key.clone(),
        row.item_name.clone(),
        format_quantity(row.unit_quantity),
        format_quantity(row.total_quantity),
        row.depth.to_string(),
        kind.to_string(),
    ]
}

fn total_record(total: &TotalRow) -> [String; 3] {
    [
        total.group_id.clone(),
        total.item_key.clone(),
        format_quantity(total.total_quantity),
    ]
}

impl ReportGenerator for CsvReporter {
    fn catalog_report(&self, report: &SchedulerReport<BreakoutRow>) -> Result<String, ReportError> {
        let mut wtr = writer();
        wtr.write_record(BREAKOUT_HEADER)?;
        for row in report.values() {
            wtr.write_record(breakout_record(row))?;
        }
        finish(wtr)
    }

    /// Each order's breakout rows, followed by that order's own `Totals`
    /// block when it has any leaf totals.
    fn order_report(
        &self,
        report: &SchedulerReport<OrderBreakout>,
    ) -> Result<String, ReportError> {
        let mut wtr = writer();
        wtr.write_record(BREAKOUT_HEADER)?;
        for order in report.values() {
            for row in &order.rows {
                wtr.write_record(breakout_record(row))?;
            }
            if !order.totals.is_empty() {
                wtr.write_record(["Totals"])?;
                wtr.write_record(["Group", "Item", "Total Qty"])?;
                for total in &order.totals {
                    wtr.write_record(total_record(total))?;
                }
            }
        }
        finish(wtr)
    }

    fn filtered_report(
        &self,
        header: Option<&LineItem>,
        report: &SchedulerReport<LineItem>,
    ) -> Result<String, ReportError> {
        let mut wtr = writer();
        if let Some(header) = header {
            wtr.write_record(&header.fields)?;
        }
        for line in report.values() {
            wtr.write_record(&line.fields)?;
        }
        finish(wtr)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn report<T>(groups: Vec<(&str, Vec<T>)>) -> SchedulerReport<T> {
        let total = groups.len();
        SchedulerReport {
            results: groups
                .into_iter()
                .map(|(key, values)| (key.to_string(), values))
                .collect::<IndexMap<_, _>>(),
            completed: total,
            cancelled: 0,
            total,
            warning: None,
        }
    }

    fn row(group: &str, sub: &str, item: &str, unit: f64, total: f64, depth: usize) -> BreakoutRow {
        BreakoutRow {
            group_id: group.into(),
            parent_key: group.into(),
            subassembly_key: sub.into(),
            item_key: item.into(),
            item_name: String::new(),
            unit_quantity: unit,
            total_quantity: total,
            depth,
            kind: if depth == 0 {
                BreakoutRowKind::Root
            } else {
                BreakoutRowKind::Component
            },
        }
    }

    #[test]
    fn test_catalog_report() {
        let csv = CsvReporter::new()
            .catalog_report(&report(vec![(
                "KIT-A",
                vec![
                    row("KIT-A", "KIT-A", "KIT-A", 1.0, 1.0, 0),
                    row("KIT-A", "KIT-A", "leaf, big", 2.0, 2.0, 1),
                ],
            )]))
            .unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Group,Parent,Subassembly,Item,Name,Unit Qty,Total Qty,Depth,Kind");
        assert_eq!(lines[1], "KIT-A,KIT-A,KIT-A,KIT-A,,1,1,0,root");
        assert_eq!(lines[2], "KIT-A,KIT-A,KIT-A,\"leaf, big\",,2,2,1,component");
    }

    #[test]
    fn test_order_report_has_totals_section() {
        let order = OrderBreakout {
            group_id: "SO-1".into(),
            rows: vec![row("SO-1", "KIT-A", "leaf", 2.0, 4.0, 1)],
            totals: vec![TotalRow {
                group_id: "SO-1".into(),
                item_key: "leaf".into(),
                total_quantity: 4.0,
            }],
            stats: Default::default(),
            bad_quantities: 0,
        };
        let csv = CsvReporter::new()
            .order_report(&report(vec![("SO-1", vec![order])]))
            .unwrap();

        assert!(csv.contains("\nTotals\nGroup,Item,Total Qty\nSO-1,leaf,4\n"), "{csv}");
    }

    #[test]
    fn test_each_order_is_followed_by_its_own_totals() {
        let order = |group: &str, item: &str, total: f64| OrderBreakout {
            group_id: group.into(),
            rows: vec![row(group, "KIT-A", item, 1.0, total, 1)],
            totals: vec![TotalRow {
                group_id: group.into(),
                item_key: item.into(),
                total_quantity: total,
            }],
            stats: Default::default(),
            bad_quantities: 0,
        };
        let no_kits = OrderBreakout {
            group_id: "SO-3".into(),
            rows: Vec::new(),
            totals: Vec::new(),
            stats: Default::default(),
            bad_quantities: 0,
        };
        let csv = CsvReporter::new()
            .order_report(&report(vec![
                ("SO-1", vec![order("SO-1", "leaf1", 2.0)]),
                ("SO-2", vec![order("SO-2", "leaf2", 5.0)]),
                ("SO-3", vec![no_kits]),
            ]))
            .unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[1..],
            [
                "SO-1,SO-1,KIT-A,leaf1,,1,2,1,component",
                "Totals",
                "Group,Item,Total Qty",
                "SO-1,leaf1,2",
                "SO-2,SO-2,KIT-A,leaf2,,1,5,1,component",
                "Totals",
                "Group,Item,Total Qty",
                "SO-2,leaf2,5",
            ]
        );
    }

    #[test]
    fn test_filtered_report_keeps_header_and_shape() {
        let header = LineItem::from_strs(&["Order", "Item", "Qty"]);
        let csv = CsvReporter::new()
            .filtered_report(
                Some(&header),
                &report(vec![(
                    "SO-1",
                    vec![
                        LineItem::from_strs(&["SO-1", "KIT-A", "1"]),
                        LineItem::from_strs(&["SO-1", "rope", "3", "extra"]),
                    ],
                )]),
            )
            .unwrap();

        assert_eq!(csv, "Order,Item,Qty\nSO-1,KIT-A,1\nSO-1,rope,3,extra\n");
    }
}
