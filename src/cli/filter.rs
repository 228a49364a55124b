//! Filter command handler.
//!
//! Implements the `filter` subcommand: drop order lines that a kit on the
//! same order already supplies.

use super::emit;
use crate::config::{AppConfig, RunPaths};
use crate::pipeline::{load_kit_graph, load_orders, run_filter, RunControl};
use crate::reports::create_reporter;
use crate::scheduler::{LogProgress, ProgressObserver};
use anyhow::Result;
use std::path::PathBuf;

/// Run the filter command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_order_filter(kits: PathBuf, orders: PathBuf, config: AppConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    RunPaths {
        kits: kits.clone(),
        orders: Some(orders.clone()),
    }
    .ensure_valid()?;

    let loaded = load_kit_graph(&kits, &config, quiet)?;
    let table = load_orders(&orders, &config, quiet)?;
    let submitted = table.lines.len();

    let progress = LogProgress::new("filter");
    let observer: Option<&dyn ProgressObserver> = if quiet { None } else { Some(&progress) };
    let report = run_filter(
        &loaded.graph,
        table.lines,
        &config,
        RunControl {
            cancel: None,
            observer,
        },
    )?;

    if !quiet {
        let kept = report.values().count();
        tracing::info!("Kept {kept} of {submitted} order lines");
    }

    let reporter = create_reporter(config.output.format);
    emit(
        reporter.filtered_report(table.header.as_ref(), &report),
        &report,
        &config,
    )
}
