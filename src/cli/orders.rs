//! Orders command handler.
//!
//! Implements the `orders` subcommand: explode the kits on every order and
//! report the breakout rows followed by each order's totals.

use super::emit;
use crate::config::{AppConfig, RunPaths};
use crate::pipeline::{load_kit_graph, load_orders, run_orders, RunControl};
use crate::reports::create_reporter;
use crate::scheduler::{LogProgress, ProgressObserver};
use anyhow::Result;
use std::path::PathBuf;

/// Run the orders command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_order_breakout(kits: PathBuf, orders: PathBuf, config: AppConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    RunPaths {
        kits: kits.clone(),
        orders: Some(orders.clone()),
    }
    .ensure_valid()?;

    let loaded = load_kit_graph(&kits, &config, quiet)?;
    let table = load_orders(&orders, &config, quiet)?;

    let progress = LogProgress::new("orders");
    let observer: Option<&dyn ProgressObserver> = if quiet { None } else { Some(&progress) };
    let report = run_orders(
        &loaded.graph,
        table.lines,
        &config,
        RunControl {
            cancel: None,
            observer,
        },
    )?;

    let without_kits = report.values().filter(|order| !order.has_kits()).count();
    if without_kits > 0 && !quiet {
        tracing::info!("{without_kits} orders contain no known kits");
    }

    let reporter = create_reporter(config.output.format);
    emit(reporter.order_report(&report), &report, &config)
}
