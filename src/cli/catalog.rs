//! Catalog command handler.
//!
//! Implements the `catalog` subcommand: explode every root kit of the
//! catalog and report the breakout rows.

use super::emit;
use crate::config::{AppConfig, RunPaths};
use crate::pipeline::{load_kit_graph, run_catalog, RunControl};
use crate::reports::create_reporter;
use crate::scheduler::{LogProgress, ProgressObserver};
use anyhow::Result;
use std::path::PathBuf;

/// Run the catalog command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_catalog_breakout(kits: PathBuf, config: AppConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    RunPaths {
        kits: kits.clone(),
        orders: None,
    }
    .ensure_valid()?;

    let loaded = load_kit_graph(&kits, &config, quiet)?;
    let progress = LogProgress::new("catalog");
    let observer: Option<&dyn ProgressObserver> = if quiet { None } else { Some(&progress) };
    let control = RunControl {
        cancel: None,
        observer,
    };
    let report = run_catalog(&loaded.graph, &config, control)?;

    let reporter = create_reporter(config.output.format);
    emit(reporter.catalog_report(&report), &report, &config)
}
