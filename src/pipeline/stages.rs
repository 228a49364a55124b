//! Explosion and filter stages on the worker pool.

use super::PipelineError;
use crate::config::AppConfig;
use crate::explode::{catalog_roots, explode, explode_order, OrderBreakout};
use crate::filter::{filter_lines, KeyMatcher};
use crate::graph::KitGraph;
use crate::model::{group_line_items, BreakoutRow, LineItem};
use crate::scheduler::{
    CancellationToken, Outcome, ProgressObserver, SchedulerReport, WorkUnit, WorkerPool,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Cancellation and progress hooks for a stage.
#[derive(Default, Clone, Copy)]
pub struct RunControl<'a> {
    pub cancel: Option<&'a CancellationToken>,
    pub observer: Option<&'a dyn ProgressObserver>,
}

impl std::fmt::Debug for RunControl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunControl")
            .field("cancel", &self.cancel)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

fn pool(
    label: &str,
    workers: usize,
    config: &AppConfig,
    control: RunControl<'_>,
) -> Result<WorkerPool> {
    let mut pool = WorkerPool::new(label, workers)
        .map_err(|e| PipelineError::StageFailed { source: e.into() })?
        .with_completion_timeout(config.scheduler.completion_timeout());
    if let Some(cancel) = control.cancel {
        pool = pool.with_cancellation(cancel.clone());
    }
    Ok(pool)
}

/// Explode every catalog root, one unit per root.
pub fn run_catalog(
    graph: &Arc<KitGraph>,
    config: &AppConfig,
    control: RunControl<'_>,
) -> Result<SchedulerReport<BreakoutRow>> {
    let units: Vec<WorkUnit<()>> = catalog_roots(graph, &config.catalog)
        .into_iter()
        .map(|root| WorkUnit::new(root.assembly_key.clone(), ()))
        .collect();
    tracing::info!("Exploding {} catalog roots", units.len());

    let pool = pool("explode", config.scheduler.explosion_workers, config, control)?;
    let graph = Arc::clone(graph);
    let report = pool
        .run_units(
            units,
            move |unit: &WorkUnit<()>, cancel: &CancellationToken| {
                let Some(root) = graph.get(&unit.key) else {
                    return Outcome::Completed(Vec::new());
                };
                explode(&graph, root, 1.0, &unit.key, cancel).map(|explosion| {
                    debug!(
                        assembly = %unit.key,
                        components = explosion.stats.components,
                        max_depth = explosion.stats.max_depth,
                        "Catalog root exploded"
                    );
                    explosion.rows
                })
            },
            control.observer,
        )
        .map_err(|e| PipelineError::StageFailed { source: e.into() })?;

    Ok(report)
}

/// Explode the kits on each order, one unit per order.
pub fn run_orders(
    graph: &Arc<KitGraph>,
    lines: Vec<LineItem>,
    config: &AppConfig,
    control: RunControl<'_>,
) -> Result<SchedulerReport<OrderBreakout>> {
    let layout = config.orders.layout();
    let units: Vec<WorkUnit<Vec<LineItem>>> = group_line_items(lines, &layout)
        .into_iter()
        .map(|(group_id, lines)| WorkUnit::new(group_id, lines))
        .collect();
    tracing::info!("Exploding kits on {} orders", units.len());

    let pool = pool("explode", config.scheduler.explosion_workers, config, control)?;
    let graph = Arc::clone(graph);
    let report = pool
        .run_units(
            units,
            move |unit: &WorkUnit<Vec<LineItem>>, cancel: &CancellationToken| {
                explode_order(&graph, &unit.key, &unit.payload, &layout, cancel).map(|breakout| {
                    debug!(
                        group = %unit.key,
                        rows = breakout.rows.len(),
                        totals = breakout.totals.len(),
                        "Order exploded"
                    );
                    vec![breakout]
                })
            },
            control.observer,
        )
        .map_err(|e| PipelineError::StageFailed { source: e.into() })?;

    Ok(report)
}

/// Filter each order's lines against the kits on that order, one unit per
/// order.
pub fn run_filter(
    graph: &Arc<KitGraph>,
    lines: Vec<LineItem>,
    config: &AppConfig,
    control: RunControl<'_>,
) -> Result<SchedulerReport<LineItem>> {
    let layout = config.orders.layout();
    let matcher = KeyMatcher::new(config.matching.mode);
    let units: Vec<WorkUnit<Vec<LineItem>>> = group_line_items(lines, &layout)
        .into_iter()
        .map(|(group_id, lines)| WorkUnit::new(group_id, lines))
        .collect();
    tracing::info!("Filtering {} orders", units.len());

    let pool = pool("filter", config.scheduler.filter_workers, config, control)?;
    let graph = Arc::clone(graph);
    let report = pool
        .run_units(
            units,
            move |unit: &WorkUnit<Vec<LineItem>>, cancel: &CancellationToken| {
                filter_lines(&unit.payload, &graph, &layout, matcher, cancel).map(|filtered| {
                    debug!(
                        group = %unit.key,
                        kit_lines = filtered.stats.kit_lines,
                        removed = filtered.stats.removed,
                        "Order filtered"
                    );
                    filtered.lines
                })
            },
            control.observer,
        )
        .map_err(|e| PipelineError::StageFailed { source: e.into() })?;

    Ok(report)
}
