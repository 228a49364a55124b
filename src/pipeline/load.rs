//! Input loading stage.

use super::PipelineError;
use crate::config::AppConfig;
use crate::error::{IngestErrorKind, KitError};
use crate::graph::{BuildDiagnostics, KitGraph, KitGraphBuilder};
use crate::ingest::{read_order_table, read_table, OrderTable};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// A frozen kit graph ready to be shared with workers.
#[derive(Debug, Clone)]
pub struct LoadedKits {
    pub graph: Arc<KitGraph>,
    pub diagnostics: BuildDiagnostics,
}

/// Read the kit-definition table and build the graph.
pub fn load_kit_graph(path: &Path, config: &AppConfig, quiet: bool) -> Result<LoadedKits> {
    if !quiet {
        tracing::info!("Loading kit definitions: {}", path.display());
    }

    let load = || -> crate::error::Result<(KitGraph, BuildDiagnostics)> {
        let rows = read_table(path)?;
        if rows.is_empty() {
            return Err(KitError::ingest(
                "kit definition table",
                IngestErrorKind::EmptyTable,
            ));
        }
        KitGraphBuilder::new(&config.ingest, &config.graph).build(&rows)
    };

    let (graph, diagnostics) = load().map_err(|e| PipelineError::LoadFailed {
        path: path.display().to_string(),
        source: e.into(),
    })?;

    if !quiet && diagnostics.has_findings() {
        tracing::warn!(
            skipped_rows = diagnostics.skipped_rows.len(),
            bad_quantities = diagnostics.bad_quantities.len(),
            unresolved_references = diagnostics.unresolved_references.len(),
            cycles = diagnostics.cycles.len(),
            "Kit definitions have data-quality findings"
        );
    }

    Ok(LoadedKits {
        graph: Arc::new(graph),
        diagnostics,
    })
}

/// Read the order line-item table.
pub fn load_orders(path: &Path, config: &AppConfig, quiet: bool) -> Result<OrderTable> {
    if !quiet {
        tracing::info!("Loading order lines: {}", path.display());
    }
    let table = read_order_table(path, &config.orders).map_err(|e| PipelineError::LoadFailed {
        path: path.display().to_string(),
        source: e.into(),
    })?;
    if !quiet {
        tracing::info!("Loaded {} order lines", table.lines.len());
    }
    Ok(table)
}
