//! **Multi-level kit explosion and order reconciliation.**
//!
//! `kit-breakout` reads a flat kit-definition table (assembly, component,
//! quantity) and turns it into a graph of kits whose components may themselves
//! be kits. On top of that graph it offers two operations:
//!
//! - **Explosion**: expand a kit, recursively, into every component row with
//!   the quantity multiplied along the path, plus grand totals per leaf part.
//!   Works over the whole catalog (one group per top-level kit) or per order
//!   (one group per order, multiplied by the ordered kit quantity).
//! - **Filtering**: drop order lines whose item is already supplied by a kit
//!   ordered on the same order, so nothing is shipped twice.
//!
//! Both run on a bounded worker pool with cooperative cancellation, progress
//! reporting and an optional completion timeout.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: input rows, the [`Subassembly`] node and the output rows.
//! - **[`graph`]**: [`KitGraphBuilder`] turns raw rows into an immutable
//!   [`KitGraph`], reporting data-quality findings in [`BuildDiagnostics`].
//! - **[`explode`]**: single-threaded explosion of one kit, one order or the
//!   whole catalog.
//! - **[`filter`]**: removal of kit-supplied order lines.
//! - **[`scheduler`]**: the [`WorkerPool`] that fans units out over threads.
//! - **[`pipeline`]**: load → run → report composition used by the CLI.
//! - **[`reports`]**: CSV and JSON renderers.
//!
//! ## Getting Started
//!
//! ```no_run
//! use kit_breakout::config::AppConfig;
//! use kit_breakout::explode::explode;
//! use kit_breakout::graph::KitGraphBuilder;
//! use kit_breakout::ingest::read_table;
//! use kit_breakout::scheduler::CancellationToken;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let rows = read_table(Path::new("kits.csv"))?;
//!     let (graph, diagnostics) = KitGraphBuilder::new(&config.ingest, &config.graph).build(&rows)?;
//!     println!("{} kits, {} bad quantities", graph.len(), diagnostics.bad_quantities.len());
//!
//!     if let Some(kit) = graph.get("KIT-100") {
//!         let cancel = CancellationToken::new();
//!         if let Some(explosion) = explode(&graph, kit, 2.0, "SO-1", &cancel).completed() {
//!             for (item, total) in &explosion.totals {
//!                 println!("{item}: {total}");
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Quantities are f64 and row counts usize; progress math mixes the two
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod explode;
pub mod filter;
pub mod graph;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod scheduler;

// Re-export main types for convenience
pub use config::{
    AppConfig, AppConfigBuilder, ConfigError, CyclePolicy, KeyMatchMode, Validatable,
};
pub use error::{ErrorContext, KitError, Result};
pub use explode::{explode, explode_catalog, explode_order, Explosion, OrderBreakout};
pub use filter::{filter_lines, FilteredLines, KeyMatcher};
pub use graph::{BuildDiagnostics, KitGraph, KitGraphBuilder};
pub use model::{AssemblyItem, BreakoutRow, LineItem, OrderLayout, Subassembly, TotalRow};
pub use reports::{ReportFormat, ReportGenerator};
pub use scheduler::{CancellationToken, Outcome, SchedulerReport, WorkUnit, WorkerPool};
