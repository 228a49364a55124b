//! Whole-catalog explosion.

use super::engine::{explode, Explosion};
use crate::config::CatalogConfig;
use crate::graph::KitGraph;
use crate::model::Subassembly;
use crate::scheduler::{CancellationToken, Outcome};

/// Assemblies exploded by a catalog run, in graph order.
///
/// Only top-level kits are roots unless `include_child_assemblies` is set, in
/// which case every assembly is.
pub fn catalog_roots<'g>(
    graph: &'g KitGraph,
    config: &CatalogConfig,
) -> Vec<&'g Subassembly> {
    if config.include_child_assemblies {
        graph.assemblies().collect()
    } else {
        graph.top_level().collect()
    }
}

/// Explode every catalog root once with multiplier 1, each under its own
/// assembly key as group id.
///
/// Single-threaded; the pipeline runs the same per-root work on a worker pool.
pub fn explode_catalog(
    graph: &KitGraph,
    config: &CatalogConfig,
    cancel: &CancellationToken,
) -> Outcome<Vec<Explosion>> {
    let mut explosions = Vec::new();
    for root in catalog_roots(graph, config) {
        match explode(graph, root, 1.0, &root.assembly_key, cancel) {
            Outcome::Completed(explosion) => explosions.push(explosion),
            Outcome::Cancelled => return Outcome::Cancelled,
        }
    }
    Outcome::Completed(explosions)
}
