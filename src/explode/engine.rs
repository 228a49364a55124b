//! Depth-first kit explosion with an explicit stack.

use crate::graph::KitGraph;
use crate::model::{BreakoutRow, BreakoutRowKind, Subassembly};
use crate::scheduler::{CancellationToken, Outcome};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Counters for one explosion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExplosionStats {
    /// Component rows emitted (root rows excluded)
    pub components: usize,
    pub max_depth: usize,
    /// Nested kits with no definition, counted as leaves
    pub unresolved: usize,
    /// Nested kits not descended into because they were already on the path
    pub cycle_breaks: usize,
}

/// Rows and grand totals of one or more explosions into the same group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explosion {
    pub rows: Vec<BreakoutRow>,
    /// Leaf item key to summed total quantity, sorted by key
    pub totals: BTreeMap<String, f64>,
    pub stats: ExplosionStats,
}

struct Frame<'g> {
    node: &'g Subassembly,
    next: usize,
    multiplier: f64,
    depth: usize,
}

/// Explode `root` with `multiplier`, labelling every row with `group_id`.
///
/// Emits the root line first, then one row per component occurrence in
/// depth-first order, visiting each node's items in their stored order
/// (leaves before nested kits). A nested kit's row is emitted before its own
/// components. Totals sum leaf quantities across all paths; a nested kit that
/// does not resolve in `graph` counts as a leaf. A nested kit that is already
/// on the current path gets its row but is not descended into.
///
/// A negative or non-finite multiplier is treated as 0.
pub fn explode(
    graph: &KitGraph,
    root: &Subassembly,
    multiplier: f64,
    group_id: &str,
    cancel: &CancellationToken,
) -> Outcome<Explosion> {
    let mut explosion = Explosion::default();
    match explode_into(graph, root, multiplier, group_id, cancel, &mut explosion) {
        Outcome::Completed(()) => Outcome::Completed(explosion),
        Outcome::Cancelled => Outcome::Cancelled,
    }
}

/// Like [`explode`], but appends to an existing explosion so that several
/// kits of one group share a grand-total map.
pub fn explode_into(
    graph: &KitGraph,
    root: &Subassembly,
    multiplier: f64,
    group_id: &str,
    cancel: &CancellationToken,
    out: &mut Explosion,
) -> Outcome<()> {
    if cancel.is_cancelled() {
        return Outcome::Cancelled;
    }
    let multiplier = if multiplier.is_finite() && multiplier >= 0.0 {
        multiplier
    } else {
        0.0
    };

    out.rows.push(BreakoutRow {
        group_id: group_id.to_string(),
        parent_key: root.assembly_key.clone(),
        subassembly_key: root.assembly_key.clone(),
        item_key: root.assembly_key.clone(),
        item_name: root.name.clone(),
        unit_quantity: multiplier,
        total_quantity: multiplier,
        depth: 0,
        kind: BreakoutRowKind::Root,
    });

    let mut stack = vec![Frame {
        node: root,
        next: 0,
        multiplier,
        depth: 1,
    }];

    while let Some(frame) = stack.last_mut() {
        if cancel.is_cancelled() {
            debug!(group = %group_id, assembly = %root.assembly_key, "Explosion cancelled");
            return Outcome::Cancelled;
        }

        let node: &Subassembly = frame.node;
        let Some(item) = node.items.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let depth = frame.depth;
        let total = item.quantity * frame.multiplier;

        out.rows.push(BreakoutRow {
            group_id: group_id.to_string(),
            parent_key: root.assembly_key.clone(),
            subassembly_key: node.assembly_key.clone(),
            item_key: item.item_key.clone(),
            item_name: item.name.clone(),
            unit_quantity: item.quantity,
            total_quantity: total,
            depth,
            kind: BreakoutRowKind::Component,
        });
        out.stats.components += 1;
        out.stats.max_depth = out.stats.max_depth.max(depth);

        let child = if item.is_subassembly {
            graph.get(&item.item_key)
        } else {
            None
        };
        match child {
            Some(child) => {
                if stack
                    .iter()
                    .any(|open| open.node.assembly_key == child.assembly_key)
                {
                    debug!(
                        group = %group_id,
                        assembly = %node.assembly_key,
                        item = %item.item_key,
                        "Nested kit already on path; not descending"
                    );
                    out.stats.cycle_breaks += 1;
                } else {
                    stack.push(Frame {
                        node: child,
                        next: 0,
                        multiplier: total,
                        depth: depth + 1,
                    });
                }
            }
            None => {
                if item.is_subassembly {
                    out.stats.unresolved += 1;
                }
                *out.totals.entry(item.item_key.clone()).or_insert(0.0) += total;
            }
        }
    }

    Outcome::Completed(())
}
