//! Per-order explosion with a trailing totals section.

use super::engine::{explode_into, Explosion, ExplosionStats};
use crate::graph::KitGraph;
use crate::model::{parse_quantity, BreakoutRow, LineItem, OrderLayout, TotalRow};
use crate::scheduler::{CancellationToken, Outcome};
use serde::Serialize;
use tracing::debug;

/// Breakout of every kit ordered in one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBreakout {
    pub group_id: String,
    /// One root line plus its components for each kit line, in line order
    pub rows: Vec<BreakoutRow>,
    /// Grand totals across all kits of the order, sorted by item key; empty
    /// when the order has no kit lines or no leaves
    pub totals: Vec<TotalRow>,
    pub stats: ExplosionStats,
    /// Kit lines whose ordered quantity could not be parsed
    pub bad_quantities: usize,
}

impl OrderBreakout {
    /// Whether the order contained at least one kit line.
    #[must_use]
    pub fn has_kits(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// Explode the kits ordered in one group.
///
/// A line is a kit line when its trimmed item key names an assembly in
/// `graph`. Each kit is exploded with the line's ordered quantity as
/// multiplier; totals accumulate across all kits of the order.
pub fn explode_order(
    graph: &KitGraph,
    group_id: &str,
    lines: &[LineItem],
    layout: &OrderLayout,
    cancel: &CancellationToken,
) -> Outcome<OrderBreakout> {
    let mut explosion = Explosion::default();
    let mut bad_quantities = 0;

    for line in lines {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        let Some(kit) = graph.get(line.item_key(layout)) else {
            continue;
        };

        let quantity = parse_quantity(line.quantity(layout));
        if !quantity.valid {
            debug!(
                group = %group_id,
                kit = %kit.assembly_key,
                raw = %line.quantity(layout),
                "Unparsable ordered quantity treated as 0"
            );
            bad_quantities += 1;
        }

        if explode_into(graph, kit, quantity.value, group_id, cancel, &mut explosion)
            .is_cancelled()
        {
            return Outcome::Cancelled;
        }
    }

    let totals = explosion
        .totals
        .into_iter()
        .map(|(item_key, total_quantity)| TotalRow {
            group_id: group_id.to_string(),
            item_key,
            total_quantity,
        })
        .collect();

    Outcome::Completed(OrderBreakout {
        group_id: group_id.to_string(),
        rows: explosion.rows,
        totals,
        stats: explosion.stats,
        bad_quantities,
    })
}
