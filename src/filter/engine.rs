//! Removal of order lines already covered by a kit on the same order.

use super::matcher::{normalize, KeyMatcher};
use crate::graph::KitGraph;
use crate::model::{LineItem, OrderLayout};
use crate::scheduler::{CancellationToken, Outcome};
use serde::Serialize;
use tracing::debug;

/// What one filter pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub lines: usize,
    pub kit_lines: usize,
    pub removed: usize,
}

/// Lines kept after filtering, in their original relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredLines {
    pub lines: Vec<LineItem>,
    pub stats: FilterStats,
}

/// Drop every line whose item key matches a component reachable from a kit
/// line of the same group.
///
/// Kit lines are the lines whose trimmed item key names an assembly in
/// `graph`; they are found before any removal. Each kit then removes the
/// matching lines from the working copy, descending through nested kits.
/// A kit line is never removed by its own expansion, only by another kit's.
/// Running the filter again on its output removes nothing more.
pub fn filter_lines(
    lines: &[LineItem],
    graph: &KitGraph,
    layout: &OrderLayout,
    matcher: KeyMatcher,
    cancel: &CancellationToken,
) -> Outcome<FilteredLines> {
    let kit_lines: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| (index, line.item_key(layout)))
        .filter(|(_, key)| graph.contains(key))
        .collect();

    let line_keys: Vec<String> = lines
        .iter()
        .map(|line| normalize(line.item_key(layout)))
        .collect();
    let mut removed = vec![false; lines.len()];

    for &(kit_index, kit_key) in &kit_lines {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        let components: Vec<String> = graph
            .reachable_components(kit_key)
            .into_iter()
            .map(normalize)
            .collect();

        for (index, line_key) in line_keys.iter().enumerate() {
            if cancel.is_cancelled() {
                return Outcome::Cancelled;
            }
            if index == kit_index || removed[index] {
                continue;
            }
            if components
                .iter()
                .any(|component| matcher.matches_normalized(line_key, component))
            {
                debug!(kit = %kit_key, line = index, item = %line_key, "Line covered by kit");
                removed[index] = true;
            }
        }
    }

    let kept: Vec<LineItem> = lines
        .iter()
        .zip(&removed)
        .filter(|(_, &gone)| !gone)
        .map(|(line, _)| line.clone())
        .collect();

    Outcome::Completed(FilteredLines {
        stats: FilterStats {
            lines: lines.len(),
            kit_lines: kit_lines.len(),
            removed: lines.len() - kept.len(),
        },
        lines: kept,
    })
}
