//! Builds the kit graph from kit-definition rows.

use super::cycles::find_cycles;
use super::diagnostics::{BadQuantity, BuildDiagnostics, UnresolvedReference};
use super::kit_graph::KitGraph;
use crate::config::{CyclePolicy, GraphConfig, IngestConfig, InvalidRowPolicy};
use crate::error::{KitError, Result};
use crate::model::{parse_quantity, AssemblyItem, KitRow, Subassembly};
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

/// Turns flat kit-definition rows into a [`KitGraph`].
///
/// Rows with the same assembly key append to one node. After all rows are
/// consumed each node's items are ordered leaves first, nested assemblies are
/// marked as children, and cycles are handled per the configured policy.
#[derive(Debug, Clone)]
pub struct KitGraphBuilder<'a> {
    ingest: &'a IngestConfig,
    graph: &'a GraphConfig,
}

impl<'a> KitGraphBuilder<'a> {
    #[must_use]
    pub const fn new(ingest: &'a IngestConfig, graph: &'a GraphConfig) -> Self {
        Self { ingest, graph }
    }

    /// Build the graph from a raw kit-definition table.
    ///
    /// When `kits_have_header` is set the first row is skipped. Row numbers in
    /// errors and diagnostics are 1-based positions in `rows`.
    ///
    /// # Errors
    ///
    /// Returns [`KitError::Build`] for a structurally invalid row when the
    /// invalid-row policy is `abort`, and for a cycle when the cycle policy
    /// is `reject`.
    pub fn build(&self, rows: &[Vec<String>]) -> Result<(KitGraph, BuildDiagnostics)> {
        let mut diagnostics = BuildDiagnostics::default();
        let mut nodes: IndexMap<String, Subassembly> = IndexMap::new();

        let skip = usize::from(self.ingest.kits_have_header && !rows.is_empty());
        for (index, fields) in rows.iter().enumerate().skip(skip) {
            diagnostics.rows_read += 1;
            let Some(row) = self.accept_row(index + 1, fields, &mut diagnostics)? else {
                continue;
            };

            let quantity = parse_quantity(&row.quantity);
            if !quantity.valid {
                debug!(
                    row = row.row_number,
                    assembly = %row.assembly_key,
                    component = %row.component_key,
                    raw = %row.quantity,
                    "Unparsable quantity treated as 0"
                );
                diagnostics.bad_quantities.push(BadQuantity {
                    row_number: row.row_number,
                    assembly_key: row.assembly_key.clone(),
                    component_key: row.component_key.clone(),
                    raw: row.quantity.clone(),
                });
            }

            let item = AssemblyItem::new(row.component_key, row.component_name, quantity.value);
            match nodes.entry(row.assembly_key) {
                Entry::Occupied(mut entry) => entry.get_mut().add_item(item),
                Entry::Vacant(entry) => {
                    let key = entry.key().clone();
                    entry.insert(Subassembly::new(key, row.assembly_name, item));
                }
            }
        }

        for node in nodes.values_mut() {
            node.sort_items();
        }

        mark_children(&mut nodes, &mut diagnostics);

        let cycles = find_cycles(&nodes);
        if !cycles.is_empty() {
            match self.graph.cycle_policy {
                CyclePolicy::Reject => {
                    let path = cycles.into_iter().next().unwrap_or_default();
                    return Err(KitError::cycle(path));
                }
                CyclePolicy::Break => {
                    for path in &cycles {
                        warn!(cycle = %path.join(" -> "), "Kit cycle accepted; traversal stops at re-entry");
                    }
                    diagnostics.cycles = cycles;
                }
            }
        }

        info!(
            assemblies = nodes.len(),
            rows = diagnostics.rows_read,
            bad_quantities = diagnostics.bad_quantities.len(),
            unresolved_references = diagnostics.unresolved_references.len(),
            skipped_rows = diagnostics.skipped_rows.len(),
            "Kit graph built"
        );

        Ok((KitGraph::from_nodes(nodes), diagnostics))
    }

    /// Validate one row, applying the invalid-row policy and the ignored
    /// component prefixes. `Ok(None)` means the row is dropped.
    fn accept_row(
        &self,
        row_number: usize,
        fields: &[String],
        diagnostics: &mut BuildDiagnostics,
    ) -> Result<Option<KitRow>> {
        let row = match KitRow::from_fields(row_number, fields) {
            Ok(row) => row,
            Err(kind) => match self.ingest.invalid_rows {
                InvalidRowPolicy::Abort => {
                    return Err(KitError::invalid_row(kind));
                }
                InvalidRowPolicy::Skip => {
                    warn!("Skipping kit definition row: {kind}");
                    diagnostics.skipped_rows.push(kind);
                    return Ok(None);
                }
            },
        };

        if self.ingest.is_ignored_component(&row.component_key) {
            debug!(row = row_number, component = %row.component_key, "Ignored component");
            diagnostics.ignored_components += 1;
            return Ok(None);
        }

        Ok(Some(row))
    }
}

/// Flag every assembly listed as a nested kit by another, and record nested
/// kits that resolve to nothing.
fn mark_children(nodes: &mut IndexMap<String, Subassembly>, diagnostics: &mut BuildDiagnostics) {
    let mut children = Vec::new();
    for node in nodes.values() {
        for item in node.nested_kits() {
            if nodes.contains_key(item.item_key.as_str()) {
                children.push(item.item_key.clone());
            } else {
                debug!(
                    assembly = %node.assembly_key,
                    item = %item.item_key,
                    "Nested kit does not resolve; treated as a leaf"
                );
                diagnostics.unresolved_references.push(UnresolvedReference {
                    assembly_key: node.assembly_key.clone(),
                    item_key: item.item_key.clone(),
                });
            }
        }
    }

    for key in children {
        if let Some(child) = nodes.get_mut(key.as_str()) {
            child.is_child_subassembly = true;
        }
    }
}
