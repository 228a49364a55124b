//! Data-quality findings collected while building the graph.

use crate::error::BuildErrorKind;

/// A quantity cell that could not be parsed and was coerced to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadQuantity {
    pub row_number: usize,
    pub assembly_key: String,
    pub component_key: String,
    pub raw: String,
}

/// A nested-kit item whose key names no assembly in the graph.
///
/// Explosion treats such an item as a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub assembly_key: String,
    pub item_key: String,
}

/// Build summary. None of these conditions stop a build on their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDiagnostics {
    /// Data rows examined, header excluded
    pub rows_read: usize,
    /// Structural errors for rows that were skipped
    pub skipped_rows: Vec<BuildErrorKind>,
    /// Rows dropped because the component key has an ignored prefix
    pub ignored_components: usize,
    pub bad_quantities: Vec<BadQuantity>,
    pub unresolved_references: Vec<UnresolvedReference>,
    /// Cycles accepted under the `break` cycle policy
    pub cycles: Vec<Vec<String>>,
}

impl BuildDiagnostics {
    /// Whether anything worth reporting was found.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.skipped_rows.is_empty()
            || !self.bad_quantities.is_empty()
            || !self.unresolved_references.is_empty()
            || !self.cycles.is_empty()
    }
}
