//! Order line items.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column positions of an order line-item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLayout {
    pub group_column: usize,
    pub item_key_column: usize,
    pub quantity_column: usize,
}

impl Default for OrderLayout {
    fn default() -> Self {
        Self {
            group_column: 0,
            item_key_column: 1,
            quantity_column: 2,
        }
    }
}

/// One order line, kept as the raw source fields so filtered output has the
/// same shape as the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItem {
    pub fields: Vec<String>,
}

impl LineItem {
    #[must_use]
    pub const fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Build a line from string slices.
    #[must_use]
    pub fn from_strs(fields: &[&str]) -> Self {
        Self::new(fields.iter().map(|s| (*s).to_string()).collect())
    }

    /// Field at `index`, or "" when the row is too short.
    #[must_use]
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    /// Trimmed item key.
    #[must_use]
    pub fn item_key(&self, layout: &OrderLayout) -> &str {
        self.field(layout.item_key_column).trim()
    }

    /// Trimmed group id.
    #[must_use]
    pub fn group_id(&self, layout: &OrderLayout) -> &str {
        self.field(layout.group_column).trim()
    }

    /// Raw ordered-quantity cell.
    #[must_use]
    pub fn quantity(&self, layout: &OrderLayout) -> &str {
        self.field(layout.quantity_column)
    }
}

/// Group line items by group id, keeping groups in first-appearance order
/// and lines in source order within each group.
#[must_use]
pub fn group_line_items(
    lines: impl IntoIterator<Item = LineItem>,
    layout: &OrderLayout,
) -> IndexMap<String, Vec<LineItem>> {
    let mut groups: IndexMap<String, Vec<LineItem>> = IndexMap::new();
    for line in lines {
        let key = line.group_id(layout).to_string();
        groups.entry(key).or_default().push(line);
    }
    groups
}
