//! Kit graph nodes.

use super::AssemblyItem;
use serde::{Deserialize, Serialize};

/// A node in the kit graph: one assembly and its direct components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subassembly {
    pub assembly_key: String,
    pub name: String,
    pub items: Vec<AssemblyItem>,
    /// Set when another assembly lists this one as a nested kit
    pub is_child_subassembly: bool,
}

impl Subassembly {
    /// Create a node holding a single first item.
    pub fn new(assembly_key: impl Into<String>, name: impl Into<String>, item: AssemblyItem) -> Self {
        Self::with_items(assembly_key, name, vec![item])
    }

    /// Create a node from a list of items.
    pub fn with_items(
        assembly_key: impl Into<String>,
        name: impl Into<String>,
        items: Vec<AssemblyItem>,
    ) -> Self {
        Self {
            assembly_key: assembly_key.into(),
            name: name.into(),
            items,
            is_child_subassembly: false,
        }
    }

    pub fn add_item(&mut self, item: AssemblyItem) {
        self.items.push(item);
    }

    /// Order items leaves first. The sort is stable, so source order is kept
    /// within the leaf group and within the nested-kit group.
    pub fn sort_items(&mut self) {
        self.items.sort_by_key(|item| item.is_subassembly);
    }

    /// Nested-kit items, in item order.
    pub fn nested_kits(&self) -> impl Iterator<Item = &AssemblyItem> {
        self.items.iter().filter(|item| item.is_subassembly)
    }
}
