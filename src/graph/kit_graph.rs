//! The frozen kit graph.

use crate::model::Subassembly;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// Immutable mapping from assembly key to its node.
///
/// Assemblies keep the order in which their first definition row appeared,
/// which makes whole-catalog output deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitGraph {
    nodes: IndexMap<String, Subassembly>,
}

impl KitGraph {
    pub(crate) fn from_nodes(nodes: IndexMap<String, Subassembly>) -> Self {
        Self { nodes }
    }

    /// Look up an assembly by its exact key.
    #[must_use]
    pub fn get(&self, assembly_key: &str) -> Option<&Subassembly> {
        self.nodes.get(assembly_key)
    }

    #[must_use]
    pub fn contains(&self, assembly_key: &str) -> bool {
        self.nodes.contains_key(assembly_key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All assemblies, in first-seen order.
    pub fn assemblies(&self) -> impl Iterator<Item = &Subassembly> {
        self.nodes.values()
    }

    /// Assemblies that no other assembly lists as a nested kit.
    pub fn top_level(&self) -> impl Iterator<Item = &Subassembly> {
        self.nodes.values().filter(|node| !node.is_child_subassembly)
    }

    /// Every component key reachable from `assembly_key`, descending through
    /// resolved nested kits.
    ///
    /// Each assembly is expanded at most once, so cyclic graphs terminate.
    /// Keys are returned once each, in discovery order. An unknown assembly
    /// yields an empty set.
    #[must_use]
    pub fn reachable_components<'a>(&'a self, assembly_key: &'a str) -> IndexSet<&'a str> {
        let mut reachable = IndexSet::new();
        let mut expanded: HashSet<&str> = HashSet::new();
        let mut pending = vec![assembly_key];

        while let Some(key) = pending.pop() {
            if !expanded.insert(key) {
                continue;
            }
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            for item in &node.items {
                reachable.insert(item.item_key.as_str());
                if item.is_subassembly && self.nodes.contains_key(item.item_key.as_str()) {
                    pending.push(item.item_key.as_str());
                }
            }
        }

        reachable
    }
}
