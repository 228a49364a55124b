//! Kit graph construction and lookup.
//!
//! The graph maps each assembly key to a [`Subassembly`](crate::model::Subassembly)
//! holding its direct components. It is built once per run by
//! [`KitGraphBuilder`] and is read-only afterwards, so explosion and filter
//! workers share it without locking.

mod builder;
mod cycles;
mod diagnostics;
mod kit_graph;

pub use builder::KitGraphBuilder;
pub use cycles::find_cycles;
pub use diagnostics::{BadQuantity, BuildDiagnostics, UnresolvedReference};
pub use kit_graph::KitGraph;
