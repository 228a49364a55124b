//! Kit data model.
//!
//! Plain data types shared by the graph builder, the explosion and filter
//! engines, and the report writers. Nothing in here knows about threads or
//! configuration.

mod item;
mod lines;
mod quantity;
mod rows;
mod subassembly;

pub use item::{is_subassembly_key, AssemblyItem};
pub use lines::{group_line_items, LineItem, OrderLayout};
pub use quantity::{parse_quantity, Quantity};
pub use rows::{BreakoutRow, BreakoutRowKind, KitRow, TotalRow, KIT_ROW_FIELDS};
pub use subassembly::Subassembly;
