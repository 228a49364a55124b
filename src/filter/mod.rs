//! Order line filtering.
//!
//! When an order lists a kit and also lists pieces of that kit as separate
//! lines, the pieces would be counted twice. [`filter_lines`] removes them
//! using the kit graph.

mod engine;
mod matcher;

pub use engine::{filter_lines, FilterStats, FilteredLines};
pub use matcher::{normalize, KeyMatcher};
