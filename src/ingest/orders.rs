//! Order line-item tables.

use super::read_table;
use crate::config::OrdersConfig;
use crate::error::Result;
use crate::model::LineItem;
use std::path::Path;

/// An order table split into its header and line items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderTable {
    pub header: Option<LineItem>,
    pub lines: Vec<LineItem>,
}

impl OrderTable {
    /// Split raw rows, taking the first as header when `has_header` is set.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>, has_header: bool) -> Self {
        let mut rows = rows.into_iter().map(LineItem::new);
        let header = if has_header { rows.next() } else { None };
        Self {
            header,
            lines: rows.collect(),
        }
    }
}

/// Read an order line-item CSV.
///
/// # Errors
///
/// Propagates IO and CSV errors from [`read_table`].
pub fn read_order_table(path: &Path, config: &OrdersConfig) -> Result<OrderTable> {
    let rows = read_table(path)?;
    Ok(OrderTable::from_rows(rows, config.has_header))
}
