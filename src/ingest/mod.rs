//! Tabular input.
//!
//! Reads kit-definition and order line-item tables from CSV into plain rows
//! of string fields. Everything downstream works on those rows, so any other
//! tabular source can feed the builder and engines directly.

mod orders;

pub use orders::{read_order_table, OrderTable};

use crate::error::{ErrorContext, KitError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a CSV file into rows of fields. The header, if any, is returned as
/// the first row; blank lines are skipped and rows may differ in length.
///
/// # Errors
///
/// Returns [`KitError::Io`] if the file cannot be opened and
/// [`KitError::Ingest`] if it is not valid CSV.
pub fn read_table(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|e| KitError::io(path, e))?;
    read_table_from(file).with_context(|| format!("reading {}", path.display()))
}

/// Read CSV rows from any reader.
///
/// # Errors
///
/// Returns [`KitError::Ingest`] on malformed CSV or invalid UTF-8.
pub fn read_table_from(reader: impl Read) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    // Spreadsheet exports often start with a byte-order mark.
    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    Ok(rows)
}

/// Parse CSV text into rows.
///
/// # Errors
///
/// Returns [`KitError::Ingest`] on malformed CSV.
pub fn parse_table_str(text: &str) -> Result<Vec<Vec<String>>> {
    read_table_from(text.as_bytes())
}
