//! Input and output row shapes.

use crate::error::{BuildErrorKind, OffendingRow};
use serde::{Deserialize, Serialize};

/// Number of fields in a kit-definition row.
pub const KIT_ROW_FIELDS: usize = 6;

/// A validated kit-definition row.
///
/// Field order in the source table: assembly key, assembly name, kit number,
/// quantity, component item key, component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitRow {
    pub row_number: usize,
    pub assembly_key: String,
    pub assembly_name: String,
    /// Carried through for diagnostics only
    pub kit_number: String,
    pub quantity: String,
    pub component_key: String,
    pub component_name: String,
}

impl KitRow {
    /// Validate the shape of a raw row.
    ///
    /// Extra trailing fields are ignored. A row with fewer than six fields, a
    /// blank assembly key or a blank component key is a structural error.
    pub fn from_fields(row_number: usize, fields: &[String]) -> Result<Self, BuildErrorKind> {
        if fields.len() < KIT_ROW_FIELDS {
            return Err(BuildErrorKind::ShortRow {
                expected: KIT_ROW_FIELDS,
                found: fields.len(),
                row: OffendingRow::new(row_number, fields),
            });
        }

        let assembly_key = fields[0].trim();
        if assembly_key.is_empty() {
            return Err(BuildErrorKind::MissingField {
                field: "assembly key".to_string(),
                row: OffendingRow::new(row_number, fields),
            });
        }
        let component_key = fields[4].trim();
        if component_key.is_empty() {
            return Err(BuildErrorKind::MissingField {
                field: "component item key".to_string(),
                row: OffendingRow::new(row_number, fields),
            });
        }

        Ok(Self {
            row_number,
            assembly_key: assembly_key.to_string(),
            assembly_name: fields[1].trim().to_string(),
            kit_number: fields[2].trim().to_string(),
            quantity: fields[3].clone(),
            component_key: component_key.to_string(),
            component_name: fields[5].trim().to_string(),
        })
    }
}

/// Distinguishes the synthetic line for the exploded kit itself from the
/// component lines beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakoutRowKind {
    Root,
    Component,
}

/// One emitted record of an explosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutRow {
    /// Contract/order id, or the root assembly key for catalog explosions
    pub group_id: String,
    /// The assembly the explosion started from
    pub parent_key: String,
    /// The assembly that directly lists `item_key`
    pub subassembly_key: String,
    pub item_key: String,
    pub item_name: String,
    pub unit_quantity: f64,
    /// `unit_quantity` times the product of quantities from the root down to
    /// `subassembly_key` (and the root multiplier)
    pub total_quantity: f64,
    /// 0 for the root line, 1 for its direct components, and so on
    pub depth: usize,
    pub kind: BreakoutRowKind,
}

/// A grand-total line: one distinct leaf item of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalRow {
    pub group_id: String,
    pub item_key: String,
    pub total_quantity: f64,
}
