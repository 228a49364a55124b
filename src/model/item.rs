//! Components referenced from a subassembly.

use serde::{Deserialize, Serialize};

/// Classify an item key as a nested kit.
///
/// A key denotes a subassembly when it contains a colon or the substring
/// "kit" in any letter case. This is the only place key syntax is inspected;
/// everything downstream reads [`AssemblyItem::is_subassembly`].
#[must_use]
pub fn is_subassembly_key(item_key: &str) -> bool {
    item_key.contains(':') || item_key.to_lowercase().contains("kit")
}

/// A single component reference inside a subassembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyItem {
    pub item_key: String,
    pub name: String,
    /// Quantity per one unit of the parent assembly, always >= 0
    pub quantity: f64,
    pub is_subassembly: bool,
}

impl AssemblyItem {
    /// Create an item, classifying the key.
    pub fn new(item_key: impl Into<String>, name: impl Into<String>, quantity: f64) -> Self {
        let item_key = item_key.into();
        let is_subassembly = is_subassembly_key(&item_key);
        Self {
            item_key,
            name: name.into(),
            quantity: sanitize(quantity),
            is_subassembly,
        }
    }
}

fn sanitize(quantity: f64) -> f64 {
    if quantity.is_finite() && quantity >= 0.0 {
        quantity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(is_subassembly_key("TENT:20X40"));
        assert!(is_subassembly_key("KIT-FRAME"));
        assert!(is_subassembly_key("frame-Kit"));
        assert!(is_subassembly_key("Skitter"));
        assert!(!is_subassembly_key("POLE-8FT"));
        assert!(!is_subassembly_key(""));
    }

    #[test]
    fn test_new_classifies_and_sanitizes() {
        let item = AssemblyItem::new("SUB:1", "Sub", f64::NAN);
        assert!(item.is_subassembly);
        assert_eq!(item.quantity, 0.0);

        let item = AssemblyItem::new("STAKE", "", -3.0);
        assert!(!item.is_subassembly);
        assert_eq!(item.quantity, 0.0);
    }
}
