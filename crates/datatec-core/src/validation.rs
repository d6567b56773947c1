//! # Save-Time Validation
//!
//! Blank-row filtering and the few hard validation rules applied before a
//! record is persisted. Most bad input in this system degrades to defaults;
//! only missing natural keys block a save.

use crate::error::ValidationError;
use crate::types::{ItemRecord, LineItem};

// =============================================================================
// Blank-Row Filtering
// =============================================================================

/// Removes blank rows in place before persistence.
///
/// Forms always render trailing empty rows; they must never reach storage.
pub fn strip_blank_items(items: &mut Vec<LineItem>) {
    items.retain(|item| !item.is_blank());
}

// =============================================================================
// Master Record Validation
// =============================================================================

/// An item master record needs a SKU; it is the list's natural key.
pub fn validate_item(item: &ItemRecord) -> Result<(), ValidationError> {
    if item.sku.trim().is_empty() {
        return Err(ValidationError::required("sku"));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_blank_items() {
        let mut items = vec![
            LineItem {
                sku: "A1".into(),
                qty: 1.0,
                ..Default::default()
            },
            LineItem::default(),
            LineItem {
                description: "unsold sample".into(),
                ..Default::default()
            },
            LineItem::default(),
        ];
        strip_blank_items(&mut items);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "A1");
        assert_eq!(items[1].description, "unsold sample");
    }

    #[test]
    fn test_item_requires_sku() {
        let item = ItemRecord {
            description: "Widget".into(),
            ..Default::default()
        };
        assert!(validate_item(&item).is_err());

        let item = ItemRecord {
            sku: "  ".into(),
            ..item
        };
        assert!(validate_item(&item).is_err());

        let item = ItemRecord {
            sku: "W-1".into(),
            ..item
        };
        assert!(validate_item(&item).is_ok());
    }
}
