//! # Document Numbering
//!
//! Sequential numbering rules per document type.
//!
//! ## Numbering Scheme
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Document Numbers                                │
//! │                                                                     │
//! │  type            prefix  counter key                    first seq  │
//! │  ─────────────   ──────  ───────────────────────────    ─────────  │
//! │  quotation       QN      datatec_counter_quotation        251000   │
//! │  salesOrder      SO      datatec_counter_salesOrder_YY    YY5000   │
//! │  purchaseOrder   PO      datatec_counter_purchaseOrder_YY YY5000   │
//! │  invoice         INV     datatec_counter_invoice_YY       YY5000   │
//! │  deliveryOrder   DO      datatec_counter_deliveryOrder       800   │
//! │                                                                     │
//! │  number = prefix + decimal sequence, no zero padding                │
//! │  e.g. QN251000, SO255000, INV255023, DO812                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Year-scoped types embed the two-digit year into both the counter key and
//! the base, so sequences restart each calendar year without any reset job.
//! Quotations and delivery orders run on a single unscoped counter; their
//! keys and bases are frozen contracts shared with existing stored data.

use serde::{Deserialize, Serialize};

// =============================================================================
// Document Type
// =============================================================================

/// The five numbered document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Quotation,
    SalesOrder,
    PurchaseOrder,
    Invoice,
    DeliveryOrder,
}

impl DocumentType {
    /// Number prefix, e.g. `QN` for quotations.
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentType::Quotation => "QN",
            DocumentType::SalesOrder => "SO",
            DocumentType::PurchaseOrder => "PO",
            DocumentType::Invoice => "INV",
            DocumentType::DeliveryOrder => "DO",
        }
    }

    /// camelCase type name used in counter keys.
    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentType::Quotation => "quotation",
            DocumentType::SalesOrder => "salesOrder",
            DocumentType::PurchaseOrder => "purchaseOrder",
            DocumentType::Invoice => "invoice",
            DocumentType::DeliveryOrder => "deliveryOrder",
        }
    }

    /// True for types whose counters restart each calendar year.
    pub fn year_scoped(&self) -> bool {
        matches!(
            self,
            DocumentType::SalesOrder | DocumentType::PurchaseOrder | DocumentType::Invoice
        )
    }

    /// Store key of this type's counter for the given calendar year.
    ///
    /// Year-scoped types get a fresh key per year (`datatec_counter_invoice_26`);
    /// the others use one fixed key forever.
    pub fn counter_key(&self, year: i32) -> String {
        if self.year_scoped() {
            format!("datatec_counter_{}_{:02}", self.type_name(), two_digit_year(year))
        } else {
            format!("datatec_counter_{}", self.type_name())
        }
    }

    /// First sequence value of a fresh counter for the given year.
    pub fn base(&self, year: i32) -> i64 {
        match self {
            DocumentType::Quotation => 251_000,
            DocumentType::DeliveryOrder => 800,
            // YY5000: year 2025 → 255000, year 2026 → 265000
            _ => i64::from(two_digit_year(year)) * 10_000 + 5_000,
        }
    }

    /// Renders a sequence value as a document number, e.g. `INV255023`.
    pub fn format_number(&self, seq: i64) -> String {
        format!("{}{}", self.prefix(), seq)
    }
}

fn two_digit_year(year: i32) -> i32 {
    year.rem_euclid(100)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_keys() {
        assert_eq!(
            DocumentType::Quotation.counter_key(2025),
            "datatec_counter_quotation"
        );
        assert_eq!(
            DocumentType::DeliveryOrder.counter_key(2025),
            "datatec_counter_deliveryOrder"
        );
        assert_eq!(
            DocumentType::SalesOrder.counter_key(2025),
            "datatec_counter_salesOrder_25"
        );
        assert_eq!(
            DocumentType::Invoice.counter_key(2026),
            "datatec_counter_invoice_26"
        );
        assert_eq!(
            DocumentType::PurchaseOrder.counter_key(2025),
            "datatec_counter_purchaseOrder_25"
        );
    }

    #[test]
    fn test_single_digit_year_pads_key() {
        assert_eq!(
            DocumentType::Invoice.counter_key(2107),
            "datatec_counter_invoice_07"
        );
    }

    #[test]
    fn test_bases() {
        assert_eq!(DocumentType::Quotation.base(2025), 251_000);
        assert_eq!(DocumentType::DeliveryOrder.base(2025), 800);
        assert_eq!(DocumentType::SalesOrder.base(2025), 255_000);
        assert_eq!(DocumentType::Invoice.base(2026), 265_000);
        assert_eq!(DocumentType::PurchaseOrder.base(2030), 305_000);
    }

    #[test]
    fn test_format_number_has_no_padding() {
        assert_eq!(DocumentType::Quotation.format_number(251_000), "QN251000");
        assert_eq!(DocumentType::DeliveryOrder.format_number(800), "DO800");
        assert_eq!(DocumentType::Invoice.format_number(255_023), "INV255023");
    }
}
