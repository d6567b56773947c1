//! # Record Types
//!
//! The persisted record types for the Datatec ERP.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Persisted Records                            │
//! │                                                                     │
//! │  Documents (one list per type, keyed by opaque id)                  │
//! │  ┌───────────┐ ┌────────────┐ ┌───────────────┐                     │
//! │  │ Quotation │ │ SalesOrder │ │ PurchaseOrder │                     │
//! │  └───────────┘ └────────────┘ └───────────────┘                     │
//! │  ┌─────────┐ ┌───────────────┐                                      │
//! │  │ Invoice │ │ DeliveryOrder │   each holds Vec<LineItem>           │
//! │  └─────────┘ └───────────────┘                                      │
//! │                                                                     │
//! │  Masters (keyed by natural key)                                     │
//! │  ┌──────────┐ ┌────────┐ ┌────────────┐                             │
//! │  │ Customer │ │ Vendor │ │ ItemRecord │                             │
//! │  │ (name)   │ │ (name) │ │ (sku)      │                             │
//! │  └──────────┘ └────────┘ └────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Shape Compatibility
//!
//! All types serialize with the camelCase field names the store already
//! contains (`linkedQuotationId`, `shippingTotal`, ...), so blobs written by
//! earlier revisions of the system keep loading. Deserialization is lenient
//! by design: every field carries a default, and numeric fields accept
//! numbers, numeric strings, or garbage (coerced to zero), so the store
//! boundary never trusts the stored shape.
//!
//! Dates are ISO `YYYY-MM-DD` strings; the empty string means "not set",
//! which is how the forms persist untouched date inputs.

use serde::{Deserialize, Deserializer, Serialize};

use crate::totals::{DocumentLines, DocumentTotals};

// =============================================================================
// Lenient Numeric Deserialization
// =============================================================================

/// Deserializes a numeric field from a number, a numeric string, or anything
/// else (coerced to zero). Stored blobs predate the typed schema and carry
/// whatever the old forms wrote.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0.0),
        Raw::Other(_) => 0.0,
    })
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a document: a quantity of a SKU at a price and tax rate.
///
/// `tax` is a percentage (6.0 = 6%), not a fraction. `vendor` is only used
/// on sales orders (to drive purchase-order vendor filtering) and is omitted
/// from the serialized form when empty, matching the stored shape of the
/// other document types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    pub sku: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub qty: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vendor: String,
}

impl LineItem {
    /// A row with no SKU, no description, no vendor, and all numeric fields
    /// zero is blank and excluded from persistence.
    pub fn is_blank(&self) -> bool {
        self.sku.is_empty()
            && self.description.is_empty()
            && self.vendor.is_empty()
            && self.qty == 0.0
            && self.price == 0.0
            && self.tax == 0.0
    }
}

// =============================================================================
// Statuses
// =============================================================================

/// Sales order fulfilment status.
///
/// Invoices and delivery orders may be created from a sales order in any
/// status; a non-`Completed` source only triggers a confirmation warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

/// Invoice payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
}

// =============================================================================
// Record Identity
// =============================================================================

/// Records that live in an id-keyed list.
///
/// Every document carries an opaque unique `id` (UUID v4) alongside its
/// human-readable sequential `number`; the repository upserts and deletes
/// by `id` only.
pub trait Keyed {
    fn record_id(&self) -> &str;
}

macro_rules! impl_keyed {
    ($($ty:ty),+) => {
        $(impl Keyed for $ty {
            fn record_id(&self) -> &str {
                &self.id
            }
        })+
    };
}

impl_keyed!(Quotation, SalesOrder, PurchaseOrder, Invoice, DeliveryOrder, ItemRecord);

macro_rules! impl_document_lines {
    ($($ty:ty),+) => {
        $(impl DocumentLines for $ty {
            fn items(&self) -> &[LineItem] {
                &self.items
            }
            fn items_mut(&mut self) -> &mut Vec<LineItem> {
                &mut self.items
            }
            fn shipping_total(&self) -> f64 {
                self.shipping_total
            }
            fn rounding(&self) -> f64 {
                self.rounding
            }
            fn set_totals(&mut self, totals: DocumentTotals) {
                self.subtotal = totals.subtotal;
                self.tax_total = totals.tax_total;
                self.grand_total = totals.grand_total;
            }
        })+
    };
}

impl_document_lines!(Quotation, SalesOrder, PurchaseOrder, Invoice, DeliveryOrder);

// =============================================================================
// Documents
// =============================================================================

/// A customer quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quotation {
    pub id: String,
    /// Human-readable sequential number, e.g. `QN251000`.
    pub number: String,
    pub date: String,
    pub currency: String,
    pub customer: String,
    pub attention: String,
    pub email: String,
    pub billing: String,
    pub shipping: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_scheme: f64,
    pub payment_terms: String,
    /// Validity/expiry date, defaulted to 30 days from creation.
    pub validity: String,
    pub salesperson: String,
    pub remarks: String,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient_f64")]
    pub shipping_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rounding: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub grand_total: f64,
}

/// A sales order, usually derived from a quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesOrder {
    pub id: String,
    /// E.g. `SO255000` (year-prefixed sequence).
    pub number: String,
    pub date: String,
    pub delivery_date: String,
    pub customer: String,
    pub attention: String,
    pub email: String,
    pub billing: String,
    pub shipping: String,
    pub currency: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_scheme: f64,
    pub status: SalesOrderStatus,
    pub notes: String,
    /// Free-form reference carried forward onto invoices and delivery orders.
    pub source: String,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient_f64")]
    pub shipping_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rounding: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub grand_total: f64,
    /// Weak reference to the source quotation (no cascade on delete).
    pub linked_quotation_id: String,
}

/// A purchase order raised against a vendor, optionally linked to the
/// sales order it fulfils.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: String,
    /// E.g. `PO255000` (year-prefixed sequence).
    pub number: String,
    pub date: String,
    pub expected_date: String,
    pub vendor: String,
    pub ship_to: String,
    pub terms: String,
    pub currency: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_scheme: f64,
    /// Weak reference to the fulfilled sales order.
    pub linked_sales_order_id: String,
    /// Denormalized SO number, resolved at save time for printing.
    pub linked_sales_order_number: String,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient_f64")]
    pub shipping_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rounding: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub grand_total: f64,
}

/// A customer invoice, usually derived from a sales order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// E.g. `INV255000` (year-prefixed sequence).
    pub number: String,
    pub date: String,
    /// Due date = date + N days, where N is parsed from `payment_terms`.
    pub due_date: String,
    pub so_id: String,
    pub so_number: String,
    pub customer: String,
    pub attention: String,
    pub email: String,
    pub billing: String,
    pub shipping: String,
    pub currency: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_scheme: f64,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient_f64")]
    pub shipping_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rounding: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub grand_total: f64,
    pub source: String,
    pub status: InvoiceStatus,
    pub payment_terms: String,
}

/// A delivery order, derived from a sales order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeliveryOrder {
    pub id: String,
    /// E.g. `DO800` (plain sequence, not year-prefixed).
    pub number: String,
    pub date: String,
    pub so_id: String,
    pub so_number: String,
    pub customer: String,
    pub billing: String,
    pub shipping: String,
    pub currency: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_scheme: f64,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient_f64")]
    pub shipping_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rounding: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_total: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub grand_total: f64,
}

// =============================================================================
// Master Records
// =============================================================================

/// A customer master record, keyed by name.
///
/// Upserted whenever a document names a customer; mutable fields follow the
/// most recently saved document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub attention: String,
    pub email: String,
    pub billing: String,
    pub shipping: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_scheme: f64,
    pub payment_terms: String,
}

/// A vendor master record, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vendor {
    pub name: String,
}

/// An inventory item master record, keyed by SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub sku: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax: f64,
    pub vendor: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_item() {
        assert!(LineItem::default().is_blank());

        let item = LineItem {
            sku: "A1".into(),
            ..Default::default()
        };
        assert!(!item.is_blank());

        let item = LineItem {
            qty: 1.0,
            ..Default::default()
        };
        assert!(!item.is_blank());
    }

    #[test]
    fn test_camel_case_field_names() {
        let so = SalesOrder {
            id: "x".into(),
            linked_quotation_id: "q1".into(),
            shipping_total: 5.0,
            ..Default::default()
        };
        let json = serde_json::to_value(&so).unwrap();
        assert_eq!(json["linkedQuotationId"], "q1");
        assert_eq!(json["shippingTotal"], 5.0);
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn test_deserialize_sparse_blob() {
        // Records written by older revisions miss fields entirely.
        let q: Quotation = serde_json::from_str(r#"{"id":"q1","number":"QN251000"}"#).unwrap();
        assert_eq!(q.id, "q1");
        assert_eq!(q.customer, "");
        assert_eq!(q.shipping_total, 0.0);
        assert!(q.items.is_empty());
    }

    #[test]
    fn test_lenient_numeric_coercion() {
        // Numeric strings parse; garbage and nulls coerce to zero.
        let item: LineItem = serde_json::from_str(
            r#"{"sku":"A1","qty":"2","price":"abc","tax":null}"#,
        )
        .unwrap();
        assert_eq!(item.qty, 2.0);
        assert_eq!(item.price, 0.0);
        assert_eq!(item.tax, 0.0);
    }

    #[test]
    fn test_vendor_omitted_when_empty() {
        let item = LineItem {
            sku: "A1".into(),
            qty: 1.0,
            ..Default::default()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("vendor").is_none());

        let item = LineItem {
            vendor: "Acme".into(),
            ..item
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["vendor"], "Acme");
    }
}
