//! # Document Derivation
//!
//! Pure conversion of one document into the next along the sales chain.
//!
//! ## Conversion Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Document Conversion Chain                       │
//! │                                                                     │
//! │   Quotation ──────► Sales Order ──┬──► Purchase Order (per vendor)  │
//! │                                   ├──► Invoice                      │
//! │                                   └──► Delivery Order               │
//! │                                                                     │
//! │  • each conversion produces a NEW document with its own id/number   │
//! │  • the source is never mutated; links are weak references           │
//! │  • deriving from a non-Completed SO yields a warning, not an error  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller supplies the fresh id, the allocated number, and today's date,
//! keeping every function here deterministic and clock-free.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::totals::recompute;
use crate::types::{
    DeliveryOrder, Invoice, LineItem, PurchaseOrder, Quotation, SalesOrder, SalesOrderStatus,
};
use crate::{DEFAULT_PAYMENT_TERMS, DEFAULT_TERMS_DAYS};

// =============================================================================
// Conversion Result
// =============================================================================

/// A derived document plus any non-blocking warning the caller should
/// surface before committing.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion<T> {
    pub document: T,
    pub warning: Option<ConversionWarning>,
}

impl<T> Conversion<T> {
    fn with_warning(document: T, warning: Option<ConversionWarning>) -> Self {
        Conversion { document, warning }
    }
}

/// Advisory conditions detected during a conversion.
///
/// Warnings never block the conversion; the caller decides whether to ask
/// the user for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// The source sales order is not in `Completed` status.
    SourceNotCompleted { number: String },
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionWarning::SourceNotCompleted { number } => {
                write!(f, "sales order {number} is not completed")
            }
        }
    }
}

fn completion_warning(so: &SalesOrder) -> Option<ConversionWarning> {
    if so.status != SalesOrderStatus::Completed {
        Some(ConversionWarning::SourceNotCompleted {
            number: so.number.clone(),
        })
    } else {
        None
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// =============================================================================
// Payment Terms
// =============================================================================

/// Extracts the day count from free-form payment terms.
///
/// Takes the leading integer (`"45 days net"` → 45); anything without one
/// falls back to 30.
pub fn terms_days(terms: &str) -> i64 {
    let digits: String = terms
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(DEFAULT_TERMS_DAYS)
}

/// Due date = document date + payment-terms days, as an ISO string.
///
/// An unparseable document date falls back to the supplied date so a due
/// date is always produced.
pub fn due_date(date: &str, terms: &str, fallback: NaiveDate) -> String {
    let base = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or(fallback);
    iso(base + Duration::days(terms_days(terms)))
}

// =============================================================================
// Quotation → Sales Order
// =============================================================================

/// Derives a sales order from an accepted quotation.
///
/// Party details, currency, tax scheme, and line items are copied; shipping,
/// rounding, and all totals start at zero because the order is expected to
/// be re-priced before save. The quotation itself is left untouched.
pub fn sales_order_from_quotation(
    quotation: &Quotation,
    id: String,
    number: String,
    date: NaiveDate,
) -> SalesOrder {
    SalesOrder {
        id,
        number,
        date: iso(date),
        customer: quotation.customer.clone(),
        attention: quotation.attention.clone(),
        email: quotation.email.clone(),
        billing: quotation.billing.clone(),
        shipping: quotation.shipping.clone(),
        currency: quotation.currency.clone(),
        tax_scheme: quotation.tax_scheme,
        status: SalesOrderStatus::Pending,
        items: quotation.items.clone(),
        linked_quotation_id: quotation.id.clone(),
        ..Default::default()
    }
}

// =============================================================================
// Sales Order → Purchase Order
// =============================================================================

/// Keeps the SO lines that still need purchasing.
///
/// Lines whose SKU is already covered by an earlier purchase order are
/// dropped. When a vendor is given, lines assigned to a different vendor
/// are dropped too; unassigned lines always pass.
pub fn filter_items_for_po(
    items: &[LineItem],
    purchased_skus: &HashSet<String>,
    vendor: Option<&str>,
) -> Vec<LineItem> {
    items
        .iter()
        .filter(|item| !purchased_skus.contains(&item.sku))
        .filter(|item| match vendor {
            Some(v) => item.vendor == v || item.vendor.is_empty(),
            None => true,
        })
        .cloned()
        .collect()
}

/// The single vendor named across the lines, if exactly one is.
pub fn sole_vendor(items: &[LineItem]) -> Option<String> {
    let vendors: HashSet<&str> = items
        .iter()
        .filter(|i| !i.vendor.is_empty())
        .map(|i| i.vendor.as_str())
        .collect();
    if vendors.len() == 1 {
        vendors.into_iter().next().map(String::from)
    } else {
        None
    }
}

/// Derives a purchase order covering the not-yet-purchased lines of a
/// sales order.
///
/// `purchased_skus` holds the SKUs of every PO already linked to this SO,
/// so repeated conversions pick up only the remainder. The vendor field is
/// prefilled when the remaining lines name exactly one vendor; line-level
/// vendor assignments are consumed here and not carried onto the PO.
pub fn purchase_order_from_sales_order(
    so: &SalesOrder,
    purchased_skus: &HashSet<String>,
    vendor: Option<&str>,
    id: String,
    number: String,
    date: NaiveDate,
) -> PurchaseOrder {
    let mut items = filter_items_for_po(&so.items, purchased_skus, vendor);
    let prefill = vendor
        .map(String::from)
        .or_else(|| sole_vendor(&items))
        .unwrap_or_default();
    for item in &mut items {
        item.vendor.clear();
    }

    let mut po = PurchaseOrder {
        id,
        number,
        date: iso(date),
        vendor: prefill,
        ship_to: so.shipping.clone(),
        currency: so.currency.clone(),
        tax_scheme: so.tax_scheme,
        linked_sales_order_id: so.id.clone(),
        linked_sales_order_number: so.number.clone(),
        items,
        ..Default::default()
    };
    recompute(&mut po);
    po
}

// =============================================================================
// Sales Order → Invoice
// =============================================================================

/// Derives an invoice from a sales order.
///
/// Lines, shipping, and rounding carry over unchanged so the invoice totals
/// match the order. Payment terms default to 30 days and set the due date
/// relative to the invoice date.
pub fn invoice_from_sales_order(
    so: &SalesOrder,
    id: String,
    number: String,
    date: NaiveDate,
) -> Conversion<Invoice> {
    let payment_terms = DEFAULT_PAYMENT_TERMS.to_string();
    let date_str = iso(date);

    let mut invoice = Invoice {
        id,
        number,
        due_date: due_date(&date_str, &payment_terms, date),
        date: date_str,
        so_id: so.id.clone(),
        so_number: so.number.clone(),
        customer: so.customer.clone(),
        attention: so.attention.clone(),
        email: so.email.clone(),
        billing: so.billing.clone(),
        shipping: so.shipping.clone(),
        currency: so.currency.clone(),
        tax_scheme: so.tax_scheme,
        items: so.items.clone(),
        shipping_total: so.shipping_total,
        rounding: so.rounding,
        source: so.source.clone(),
        payment_terms,
        ..Default::default()
    };
    recompute(&mut invoice);
    Conversion::with_warning(invoice, completion_warning(so))
}

// =============================================================================
// Sales Order → Delivery Order
// =============================================================================

/// Derives a delivery order from a sales order.
pub fn delivery_order_from_sales_order(
    so: &SalesOrder,
    id: String,
    number: String,
    date: NaiveDate,
) -> Conversion<DeliveryOrder> {
    let mut delivery = DeliveryOrder {
        id,
        number,
        date: iso(date),
        so_id: so.id.clone(),
        so_number: so.number.clone(),
        customer: so.customer.clone(),
        billing: so.billing.clone(),
        shipping: so.shipping.clone(),
        currency: so.currency.clone(),
        tax_scheme: so.tax_scheme,
        items: so.items.clone(),
        shipping_total: so.shipping_total,
        rounding: so.rounding,
        ..Default::default()
    };
    recompute(&mut delivery);
    Conversion::with_warning(delivery, completion_warning(so))
}

// =============================================================================
// Unit Tests
// =============================================================================
