//! # Total Calculator
//!
//! Line-item and document total arithmetic, shared by every document type.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Document Totals                               │
//! │                                                                     │
//! │  per line:   net    = qty × price                                   │
//! │              taxAmt = net × tax / 100                               │
//! │                                                                     │
//! │  document:   subtotal   = Σ net                                     │
//! │              taxTotal   = Σ taxAmt                                  │
//! │              grandTotal = subtotal + taxTotal                       │
//! │                           + shippingTotal + rounding                │
//! │                                                                     │
//! │  rounding may be negative; shipping is untaxed                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are recomputed from the lines on every save; the stored totals
//! are a cache for lists and printing, never an input.

use serde::{Deserialize, Serialize};

use crate::types::LineItem;

// =============================================================================
// Line Arithmetic
// =============================================================================

/// Net amount of one line (quantity × unit price), before tax.
pub fn line_net(item: &LineItem) -> f64 {
    item.qty * item.price
}

/// Tax amount of one line. `tax` is a percentage, not a fraction.
pub fn line_tax(item: &LineItem) -> f64 {
    line_net(item) * item.tax / 100.0
}

/// Line total including tax.
pub fn line_total(item: &LineItem) -> f64 {
    line_net(item) + line_tax(item)
}

// =============================================================================
// Document Totals
// =============================================================================

/// The three derived totals every document carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub tax_total: f64,
    pub grand_total: f64,
}

/// Computes document totals from line items plus document-level adjustments.
///
/// Blank rows contribute zero to every sum, so callers may pass unfiltered
/// item lists. Summation order does not affect which lines are included;
/// results are independent of item ordering up to float associativity.
pub fn compute_totals(items: &[LineItem], shipping_total: f64, rounding: f64) -> DocumentTotals {
    let subtotal: f64 = items.iter().map(line_net).sum();
    let tax_total: f64 = items.iter().map(line_tax).sum();
    DocumentTotals {
        subtotal,
        tax_total,
        grand_total: subtotal + tax_total + shipping_total + rounding,
    }
}

/// Formats an amount for display and printing with exactly two decimals.
///
/// Halves round away from zero (0.125 renders as "0.13"), matching how the
/// stored documents were printed historically. Amounts stay as raw floats
/// in storage; only the rendered form is rounded.
pub fn format_money(amount: f64) -> String {
    format!("{:.2}", (amount * 100.0).round() / 100.0)
}

// =============================================================================
// DocumentLines Trait
// =============================================================================

/// Documents that carry line items and cached totals.
///
/// Gives the store layer one recompute path over all five document types.
pub trait DocumentLines {
    fn items(&self) -> &[LineItem];
    fn items_mut(&mut self) -> &mut Vec<LineItem>;
    fn shipping_total(&self) -> f64;
    fn rounding(&self) -> f64;
    fn set_totals(&mut self, totals: DocumentTotals);
}

/// Recomputes and stores a document's cached totals from its current lines.
pub fn recompute<D: DocumentLines>(doc: &mut D) {
    let totals = compute_totals(doc.items(), doc.shipping_total(), doc.rounding());
    doc.set_totals(totals);
}

// =============================================================================
// Unit Tests
// =============================================================================
