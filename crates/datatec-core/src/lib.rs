//! # datatec-core: Pure Business Logic for the Datatec ERP
//!
//! This crate is the heart of the Datatec ERP. It contains the record types,
//! the total calculator, the document numbering rules, and the document
//! derivation pipeline as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Datatec ERP Architecture                       │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                 Document Forms (external)                     │  │
//! │  │   Quotation ─► Sales Order ─► PO / Invoice / Delivery Order   │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │               ★ datatec-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌────────┐ ┌───────────┐ ┌────────┐ ┌─────────┐  │  │
//! │  │  │  types  │ │ totals │ │ numbering │ │ derive │ │validation│ │  │
//! │  │  └─────────┘ └────────┘ └───────────┘ └────────┘ └─────────┘  │  │
//! │  │                                                               │  │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │            datatec-store (key/value persistence)              │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (Quotation, SalesOrder, Invoice, masters, ...)
//! - [`totals`] - Line-item total calculator
//! - [`numbering`] - Sequential document numbering rules per type and year
//! - [`derive`] - Document derivation (quotation→SO, SO→PO/invoice/DO)
//! - [`validation`] - Blank-row filtering and save-time validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: derivations never mutate their source; dates and
//!    fresh ids are passed in by the caller rather than read from a clock
//! 2. **Lenient at the boundary**: stored blobs deserialize-or-default;
//!    non-numeric numeric fields coerce to zero instead of failing
//! 3. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod derive;
pub mod error;
pub mod numbering;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use derive::{Conversion, ConversionWarning};
pub use error::ValidationError;
pub use numbering::DocumentType;
pub use totals::{DocumentLines, DocumentTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default currency for new documents.
pub const DEFAULT_CURRENCY: &str = "MYR";

/// Default payment terms for quotations and invoices.
pub const DEFAULT_PAYMENT_TERMS: &str = "30 days";

/// Days added to the document date when payment terms cannot be parsed,
/// and the default validity window for new quotations.
pub const DEFAULT_TERMS_DAYS: i64 = 30;
