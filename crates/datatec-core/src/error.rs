//! # Error Types
//!
//! Domain-specific error types for datatec-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  datatec-core errors (this file)                                    │
//! │  └── ValidationError  - Save-time validation failures               │
//! │                                                                     │
//! │  datatec-store errors (separate crate)                              │
//! │  └── StoreError       - Key/value store operation failures          │
//! │                                                                     │
//! │  Flow: ValidationError → StoreError → caller                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures are the only errors surfaced to the user as blocking
//! messages; everything else in this system degrades to defaults or is
//! logged and swallowed by the storage/sync layers.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Save-time validation errors.
///
/// These are surfaced synchronously to the user and abort the save.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required natural key is missing or empty (e.g. an item SKU).
    #[error("{field} is required")]
    Required { field: &'static str },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: &'static str) -> Self {
        ValidationError::Required { field }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::required("sku");
        assert_eq!(err.to_string(), "sku is required");
    }
}
