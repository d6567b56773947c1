//! # Sequence Allocator
//!
//! Allocates sequential document numbers from counters stored as plain
//! key/value entries.
//!
//! ## Allocation Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   next_number(invoice, 2025)                        │
//! │                                                                     │
//! │  acquire allocator lock (one allocation at a time)                  │
//! │  1. key  = datatec_counter_invoice_25                               │
//! │  2. read counter, default = base (255000)                           │
//! │     • stored number        → use it                                 │
//! │     • stored numeric text  → parse it                               │
//! │     • anything else        → base                                   │
//! │  3. write counter + 1                                               │
//! │  4. return "INV" + counter  (the PRE-increment value)               │
//! │                                                                     │
//! │  Year-scoped counters never reset: a new year simply reads a key    │
//! │  that doesn't exist yet and starts from that year's base.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All allocations in the process share one lock, so the read-modify-write
//! can never interleave and hand out a duplicate. Numbers are unique per
//! store; a second process writing the same database file is outside the
//! deployment model.

use std::sync::Arc;

use chrono::{Datelike, Local};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use datatec_core::DocumentType;

use crate::error::StoreResult;
use crate::kv::KvStore;

/// Allocates document numbers from stored counters.
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    kv: KvStore,
    lock: Arc<Mutex<()>>,
}

impl SequenceAllocator {
    /// Creates a new SequenceAllocator. The lock is shared by every
    /// allocator the owning store hands out.
    pub fn new(kv: KvStore, lock: Arc<Mutex<()>>) -> Self {
        SequenceAllocator { kv, lock }
    }

    /// Allocates the next number for `doc_type` using today's year.
    pub async fn allocate(&self, doc_type: DocumentType) -> StoreResult<String> {
        self.next_number(doc_type, Local::now().year()).await
    }

    /// Allocates the next number for `doc_type` in the given calendar year.
    ///
    /// Returns the formatted number and advances the stored counter by one.
    pub async fn next_number(&self, doc_type: DocumentType, year: i32) -> StoreResult<String> {
        let key = doc_type.counter_key(year);
        let base = doc_type.base(year);

        let _guard = self.lock.lock().await;

        let raw: Value = self.kv.read(&key, Value::from(base)).await?;
        let current = coerce_counter(&raw, base);

        self.kv.write(&key, &(current + 1)).await?;

        let number = doc_type.format_number(current);
        debug!(key = %key, number = %number, "Allocated document number");
        Ok(number)
    }
}

/// Coerces a stored counter value to an integer.
///
/// Counters written by earlier revisions may be numeric strings; anything
/// that isn't a number at all restarts from the base.
fn coerce_counter(raw: &Value, base: i64) -> i64 {
    match raw {
        Value::Number(n) => n.as_i64().unwrap_or(base),
        Value::String(s) => s.trim().parse().unwrap_or(base),
        _ => base,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_allocations_use_bases() {
        let store = store().await;
        let seq = store.sequences();

        assert_eq!(
            seq.next_number(DocumentType::Quotation, 2025).await.unwrap(),
            "QN251000"
        );
        assert_eq!(
            seq.next_number(DocumentType::SalesOrder, 2025).await.unwrap(),
            "SO255000"
        );
        assert_eq!(
            seq.next_number(DocumentType::Invoice, 2025).await.unwrap(),
            "INV255000"
        );
        assert_eq!(
            seq.next_number(DocumentType::PurchaseOrder, 2025)
                .await
                .unwrap(),
            "PO255000"
        );
        assert_eq!(
            seq.next_number(DocumentType::DeliveryOrder, 2025)
                .await
                .unwrap(),
            "DO800"
        );
    }

    #[tokio::test]
    async fn test_numbers_are_monotonic() {
        let store = store().await;
        let seq = store.sequences();

        assert_eq!(
            seq.next_number(DocumentType::Invoice, 2025).await.unwrap(),
            "INV255000"
        );
        assert_eq!(
            seq.next_number(DocumentType::Invoice, 2025).await.unwrap(),
            "INV255001"
        );
        assert_eq!(
            seq.next_number(DocumentType::Invoice, 2025).await.unwrap(),
            "INV255002"
        );
    }

    #[tokio::test]
    async fn test_years_run_independent_counters() {
        let store = store().await;
        let seq = store.sequences();

        seq.next_number(DocumentType::Invoice, 2025).await.unwrap();
        seq.next_number(DocumentType::Invoice, 2025).await.unwrap();

        // A new year starts at its own base, untouched by 2025 traffic
        assert_eq!(
            seq.next_number(DocumentType::Invoice, 2026).await.unwrap(),
            "INV265000"
        );
        // And 2025 continues where it left off
        assert_eq!(
            seq.next_number(DocumentType::Invoice, 2025).await.unwrap(),
            "INV255002"
        );
    }

    #[tokio::test]
    async fn test_quotations_ignore_the_year() {
        let store = store().await;
        let seq = store.sequences();

        assert_eq!(
            seq.next_number(DocumentType::Quotation, 2025).await.unwrap(),
            "QN251000"
        );
        assert_eq!(
            seq.next_number(DocumentType::Quotation, 2026).await.unwrap(),
            "QN251001"
        );
    }

    #[tokio::test]
    async fn test_numeric_string_counter_is_coerced() {
        let store = store().await;
        store
            .kv()
            .write("datatec_counter_deliveryOrder", &"812")
            .await
            .unwrap();

        assert_eq!(
            store
                .sequences()
                .next_number(DocumentType::DeliveryOrder, 2025)
                .await
                .unwrap(),
            "DO812"
        );
    }

    #[tokio::test]
    async fn test_garbage_counter_restarts_from_base() {
        let store = store().await;
        store
            .kv()
            .write("datatec_counter_deliveryOrder", &serde_json::json!({"bad": true}))
            .await
            .unwrap();

        assert_eq!(
            store
                .sequences()
                .next_number(DocumentType::DeliveryOrder, 2025)
                .await
                .unwrap(),
            "DO800"
        );
    }

    #[tokio::test]
    async fn test_counter_is_stored_post_increment() {
        let store = store().await;
        store
            .sequences()
            .next_number(DocumentType::Quotation, 2025)
            .await
            .unwrap();

        let stored: i64 = store.kv().read("datatec_counter_quotation", 0).await.unwrap();
        assert_eq!(stored, 251_001);
    }

    #[tokio::test]
    async fn test_concurrent_allocations_never_collide() {
        let store = Store::new(StoreConfig::in_memory().max_connections(1))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let seq = store.sequences();
            handles.push(tokio::spawn(async move {
                seq.next_number(DocumentType::Quotation, 2025).await.unwrap()
            }));
        }

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap());
        }
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 8);
    }
}
