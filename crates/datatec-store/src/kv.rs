//! # Key/Value Store
//!
//! The primitive every other service is built on: read a JSON value by key
//! with a fallback default, write a JSON value by key.
//!
//! ## Read Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    read(key, default)                               │
//! │                                                                     │
//! │  SELECT value FROM erp_data WHERE key = ?                           │
//! │       │                                                             │
//! │       ├── no row        ──────────────► default (silent)            │
//! │       ├── row, bad JSON ──────────────► default (warn!)             │
//! │       ├── row, wrong shape for T ─────► default (warn!)             │
//! │       └── row, parses   ──────────────► value                       │
//! │                                                                     │
//! │  Only the database itself failing is an error. Corrupt data         │
//! │  degrades; it never wedges the application.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are last-write-wins upserts, then published to the mirror channel.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::mirror::MirrorHandle;

/// Key/value access over the `erp_data` table.
#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
    mirror: MirrorHandle,
}

impl KvStore {
    /// Creates a new KvStore.
    pub fn new(pool: SqlitePool, mirror: MirrorHandle) -> Self {
        KvStore { pool, mirror }
    }

    /// Reads and deserializes the value stored under `key`.
    ///
    /// A missing key returns `default` silently; a stored value that fails
    /// to parse as `T` returns `default` with a warning. See the module
    /// docs for the full decision table.
    pub async fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> StoreResult<T> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM erp_data WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(raw) = raw else {
            debug!(key = %key, "Key not present, using default");
            return Ok(default);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored value unreadable, using default");
                Ok(default)
            }
        }
    }

    /// Serializes `value` and upserts it under `key` (last write wins),
    /// then queues the write for mirroring.
    pub async fn write<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let json = serde_json::to_value(value)?;
        let raw = json.to_string();

        sqlx::query(
            "INSERT INTO erp_data (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(raw.as_str())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = raw.len(), "Wrote value");
        self.mirror.publish(key, json);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn kv() -> KvStore {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        store.kv()
    }

    #[tokio::test]
    async fn test_missing_key_returns_default() {
        let kv = kv().await;
        let value: Vec<String> = kv.read("datatec_vendors", vec![]).await.unwrap();
        assert!(value.is_empty());

        let n: i64 = kv.read("datatec_counter_deliveryOrder", 800).await.unwrap();
        assert_eq!(n, 800);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let kv = kv().await;
        kv.write("datatec_vendors", &vec!["Acme".to_string()])
            .await
            .unwrap();

        let value: Vec<String> = kv.read("datatec_vendors", vec![]).await.unwrap();
        assert_eq!(value, vec!["Acme".to_string()]);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let kv = kv().await;
        kv.write("k", &1i64).await.unwrap();
        kv.write("k", &2i64).await.unwrap();

        let n: i64 = kv.read("k", 0).await.unwrap();
        assert_eq!(n, 2);
    }

    #[tokio::test]
    async fn test_unparseable_value_degrades_to_default() {
        let kv = kv().await;
        // A list where a number is expected
        kv.write("k", &vec!["not a number".to_string()]).await.unwrap();

        let n: i64 = kv.read("k", 42).await.unwrap();
        assert_eq!(n, 42);
    }

    #[tokio::test]
    async fn test_writes_reach_the_mirror() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let (handle, mut rx) = MirrorHandle::channel(4);
        let store = store.with_mirror(handle);

        store.kv().write("k", &7i64).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, "k");
        assert_eq!(event.value, serde_json::json!(7));
    }
}
