//! # Mirror Channel
//!
//! Fire-and-forget propagation of key/value writes to a remote mirror.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Write Mirroring                               │
//! │                                                                     │
//! │  KvStore::write(key, value)                                         │
//! │       │                                                             │
//! │       ├──► SQLite upsert (authoritative, awaited)                   │
//! │       │                                                             │
//! │       └──► MirrorHandle::publish ──► bounded mpsc ──► processor     │
//! │                 (try_send, never blocks, lossy)       (other crate) │
//! │                                                                     │
//! │  Local persistence NEVER waits on the mirror. A full queue or a     │
//! │  dead processor drops the event with a warning; the mirror is a     │
//! │  best-effort replica, not a second source of truth.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

// =============================================================================
// Mirror Event
// =============================================================================

/// One key/value write, as it should be replayed against the mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorEvent {
    pub key: String,
    pub value: Value,
}

// =============================================================================
// Mirror Handle
// =============================================================================

/// Sending side of the mirror channel, held by the store.
///
/// Cheap to clone; a disabled handle (the default) drops every event
/// silently, which is how tests and offline deployments run.
#[derive(Debug, Clone, Default)]
pub struct MirrorHandle {
    tx: Option<mpsc::Sender<MirrorEvent>>,
}

impl MirrorHandle {
    /// A handle that discards every event. Used when no mirror is configured.
    pub fn disabled() -> Self {
        MirrorHandle { tx: None }
    }

    /// Creates a bounded channel; the receiver goes to the mirror processor.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<MirrorEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (MirrorHandle { tx: Some(tx) }, rx)
    }

    /// Queues a write for mirroring. Never blocks and never fails the caller.
    pub fn publish(&self, key: &str, value: Value) {
        let Some(tx) = &self.tx else {
            return;
        };
        let event = MirrorEvent {
            key: key.to_string(),
            value,
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(key = %event.key, "Mirror queue full, dropping update");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!(key = %event.key, "Mirror processor gone, dropping update");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_delivers_event() {
        let (handle, mut rx) = MirrorHandle::channel(4);
        handle.publish("datatec_vendors", serde_json::json!(["Acme"]));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, "datatec_vendors");
        assert_eq!(event.value, serde_json::json!(["Acme"]));
    }

    #[tokio::test]
    async fn test_disabled_handle_is_a_no_op() {
        let handle = MirrorHandle::disabled();
        handle.publish("datatec_vendors", serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let (handle, mut rx) = MirrorHandle::channel(1);
        handle.publish("a", serde_json::json!(1));
        handle.publish("b", serde_json::json!(2));

        assert_eq!(rx.recv().await.unwrap().key, "a");
        assert!(rx.try_recv().is_err());
    }
}
