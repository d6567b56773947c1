//! # Mirror Processor
//!
//! Drains the store's mirror channel and replays each write against the
//! remote backend.
//!
//! ## Processing Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Mirror Processing                              │
//! │                                                                     │
//! │  KvStore::write ──► MirrorHandle ──► mpsc queue                     │
//! │                                         │                           │
//! │                                         ▼                           │
//! │                                  MirrorProcessor                    │
//! │                                         │                           │
//! │                                         ▼                           │
//! │                     POST endpoint  {"key": ..., "value": ...}       │
//! │                                         │                           │
//! │                         ┌───────────────┴───────────────┐           │
//! │                         ▼                               ▼           │
//! │                      2xx: done                 failure: warn, drop  │
//! │                                                                     │
//! │  No retries, no persistence, no acknowledgement back to the store.  │
//! │  The backend reconciles by being overwritten on the next save of    │
//! │  the same key (every write carries the full value).                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::Client;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use datatec_store::{MirrorEvent, MirrorHandle};

use crate::config::MirrorConfig;
use crate::error::{SyncError, SyncResult};

/// Wire shape of one mirrored write.
#[derive(Debug, Serialize)]
struct MirrorPayload<'a> {
    key: &'a str,
    value: &'a serde_json::Value,
}

/// Replays mirror events against the remote backend.
#[derive(Debug)]
pub struct MirrorProcessor {
    client: Client,
    endpoint: String,
    rx: mpsc::Receiver<MirrorEvent>,
}

impl MirrorProcessor {
    /// Creates the processor and the handle the store publishes into.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let (handle, processor) = MirrorProcessor::new(config)?;
    /// let store = Store::new(store_config).await?.with_mirror(handle);
    /// let task = processor.spawn();
    /// ```
    pub fn new(config: MirrorConfig) -> SyncResult<(MirrorHandle, Self)> {
        if config.endpoint.trim().is_empty() {
            return Err(SyncError::InvalidConfig("empty endpoint URL".into()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let (handle, rx) = MirrorHandle::channel(config.queue_capacity);
        info!(endpoint = %config.endpoint, "Mirror processor created");

        Ok((
            handle,
            MirrorProcessor {
                client,
                endpoint: config.endpoint,
                rx,
            },
        ))
    }

    /// Spawns the processing loop on the current runtime.
    ///
    /// The task ends when every `MirrorHandle` clone has been dropped.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs the processing loop to completion.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.push(&event).await;
        }
        info!("Mirror channel closed, processor stopping");
    }

    /// Pushes one event to the backend. Failures are logged and dropped;
    /// the next write of the same key carries the full value anyway.
    async fn push(&self, event: &MirrorEvent) {
        let payload = MirrorPayload {
            key: &event.key,
            value: &event.value,
        };

        let result = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());

        match result {
            Ok(_) => debug!(key = %event.key, "Mirrored write"),
            Err(e) => warn!(key = %event.key, error = %e, "Mirror push failed, dropping"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
