//! # datatec-sync: Remote Mirror for the Datatec ERP
//!
//! This crate keeps a remote backend loosely in step with the local store.
//! Every key/value write the store makes is queued on an in-memory channel;
//! the processor here drains that channel and POSTs each write to the
//! backend.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Mirror Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────┐    mpsc     ┌─────────────────────────────┐    │
//! │  │  datatec-store  │ ──────────► │  MirrorProcessor (here)     │    │
//! │  │  KvStore::write │   (lossy)   │  POST {key, value} via HTTP │    │
//! │  └─────────────────┘             └─────────────────────────────┘    │
//! │                                                                     │
//! │  Guarantees, deliberately weak:                                     │
//! │  • local writes never wait on the network                           │
//! │  • a full queue or failed push drops the event with a warning       │
//! │  • every push carries the FULL value for its key, so the next       │
//! │    successful push heals any earlier loss                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Mirror endpoint and queue configuration
//! - [`mirror`] - The processing loop
//! - [`error`] - Sync error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use datatec_store::{Store, StoreConfig};
//! use datatec_sync::{MirrorConfig, MirrorProcessor};
//!
//! let store = Store::new(StoreConfig::new("./datatec.db")).await?;
//! let store = match MirrorConfig::from_env() {
//!     Some(config) => {
//!         let (handle, processor) = MirrorProcessor::new(config)?;
//!         processor.spawn();
//!         store.with_mirror(handle)
//!     }
//!     None => store, // local-only deployment
//! };
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod mirror;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{MirrorConfig, MIRROR_URL_ENV};
pub use error::{SyncError, SyncResult};
pub use mirror::MirrorProcessor;
