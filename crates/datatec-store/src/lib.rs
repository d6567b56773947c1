//! # datatec-store: Persistence Layer for the Datatec ERP
//!
//! This crate provides storage for the Datatec ERP. The entire data model
//! is a per-key JSON blob store over SQLite, with the ERP's services built
//! on that one primitive.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Datatec ERP Data Flow                         │
//! │                                                                     │
//! │  Caller (forms / seed / future API)                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  datatec-store (THIS CRATE)                   │  │
//! │  │                                                               │  │
//! │  │   ┌───────────┐  ┌───────────┐  ┌──────────┐  ┌───────────┐  │  │
//! │  │   │ documents │  │ sequence  │  │ masters  │  │  records  │  │  │
//! │  │   └─────┬─────┘  └─────┬─────┘  └────┬─────┘  └─────┬─────┘  │  │
//! │  │         └──────────────┴─────┬───────┴──────────────┘        │  │
//! │  │                        ┌─────▼─────┐       ┌──────────┐      │  │
//! │  │                        │    kv     │──────►│  mirror  │      │  │
//! │  │                        └─────┬─────┘       └──────────┘      │  │
//! │  └──────────────────────────────┼────────────────────────────────┘  │
//! │                                 ▼                                   │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │          SQLite: erp_data (key TEXT PK, value TEXT)           │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`kv`] - The read/write-by-key primitive
//! - [`records`] - Typed id-keyed record lists
//! - [`sequence`] - Document number allocation
//! - [`masters`] - Customer/vendor/item master maintenance
//! - [`documents`] - Document creation, conversion, save, delete
//! - [`mirror`] - Fire-and-forget write mirroring channel
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use datatec_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("path/to/datatec.db")).await?;
//!
//! let docs = store.documents();
//! let quotation = docs.new_quotation().await?;
//! let quotation = docs.save_quotation(quotation).await?;
//! let so = docs.convert_quotation_to_sales_order(&quotation.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod documents;
pub mod error;
pub mod kv;
pub mod masters;
pub mod mirror;
pub mod pool;
pub mod records;
pub mod sequence;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};

// Service re-exports for convenience
pub use documents::DocumentService;
pub use kv::KvStore;
pub use masters::MasterData;
pub use mirror::{MirrorEvent, MirrorHandle};
pub use records::{keys, RecordStore};
pub use sequence::SequenceAllocator;
