//! # concur-store - Document Store Gateway
//!
//! All persistent state of the registry lives in five named collections of
//! schemaless JSON documents. Handlers talk to the store through the
//! [`DocumentStore`] trait and never see the backend.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: `parking_lot::RwLock` over insertion-ordered vectors.
//!   Used when no `DATABASE_URL` is configured and throughout the tests.
//! - [`PgDocumentStore`]: one `documents` table with a JSONB body. Filters
//!   are containment queries, updates are JSONB merges, upserts run under a
//!   transaction-scoped advisory lock.
//!
//! ## Typed boundary
//!
//! Records are converted with [`to_document`] and [`from_document`]. The
//! store assigns `_id`; any `_id` present on an inbound record is dropped.
//!
//! ## Retries
//!
//! Connection establishment retries with exponential backoff
//! ([`connect_with_retry`]). Individual store calls are never retried.

pub mod codec;
pub mod document;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod postgres;
pub mod retry;

pub use codec::{from_document, to_document};
pub use concur_core::DocumentId;
pub use document::{Collection, Document, Filter, ID_FIELD};
pub use error::StoreError;
pub use gateway::{DocumentStore, UpdateOutcome};
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use retry::connect_with_retry;
