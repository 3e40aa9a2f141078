//! # concur-manifest - Organisation Manifests
//!
//! Each organisation has one YAML manifest, `{org_id}_applications.yaml`,
//! describing its applications and their collection points. The manifest
//! mirrors what the document store holds. It is written alongside store
//! mutations but the two writes are not atomic, so the manifest is treated
//! as a derived cache that can be rebuilt from the store.
//!
//! ## Concurrency
//!
//! Every mutation is a read-modify-write of the whole file. Callers take
//! the organisation's lock ([`ManifestStore::lock`]) before mutating the store
//! and hold it until the manifest is written, so two requests for the same
//! organisation cannot interleave their writes within this process.

pub mod document;
pub mod error;
pub mod locks;
pub mod store;

pub use document::{ManifestApplication, ManifestCollectionPoint, ManifestDocument, MANIFEST_VERSION};
pub use error::ManifestError;
pub use locks::ManifestLocks;
pub use store::ManifestStore;
