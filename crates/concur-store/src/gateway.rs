//! The [`DocumentStore`] trait.

use async_trait::async_trait;

use concur_core::DocumentId;

use crate::document::{Collection, Document, Filter};
use crate::error::StoreError;

/// Result of an `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Documents that matched the filter (0 or 1).
    pub matched: u64,
    /// Documents whose content actually changed.
    pub modified: u64,
}

/// Access to named collections of JSON documents.
///
/// Single-document operations (`update`, `delete`, `upsert`) act on the
/// first match in insertion order. Each call is atomic on its own; there
/// are no multi-call transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return the identifier assigned to it.
    async fn insert(&self, collection: Collection, doc: Document)
        -> Result<DocumentId, StoreError>;

    /// All matching documents, in insertion order. Each carries `_id`.
    async fn find(&self, collection: Collection, filter: &Filter)
        -> Result<Vec<Document>, StoreError>;

    /// The first matching document.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    /// Overwrite the fields in `set` on the first match, leaving other
    /// fields untouched.
    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Delete the first match. Returns the number of documents deleted.
    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    /// Apply `set` to the first match, or insert `filter` fields plus `set`
    /// when nothing matches. Returns the document id and whether it was
    /// inserted.
    async fn upsert(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<(DocumentId, bool), StoreError>;

    /// Cheap reachability probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
