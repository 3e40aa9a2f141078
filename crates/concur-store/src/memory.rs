//! In-memory [`DocumentStore`] backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use concur_core::DocumentId;

use crate::document::{Collection, Document, Filter, ID_FIELD};
use crate::error::StoreError;
use crate::gateway::{DocumentStore, UpdateOutcome};

/// Thread-safe, cloneable in-memory document store.
///
/// The lock is `parking_lot` and is never held across an `.await`, so every
/// trait method runs to completion under a single lock acquisition. That
/// makes `upsert` atomic with respect to other callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

fn stamp(mut doc: Document) -> (DocumentId, Document) {
    let id = DocumentId::generate();
    doc.insert(ID_FIELD.into(), Value::String(id.to_string()));
    (id, doc)
}

fn merge(target: &mut Document, mut set: Document) -> bool {
    set.remove(ID_FIELD);
    let mut changed = false;
    for (k, v) in set {
        if target.get(&k) != Some(&v) {
            target.insert(k, v);
            changed = true;
        }
    }
    changed
}

fn stored_id(doc: &Document) -> Result<DocumentId, StoreError> {
    let raw = doc.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default();
    DocumentId::parse(raw).map_err(|_| StoreError::CorruptId(raw.to_string()))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<DocumentId, StoreError> {
        let (id, doc) = stamp(doc);
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .push(doc);
        Ok(id)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map_or(0, |docs| docs.iter().filter(|d| filter.matches(d)).count() as u64))
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut guard = self.collections.write();
        let target = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)));
        Ok(match target {
            Some(doc) => UpdateOutcome {
                matched: 1,
                modified: u64::from(merge(doc, set)),
            },
            None => UpdateOutcome::default(),
        })
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut guard = self.collections.write();
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn upsert(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<(DocumentId, bool), StoreError> {
        let mut guard = self.collections.write();
        let docs = guard.entry(collection).or_default();
        if let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) {
            merge(doc, set);
            return Ok((stored_id(doc)?, false));
        }

        let mut fresh = filter.fields();
        merge(&mut fresh, set);
        let (id, fresh) = stamp(fresh);
        docs.push(fresh);
        Ok((id, true))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
