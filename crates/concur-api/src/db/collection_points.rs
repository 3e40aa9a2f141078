//! Collection point persistence.

use concur_core::{CollectionPointRecord, DataElement, DocumentId};
use concur_store::{
    from_document, to_document, Collection, Document, DocumentStore, Filter, StoreError,
    UpdateOutcome,
};
use serde_json::Value;

pub async fn insert(
    store: &dyn DocumentStore,
    record: &CollectionPointRecord,
) -> Result<DocumentId, StoreError> {
    store.insert(Collection::CollectionPoints, to_document(record)?).await
}

pub async fn set_url(
    store: &dyn DocumentStore,
    id: &DocumentId,
    url: &str,
) -> Result<UpdateOutcome, StoreError> {
    let mut set = Document::new();
    set.insert("cp_url".into(), Value::String(url.to_string()));
    store
        .update(Collection::CollectionPoints, &Filter::by_id(id), set)
        .await
}

/// Look up by id, optionally narrowed to an organisation and application.
pub async fn find(
    store: &dyn DocumentStore,
    id: &DocumentId,
    org_id: Option<&str>,
    app_id: Option<&str>,
) -> Result<Option<CollectionPointRecord>, StoreError> {
    let mut filter = Filter::by_id(id);
    if let Some(org_id) = org_id {
        filter = filter.eq("org_id", org_id);
    }
    if let Some(app_id) = app_id {
        filter = filter.eq("application_id", app_id);
    }
    store
        .find_one(Collection::CollectionPoints, &filter)
        .await?
        .map(from_document)
        .transpose()
}

pub async fn list_for_app(
    store: &dyn DocumentStore,
    org_id: &str,
    app_id: &str,
) -> Result<Vec<CollectionPointRecord>, StoreError> {
    let filter = Filter::new().eq("org_id", org_id).eq("application_id", app_id);
    store
        .find(Collection::CollectionPoints, &filter)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

pub async fn list_for_org(
    store: &dyn DocumentStore,
    org_id: &str,
) -> Result<Vec<CollectionPointRecord>, StoreError> {
    store
        .find(Collection::CollectionPoints, &Filter::new().eq("org_id", org_id))
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

/// Fields a manifest upload may overwrite.
#[derive(Debug, Clone)]
pub struct CollectionPointPatch<'a> {
    pub cp_name: &'a str,
    pub cp_status: &'a str,
    pub cp_url: &'a str,
    pub data_elements: &'a [DataElement],
}

pub async fn overwrite(
    store: &dyn DocumentStore,
    id: &DocumentId,
    patch: CollectionPointPatch<'_>,
) -> Result<UpdateOutcome, StoreError> {
    let mut set = Document::new();
    set.insert("cp_name".into(), Value::String(patch.cp_name.to_string()));
    set.insert("cp_status".into(), Value::String(patch.cp_status.to_string()));
    set.insert("cp_url".into(), Value::String(patch.cp_url.to_string()));
    set.insert("data_elements".into(), serde_json::to_value(patch.data_elements)?);
    store
        .update(Collection::CollectionPoints, &Filter::by_id(id), set)
        .await
}

/// Delete a collection point owned by `org_id`. Returns the deleted count.
pub async fn delete(
    store: &dyn DocumentStore,
    id: &DocumentId,
    org_id: &str,
) -> Result<u64, StoreError> {
    store
        .delete(
            Collection::CollectionPoints,
            &Filter::by_id(id).eq("org_id", org_id),
        )
        .await
}
