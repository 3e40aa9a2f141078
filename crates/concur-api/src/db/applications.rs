//! Application persistence. Applications are insert-only.

use concur_core::{ApplicationRecord, DocumentId};
use concur_store::{from_document, to_document, Collection, DocumentStore, Filter, StoreError};

pub async fn insert(
    store: &dyn DocumentStore,
    record: &ApplicationRecord,
) -> Result<DocumentId, StoreError> {
    store.insert(Collection::Applications, to_document(record)?).await
}

/// All applications of an organisation, in creation order.
pub async fn list_for_org(
    store: &dyn DocumentStore,
    org_id: &str,
) -> Result<Vec<ApplicationRecord>, StoreError> {
    store
        .find(Collection::Applications, &Filter::new().eq("org_id", org_id))
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}
