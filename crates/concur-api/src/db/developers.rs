//! Developer and organisation persistence.

use concur_core::{DeveloperRecord, DocumentId, OrgCredentials, OrganisationRecord};
use concur_store::{to_document, Collection, Document, DocumentStore, Filter, StoreError};
use serde_json::Value;

pub async fn insert_developer(
    store: &dyn DocumentStore,
    record: &DeveloperRecord,
) -> Result<DocumentId, StoreError> {
    store.insert(Collection::Developers, to_document(record)?).await
}

pub async fn insert_organisation(
    store: &dyn DocumentStore,
    record: &OrganisationRecord,
) -> Result<DocumentId, StoreError> {
    store.insert(Collection::Organisations, to_document(record)?).await
}

/// Set the back-reference from a developer to its organisation.
pub async fn link_organisation(
    store: &dyn DocumentStore,
    developer_id: &DocumentId,
    organisation_id: &DocumentId,
) -> Result<bool, StoreError> {
    let mut set = Document::new();
    set.insert(
        "organisation_id".into(),
        Value::String(organisation_id.to_string()),
    );
    let outcome = store
        .update(Collection::Developers, &Filter::by_id(developer_id), set)
        .await?;
    Ok(outcome.matched > 0)
}

/// Number of developers whose organisation id, key and secret all match.
pub async fn count_matching(
    store: &dyn DocumentStore,
    creds: &OrgCredentials,
) -> Result<u64, StoreError> {
    let filter = Filter::new()
        .eq("organisation_id", creds.org_id.as_str())
        .eq("org_key", creds.org_key.as_str())
        .eq("org_secret", creds.org_secret.as_str());
    store.count(Collection::Developers, &filter).await
}
