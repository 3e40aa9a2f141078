//! Consent preference persistence.

use concur_core::{ConsentRecord, DocumentId};
use concur_store::{to_document, Collection, DocumentStore, Filter, StoreError};

/// Replace the record for `(dp_id, cp_id)`, inserting it if absent.
/// Returns the record id and whether it was newly created.
pub async fn upsert(
    store: &dyn DocumentStore,
    record: &ConsentRecord,
) -> Result<(DocumentId, bool), StoreError> {
    let filter = Filter::new()
        .eq("dp_id", record.dp_id.as_str())
        .eq("cp_id", record.cp_id.as_str());
    store
        .upsert(Collection::ConsentPreferences, &filter, to_document(record)?)
        .await
}
