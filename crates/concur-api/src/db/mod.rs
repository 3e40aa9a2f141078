//! # Typed Repository Functions
//!
//! One module per collection. Every function takes a `&dyn DocumentStore`
//! and converts between typed records and documents at this boundary, so
//! handlers never build untyped maps.

pub mod applications;
pub mod collection_points;
pub mod consents;
pub mod developers;

use std::sync::Arc;

use concur_store::{DocumentStore, MemoryStore, PgDocumentStore, StoreError};

use crate::config::AppConfig;

/// Build the configured store backend.
///
/// Returns the in-memory store when `DATABASE_URL` is not set. Returns
/// `Err` if the URL is set but connection (after retries) or migration
/// fails.
pub async fn init_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!(
            "DATABASE_URL not set, running with the in-memory store. \
             State will not survive restarts."
        );
        return Ok(Arc::new(MemoryStore::new()));
    };

    let store =
        PgDocumentStore::connect(url, &config.database_name, config.db_connect_retries).await?;
    tracing::info!(database = %config.database_name, "document store ready");
    Ok(Arc::new(store))
}
