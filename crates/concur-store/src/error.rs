//! Store error type.

use thiserror::Error;

/// Failure of a document store operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Every connection attempt failed.
    #[error("could not connect after {attempts} attempts: {source}")]
    ConnectExhausted {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    /// A record could not be converted to or from a document.
    #[error("document codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A value that must be a JSON object was not one.
    #[error("document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A stored `_id` was missing or malformed.
    #[error("stored document has invalid _id: {0}")]
    CorruptId(String),
}
