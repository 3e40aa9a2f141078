//! PostgreSQL [`DocumentStore`] backend.
//!
//! Every collection shares the `documents` table. Documents are stored
//! without `_id` in a JSONB `body`; the identifier lives in its own column
//! and is spliced back in on read. Filters compile to `body @> $filter`,
//! which for the scalar fields the registry filters on is exact equality.

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool};
use sqlx::types::Json;

use concur_core::DocumentId;

use crate::document::{Collection, Document, Filter, ID_FIELD};
use crate::error::StoreError;
use crate::gateway::{DocumentStore, UpdateOutcome};
use crate::retry::connect_with_retry;

const MATCH_CLAUSE: &str =
    "collection = $1 AND body @> $2 AND ($3::text IS NULL OR id = $3)";

/// PostgreSQL-backed document store.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect to `url`, select `database`, and apply embedded migrations.
    ///
    /// `database` replaces any database named in the URL.
    pub async fn connect(url: &str, database: &str, attempts: u32) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(url)?.database(database);
        let pool = connect_with_retry(options, attempts).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(database, "document store migrations applied");

        Ok(Self { pool })
    }

    /// Wrap an existing pool. Migrations are the caller's responsibility.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn with_id(id: String, Json(mut body): Json<Document>) -> Document {
    body.insert(ID_FIELD.into(), Value::String(id));
    body
}

fn parse_stored_id(id: &str) -> Result<DocumentId, StoreError> {
    DocumentId::parse(id.trim()).map_err(|_| StoreError::CorruptId(id.to_string()))
}

fn strip_id(mut set: Document) -> Document {
    set.remove(ID_FIELD);
    set
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(id.as_str())
            .bind(Json(strip_id(doc)))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Json<Document>)>(&format!(
            "SELECT id, body FROM documents WHERE {MATCH_CLAUSE} ORDER BY seq"
        ))
        .bind(collection.as_str())
        .bind(Json(filter.fields()))
        .bind(filter.id())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id, body)| with_id(id, body)).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (String, Json<Document>)>(&format!(
            "SELECT id, body FROM documents WHERE {MATCH_CLAUSE} ORDER BY seq LIMIT 1"
        ))
        .bind(collection.as_str())
        .bind(Json(filter.fields()))
        .bind(filter.id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, body)| with_id(id, body)))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let (n,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM documents WHERE {MATCH_CLAUSE}"
        ))
        .bind(collection.as_str())
        .bind(Json(filter.fields()))
        .bind(filter.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(n).unwrap_or_default())
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let row: Option<(bool,)> = sqlx::query_as(&format!(
            "WITH target AS (
                 SELECT seq, body FROM documents WHERE {MATCH_CLAUSE}
                 ORDER BY seq LIMIT 1 FOR UPDATE
             )
             UPDATE documents d SET body = d.body || $4
             FROM target WHERE d.seq = target.seq
             RETURNING target.body IS DISTINCT FROM d.body"
        ))
        .bind(collection.as_str())
        .bind(Json(filter.fields()))
        .bind(filter.id())
        .bind(Json(strip_id(set)))
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some((modified,)) => UpdateOutcome {
                matched: 1,
                modified: u64::from(modified),
            },
            None => UpdateOutcome::default(),
        })
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let result = sqlx::query(&format!(
            "DELETE FROM documents WHERE seq = (
                 SELECT seq FROM documents WHERE {MATCH_CLAUSE} ORDER BY seq LIMIT 1
             )"
        ))
        .bind(collection.as_str())
        .bind(Json(filter.fields()))
        .bind(filter.id())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn upsert(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<(DocumentId, bool), StoreError> {
        let fields = filter.fields();
        let set = strip_id(set);
        let lock_key = format!(
            "{collection}:{}:{}",
            filter.id().unwrap_or_default(),
            Value::Object(fields.clone())
        );

        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&lock_key)
            .execute(&mut *tx)
            .await?;

        let existing: Option<(String,)> = sqlx::query_as(&format!(
            "SELECT id FROM documents WHERE {MATCH_CLAUSE} ORDER BY seq LIMIT 1 FOR UPDATE"
        ))
        .bind(collection.as_str())
        .bind(Json(&fields))
        .bind(filter.id())
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            Some((id,)) => {
                sqlx::query(
                    "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
                )
                .bind(collection.as_str())
                .bind(&id)
                .bind(Json(&set))
                .execute(&mut *tx)
                .await?;
                (parse_stored_id(&id)?, false)
            }
            None => {
                let id = DocumentId::generate();
                let mut body = fields;
                body.extend(set);
                sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
                    .bind(collection.as_str())
                    .bind(id.as_str())
                    .bind(Json(body))
                    .execute(&mut *tx)
                    .await?;
                (id, true)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
