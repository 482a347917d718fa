//! `PostgreSQL` backend for the document store.
//!
//! Documents live in a single `documents` table keyed by
//! `(collection, id)`. Equality filters use JSONB containment so they can be
//! served by the GIN index.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use safar_core::DocumentId;

use super::{Document, JsonMap, MergeMode, Query, RepositoryError, merge_json};

/// Internal row type for `documents` queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<JsonMap>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = RepositoryError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let id = DocumentId::parse(&row.id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid document id in database: {e}"))
        })?;

        Ok(Self {
            id,
            data: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Document store over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(super) async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    pub(super) async fn list(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<Document>, RepositoryError> {
        let sql = if query.is_newest_first() {
            r"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND data @> $2
            ORDER BY created_at DESC, id DESC
            "
        } else {
            r"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND data @> $2
            ORDER BY id
            "
        };

        let rows = sqlx::query_as::<_, DocumentRow>(sql)
            .bind(collection)
            .bind(Json(query.filters()))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    pub(super) async fn insert(
        &self,
        collection: &str,
        id: &DocumentId,
        data: JsonMap,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(super) async fn set(
        &self,
        collection: &str,
        id: &DocumentId,
        data: JsonMap,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            ",
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(super) async fn merge(
        &self,
        collection: &str,
        id: &DocumentId,
        patch: JsonMap,
        mode: MergeMode,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if mode == MergeMode::Upsert {
            sqlx::query(
                r"
                INSERT INTO documents (collection, id)
                VALUES ($1, $2)
                ON CONFLICT (collection, id) DO NOTHING
                ",
            )
            .bind(collection)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;
        }

        // Row lock keeps concurrent merges on the same document serialized.
        let current: Option<Json<JsonMap>> = sqlx::query_scalar(
            r"
            SELECT data FROM documents
            WHERE collection = $1 AND id = $2
            FOR UPDATE
            ",
        )
        .bind(collection)
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(Json(mut data)) = current else {
            return Err(RepositoryError::NotFound);
        };

        merge_json(&mut data, patch);

        sqlx::query(
            r"
            UPDATE documents
            SET data = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Json(data))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub(super) async fn delete(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
