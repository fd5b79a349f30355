//! `PostgreSQL` document backend.
//!
//! Every collection lives in the `document` table as JSONB bodies keyed by
//! `(collection, id)`; `seq` preserves insertion order. Queries are built at
//! runtime with `QueryBuilder` because filters and projections vary per call.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use shopfront_core::{DocumentId, RawDocument};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::StoreError;
use super::document::{Collection, DocumentStore, Filter, Projection, assign_id};

/// Rows per `INSERT` statement when seeding (three bind parameters each).
const INSERT_BATCH_SIZE: usize = 1000;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Internal row type for document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    body: Json<RawDocument>,
}

/// Document store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map unique violations on `(collection, id)` to `DuplicateId`.
fn map_insert_error(e: sqlx::Error, collection: Collection, detail: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::DuplicateId {
            collection,
            detail: detail.to_owned(),
        };
    }
    StoreError::Database(e)
}

/// Append the `WHERE` clause for `filter` to a query selecting from `document`.
fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, collection: Collection, filter: &'a Filter) {
    qb.push(" FROM document WHERE collection = ");
    qb.push_bind(collection.as_str());

    match filter {
        Filter::All => {}
        Filter::Eq { field, value } => {
            qb.push(" AND body -> ");
            qb.push_bind(field.as_str());
            qb.push(" = ");
            qb.push_bind(Json(value));
        }
        Filter::In { field, values } => {
            qb.push(" AND body -> ");
            qb.push_bind(field.as_str());
            qb.push(" IN (SELECT jsonb_array_elements(");
            qb.push_bind(Json(values));
            qb.push("))");
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: RawDocument,
    ) -> Result<DocumentId, StoreError> {
        let id = assign_id(&mut document)?;

        sqlx::query("INSERT INTO document (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(id.as_str())
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, collection, id.as_str()))?;

        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let mut rows = Vec::with_capacity(documents.len());
        for mut document in documents {
            let id = assign_id(&mut document)?;
            rows.push((id, document));
        }

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        for chunk in rows.chunks(INSERT_BATCH_SIZE) {
            let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO document (collection, id, body) ");
            qb.push_values(chunk, |mut row, (id, document)| {
                row.push_bind(collection.as_str())
                    .push_bind(id.as_str())
                    .push_bind(Json(document));
            });
            qb.build()
                .execute(&mut *tx)
                .await
                .map_err(|e| map_insert_error(e, collection, "batch contains an existing _id"))?;
        }
        tx.commit().await?;

        Ok(rows.into_iter().map(|(id, _)| id).collect())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<RawDocument>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        match projection {
            Some(projection) => {
                qb.push(
                    "(SELECT COALESCE(jsonb_object_agg(key, value), '{}'::jsonb) \
                     FROM jsonb_each(body) WHERE key = '_id' OR key = ANY(",
                );
                qb.push_bind(projection.fields().to_vec());
                qb.push(")) AS body");
            }
            None => {
                qb.push("body");
            }
        }
        push_filter(&mut qb, collection, filter);
        qb.push(" ORDER BY seq");

        let rows: Vec<DocumentRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(|row| row.body.0).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sql_for_all() {
        let filter = Filter::All;
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body");
        push_filter(&mut qb, Collection::Products, &filter);
        assert_eq!(qb.sql(), "SELECT body FROM document WHERE collection = $1");
    }

    #[test]
    fn test_filter_sql_for_eq() {
        let filter = Filter::equals("name", "Wireless Mouse");
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body");
        push_filter(&mut qb, Collection::Products, &filter);
        assert_eq!(
            qb.sql(),
            "SELECT body FROM document WHERE collection = $1 AND body -> $2 = $3"
        );
    }

    #[test]
    fn test_filter_sql_for_in() {
        let filter = Filter::any_of("productId", [1, 2]);
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body");
        push_filter(&mut qb, Collection::Skus, &filter);
        assert_eq!(
            qb.sql(),
            "SELECT body FROM document WHERE collection = $1 \
             AND body -> $2 IN (SELECT jsonb_array_elements($3))"
        );
    }

    #[test]
    fn test_unique_violation_detection_falls_through() {
        let err = map_insert_error(sqlx::Error::RowNotFound, Collection::Orders, "ORD-1");
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
