use async_trait::async_trait;
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Document;
use crate::database::repository::{duplicate_name, not_found, EntryFilter, Record, Repository};

const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed store: one table per collection, the document kept as JSONB
pub struct PgRepository<T> {
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T: Document> PgRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    fn table() -> String {
        format!("\"{}\"", T::COLLECTION)
    }

    /// Creates the collection table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let ddl = format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                deprecated BOOLEAN NOT NULL DEFAULT FALSE,
                document JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"#,
            Self::table()
        );
        sqlx::query(&ddl).execute(&self.pool).await?;

        tracing::debug!("Ensured table for collection {}", T::COLLECTION);
        Ok(())
    }

    fn decode(row: PgRow) -> Result<Record<T>, DatabaseError> {
        let id: Uuid = row.try_get("id")?;
        let Json(document): Json<T> = row.try_get("document")?;
        Ok(Record::new(id, document))
    }

    fn map_write_error(err: sqlx::Error, name: &str) -> DatabaseError {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                duplicate_name::<T>(name)
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

#[async_trait]
impl<T: Document> Repository<T> for PgRepository<T> {
    async fn list(&self, filter: EntryFilter) -> Result<Vec<Record<T>>, DatabaseError> {
        let sql = format!(
            "SELECT id, document FROM {} WHERE $1 OR deprecated = FALSE ORDER BY created_at, id",
            Self::table()
        );
        let rows = sqlx::query(&sql)
            .bind(filter.include_deprecated)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::decode).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Record<T>, DatabaseError> {
        let sql = format!("SELECT id, document FROM {} WHERE id = $1", Self::table());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::decode(row),
            None => Err(not_found::<T>(id)),
        }
    }

    async fn insert(&self, document: T) -> Result<Record<T>, DatabaseError> {
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO {} (id, name, deprecated, document) VALUES ($1, $2, $3, $4)",
            Self::table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(document.name())
            .bind(document.is_deprecated())
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(e, document.name()))?;

        Ok(Record::new(id, document))
    }

    async fn save(&self, record: &Record<T>) -> Result<(), DatabaseError> {
        let sql = format!(
            "UPDATE {} SET name = $2, deprecated = $3, document = $4, updated_at = now() WHERE id = $1",
            Self::table()
        );
        let result = sqlx::query(&sql)
            .bind(record.id)
            .bind(record.document.name())
            .bind(record.document.is_deprecated())
            .bind(Json(&record.document))
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(e, record.document.name()))?;

        if result.rows_affected() == 0 {
            return Err(not_found::<T>(record.id));
        }
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(not_found::<T>(id));
        }
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Record<T>>, DatabaseError> {
        let sql = format!("SELECT id, document FROM {} WHERE name = $1", Self::table());
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::decode).transpose()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
