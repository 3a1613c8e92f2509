//! SQLite document store
//!
//! Every record is one JSON document in the `documents` table, keyed by
//! `(collection, id)`. Field lookups go through `json_extract`.

use std::path::Path;

use prometheus::HistogramTimer;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use super::repository::{Document, Repository};
use crate::error::AppError;
use crate::metrics::{DB_QUERIES_TOTAL, DB_QUERY_DURATION_SECONDS};

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

fn observe(operation: &str, collection: &str) -> HistogramTimer {
    DB_QUERIES_TOTAL
        .with_label_values(&[operation, collection])
        .inc();
    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[operation, collection])
        .start_timer()
}

/// Build a JSON path for a top-level field.
///
/// Field names are interpolated into SQL so that expression indexes apply;
/// anything other than an ASCII identifier is rejected.
fn json_path(field: &str) -> Result<String, AppError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(AppError::Validation(format!(
            "invalid document field name: {field:?}"
        )));
    }
    Ok(format!("$.{field}"))
}

/// Escape LIKE wildcards so `fragment` matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn decode_all<T: Document>(bodies: Vec<String>) -> Result<Vec<T>, AppError> {
    bodies
        .iter()
        .map(|body| serde_json::from_str(body).map_err(AppError::from))
        .collect()
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        Self::connect_with_pool_size(path, 5).await
    }

    /// Connect with an explicit connection pool size.
    pub async fn connect_with_pool_size(
        path: &Path,
        max_connections: u32,
    ) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!(path = %path.display(), "Database connected and migrated successfully");

        Ok(Self { pool })
    }

    /// Count documents in a collection
    pub async fn count(&self, collection: &str) -> Result<i64, AppError> {
        let _timer = observe("COUNT", collection);
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

impl<T: Document> Repository<T> for Database {
    async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        let _timer = observe("GET", T::COLLECTION);
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(T::COLLECTION)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        body.map(|body| serde_json::from_str(&body).map_err(AppError::from))
            .transpose()
    }

    async fn insert(&self, record: &T) -> Result<(), AppError> {
        let _timer = observe("INSERT", T::COLLECTION);
        let body = serde_json::to_string(record)?;
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES (?, ?, ?)
            ON CONFLICT (collection, id) DO NOTHING
            "#,
        )
        .bind(T::COLLECTION)
        .bind(record.key())
        .bind(&body)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "{} key already exists: {}",
                T::COLLECTION,
                record.key()
            )));
        }

        Ok(())
    }

    async fn put(&self, record: &T) -> Result<(), AppError> {
        let _timer = observe("PUT", T::COLLECTION);
        let body = serde_json::to_string(record)?;
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES (?, ?, ?)
            ON CONFLICT (collection, id)
            DO UPDATE SET body = excluded.body, updated_at = datetime('now')
            "#,
        )
        .bind(T::COLLECTION)
        .bind(record.key())
        .bind(&body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let _timer = observe("DELETE", T::COLLECTION);
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(T::COLLECTION)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let _timer = observe("EXISTS", T::COLLECTION);
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM documents WHERE collection = ? AND id = ?")
                .bind(T::COLLECTION)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }

    async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<T>, AppError> {
        let path = json_path(field)?;
        let _timer = observe("FIND", T::COLLECTION);
        let query = format!(
            "SELECT body FROM documents \
             WHERE collection = ? AND json_extract(body, '{path}') = ? \
             ORDER BY rowid"
        );
        let bodies: Vec<String> = sqlx::query_scalar(&query)
            .bind(T::COLLECTION)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        decode_all(bodies)
    }

    async fn search_by_field(&self, field: &str, fragment: &str) -> Result<Vec<T>, AppError> {
        let path = json_path(field)?;
        let _timer = observe("SEARCH", T::COLLECTION);
        let query = format!(
            "SELECT body FROM documents \
             WHERE collection = ? AND json_extract(body, '{path}') LIKE ? ESCAPE '\\' \
             ORDER BY rowid"
        );
        let bodies: Vec<String> = sqlx::query_scalar(&query)
            .bind(T::COLLECTION)
            .bind(like_pattern(fragment))
            .fetch_all(&self.pool)
            .await?;

        decode_all(bodies)
    }

    async fn all(&self) -> Result<Vec<T>, AppError> {
        let _timer = observe("ALL", T::COLLECTION);
        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? ORDER BY rowid")
                .bind(T::COLLECTION)
                .fetch_all(&self.pool)
                .await?;

        decode_all(bodies)
    }
}
