use async_trait::async_trait;
use jiff::Timestamp;
use keyhole_core::repository::{AccessRecord, ReadRepository, RecordKey, Repository, Result};
use keyhole_core::{ContextTag, StorageError};
use sqlx::{MySqlPool, Row};
use tracing::debug;

/// MySQL implementation of the repository contract.
///
/// Records live in `access_records` (see `ddl/mysql/access_records.sql`),
/// unique on `(context, access_code)`. The access code column is binary, so
/// lookups are exact byte matches. Reads only return active records (no
/// `expire_at`, or `expire_at` in the future).
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }
}

/// Width of the `access_code` column. A longer code cannot be stored, so it
/// can never match.
const ACCESS_CODE_COLUMN_BYTES: usize = 1500;

fn fits_column(key: &RecordKey) -> bool {
    key.code.as_str().len() <= ACCESS_CODE_COLUMN_BYTES
}

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn parse_expire_at(seconds: Option<i64>) -> Result<Option<Timestamp>> {
    seconds
        .map(|value| {
            Timestamp::from_second(value).map_err(|e| {
                StorageError::InvalidData(format!("invalid expire_at timestamp '{}': {e}", value))
            })
        })
        .transpose()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, key: &RecordKey) -> Result<Option<AccessRecord>> {
        if !fits_column(key) {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            SELECT link, encrypted_link, expire_at
            FROM access_records
            WHERE context = ?
              AND access_code = ?
              AND (expire_at IS NULL OR expire_at > ?)
            LIMIT 1
            "#,
        )
        .bind(key.context.as_str())
        .bind(key.code.as_str().as_bytes())
        .bind(now_unix_seconds())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let link: String = row.try_get("link").map_err(map_sqlx_error)?;
        let encrypted_link: Option<String> =
            row.try_get("encrypted_link").map_err(map_sqlx_error)?;
        let expire_at_raw: Option<i64> = row.try_get("expire_at").map_err(map_sqlx_error)?;

        Ok(Some(AccessRecord {
            link,
            encrypted_link,
            expire_at: parse_expire_at(expire_at_raw)?,
        }))
    }

    async fn exists(&self, key: &RecordKey) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn contains_link(&self, link: &str) -> Result<bool> {
        let found = sqlx::query(
            r#"
            SELECT 1
            FROM access_records
            WHERE (link = ? OR encrypted_link = ?)
              AND (expire_at IS NULL OR expire_at > ?)
            LIMIT 1
            "#,
        )
        .bind(link)
        .bind(link)
        .bind(now_unix_seconds())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(found)
    }

    async fn contexts(&self) -> Result<Vec<ContextTag>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT context
            FROM access_records
            WHERE expire_at IS NULL OR expire_at > ?
            ORDER BY context
            "#,
        )
        .bind(now_unix_seconds())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                let raw: String = row.try_get("context").map_err(map_sqlx_error)?;
                ContextTag::new(raw).map_err(|e| StorageError::InvalidData(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, key: &RecordKey, record: AccessRecord) -> Result<()> {
        if !fits_column(key) {
            return Err(StorageError::InvalidData(format!(
                "access code exceeds {ACCESS_CODE_COLUMN_BYTES} bytes"
            )));
        }

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // An expired row no longer occupies its key.
        let purged = sqlx::query(
            r#"
            DELETE FROM access_records
            WHERE context = ?
              AND access_code = ?
              AND expire_at IS NOT NULL
              AND expire_at <= ?
            "#,
        )
        .bind(key.context.as_str())
        .bind(key.code.as_str().as_bytes())
        .bind(now_unix_seconds())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if purged.rows_affected() > 0 {
            debug!(context = %key.context, "replacing expired access record");
        }

        let result = sqlx::query(
            r#"
            INSERT INTO access_records (context, access_code, link, encrypted_link, expire_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(key.context.as_str())
        .bind(key.code.as_str().as_bytes())
        .bind(record.link)
        .bind(record.encrypted_link)
        .bind(record.expire_at.map(|ts| ts.as_second()))
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => tx.commit().await.map_err(map_sqlx_error),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(format!(
                "access code already registered in context '{}'",
                key.context
            ))),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete(&self, key: &RecordKey) -> Result<bool> {
        if !fits_column(key) {
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM access_records
            WHERE context = ?
              AND access_code = ?
            "#,
        )
        .bind(key.context.as_str())
        .bind(key.code.as_str().as_bytes())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
