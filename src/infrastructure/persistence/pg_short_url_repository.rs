//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, NewUrlRequest, ShortUrl, UrlRequest};
use crate::domain::repositories::{Resolution, ShortUrlRepository, UsageTotals};
use crate::error::AppError;

const SHORT_URL_COLUMNS: &str = "id, origin_url, short_url, short_form, created_at, deleted";

#[derive(FromRow)]
struct ShortUrlRow {
    id: i64,
    origin_url: String,
    short_url: String,
    short_form: String,
    created_at: DateTime<Utc>,
    deleted: bool,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(r: ShortUrlRow) -> Self {
        ShortUrl::new(
            r.id,
            r.origin_url,
            r.short_url,
            r.short_form,
            r.created_at,
            r.deleted,
        )
    }
}

#[derive(FromRow)]
struct RequestRow {
    id: i64,
    url_id: i64,
    made_at: DateTime<Utc>,
    client_host: String,
    client_port: i32,
}

impl From<RequestRow> for UrlRequest {
    fn from(r: RequestRow) -> Self {
        UrlRequest::new(r.id, r.url_id, r.made_at, r.client_host, r.client_port)
    }
}

#[derive(FromRow)]
struct TotalsRow {
    short_urls: i64,
    deleted_short_urls: i64,
    requests: i64,
}

/// PostgreSQL repository for short URLs and their request log.
///
/// Read-then-write operations run inside a transaction; the alias row is
/// locked `FOR SHARE` during a redirect so a concurrent soft delete waits
/// for the request insert to commit (or vice versa).
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn insert_sql() -> String {
        format!(
            "INSERT INTO short_urls (origin_url, short_url, short_form) \
             VALUES ($1, $2, $3) \
             RETURNING {SHORT_URL_COLUMNS}"
        )
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&Self::insert_sql())
            .bind(&new_url.origin_url)
            .bind(&new_url.short_url)
            .bind(&new_url.short_form)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn create_many(&self, new_urls: Vec<NewShortUrl>) -> Result<Vec<ShortUrl>, AppError> {
        let sql = Self::insert_sql();
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(new_urls.len());

        for new_url in &new_urls {
            let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
                .bind(&new_url.origin_url)
                .bind(&new_url.short_url)
                .bind(&new_url.short_form)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row.into());
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn find_by_short_form(&self, short_form: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {SHORT_URL_COLUMNS} FROM short_urls WHERE short_form = $1"
        ))
        .bind(short_form)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn record_request(
        &self,
        short_form: &str,
        request: NewUrlRequest,
    ) -> Result<Resolution, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {SHORT_URL_COLUMNS} FROM short_urls WHERE short_form = $1 FOR SHARE"
        ))
        .bind(short_form)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping `tx` on the early returns rolls back the read-only work.
        let Some(row) = row else {
            return Ok(Resolution::Missing);
        };
        let url = ShortUrl::from(row);
        if url.is_deleted() {
            return Ok(Resolution::Deleted(url));
        }

        sqlx::query("INSERT INTO requests (url_id, client_host, client_port) VALUES ($1, $2, $3)")
            .bind(url.id)
            .bind(&request.client_host)
            .bind(i32::from(request.client_port))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Resolution::Recorded(url))
    }

    async fn count_requests(&self, url_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM requests WHERE url_id = $1")
            .bind(url_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list_requests(
        &self,
        url_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UrlRequest>, AppError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, url_id, made_at, client_host, client_port
            FROM requests
            WHERE url_id = $1
            ORDER BY made_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(url_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_deleted(&self, short_form: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "UPDATE short_urls SET deleted = TRUE WHERE short_form = $1 RETURNING {SHORT_URL_COLUMNS}"
        ))
        .bind(short_form)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn totals(&self) -> Result<UsageTotals, AppError> {
        let row = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM short_urls) AS short_urls,
                (SELECT COUNT(*) FROM short_urls WHERE deleted) AS deleted_short_urls,
                (SELECT COUNT(*) FROM requests) AS requests
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(UsageTotals {
            short_urls: row.short_urls,
            deleted_short_urls: row.deleted_short_urls,
            requests: row.requests,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
