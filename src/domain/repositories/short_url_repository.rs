//! Repository trait for short URLs and their request log.

use crate::domain::entities::{NewShortUrl, NewUrlRequest, ShortUrl, UrlRequest};
use crate::error::AppError;
use async_trait::async_trait;

/// Outcome of resolving a short form inside a single store transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No record carries this short form.
    Missing,
    /// The record exists but is soft-deleted; nothing was written.
    Deleted(ShortUrl),
    /// The record is active and the request was recorded.
    Recorded(ShortUrl),
}

/// Store-wide counters, used by the admin CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageTotals {
    pub short_urls: i64,
    pub deleted_short_urls: i64,
    pub requests: i64,
}

/// Data access for [`ShortUrl`] and [`UrlRequest`] records.
///
/// Operations that combine a read with a conditional write
/// ([`Self::record_request`], [`Self::mark_deleted`]) run atomically, so a
/// redirect racing a delete observes the record either fully before or fully
/// after the delete.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryShortUrlRepository`] - in-process
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Persists one short URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a
    /// `short_form` collision.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Persists all short URLs in one transaction, preserving input order.
    ///
    /// Either every record is stored or none is.
    async fn create_many(&self, new_urls: Vec<NewShortUrl>) -> Result<Vec<ShortUrl>, AppError>;

    /// Finds a record by short form, deleted or not.
    async fn find_by_short_form(&self, short_form: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Looks up the short form and, when it is active, records a request
    /// against it within the same transaction.
    async fn record_request(
        &self,
        short_form: &str,
        request: NewUrlRequest,
    ) -> Result<Resolution, AppError>;

    /// Counts every request recorded for a short URL.
    async fn count_requests(&self, url_id: i64) -> Result<i64, AppError>;

    /// Returns a page of requests in creation order.
    async fn list_requests(
        &self,
        url_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UrlRequest>, AppError>;

    /// Sets `deleted` on the record and returns it.
    ///
    /// Returns `Ok(None)` if the short form is unknown. Idempotent.
    async fn mark_deleted(&self, short_form: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Aggregated counters over the whole store.
    async fn totals(&self) -> Result<UsageTotals, AppError>;

    /// Round-trips to the store, for health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
