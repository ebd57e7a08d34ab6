//! Short URL lifecycle and request accounting.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewShortUrl, NewUrlRequest, ShortUrl, UrlRequest};
use crate::domain::repositories::{Resolution, ShortUrlRepository, UsageTotals};
use crate::error::AppError;
use crate::utils::alias::AliasGenerator;

/// Default number of requests returned by a full status query.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Validated parameters of a status query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusQuery {
    pub full_info: bool,
    pub limit: i64,
    pub offset: i64,
}

impl StatusQuery {
    /// Applies defaults and validates pagination.
    ///
    /// # Defaults
    ///
    /// - `full_info`: `false` (count only)
    /// - `limit`: 10
    /// - `offset`: 0
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `limit < 1` or `offset < 0`.
    pub fn new(
        full_info: Option<bool>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Self, AppError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = offset.unwrap_or(0);

        if limit < 1 {
            return Err(AppError::bad_request(
                "max-size must be at least 1",
                json!({ "max_size": limit }),
            ));
        }

        if offset < 0 {
            return Err(AppError::bad_request(
                "offset must not be negative",
                json!({ "offset": offset }),
            ));
        }

        Ok(Self {
            full_info: full_info.unwrap_or(false),
            limit,
            offset,
        })
    }
}

impl Default for StatusQuery {
    fn default() -> Self {
        Self {
            full_info: false,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Result of a status query.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlStatus {
    /// Total number of recorded requests.
    Count(i64),
    /// One page of the request log.
    Requests(Vec<UrlRequest>),
}

/// Service owning create, redirect, status and soft-delete of short URLs.
///
/// Missing and deleted short forms are reported as distinct errors
/// ([`AppError::NotFound`] and [`AppError::Gone`]); deletion is terminal.
pub struct ShortUrlService {
    repository: Arc<dyn ShortUrlRepository>,
    aliases: AliasGenerator,
}

impl ShortUrlService {
    pub fn new(repository: Arc<dyn ShortUrlRepository>, aliases: AliasGenerator) -> Self {
        Self {
            repository,
            aliases,
        }
    }

    /// Creates one short URL for `origin_url`.
    ///
    /// Duplicate origin URLs are allowed and produce distinct records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failure, including a
    /// short form collision.
    pub async fn create(&self, origin_url: String) -> Result<ShortUrl, AppError> {
        let (short_form, short_url) = self.aliases.next_alias();

        let created = self
            .repository
            .create(NewShortUrl {
                origin_url,
                short_url,
                short_form,
            })
            .await?;

        debug!(short_form = %created.short_form, origin_url = %created.origin_url, "Short URL created");
        metrics::counter!("short_urls_created_total").increment(1);

        Ok(created)
    }

    /// Creates short URLs for every origin URL in a single atomic batch.
    ///
    /// The result preserves input order and every element carries its own
    /// short form; forms are distinct within the batch.
    pub async fn create_batch(&self, origin_urls: Vec<String>) -> Result<Vec<ShortUrl>, AppError> {
        let mut seen = HashSet::with_capacity(origin_urls.len());
        let mut new_urls = Vec::with_capacity(origin_urls.len());

        for origin_url in origin_urls {
            let (short_form, short_url) = loop {
                let alias = self.aliases.next_alias();
                if seen.insert(alias.0.clone()) {
                    break alias;
                }
            };

            new_urls.push(NewShortUrl {
                origin_url,
                short_url,
                short_form,
            });
        }

        let created = self.repository.create_many(new_urls).await?;

        debug!(count = created.len(), "Short URL batch created");
        metrics::counter!("short_urls_created_total").increment(created.len() as u64);

        Ok(created)
    }

    /// Finds a short URL by short form, including deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the short form is unknown.
    pub async fn lookup(&self, short_form: &str) -> Result<ShortUrl, AppError> {
        self.repository
            .find_by_short_form(short_form)
            .await?
            .ok_or_else(|| not_found(short_form))
    }

    /// Resolves a short form to its origin URL and records the visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown and [`AppError::Gone`] for
    /// deleted short forms; no request is recorded in either case.
    pub async fn redirect(
        &self,
        short_form: &str,
        client: NewUrlRequest,
    ) -> Result<String, AppError> {
        match self.repository.record_request(short_form, client).await? {
            Resolution::Recorded(url) => {
                metrics::counter!("redirects_total").increment(1);
                Ok(url.origin_url)
            }
            Resolution::Deleted(_) => {
                warn!(short_form, "Redirect to deleted short URL");
                Err(gone(short_form))
            }
            Resolution::Missing => {
                warn!(short_form, "Redirect to unknown short URL");
                Err(not_found(short_form))
            }
        }
    }

    /// Reports usage of a short URL: a request count, or a page of the
    /// request log when `query.full_info` is set.
    ///
    /// # Errors
    ///
    /// Same as [`Self::redirect`].
    pub async fn status(&self, short_form: &str, query: StatusQuery) -> Result<UrlStatus, AppError> {
        let url = self.lookup(short_form).await?;
        if url.is_deleted() {
            return Err(gone(short_form));
        }

        if query.full_info {
            let requests = self
                .repository
                .list_requests(url.id, query.limit, query.offset)
                .await?;
            Ok(UrlStatus::Requests(requests))
        } else {
            let count = self.repository.count_requests(url.id).await?;
            Ok(UrlStatus::Count(count))
        }
    }

    /// Soft-deletes a short URL and returns the updated record.
    ///
    /// Deleting an already deleted short URL succeeds again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the short form is unknown.
    pub async fn delete(&self, short_form: &str) -> Result<ShortUrl, AppError> {
        let url = self
            .repository
            .mark_deleted(short_form)
            .await?
            .ok_or_else(|| not_found(short_form))?;

        info!(short_form, "Short URL deleted");
        metrics::counter!("short_urls_deleted_total").increment(1);

        Ok(url)
    }

    /// Store-wide counters.
    pub async fn totals(&self) -> Result<UsageTotals, AppError> {
        self.repository.totals().await
    }

    /// Checks that the store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn not_found(short_form: &str) -> AppError {
    AppError::not_found("Item not found", json!({ "short_form": short_form }))
}

fn gone(short_form: &str) -> AppError {
    AppError::gone("Item is deleted", json!({ "short_form": short_form }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockShortUrlRepository;
    use chrono::Utc;

    fn aliases() -> AliasGenerator {
        AliasGenerator::new("http", "127.0.0.1", 8080)
    }

    fn stored(new_url: NewShortUrl, id: i64) -> ShortUrl {
        ShortUrl::new(
            id,
            new_url.origin_url,
            new_url.short_url,
            new_url.short_form,
            Utc::now(),
            false,
        )
    }

    fn test_url(short_form: &str, deleted: bool) -> ShortUrl {
        ShortUrl::new(
            7,
            "http://ya.ru".to_string(),
            format!("http://127.0.0.1:8080/api/v1/short_url/{short_form}"),
            short_form.to_string(),
            Utc::now(),
            deleted,
        )
    }

    fn service(repo: MockShortUrlRepository) -> ShortUrlService {
        ShortUrlService::new(Arc::new(repo), aliases())
    }

    #[tokio::test]
    async fn test_create_generates_alias() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_create()
            .withf(|new_url| {
                new_url.origin_url == "http://ya.ru"
                    && new_url.short_form.len() == 6
                    && new_url.short_url.ends_with(&new_url.short_form)
            })
            .times(1)
            .returning(|new_url| Ok(stored(new_url, 1)));

        let created = service(repo).create("http://ya.ru".to_string()).await.unwrap();

        assert_eq!(created.origin_url, "http://ya.ru");
        assert!(!created.deleted);
        assert!(
            created
                .short_url
                .starts_with("http://127.0.0.1:8080/api/v1/short_url/")
        );
    }

    #[tokio::test]
    async fn test_create_propagates_storage_failure() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let result = service(repo).create("http://ya.ru".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_batch_preserves_order_with_distinct_forms() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_create_many()
            .withf(|new_urls| new_urls.len() == 3)
            .times(1)
            .returning(|new_urls| {
                Ok(new_urls
                    .into_iter()
                    .enumerate()
                    .map(|(i, n)| stored(n, i as i64 + 1))
                    .collect())
            });

        let created = service(repo)
            .create_batch(vec![
                "http://a.com".to_string(),
                "http://b.com".to_string(),
                "http://a.com".to_string(),
            ])
            .await
            .unwrap();

        let origins: Vec<_> = created.iter().map(|u| u.origin_url.as_str()).collect();
        assert_eq!(origins, ["http://a.com", "http://b.com", "http://a.com"]);

        let forms: HashSet<_> = created.iter().map(|u| u.short_form.clone()).collect();
        assert_eq!(forms.len(), 3);
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_by_short_form()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repo).lookup("nope00").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lookup_returns_deleted_record() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_by_short_form()
            .withf(|form| form == "gone01")
            .times(1)
            .returning(|form| Ok(Some(test_url(form, true))));

        let url = service(repo).lookup("gone01").await.unwrap();

        assert!(url.deleted);
    }

    #[tokio::test]
    async fn test_redirect_returns_origin_url() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_record_request()
            .withf(|form, req| form == "abc123" && req.client_host == "10.0.0.1" && req.client_port == 4000)
            .times(1)
            .returning(|form, _| Ok(Resolution::Recorded(test_url(form, false))));

        let origin = service(repo)
            .redirect("abc123", NewUrlRequest::new("10.0.0.1", 4000))
            .await
            .unwrap();

        assert_eq!(origin, "http://ya.ru");
    }

    #[tokio::test]
    async fn test_redirect_unknown_is_not_found() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_record_request()
            .times(1)
            .returning(|_, _| Ok(Resolution::Missing));

        let result = service(repo)
            .redirect("nope00", NewUrlRequest::new("10.0.0.1", 4000))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_redirect_deleted_is_gone() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_record_request()
            .times(1)
            .returning(|form, _| Ok(Resolution::Deleted(test_url(form, true))));

        let result = service(repo)
            .redirect("gone01", NewUrlRequest::new("10.0.0.1", 4000))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_status_count_by_default() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_by_short_form()
            .times(1)
            .returning(|form| Ok(Some(test_url(form, false))));
        repo.expect_count_requests()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(2));
        repo.expect_list_requests().times(0);

        let status = service(repo)
            .status("abc123", StatusQuery::default())
            .await
            .unwrap();

        assert_eq!(status, UrlStatus::Count(2));
    }

    #[tokio::test]
    async fn test_status_full_info_passes_pagination() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_by_short_form()
            .times(1)
            .returning(|form| Ok(Some(test_url(form, false))));
        repo.expect_list_requests()
            .withf(|id, limit, offset| *id == 7 && *limit == 5 && *offset == 3)
            .times(1)
            .returning(|url_id, _, _| {
                Ok(vec![UrlRequest::new(
                    1,
                    url_id,
                    Utc::now(),
                    "127.0.0.1".to_string(),
                    5555,
                )])
            });

        let query = StatusQuery::new(Some(true), Some(5), Some(3)).unwrap();
        let status = service(repo).status("abc123", query).await.unwrap();

        match status {
            UrlStatus::Requests(requests) => {
                assert_eq!(requests.len(), 1);
                assert_eq!(requests[0].client_port, 5555);
            }
            other => panic!("expected requests, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_deleted_is_gone() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_by_short_form()
            .times(1)
            .returning(|form| Ok(Some(test_url(form, true))));
        repo.expect_count_requests().times(0);

        let result = service(repo).status("gone01", StatusQuery::default()).await;

        assert!(matches!(result.unwrap_err(), AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_delete_returns_updated_record() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_mark_deleted()
            .times(1)
            .returning(|form| Ok(Some(test_url(form, true))));

        let url = service(repo).delete("abc123").await.unwrap();

        assert!(url.deleted);
        assert_eq!(url.short_form, "abc123");
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_mark_deleted().times(1).returning(|_| Ok(None));

        let result = service(repo).delete("nope00").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_status_query_defaults() {
        let query = StatusQuery::new(None, None, None).unwrap();
        assert_eq!(query, StatusQuery::default());
        assert!(!query.full_info);
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn test_status_query_rejects_zero_limit() {
        let result = StatusQuery::new(Some(true), Some(0), None);
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_status_query_rejects_negative_offset() {
        let result = StatusQuery::new(Some(true), None, Some(-1));
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_status_query_accepts_minimum_limit() {
        let query = StatusQuery::new(Some(true), Some(1), Some(0)).unwrap();
        assert_eq!(query.limit, 1);
    }
}
