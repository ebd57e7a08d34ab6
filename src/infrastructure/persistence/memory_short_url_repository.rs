//! In-process implementation of the short URL repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::{NewShortUrl, NewUrlRequest, ShortUrl, UrlRequest};
use crate::domain::repositories::{Resolution, ShortUrlRepository, UsageTotals};
use crate::error::AppError;

#[derive(Default)]
struct Store {
    urls: Vec<ShortUrl>,
    requests: Vec<UrlRequest>,
}

impl Store {
    fn position(&self, short_form: &str) -> Option<usize> {
        self.urls.iter().position(|u| u.short_form == short_form)
    }

    fn insert(&mut self, new_url: NewShortUrl) -> ShortUrl {
        let url = ShortUrl::new(
            self.urls.len() as i64 + 1,
            new_url.origin_url,
            new_url.short_url,
            new_url.short_form,
            Utc::now(),
            false,
        );
        self.urls.push(url.clone());
        url
    }
}

/// A repository that keeps everything in memory behind one lock.
///
/// Holding the lock for the whole operation gives the same atomicity as the
/// PostgreSQL transactions. Data is lost on restart.
///
/// # Use Cases
///
/// - Handler and end-to-end tests without a database
/// - Local runs with `STORAGE=memory`
#[derive(Default)]
pub struct MemoryShortUrlRepository {
    store: Mutex<Store>,
}

impl MemoryShortUrlRepository {
    pub fn new() -> Self {
        debug!("Using in-memory short URL storage");
        Self::default()
    }
}

fn collision(short_form: &str) -> AppError {
    AppError::internal("Short form collision", json!({ "short_form": short_form }))
}

#[async_trait]
impl ShortUrlRepository for MemoryShortUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut store = self.store.lock().await;
        if store.position(&new_url.short_form).is_some() {
            return Err(collision(&new_url.short_form));
        }
        Ok(store.insert(new_url))
    }

    async fn create_many(&self, new_urls: Vec<NewShortUrl>) -> Result<Vec<ShortUrl>, AppError> {
        let mut store = self.store.lock().await;

        for (i, new_url) in new_urls.iter().enumerate() {
            let repeated = new_urls[..i]
                .iter()
                .any(|other| other.short_form == new_url.short_form);
            if repeated || store.position(&new_url.short_form).is_some() {
                return Err(collision(&new_url.short_form));
            }
        }

        Ok(new_urls.into_iter().map(|n| store.insert(n)).collect())
    }

    async fn find_by_short_form(&self, short_form: &str) -> Result<Option<ShortUrl>, AppError> {
        let store = self.store.lock().await;
        Ok(store.position(short_form).map(|i| store.urls[i].clone()))
    }

    async fn record_request(
        &self,
        short_form: &str,
        request: NewUrlRequest,
    ) -> Result<Resolution, AppError> {
        let mut store = self.store.lock().await;

        let Some(index) = store.position(short_form) else {
            return Ok(Resolution::Missing);
        };
        let url = store.urls[index].clone();
        if url.is_deleted() {
            return Ok(Resolution::Deleted(url));
        }

        let id = store.requests.len() as i64 + 1;
        store.requests.push(UrlRequest::new(
            id,
            url.id,
            Utc::now(),
            request.client_host,
            i32::from(request.client_port),
        ));

        Ok(Resolution::Recorded(url))
    }

    async fn count_requests(&self, url_id: i64) -> Result<i64, AppError> {
        let store = self.store.lock().await;
        Ok(store.requests.iter().filter(|r| r.url_id == url_id).count() as i64)
    }

    async fn list_requests(
        &self,
        url_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UrlRequest>, AppError> {
        let store = self.store.lock().await;
        Ok(store
            .requests
            .iter()
            .filter(|r| r.url_id == url_id)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn mark_deleted(&self, short_form: &str) -> Result<Option<ShortUrl>, AppError> {
        let mut store = self.store.lock().await;
        Ok(store.position(short_form).map(|i| {
            store.urls[i].deleted = true;
            store.urls[i].clone()
        }))
    }

    async fn totals(&self) -> Result<UsageTotals, AppError> {
        let store = self.store.lock().await;
        Ok(UsageTotals {
            short_urls: store.urls.len() as i64,
            deleted_short_urls: store.urls.iter().filter(|u| u.deleted).count() as i64,
            requests: store.requests.len() as i64,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
