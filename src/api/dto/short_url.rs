//! DTOs for short URL creation and deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request to shorten one URL. Batch requests are a JSON array of these.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortUrlCreate {
    /// Absolute URL to redirect to. Stored exactly as submitted.
    #[validate(url(message = "Invalid URL format"))]
    pub origin_url: String,
}

/// Response to a single creation.
#[derive(Debug, Serialize)]
pub struct ShortUrlCreated {
    pub short_url: String,
}

/// One element of a batch creation response.
#[derive(Debug, Serialize)]
pub struct ShortUrlInfo {
    pub short_form: String,
    pub short_url: String,
}

/// Full representation of a short URL, returned by delete.
#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    pub id: i64,
    pub origin_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub short_form: String,
    pub deleted: bool,
}

impl From<ShortUrl> for ShortUrlCreated {
    fn from(url: ShortUrl) -> Self {
        Self {
            short_url: url.short_url,
        }
    }
}

impl From<ShortUrl> for ShortUrlInfo {
    fn from(url: ShortUrl) -> Self {
        Self {
            short_form: url.short_form,
            short_url: url.short_url,
        }
    }
}

impl From<ShortUrl> for ShortUrlResponse {
    fn from(url: ShortUrl) -> Self {
        Self {
            id: url.id,
            origin_url: url.origin_url,
            short_url: url.short_url,
            created_at: url.created_at,
            short_form: url.short_form,
            deleted: url.deleted,
        }
    }
}
