//! Short URL entity.

use chrono::{DateTime, Utc};

/// A shortening mapping.
///
/// Records are never physically removed: deletion only flips `deleted`,
/// and that flag is never cleared again.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortUrl {
    pub id: i64,
    pub origin_url: String,
    pub short_url: String,
    pub short_form: String,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}

impl ShortUrl {
    pub fn new(
        id: i64,
        origin_url: String,
        short_url: String,
        short_form: String,
        created_at: DateTime<Utc>,
        deleted: bool,
    ) -> Self {
        Self {
            id,
            origin_url,
            short_url,
            short_form,
            created_at,
            deleted,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Input data for persisting a new short URL.
///
/// `short_form` and `short_url` are produced by
/// [`crate::utils::alias::AliasGenerator`] before the record reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortUrl {
    pub origin_url: String,
    pub short_url: String,
    pub short_form: String,
}
