//! Request entity representing one redirect through a short URL.

use chrono::{DateTime, Utc};

/// A resolution event recorded when a short URL is visited.
///
/// Immutable once written; removed only together with its owning
/// [`super::ShortUrl`] on a hard delete, which the service never performs.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRequest {
    pub id: i64,
    pub url_id: i64,
    pub made_at: DateTime<Utc>,
    pub client_host: String,
    pub client_port: i32,
}

impl UrlRequest {
    pub fn new(
        id: i64,
        url_id: i64,
        made_at: DateTime<Utc>,
        client_host: String,
        client_port: i32,
    ) -> Self {
        Self {
            id,
            url_id,
            made_at,
            client_host,
            client_port,
        }
    }
}

/// Network origin of a visitor, captured at redirect time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRequest {
    pub client_host: String,
    pub client_port: u16,
}

impl NewUrlRequest {
    pub fn new(client_host: impl Into<String>, client_port: u16) -> Self {
        Self {
            client_host: client_host.into(),
            client_port,
        }
    }
}

impl From<std::net::SocketAddr> for NewUrlRequest {
    fn from(addr: std::net::SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port())
    }
}
