//! Core domain entities.
//!
//! - [`ShortUrl`] - A shortening mapping from a short form to an origin URL
//! - [`UrlRequest`] - A single resolution (redirect) of a short URL
//!
//! Creation inputs are separate structs (`NewShortUrl`, `NewUrlRequest`)
//! because identity and timestamps are assigned by the store.

pub mod short_url;
pub mod url_request;

pub use short_url::{NewShortUrl, ShortUrl};
pub use url_request::{NewUrlRequest, UrlRequest};
