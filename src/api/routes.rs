//! API route configuration.

use crate::api::handlers::{
    create_handler, delete_handler, redirect_handler, shorten_handler, status_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Versioned API prefix.
pub const API_PREFIX: &str = "/api/v1";

/// Short URL routes, nested under [`API_PREFIX`].
///
/// # Endpoints
///
/// - `POST   /short_url`             - Create one short URL
/// - `POST   /short_url/shorten`     - Create a batch of short URLs
/// - `GET    /short_url/{id}`        - Redirect (records the visit)
/// - `DELETE /short_url/{id}`        - Soft-delete
/// - `GET    /short_url/{id}/status` - Visit count or visit log
pub fn short_url_routes() -> Router<AppState> {
    Router::new()
        .route("/short_url", post(create_handler))
        .route("/short_url/shorten", post(shorten_handler))
        .route(
            "/short_url/{id}",
            get(redirect_handler).delete(delete_handler),
        )
        .route("/short_url/{id}/status", get(status_handler))
}
