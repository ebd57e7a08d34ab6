//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/api/v1/short_url/*` - Short URL API
//! - `GET /health`         - Storage health check
//!
//! # Middleware
//!
//! Outermost first:
//!
//! - **Path normalization** - Trailing slash handling (`/short_url/` == `/short_url`)
//! - **Tracing** - Structured request/response logging
//! - **Host filter** - Rejects blocklisted hosts before any handler runs

use crate::api::handlers::health_handler;
use crate::api::middleware::{host_filter, tracing};
use crate::api::routes::{API_PREFIX, short_url_routes};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, short_url_routes())
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            host_filter::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
}
