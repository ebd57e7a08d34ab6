//! Handlers for the short URL endpoints.

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;
use url::Url;
use validator::Validate;

use crate::api::dto::short_url::{ShortUrlCreate, ShortUrlCreated, ShortUrlInfo, ShortUrlResponse};
use crate::api::dto::status::{StatusQueryParams, StatusResponse};
use crate::domain::entities::NewUrlRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/v1/short_url/`
///
/// # Request Body
///
/// ```json
/// { "origin_url": "http://ya.ru" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "short_url": "http://127.0.0.1:8080/api/v1/short_url/aB3xYz" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `origin_url` is not a valid URL.
pub async fn create_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortUrlCreate>,
) -> Result<(StatusCode, Json<ShortUrlCreated>), AppError> {
    payload.validate()?;

    let url = state.short_url_service.create(payload.origin_url).await?;

    Ok((StatusCode::CREATED, Json(url.into())))
}

/// Creates short URLs for a list of origin URLs in one atomic batch.
///
/// # Endpoint
///
/// `POST /api/v1/short_url/shorten`
///
/// # Request Body
///
/// ```json
/// [
///   { "origin_url": "http://ya.ru" },
///   { "origin_url": "http://ya.ru" }
/// ]
/// ```
///
/// # Response
///
/// `201 Created`, in input order:
///
/// ```json
/// [
///   { "short_form": "aB3xYz", "short_url": "http://127.0.0.1:8080/api/v1/short_url/aB3xYz" },
///   { "short_form": "Qw12Er", "short_url": "http://127.0.0.1:8080/api/v1/short_url/Qw12Er" }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if any item is invalid; nothing is stored then.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<Vec<ShortUrlCreate>>,
) -> Result<(StatusCode, Json<Vec<ShortUrlInfo>>), AppError> {
    for (index, item) in payload.iter().enumerate() {
        item.validate().map_err(|e| {
            AppError::bad_request(
                "Validation failed",
                json!({ "index": index, "fields": e.field_errors() }),
            )
        })?;
    }

    let origin_urls = payload.into_iter().map(|item| item.origin_url).collect();
    let urls = state.short_url_service.create_batch(origin_urls).await?;

    Ok((
        StatusCode::CREATED,
        Json(urls.into_iter().map(Into::into).collect()),
    ))
}

/// Redirects a short form to its origin URL and records the visit.
///
/// # Endpoint
///
/// `GET /api/v1/short_url/{id}`
///
/// Responds `307 Temporary Redirect`. The visitor's IP and port are taken
/// from the peer socket address. Non-ASCII origin URLs are sent encoded.
///
/// # Errors
///
/// Returns 404 Not Found if the short form is unknown.
/// Returns 410 Gone if it was deleted.
pub async fn redirect_handler(
    Path(short_form): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let origin_url = state
        .short_url_service
        .redirect(&short_form, NewUrlRequest::from(addr))
        .await?;

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location_header(&origin_url))],
    ))
}

/// Converts a stored origin URL into a `Location` value.
///
/// Printable ASCII URLs are sent back unchanged. Anything else goes through
/// [`Url`] serialization, which punycodes the host and percent-encodes the
/// rest; unparseable leftovers have their non-printable bytes
/// percent-encoded. The result is always a valid header value.
fn location_header(origin_url: &str) -> HeaderValue {
    let target = if origin_url.bytes().all(|b| b.is_ascii_graphic()) {
        origin_url.to_string()
    } else {
        match Url::parse(origin_url) {
            Ok(url) => url.into(),
            Err(_) => percent_encode_non_graphic(origin_url),
        }
    };

    HeaderValue::from_str(&target).unwrap_or_else(|_| HeaderValue::from_static("/"))
}

fn percent_encode_non_graphic(raw: &str) -> String {
    raw.bytes()
        .map(|b| {
            if b.is_ascii_graphic() {
                char::from(b).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}

/// Soft-deletes a short URL.
///
/// # Endpoint
///
/// `DELETE /api/v1/short_url/{id}`
///
/// # Response
///
/// The full record with `"deleted": true`. Repeating the call returns the
/// same record.
///
/// # Errors
///
/// Returns 404 Not Found if the short form is unknown.
pub async fn delete_handler(
    Path(short_form): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let url = state.short_url_service.delete(&short_form).await?;

    Ok(Json(url.into()))
}

/// Reports usage of a short URL.
///
/// # Endpoint
///
/// `GET /api/v1/short_url/{id}/status`
///
/// # Query Parameters
///
/// - `full-info` (optional): return the visit log instead of a count
/// - `max-size` (optional): page size of the visit log (default: 10, min: 1)
/// - `offset` (optional): visits to skip (default: 0)
///
/// # Response
///
/// `{"requests_number": 2}` by default, or with `full-info=true`:
///
/// ```json
/// [
///   { "made_at": "2026-01-01T00:00:00Z", "client_host": "127.0.0.1", "client_port": 53211 }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for malformed pagination.
/// Returns 404 Not Found / 410 Gone as for redirects.
pub async fn status_handler(
    Path(short_form): Path<String>,
    State(state): State<AppState>,
    params: Result<Query<StatusQueryParams>, QueryRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Query(params) = params.map_err(|e| {
        AppError::bad_request("Invalid query parameters", json!({ "reason": e.body_text() }))
    })?;
    let query = params.into_query()?;

    let status = state.short_url_service.status(&short_form, query).await?;

    Ok(Json(status.into()))
}
