//! Host blocklist middleware.
//!
//! Rejects requests whose declared host matches a configured pattern before
//! any handler runs. Patterns are either literal hosts (`evil.com`), suffix
//! wildcards (`*.evil.com`) or a lone `*` that blocks every host.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_host::extract_host;

/// Invalid blocklist configuration, reported at startup.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum HostFilterError {
    #[error("Domain wildcard patterns must be like '*.example.com', got '{0}'")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, PartialEq)]
enum HostPattern {
    Any,
    Exact(String),
    /// Stored with its leading dot, e.g. `.example.com`.
    Suffix(String),
}

impl HostPattern {
    fn parse(raw: &str) -> Result<Self, HostFilterError> {
        let pattern = raw.trim().to_ascii_lowercase();

        if pattern == "*" {
            return Ok(HostPattern::Any);
        }

        match pattern.strip_prefix('*') {
            Some(suffix) if suffix.starts_with('.') && !suffix.contains('*') => {
                Ok(HostPattern::Suffix(suffix.to_string()))
            }
            Some(_) => Err(HostFilterError::InvalidPattern(raw.to_string())),
            None if pattern.contains('*') => Err(HostFilterError::InvalidPattern(raw.to_string())),
            None => Ok(HostPattern::Exact(pattern)),
        }
    }

    fn matches(&self, host: &str) -> bool {
        match self {
            HostPattern::Any => true,
            HostPattern::Exact(exact) => host == exact,
            HostPattern::Suffix(suffix) => host.ends_with(suffix.as_str()),
        }
    }
}

/// A validated set of blocked host patterns.
///
/// An empty blocklist lets every request through.
#[derive(Debug, Clone, Default)]
pub struct HostBlocklist {
    patterns: Vec<HostPattern>,
}

impl HostBlocklist {
    /// Parses and validates the patterns.
    ///
    /// # Errors
    ///
    /// Returns [`HostFilterError::InvalidPattern`] if a `*` appears anywhere
    /// other than as a lone `*` or a leading `*.`.
    pub fn new<I, S>(patterns: I) -> Result<Self, HostFilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| HostPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if `host` (already stripped of its port) is blocked.
    ///
    /// Matching ignores ASCII case on both sides, following DNS: a literal
    /// `evil.com` also blocks `EVIL.com`, and `*.Evil.com` blocks `a.evil.com`.
    pub fn is_blocked(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.patterns.iter().any(|p| p.matches(&host))
    }
}

/// Short-circuits requests from blocked hosts with `400 Bad Request`.
///
/// # Response
///
/// ```json
/// {
///   "error": {
///     "code": "host_blocked",
///     "message": "Host in black list",
///     "details": { "host": "a.evil.com" }
///   }
/// }
/// ```
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api/v1", api_routes())
///     .layer(middleware::from_fn_with_state(state.clone(), host_filter::layer));
/// ```
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.host_blocklist.is_empty() {
        return Ok(next.run(req).await);
    }

    let host = extract_host(req.headers(), req.uri());

    if state.host_blocklist.is_blocked(&host) {
        warn!(host = %host, "Request from blocked host rejected");
        metrics::counter!("blocked_hosts_total").increment(1);
        return Err(AppError::host_blocked(
            "Host in black list",
            json!({ "host": host }),
        ));
    }

    Ok(next.run(req).await)
}
