//! Host extraction from HTTP requests.

use axum::http::{HeaderMap, Uri, header};

/// Extracts the declared host of a request, without port.
///
/// Reads the `Host` header, falling back to the URI authority (HTTP/2
/// requests carry it in `:authority`). Handles:
/// - hostnames with or without port (`example.com:3000`)
/// - IPv4 addresses (`192.168.1.1:80`)
/// - IPv6 addresses, keeping the brackets (`[::1]:8080` -> `[::1]`)
///
/// The result is lowercased. A missing or non-UTF-8 host yields an empty
/// string.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "Example.com:8080".parse().unwrap());
///
/// assert_eq!(extract_host(&headers, &Uri::from_static("/")), "example.com");
/// ```
pub fn extract_host(headers: &HeaderMap, uri: &Uri) -> String {
    let raw = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("");

    strip_port(raw).to_ascii_lowercase()
}

fn strip_port(host: &str) -> &str {
    // Userinfo may precede the host in a URI authority.
    let host = host.rsplit('@').next().unwrap_or(host);

    if host.starts_with('[') {
        match host.find(']') {
            Some(end_bracket) => &host[..=end_bracket],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_host(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers
    }

    fn root() -> Uri {
        Uri::from_static("/")
    }

    #[test]
    fn test_extract_host_simple() {
        assert_eq!(extract_host(&headers_with_host("example.com"), &root()), "example.com");
    }

    #[test]
    fn test_extract_host_with_port() {
        assert_eq!(
            extract_host(&headers_with_host("example.com:3000"), &root()),
            "example.com"
        );
    }

    #[test]
    fn test_extract_host_ip_with_port() {
        assert_eq!(
            extract_host(&headers_with_host("192.168.1.1:9000"), &root()),
            "192.168.1.1"
        );
    }

    #[test]
    fn test_extract_host_ipv6_with_port() {
        assert_eq!(extract_host(&headers_with_host("[::1]:8080"), &root()), "[::1]");
    }

    #[test]
    fn test_extract_host_lowercases() {
        assert_eq!(
            extract_host(&headers_with_host("API.Example.COM"), &root()),
            "api.example.com"
        );
    }

    #[test]
    fn test_extract_host_falls_back_to_uri_authority() {
        let uri = Uri::from_static("http://a.example.com:8443/api/v1/short_url/abc");
        assert_eq!(extract_host(&HeaderMap::new(), &uri), "a.example.com");
    }

    #[test]
    fn test_extract_host_header_wins_over_authority() {
        let uri = Uri::from_static("http://other.com/");
        assert_eq!(
            extract_host(&headers_with_host("example.com"), &uri),
            "example.com"
        );
    }

    #[test]
    fn test_extract_host_missing() {
        assert_eq!(extract_host(&HeaderMap::new(), &root()), "");
    }

    #[test]
    fn test_extract_host_invalid_utf8() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(&[0xFF, 0xFE, 0xFD]) {
            headers.insert(header::HOST, value);
            assert_eq!(extract_host(&headers, &root()), "");
        }
    }
}
