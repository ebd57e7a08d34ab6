//! DTOs for the status endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::{StatusQuery, UrlStatus};
use crate::domain::entities::UrlRequest;
use crate::error::AppError;

/// Query parameters of `GET /short_url/{id}/status`.
///
/// Numbers are parsed from the query string with `serde_with`; `full-info`
/// accepts the usual spellings of a boolean (`true`, `1`, `yes`, `on`, ...).
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct StatusQueryParams {
    #[serde(default, rename = "full-info", with = "lenient_bool")]
    pub full_info: Option<bool>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default, rename = "max-size")]
    pub max_size: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,
}

impl StatusQueryParams {
    /// Applies defaults and validates pagination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `max-size < 1` or `offset < 0`.
    pub fn into_query(self) -> Result<StatusQuery, AppError> {
        StatusQuery::new(self.full_info, self.max_size, self.offset)
    }
}

/// Boolean query values in their common textual forms.
mod lenient_bool {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") => Ok(None),
            Some("true" | "1" | "yes" | "on") => Ok(Some(true)),
            Some("false" | "0" | "no" | "off") => Ok(Some(false)),
            Some(other) => Err(serde::de::Error::custom(format!(
                "invalid boolean value '{other}'"
            ))),
        }
    }
}

/// One recorded visit.
#[derive(Debug, Serialize)]
pub struct RequestInfo {
    pub made_at: DateTime<Utc>,
    pub client_host: String,
    pub client_port: i32,
}

impl From<UrlRequest> for RequestInfo {
    fn from(r: UrlRequest) -> Self {
        Self {
            made_at: r.made_at,
            client_host: r.client_host,
            client_port: r.client_port,
        }
    }
}

/// Either `{"requests_number": n}` or a bare list of visits.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatusResponse {
    Count { requests_number: i64 },
    Requests(Vec<RequestInfo>),
}

impl From<UrlStatus> for StatusResponse {
    fn from(status: UrlStatus) -> Self {
        match status {
            UrlStatus::Count(requests_number) => StatusResponse::Count { requests_number },
            UrlStatus::Requests(requests) => {
                StatusResponse::Requests(requests.into_iter().map(Into::into).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<StatusQueryParams, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(query)
    }

    #[test]
    fn test_defaults() {
        let query = parse("").unwrap().into_query().unwrap();
        assert!(!query.full_info);
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn test_all_params() {
        let query = parse("full-info=true&max-size=5&offset=2")
            .unwrap()
            .into_query()
            .unwrap();
        assert!(query.full_info);
        assert_eq!(query.limit, 5);
        assert_eq!(query.offset, 2);
    }

    #[test]
    fn test_full_info_spellings() {
        for value in ["True", "1", "yes", "ON"] {
            let params = parse(&format!("full-info={value}")).unwrap();
            assert_eq!(params.full_info, Some(true), "{value}");
        }
        for value in ["false", "0", "No", "off"] {
            let params = parse(&format!("full-info={value}")).unwrap();
            assert_eq!(params.full_info, Some(false), "{value}");
        }
    }

    #[test]
    fn test_invalid_full_info() {
        assert!(parse("full-info=maybe").is_err());
    }

    #[test]
    fn test_non_numeric_max_size() {
        assert!(parse("max-size=ten").is_err());
    }

    #[test]
    fn test_negative_offset_is_validation_error() {
        let result = parse("offset=-1").unwrap().into_query();
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_zero_max_size_is_validation_error() {
        let result = parse("max-size=0").unwrap().into_query();
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_count_serialization() {
        let json = serde_json::to_value(StatusResponse::from(UrlStatus::Count(2))).unwrap();
        assert_eq!(json, serde_json::json!({ "requests_number": 2 }));
    }

    #[test]
    fn test_requests_serialization() {
        let status = UrlStatus::Requests(vec![UrlRequest::new(
            1,
            1,
            Utc::now(),
            "127.0.0.1".to_string(),
            5000,
        )]);

        let json = serde_json::to_value(StatusResponse::from(status)).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["client_host"], "127.0.0.1");
        assert_eq!(items[0]["client_port"], 5000);
        assert!(items[0]["made_at"].is_string());
    }
}
