//! HTTP response type for GraphQL Admin API calls.

use std::collections::HashMap;

use crate::clients::errors::HttpError;

/// A raw HTTP response from the GraphQL endpoint.
///
/// The body is kept as text so the executor can decide how to interpret it:
/// a non-JSON body is meaningful for non-2xx responses (it becomes the error
/// message) and is a failure for 2xx responses.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased names (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub text: String,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, text: String) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok());

        Self {
            code,
            headers,
            text,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    /// Returns the first value of a header by lowercased name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidBody`] if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, HttpError> {
        serde_json::from_str(&self.text).map_err(|source| HttpError::InvalidBody {
            code: self.code,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect()
    }

    #[test]
    fn test_retry_after_is_parsed() {
        let response = HttpResponse::new(429, headers(&[("retry-after", "2.5")]), String::new());
        assert_eq!(response.retry_request_after, Some(2.5));
        assert!(!response.is_ok());
    }

    #[test]
    fn test_header_accessors() {
        let response = HttpResponse::new(
            200,
            headers(&[
                ("x-request-id", "req-1"),
                ("x-shopify-api-deprecated-reason", "use a newer version"),
            ]),
            "{}".to_string(),
        );
        assert!(response.is_ok());
        assert_eq!(response.request_id(), Some("req-1"));
        assert_eq!(response.deprecation_reason(), Some("use a newer version"));
    }

    #[test]
    fn test_json_decode_failure_is_invalid_body() {
        let response = HttpResponse::new(200, HashMap::new(), "not json".to_string());
        assert!(matches!(
            response.json(),
            Err(HttpError::InvalidBody { code: 200, .. })
        ));
    }
}
