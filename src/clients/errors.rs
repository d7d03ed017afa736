//! HTTP-level error types.
//!
//! These errors describe what went wrong *below* GraphQL: the request could
//! not be sent, the connection failed, the server answered with a non-2xx
//! status, or the body was not JSON. They always end up as the `source` of a
//! [`TransportFailure`](crate::clients::graphql::TransportFailure).
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the API
//! - [`InvalidHttpRequestError`]: Requests rejected before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors

use thiserror::Error;

/// Error describing a non-successful HTTP response.
///
/// The message field contains a JSON object with whichever of the
/// `errors`, `error`, `error_description` fields the response carried, plus
/// an `error_reference` built from the `X-Request-Id` header.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 401,
///     message: r#"{"errors":"Invalid API key or access token"}"#.to_string(),
///     error_reference: Some("abc-123".to_string()),
/// };
///
/// assert!(error.to_string().contains("Invalid API key"));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when a request is rejected before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The GraphQL document was empty or whitespace.
    #[error("Query document cannot be empty.")]
    EmptyQuery,
}

/// Unified error type for all HTTP-related errors.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::clients::{HttpError, InvalidHttpRequestError};
///
/// let error: HttpError = InvalidHttpRequestError::EmptyQuery.into();
/// assert_eq!(error.status(), None);
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The response body was not valid JSON.
    #[error("Response body with status {code} is not valid JSON: {source}")]
    InvalidBody {
        /// The HTTP status code of the response.
        code: u16,
        /// The decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status associated with this error, if a response
    /// was received at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::InvalidBody { code, .. } => Some(*code),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_displays_message() {
        let error = HttpResponseError {
            code: 404,
            message: r#"{"errors":"Not Found"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"{"errors":"Not Found"}"#);
    }

    #[test]
    fn test_invalid_body_keeps_decode_error_as_source() {
        let decode_error = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let error = HttpError::InvalidBody {
            code: 200,
            source: decode_error,
        };

        assert_eq!(error.status(), Some(200));
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains("status 200"));
    }

    #[test]
    fn test_response_error_status() {
        let error: HttpError = HttpResponseError {
            code: 502,
            message: "Bad Gateway".to_string(),
            error_reference: None,
        }
        .into();
        assert_eq!(error.status(), Some(502));
    }

    #[test]
    fn test_invalid_request_messages() {
        assert_eq!(
            InvalidHttpRequestError::EmptyQuery.to_string(),
            "Query document cannot be empty."
        );
    }
}
