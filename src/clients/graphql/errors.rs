//! Transport failure type for GraphQL calls.
//!
//! GraphQL-level errors (validation, user errors, throttling) arrive with
//! HTTP 200 and are classified into [`GraphqlOutcome`] variants. Anything
//! that prevents a usable GraphQL response becomes a [`TransportFailure`]
//! whose `source` is the underlying [`HttpError`].
//!
//! [`GraphqlOutcome`]: crate::clients::graphql::GraphqlOutcome

use crate::clients::graphql::outcome::GraphqlErrorEntry;
use crate::clients::HttpError;
use thiserror::Error;

/// A GraphQL call that failed below the GraphQL layer.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::clients::graphql::TransportFailure;
/// use shopify_rest_shim::clients::{HttpError, HttpResponseError};
///
/// let failure = TransportFailure::from_http(HttpError::Response(HttpResponseError {
///     code: 401,
///     message: r#"{"errors":"Invalid API key or access token"}"#.to_string(),
///     error_reference: None,
/// }));
///
/// assert_eq!(failure.status, Some(401));
/// assert!(std::error::Error::source(&failure).is_some());
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportFailure {
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Summary message.
    pub message: String,
    /// Decoded error entries from the response body, if any.
    pub errors: Vec<GraphqlErrorEntry>,
    /// The lower-level cause.
    #[source]
    pub source: HttpError,
}

impl TransportFailure {
    /// Builds a failure from an HTTP error, deriving status and message.
    #[must_use]
    pub fn from_http(source: HttpError) -> Self {
        let message = match &source {
            HttpError::Network(e) => format!("Connection failed: {e}"),
            other => other.to_string(),
        };
        Self {
            status: source.status(),
            message,
            errors: Vec::new(),
            source,
        }
    }

    /// Attaches decoded error entries.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<GraphqlErrorEntry>) -> Self {
        self.errors = errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpResponseError, InvalidHttpRequestError};

    #[test]
    fn test_failure_from_response_error_keeps_status() {
        let failure = TransportFailure::from_http(HttpError::Response(HttpResponseError {
            code: 500,
            message: r#"{"errors":"Internal Server Error"}"#.to_string(),
            error_reference: None,
        }));

        assert_eq!(failure.status, Some(500));
        assert!(failure.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_failure_without_response_has_no_status() {
        let failure = TransportFailure::from_http(InvalidHttpRequestError::EmptyQuery.into())
            .with_errors(vec![GraphqlErrorEntry::from_message("empty")]);

        assert_eq!(failure.status, None);
        assert_eq!(failure.errors.len(), 1);
        assert!(matches!(failure.source, HttpError::InvalidRequest(_)));
    }
}
