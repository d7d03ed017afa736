//! Error type for REST-shaped resource operations.
//!
//! Every resource translator re-raises executor outcomes as a
//! [`ResourceError`] with a REST-style status code:
//!
//! - **400**: [`ResourceError::Validation`] - GraphQL errors or `userErrors`
//! - **400**: [`ResourceError::InvalidInput`] - rejected before any request
//! - **404**: [`ResourceError::NotFound`] - single-resource read returned `null`
//! - **502**: [`ResourceError::MalformedResponse`] - success payload that cannot be shaped
//! - **503**: [`ResourceError::Throttled`] - cost-based throttling
//! - **passthrough / 0**: [`ResourceError::Transport`] - HTTP-level failure
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_rest_shim::rest::ResourceError;
//!
//! match shim.products().get(123).await {
//!     Ok(product) => println!("Found: {:?}", product.title),
//!     Err(ResourceError::NotFound { resource, id }) => {
//!         println!("{resource} with id {id} not found");
//!     }
//!     Err(ResourceError::Throttled { info, .. }) => {
//!         println!("retry in {:?}", info.suggested_wait());
//!     }
//!     Err(e) => println!("{} {}", e.status(), e),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::clients::graphql::{GraphqlErrorEntry, ThrottleInfo, TransportFailure};
use crate::rest::gid::InvalidGidError;

/// Error type for REST-shaped resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The remote rejected the operation (HTTP 400).
    ///
    /// Carries either the top-level GraphQL `errors` list or the mutation's
    /// embedded user-error list, verbatim.
    #[error("{operation} failed validation: {}", summarize(.errors))]
    Validation {
        /// The GraphQL operation name.
        operation: &'static str,
        /// The raw error objects.
        errors: Vec<Value>,
    },

    /// The request was throttled (HTTP 503). Never retried.
    #[error("{operation} was throttled by the GraphQL Admin API")]
    Throttled {
        /// The GraphQL operation name.
        operation: &'static str,
        /// Throttle details including a suggested wait.
        info: ThrottleInfo,
    },

    /// The call failed below the GraphQL layer.
    #[error("{operation} failed: {failure}")]
    Transport {
        /// The GraphQL operation name.
        operation: &'static str,
        /// The transport failure, whose source is the HTTP error.
        #[source]
        failure: TransportFailure,
    },

    /// A single-resource read came back `null` (HTTP 404).
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// The REST resource name (e.g., "Product").
        resource: &'static str,
        /// The ID that was requested.
        id: String,
    },

    /// Input was rejected locally before any request was issued (HTTP 400).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// The success payload could not be shaped into a REST record (HTTP 502).
    #[error("{operation} returned a malformed response: {message}")]
    MalformedResponse {
        /// The GraphQL operation name.
        operation: &'static str,
        /// What was wrong with the payload.
        message: String,
        /// The decode error, when one exists.
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl ResourceError {
    /// Returns the REST-style HTTP status for this error.
    ///
    /// Transport failures pass their HTTP status through, or `0` when no
    /// response was received.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::InvalidInput { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::MalformedResponse { .. } => 502,
            Self::Throttled { .. } => 503,
            Self::Transport { failure, .. } => failure.status.unwrap_or(0),
        }
    }

    /// Returns the raw remote error list attached to this error, if any.
    #[must_use]
    pub fn errors(&self) -> Vec<Value> {
        match self {
            Self::Validation { errors, .. } => errors.clone(),
            Self::Throttled { info, .. } => entries_to_values(&info.errors),
            Self::Transport { failure, .. } => entries_to_values(&failure.errors),
            Self::NotFound { .. } | Self::InvalidInput { .. } | Self::MalformedResponse { .. } => {
                Vec::new()
            }
        }
    }

    /// Creates an [`ResourceError::InvalidInput`].
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a [`ResourceError::MalformedResponse`] without a decode error.
    #[must_use]
    pub fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a [`ResourceError::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }
}

impl From<InvalidGidError> for ResourceError {
    fn from(error: InvalidGidError) -> Self {
        Self::invalid_input(error.to_string())
    }
}

pub(crate) fn entries_to_values(entries: &[GraphqlErrorEntry]) -> Vec<Value> {
    entries
        .iter()
        .map(|entry| serde_json::to_value(entry).unwrap_or(Value::Null))
        .collect()
}

fn summarize(errors: &[Value]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect();
    if messages.is_empty() {
        format!("{} error(s)", errors.len())
    } else {
        messages.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpError, HttpResponseError, InvalidHttpRequestError};
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        let validation = ResourceError::Validation {
            operation: "productCreate",
            errors: vec![json!({ "field": ["title"], "message": "Title can't be blank" })],
        };
        assert_eq!(validation.status(), 400);
        assert_eq!(ResourceError::invalid_input("bad").status(), 400);
        assert_eq!(ResourceError::not_found("Product", "1").status(), 404);
        assert_eq!(ResourceError::malformed("products", "no cursor").status(), 502);

        let throttled = ResourceError::Throttled {
            operation: "products",
            info: ThrottleInfo {
                status: 200,
                errors: vec![],
                cost: None,
                retry_after: None,
            },
        };
        assert_eq!(throttled.status(), 503);
    }

    #[test]
    fn test_transport_status_passthrough_and_zero() {
        let with_status = ResourceError::Transport {
            operation: "shop",
            failure: TransportFailure::from_http(HttpError::Response(HttpResponseError {
                code: 401,
                message: "Unauthorized".to_string(),
                error_reference: None,
            })),
        };
        assert_eq!(with_status.status(), 401);

        let without_status = ResourceError::Transport {
            operation: "shop",
            failure: TransportFailure::from_http(InvalidHttpRequestError::EmptyQuery.into()),
        };
        assert_eq!(without_status.status(), 0);
        assert!(std::error::Error::source(&without_status).is_some());
    }

    #[test]
    fn test_validation_message_lists_error_messages() {
        let error = ResourceError::Validation {
            operation: "productCreate",
            errors: vec![
                json!({ "message": "Title can't be blank" }),
                json!({ "message": "Handle is taken" }),
            ],
        };
        assert_eq!(
            error.to_string(),
            "productCreate failed validation: Title can't be blank; Handle is taken"
        );
        assert_eq!(error.errors().len(), 2);
    }

    #[test]
    fn test_invalid_gid_becomes_invalid_input() {
        let error: ResourceError = InvalidGidError::Empty.into();
        assert!(matches!(error, ResourceError::InvalidInput { .. }));
    }
}
