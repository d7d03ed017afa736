//! The classified result of one GraphQL call.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::graphql::errors::TransportFailure;

/// The four ways a GraphQL call can end.
///
/// Every caller matches this exhaustively; there is no catch-all error path.
#[derive(Debug)]
pub enum GraphqlOutcome {
    /// The call succeeded; holds the `data` object (`Value::Null` if absent).
    Success(Value),
    /// The server answered with a non-throttling top-level `errors` list.
    ApplicationErrors(Vec<GraphqlErrorEntry>),
    /// The query was rejected by the cost-based rate limiter.
    Throttled(ThrottleInfo),
    /// The call did not produce a usable GraphQL response.
    TransportFailure(TransportFailure),
}

impl GraphqlOutcome {
    /// Returns `true` for [`GraphqlOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// One entry of a GraphQL `errors` list, kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    /// The human-readable message.
    #[serde(default)]
    pub message: String,
    /// The response path the error applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    /// Error extensions, e.g. `{"code": "THROTTLED"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
    /// Any other fields (`locations`, ...).
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl GraphqlErrorEntry {
    /// Creates an entry carrying only a message.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Returns `extensions.code`, if present.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(Value::as_str)
    }
}

/// The leaky-bucket state reported in `extensions.cost.throttleStatus`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleStatus {
    /// Bucket size.
    pub maximum_available: f64,
    /// Points left in the bucket.
    pub currently_available: f64,
    /// Points restored per second.
    pub restore_rate: f64,
}

/// The `extensions.cost` object of a GraphQL response.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCost {
    /// Cost the query asked for.
    pub requested_query_cost: f64,
    /// Cost actually charged, absent when the query did not run.
    #[serde(default)]
    pub actual_query_cost: Option<f64>,
    /// Bucket state after the query.
    pub throttle_status: ThrottleStatus,
}

/// Everything known about a throttled call.
#[derive(Clone, Debug, PartialEq)]
pub struct ThrottleInfo {
    /// HTTP status of the throttled response (200 or 429 in practice).
    pub status: u16,
    /// The raw `errors` list.
    pub errors: Vec<GraphqlErrorEntry>,
    /// The cost extension, if the server sent one.
    pub cost: Option<QueryCost>,
    /// The `Retry-After` header, in seconds.
    pub retry_after: Option<f64>,
}

impl ThrottleInfo {
    /// How long the caller should wait before retrying.
    ///
    /// `Retry-After` wins when present. Otherwise the wait is the time the
    /// bucket needs to restore enough points for the requested cost. Returns
    /// `None` when neither source is available.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shopify_rest_shim::clients::graphql::{QueryCost, ThrottleInfo, ThrottleStatus};
    /// use std::time::Duration;
    ///
    /// let info = ThrottleInfo {
    ///     status: 200,
    ///     errors: vec![],
    ///     cost: Some(QueryCost {
    ///         requested_query_cost: 100.0,
    ///         actual_query_cost: None,
    ///         throttle_status: ThrottleStatus {
    ///             maximum_available: 1000.0,
    ///             currently_available: 50.0,
    ///             restore_rate: 50.0,
    ///         },
    ///     }),
    ///     retry_after: None,
    /// };
    ///
    /// assert_eq!(info.suggested_wait(), Some(Duration::from_secs(1)));
    /// ```
    #[must_use]
    pub fn suggested_wait(&self) -> Option<Duration> {
        if let Some(seconds) = self.retry_after {
            return Duration::try_from_secs_f64(seconds).ok();
        }

        let cost = self.cost?;
        let status = cost.throttle_status;
        if status.restore_rate <= 0.0 {
            return None;
        }
        let deficit = (cost.requested_query_cost - status.currently_available).max(0.0);
        Duration::try_from_secs_f64(deficit / status.restore_rate).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_entry_keeps_unknown_fields() {
        let entry: GraphqlErrorEntry = serde_json::from_value(json!({
            "message": "Field 'x' doesn't exist",
            "locations": [{ "line": 1, "column": 3 }],
            "extensions": { "code": "undefinedField" }
        }))
        .unwrap();

        assert_eq!(entry.code(), Some("undefinedField"));
        assert!(entry.other.contains_key("locations"));

        let round = serde_json::to_value(&entry).unwrap();
        assert_eq!(round["locations"][0]["line"], 1);
    }

    #[test]
    fn test_retry_after_takes_precedence() {
        let info = ThrottleInfo {
            status: 429,
            errors: vec![],
            cost: None,
            retry_after: Some(2.0),
        };
        assert_eq!(info.suggested_wait(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_no_wait_when_bucket_already_has_room() {
        let info = ThrottleInfo {
            status: 200,
            errors: vec![],
            cost: Some(QueryCost {
                requested_query_cost: 10.0,
                actual_query_cost: None,
                throttle_status: ThrottleStatus {
                    maximum_available: 1000.0,
                    currently_available: 500.0,
                    restore_rate: 50.0,
                },
            }),
            retry_after: None,
        };
        assert_eq!(info.suggested_wait(), Some(Duration::ZERO));
    }

    #[test]
    fn test_no_wait_without_hints() {
        let info = ThrottleInfo {
            status: 200,
            errors: vec![GraphqlErrorEntry::from_message("Throttled")],
            cost: None,
            retry_after: None,
        };
        assert_eq!(info.suggested_wait(), None);
    }
}
