//! The query executor for the GraphQL Admin API.
//!
//! This module provides the [`GraphqlClient`] type, the single path through
//! which every translated REST operation reaches the network.

use serde_json::{Map, Value};

use crate::clients::graphql::errors::TransportFailure;
use crate::clients::graphql::outcome::{GraphqlErrorEntry, GraphqlOutcome, QueryCost, ThrottleInfo};
use crate::clients::graphql::QueryEnvelope;
use crate::clients::{HttpClient, HttpError, HttpResponse, HttpResponseError, InvalidHttpRequestError};
use crate::config::{ApiVersion, ShimConfig};

/// The `extensions.code` value Shopify uses for cost-based throttling.
pub const THROTTLED_CODE: &str = "THROTTLED";

/// GraphQL Admin API executor.
///
/// Sends exactly one request per [`execute`](Self::execute) call and
/// classifies the response into a [`GraphqlOutcome`]. It never retries,
/// even when throttled.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync`. One instance may be shared by any
/// number of concurrent tasks because the underlying `reqwest::Client` is
/// safe for concurrent use.
///
/// # Example
///
/// ```rust,no_run
/// use shopify_rest_shim::{AccessToken, ShimConfig, ShopDomain};
/// use shopify_rest_shim::clients::graphql::{GraphqlClient, GraphqlOutcome, QueryEnvelope};
///
/// # async fn run() {
/// let config = ShimConfig::builder()
///     .shop(ShopDomain::new("my-store").unwrap())
///     .access_token(AccessToken::new("shpat_123").unwrap())
///     .build()
///     .unwrap();
///
/// let client = GraphqlClient::new(&config);
/// match client.execute(&QueryEnvelope::new("query { shop { name } }")).await {
///     GraphqlOutcome::Success(data) => println!("{}", data["shop"]["name"]),
///     GraphqlOutcome::ApplicationErrors(errors) => println!("{errors:?}"),
///     GraphqlOutcome::Throttled(info) => println!("wait {:?}", info.suggested_wait()),
///     GraphqlOutcome::TransportFailure(failure) => println!("{failure}"),
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
    /// The API version being used.
    api_version: ApiVersion,
    /// Page size used when a list call gives no limit.
    page_size: u32,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a new executor using the configured API version.
    #[must_use]
    pub fn new(config: &ShimConfig) -> Self {
        Self::create_client(config, config.api_version().clone())
    }

    /// Creates a new executor with a specific API version override.
    #[must_use]
    pub fn with_version(config: &ShimConfig, version: ApiVersion) -> Self {
        let config_version = config.api_version();

        if &version == config_version {
            tracing::debug!(
                "GraphQL client has a redundant API version override to the default {}",
                config_version
            );
        } else {
            tracing::debug!(
                "GraphQL client overriding default API version {} with {}",
                config_version,
                version
            );
        }

        Self::create_client(config, version)
    }

    fn create_client(config: &ShimConfig, api_version: ApiVersion) -> Self {
        let base_path = format!("/admin/api/{api_version}");
        let http_client = HttpClient::new(base_path, config);

        tracing::debug!(
            shop = %config.shop(),
            version = %api_version,
            "GraphQL executor created"
        );

        Self {
            http_client,
            api_version,
            page_size: config.page_size(),
        }
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the default page size for list operations.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Executes one GraphQL request and classifies the result.
    ///
    /// Classification, in priority order:
    ///
    /// 1. first `errors` entry has `extensions.code == "THROTTLED"` →
    ///    [`GraphqlOutcome::Throttled`]
    /// 2. non-2xx status → [`GraphqlOutcome::TransportFailure`] with the
    ///    decoded error body
    /// 3. connection failure → [`GraphqlOutcome::TransportFailure`] whose
    ///    message starts with `Connection failed:`
    /// 4. other top-level `errors` → [`GraphqlOutcome::ApplicationErrors`]
    /// 5. otherwise [`GraphqlOutcome::Success`] with the `data` object
    pub async fn execute(&self, envelope: &QueryEnvelope) -> GraphqlOutcome {
        if envelope.query().trim().is_empty() {
            return GraphqlOutcome::TransportFailure(TransportFailure::from_http(
                InvalidHttpRequestError::EmptyQuery.into(),
            ));
        }

        match self
            .http_client
            .post_json("graphql.json", &envelope.to_json())
            .await
        {
            Ok(response) => {
                tracing::debug!(status = response.code, "GraphQL response received");
                classify(&response)
            }
            Err(error) => {
                tracing::debug!(error = %error, "GraphQL request did not complete");
                GraphqlOutcome::TransportFailure(TransportFailure::from_http(error))
            }
        }
    }
}

/// Classifies a received HTTP response.
///
/// Connection failures never reach this function; see
/// [`GraphqlClient::execute`].
#[must_use]
pub fn classify(response: &HttpResponse) -> GraphqlOutcome {
    let body = response.json();

    if let Ok(body) = &body {
        if let Some(info) = throttle_info(response, body) {
            tracing::warn!(
                status = info.status,
                retry_after = ?info.retry_after,
                "GraphQL request was throttled"
            );
            return GraphqlOutcome::Throttled(info);
        }
    }

    if !response.is_ok() {
        let errors = match &body {
            Ok(body) => error_body_entries(body),
            Err(_) => None,
        }
        .unwrap_or_else(|| vec![GraphqlErrorEntry::from_message(response.text.clone())]);

        let message = body
            .as_ref()
            .ok()
            .and_then(|body| serialize_error(response, body))
            .unwrap_or_else(|| response.text.clone());

        let source = HttpError::Response(HttpResponseError {
            code: response.code,
            message,
            error_reference: response.request_id().map(String::from),
        });
        return GraphqlOutcome::TransportFailure(
            TransportFailure::from_http(source).with_errors(errors),
        );
    }

    let body = match body {
        Ok(body) => body,
        Err(error) => {
            return GraphqlOutcome::TransportFailure(TransportFailure::from_http(error));
        }
    };

    if let Some(errors) = body.get("errors") {
        let errors = decode_errors(errors);
        if !errors.is_empty() {
            return GraphqlOutcome::ApplicationErrors(errors);
        }
    }

    GraphqlOutcome::Success(body.get("data").cloned().unwrap_or(Value::Null))
}

fn throttle_info(response: &HttpResponse, body: &Value) -> Option<ThrottleInfo> {
    let errors = decode_errors(body.get("errors")?);
    if errors.first()?.code() != Some(THROTTLED_CODE) {
        return None;
    }

    let cost_value = body
        .pointer("/extensions/cost")
        .or_else(|| body.pointer("/errors/0/extensions/cost"));
    let cost = cost_value.and_then(|value| serde_json::from_value::<QueryCost>(value.clone()).ok());

    Some(ThrottleInfo {
        status: response.code,
        errors,
        cost,
        retry_after: response.retry_request_after,
    })
}

/// Decodes an `errors` value that may be a list of objects, a list of
/// strings, or a single string.
fn decode_errors(errors: &Value) -> Vec<GraphqlErrorEntry> {
    match errors {
        Value::Array(items) => items.iter().map(decode_error_entry).collect(),
        Value::Null => Vec::new(),
        other => vec![decode_error_entry(other)],
    }
}

fn decode_error_entry(item: &Value) -> GraphqlErrorEntry {
    match item {
        Value::String(message) => GraphqlErrorEntry::from_message(message.clone()),
        Value::Object(_) => serde_json::from_value(item.clone())
            .unwrap_or_else(|_| GraphqlErrorEntry::from_message(item.to_string())),
        other => GraphqlErrorEntry::from_message(other.to_string()),
    }
}

/// Error entries from a non-2xx body: `errors` first, then
/// `error`/`error_description`.
fn error_body_entries(body: &Value) -> Option<Vec<GraphqlErrorEntry>> {
    if let Some(errors) = body.get("errors") {
        let errors = decode_errors(errors);
        if !errors.is_empty() {
            return Some(errors);
        }
    }

    let error = body.get("error")?;
    let mut message = error
        .as_str()
        .map_or_else(|| error.to_string(), String::from);
    if let Some(description) = body.get("error_description").and_then(Value::as_str) {
        message = format!("{message}: {description}");
    }
    Some(vec![GraphqlErrorEntry::from_message(message)])
}

/// Serializes an error body to the compact JSON message carried by
/// [`HttpResponseError`].
fn serialize_error(response: &HttpResponse, body: &Value) -> Option<String> {
    let mut error_body = Map::new();

    if let Some(errors) = body.get("errors") {
        error_body.insert("errors".to_string(), errors.clone());
    }
    if let Some(error) = body.get("error") {
        error_body.insert("error".to_string(), error.clone());
        if let Some(desc) = body.get("error_description") {
            error_body.insert("error_description".to_string(), desc.clone());
        }
    }
    if error_body.is_empty() {
        return None;
    }

    if let Some(request_id) = response.request_id() {
        error_body.insert(
            "error_reference".to_string(),
            Value::String(format!(
                "If you report this error, please include this id: {request_id}."
            )),
        );
    }

    Some(Value::Object(error_body).to_string())
}
