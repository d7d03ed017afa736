//! Integration tests for the GraphQL executor.
//!
//! These tests run the executor against a mock Admin API endpoint and check
//! how each kind of response is classified.

use std::time::Duration;

use serde_json::json;
use shopify_rest_shim::clients::graphql::{GraphqlClient, GraphqlOutcome, QueryEnvelope};
use shopify_rest_shim::{AccessToken, ApiVersion, HostUrl, ShimConfig, ShopDomain};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/admin/api/2025-10/graphql.json";

/// Creates an executor pointed at the mock server.
fn create_test_client(server: &MockServer, timeout: Option<Duration>) -> GraphqlClient {
    let mut builder = ShimConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .access_token(AccessToken::new("shpat_test").unwrap())
        .api_version(ApiVersion::V2025_10)
        .api_host(HostUrl::new(server.uri()).unwrap());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    GraphqlClient::new(&builder.build().unwrap())
}

async fn mount(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

fn shop_query() -> QueryEnvelope {
    QueryEnvelope::new("query { shop { name } }")
}

// ============================================================================
// Request Shape
// ============================================================================

#[tokio::test]
async fn test_request_carries_token_query_and_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "query": "query product($id: ID!) { product(id: $id) { id } }",
            "variables": { "id": "gid://shopify/Product/1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": null } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, None);
    let mut variables = serde_json::Map::new();
    variables.insert("id".to_string(), json!("gid://shopify/Product/1"));
    let envelope = QueryEnvelope::with_variables(
        "query product($id: ID!) { product(id: $id) { id } }",
        variables,
    );

    let outcome = client.execute(&envelope).await;
    assert!(matches!(outcome, GraphqlOutcome::Success(data) if data["product"].is_null()));
}

#[tokio::test]
async fn test_empty_query_fails_without_request() {
    let server = MockServer::start().await;
    let client = create_test_client(&server, None);

    let outcome = client.execute(&QueryEnvelope::new("   ")).await;

    assert!(matches!(outcome, GraphqlOutcome::TransportFailure(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_success_returns_data() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "data": { "shop": { "name": "Snowdevil" } } })),
    )
    .await;

    let outcome = create_test_client(&server, None).execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::Success(data) => assert_eq!(data["shop"]["name"], "Snowdevil"),
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_errors_with_http_200_are_application_errors() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Field 'nope' doesn't exist on type 'Shop'",
                "locations": [{ "line": 1, "column": 16 }],
                "extensions": { "code": "undefinedField" }
            }]
        })),
    )
    .await;

    let outcome = create_test_client(&server, None).execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::ApplicationErrors(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code(), Some("undefinedField"));
        }
        other => panic!("expected application errors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_throttled_code_is_throttled_with_cost() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }],
            "extensions": { "cost": {
                "requestedQueryCost": 202,
                "throttleStatus": { "maximumAvailable": 2000.0, "currentlyAvailable": 2.0, "restoreRate": 100.0 }
            }}
        })),
    )
    .await;

    let outcome = create_test_client(&server, None).execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::Throttled(info) => {
            assert_eq!(info.status, 200);
            assert_eq!(info.suggested_wait(), Some(Duration::from_secs(2)));
        }
        other => panic!("expected throttled, got {other:?}"),
    }
}

#[tokio::test]
async fn test_429_with_throttled_code_uses_retry_after() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(429)
            .insert_header("Retry-After", "3")
            .set_body_json(json!({ "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }] })),
    )
    .await;

    let outcome = create_test_client(&server, None).execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::Throttled(info) => {
            assert_eq!(info.status, 429);
            assert_eq!(info.suggested_wait(), Some(Duration::from_secs(3)));
        }
        other => panic!("expected throttled, got {other:?}"),
    }
}

#[tokio::test]
async fn test_429_without_throttled_code_is_transport_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(429).set_body_json(json!({ "errors": "Exceeded 2 calls per second for api client." })),
    )
    .await;

    let outcome = create_test_client(&server, None).execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::TransportFailure(failure) => {
            assert_eq!(failure.status, Some(429));
            assert_eq!(failure.errors[0].message, "Exceeded 2 calls per second for api client.");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_becomes_the_message() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>")).await;

    let outcome = create_test_client(&server, None).execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::TransportFailure(failure) => {
            assert_eq!(failure.status, Some(502));
            assert_eq!(failure.errors[0].message, "<html>Bad Gateway</html>");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_oauth_style_error_body() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_token",
            "error_description": "The access token is invalid"
        })),
    )
    .await;

    let outcome = create_test_client(&server, None).execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::TransportFailure(failure) => {
            assert_eq!(failure.status, Some(401));
            assert_eq!(failure.errors[0].message, "invalid_token: The access token is invalid");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_connection_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_delay(Duration::from_millis(500))
            .set_body_json(json!({ "data": {} })),
    )
    .await;

    let client = create_test_client(&server, Some(Duration::from_millis(50)));
    let outcome = client.execute(&shop_query()).await;

    match outcome {
        GraphqlOutcome::TransportFailure(failure) => {
            assert_eq!(failure.status, None);
            assert!(failure.message.starts_with("Connection failed:"), "{}", failure.message);
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}
