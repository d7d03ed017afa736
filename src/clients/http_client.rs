//! HTTP transport for the GraphQL Admin API.
//!
//! This module provides the [`HttpClient`] type, a thin wrapper around
//! `reqwest` that knows the shop's base URI, the default headers and the
//! configured timeout. It never retries and never interprets the body.

use std::collections::HashMap;

use crate::clients::errors::HttpError;
use crate::clients::http_response::HttpResponse;
use crate::config::ShimConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Shopify API.
///
/// The client handles:
/// - Base URI construction from the shop domain or `api_host`
/// - Default headers including User-Agent and access token
/// - The transport timeout from [`ShimConfig::timeout`]
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::{AccessToken, ShimConfig, ShopDomain};
/// use shopify_rest_shim::clients::HttpClient;
///
/// let config = ShimConfig::builder()
///     .shop(ShopDomain::new("my-store").unwrap())
///     .access_token(AccessToken::new("shpat_123").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new("/admin/api/2025-10", &config);
/// assert_eq!(client.base_uri(), "https://my-store.myshopify.com");
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URI (e.g., `https://my-store.myshopify.com`).
    base_uri: String,
    /// Base path (e.g., "/admin/api/2025-10").
    base_path: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the shim configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(base_path: impl Into<String>, config: &ShimConfig) -> Self {
        let base_path = base_path.into();
        let shop = config.shop().as_ref();

        let base_uri = config.api_host().map_or_else(
            || format!("https://{shop}"),
            |host| host.as_ref().to_string(),
        );

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}Shopify REST Shim v{SDK_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "X-Shopify-Access-Token".to_string(),
            config.access_token().as_ref().to_string(),
        );

        // Proxies route on Host, so keep the shop there
        if config.api_host().is_some() {
            default_headers.insert("Host".to_string(), shop.to_string());
        }

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        Self {
            client,
            base_uri,
            base_path,
            default_headers,
        }
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// POSTs a JSON body to `{base_uri}{base_path}/{path}`.
    ///
    /// Any HTTP status is returned as `Ok`; the caller decides what a non-2xx
    /// response means. Deprecation headers are logged.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the request could not be completed
    /// (DNS failure, refused connection, timeout, interrupted body).
    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let url = format!("{}{}/{}", self.base_uri, self.base_path, path);

        let mut req_builder = self.client.post(&url);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder
            .header("Content-Type", "application/json")
            .body(body.to_string());

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let text = res.text().await?;

        let response = HttpResponse::new(code, headers, text);

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to Shopify API at {}, received reason: {}",
                path,
                reason
            );
        }

        Ok(response)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessToken, HostUrl, ShopDomain};

    fn config_builder() -> crate::config::ShimConfigBuilder {
        ShimConfig::builder()
            .shop(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("test-access-token").unwrap())
    }

    #[test]
    fn test_client_construction_uses_shop_domain() {
        let config = config_builder().build().unwrap();
        let client = HttpClient::new("/admin/api/2025-10", &config);

        assert_eq!(client.base_uri(), "https://test-shop.myshopify.com");
        assert_eq!(client.base_path(), "/admin/api/2025-10");
        assert!(client.default_headers().get("Host").is_none());
    }

    #[test]
    fn test_api_host_replaces_origin_and_sets_host_header() {
        let config = config_builder()
            .api_host(HostUrl::new("http://127.0.0.1:9999").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new("/admin/api/2025-10", &config);

        assert_eq!(client.base_uri(), "http://127.0.0.1:9999");
        assert_eq!(
            client.default_headers().get("Host"),
            Some(&"test-shop.myshopify.com".to_string())
        );
    }

    #[test]
    fn test_access_token_and_accept_headers() {
        let config = config_builder().build().unwrap();
        let client = HttpClient::new("/admin/api/2025-10", &config);

        assert_eq!(
            client.default_headers().get("X-Shopify-Access-Token"),
            Some(&"test-access-token".to_string())
        );
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = config_builder().user_agent_prefix("Legacy/1.0").build().unwrap();
        let client = HttpClient::new("/admin/api/2025-10", &config);

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Legacy/1.0 | "));
        assert!(user_agent.contains("Shopify REST Shim v"));
        assert!(user_agent.contains("Rust"));
    }
}
