//! Configuration types for the REST shim.
//!
//! The shim needs exactly two credentials, the shop domain and an Admin API
//! access token. Everything else has a sensible default.
//!
//! - [`ShimConfig`]: immutable configuration shared by the executor
//! - [`ShimConfigBuilder`]: builder validating required fields
//! - [`ShopDomain`], [`AccessToken`], [`HostUrl`]: validated newtypes
//! - [`ApiVersion`]: the GraphQL Admin API version to target
//!
//! # Example
//!
//! ```rust
//! use shopify_rest_shim::{AccessToken, ApiVersion, ShimConfig, ShopDomain};
//!
//! let config = ShimConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_123").unwrap())
//!     .api_version(ApiVersion::V2025_07)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), 250);
//! ```

mod newtypes;
mod version;

use std::time::Duration;

pub use newtypes::{AccessToken, HostUrl, ShopDomain};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// The largest page the GraphQL Admin API returns for a connection.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Configuration for the GraphQL executor behind the REST shim.
///
/// `ShimConfig` is `Clone + Send + Sync`; one configuration can back any
/// number of [`GraphqlClient`](crate::clients::GraphqlClient) instances.
#[derive(Clone, Debug)]
pub struct ShimConfig {
    shop: ShopDomain,
    access_token: AccessToken,
    api_version: ApiVersion,
    api_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    page_size: u32,
}

impl ShimConfig {
    /// Creates a new builder for constructing a `ShimConfig`.
    #[must_use]
    pub fn builder() -> ShimConfigBuilder {
        ShimConfigBuilder::new()
    }

    /// Returns the shop domain.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Returns the access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the origin override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the transport timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the default page size used when a caller gives no limit.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}

// Verify ShimConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShimConfig>();
};

/// Builder for [`ShimConfig`].
///
/// # Defaults
///
/// - `api_version`: [`ApiVersion::latest`]
/// - `api_host`: `None` (requests go to `https://{shop}`)
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None` (no transport timeout)
/// - `page_size`: [`MAX_PAGE_SIZE`]
#[derive(Debug, Default)]
pub struct ShimConfigBuilder {
    shop: Option<ShopDomain>,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    api_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    page_size: Option<u32>,
}

impl ShimConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shop domain (required).
    #[must_use]
    pub fn shop(mut self, shop: ShopDomain) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Sets the Admin API access token (required).
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Routes requests through a different origin.
    ///
    /// The `Host` header still carries the shop domain.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout applied by the transport to each request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the default page size for list operations.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Builds the [`ShimConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `shop` or
    /// `access_token` is not set, and [`ConfigError::InvalidPageSize`] if the
    /// page size is zero or above [`MAX_PAGE_SIZE`].
    pub fn build(self) -> Result<ShimConfig, ConfigError> {
        let shop = self
            .shop
            .ok_or(ConfigError::MissingRequiredField { field: "shop" })?;
        let access_token = self
            .access_token
            .ok_or(ConfigError::MissingRequiredField {
                field: "access_token",
            })?;

        let page_size = self.page_size.unwrap_or(MAX_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize {
                size: page_size,
                max: MAX_PAGE_SIZE,
            });
        }

        Ok(ShimConfig {
            shop,
            access_token,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            api_host: self.api_host,
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_builder() -> ShimConfigBuilder {
        ShimConfig::builder()
            .shop(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("token").unwrap())
    }

    #[test]
    fn test_builder_requires_shop() {
        let result = ShimConfigBuilder::new()
            .access_token(AccessToken::new("token").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "shop" })
        ));
    }

    #[test]
    fn test_builder_requires_access_token() {
        let result = ShimConfigBuilder::new()
            .shop(ShopDomain::new("test-shop").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "access_token"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = base_builder().build().unwrap();

        assert_eq!(config.api_version(), &ApiVersion::latest());
        assert!(config.api_host().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert!(config.timeout().is_none());
        assert_eq!(config.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = base_builder()
            .api_version(ApiVersion::V2025_01)
            .api_host(HostUrl::new("http://localhost:4000").unwrap())
            .user_agent_prefix("Legacy/2.0")
            .timeout(Duration::from_secs(5))
            .page_size(50)
            .build()
            .unwrap();

        assert_eq!(config.api_version(), &ApiVersion::V2025_01);
        assert_eq!(config.api_host().unwrap().as_ref(), "http://localhost:4000");
        assert_eq!(config.user_agent_prefix(), Some("Legacy/2.0"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.page_size(), 50);
    }

    #[test]
    fn test_builder_rejects_out_of_range_page_size() {
        assert!(matches!(
            base_builder().page_size(0).build(),
            Err(ConfigError::InvalidPageSize { size: 0, .. })
        ));
        assert!(matches!(
            base_builder().page_size(251).build(),
            Err(ConfigError::InvalidPageSize { size: 251, .. })
        ));
    }

    #[test]
    fn test_config_debug_does_not_leak_token() {
        let config = ShimConfig::builder()
            .shop(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("shpat_visible").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("ShimConfig"));
        assert!(!debug_str.contains("shpat_visible"));
    }
}
