//! # Shopify REST Shim
//!
//! The legacy Shopify REST Admin API surface, implemented on top of the
//! GraphQL Admin API.
//!
//! ## Overview
//!
//! Applications written against REST resources (products, orders, themes,
//! webhooks and so on) keep their call sites and record shapes. Every
//! operation is carried out by one or more GraphQL queries or mutations and
//! the responses are reshaped into REST form:
//!
//! - bare numeric IDs instead of `gid://shopify/...` global IDs
//! - snake_case field names and lowercase enum values
//! - REST-style errors with HTTP status codes via [`rest::ResourceError`]
//!
//! The crate is organised in three layers:
//!
//! - [`config`]: validated credentials and endpoint settings ([`ShimConfig`])
//! - [`clients::graphql`]: the executor that posts documents and classifies
//!   the outcome (success, application errors, throttled, transport failure)
//! - [`rest`]: the shared translation runtime and one family per resource
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_rest_shim::{AccessToken, ApiVersion, RestShim, ShimConfig, ShopDomain};
//!
//! let config = ShimConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_123").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! let shim = RestShim::new(&config);
//! let _products = shim.products();
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use shopify_rest_shim::rest::{PageParams, ResourceError};
//! use shopify_rest_shim::rest::resources::{ProductInput, ProductListParams};
//!
//! let product = shim.products().create(&ProductInput {
//!     title: Some("Burton Custom Freestyle 151".to_string()),
//!     ..Default::default()
//! }).await?;
//!
//! match shim.orders().get(450_789_469).await {
//!     Ok(order) => println!("{:?}", order.name),
//!     Err(e @ ResourceError::NotFound { .. }) => println!("{} {e}", e.status()),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (operation names, page counts,
//! throttle waits) and never installs a subscriber; applications choose
//! their own.

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ApiVersion, HostUrl, ShimConfig, ShimConfigBuilder, ShopDomain};
pub use error::ConfigError;
pub use rest::resources::RestShim;
pub use rest::ResourceError;

// Re-export executor types
pub use clients::{GraphqlClient, GraphqlOutcome, QueryEnvelope, TransportFailure};
