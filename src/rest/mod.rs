//! REST-shaped operations implemented over the GraphQL Admin API.
//!
//! This module provides:
//!
//! - **[`Translator`] and [`Operation`]**: the shared runtime that executes a
//!   GraphQL document and converts every outcome into a REST result
//! - **[`fields`]**: declarative tables mapping GraphQL nodes to REST records
//! - **[`gid`]**: bare ID ⇄ global ID translation
//! - **[`InputMap`]**: variable building that omits absent optional fields
//! - **[`PageParams`] / [`Page`]**: cursor pass-through pagination
//! - **[`ResourceError`]**: REST-style errors with HTTP status codes
//! - **[`resources`]**: one translator per REST resource family
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_rest_shim::{RestShim, ShimConfig};
//! use shopify_rest_shim::rest::PageParams;
//! use shopify_rest_shim::rest::resources::ProductListParams;
//!
//! let shim = RestShim::new(&config);
//!
//! let product = shim.products().get(632_910_392).await?;
//! println!("{:?} has {} variants", product.title, product.variants.len());
//!
//! let mut page = shim.products().list(&ProductListParams::default(), &PageParams::new().limit(50)).await?;
//! while let Some(next) = page.next_page(Some(50)) {
//!     page = shim.products().list(&ProductListParams::default(), &next).await?;
//! }
//! ```

mod errors;
pub mod fields;
pub mod gid;
pub mod input;
mod pagination;
pub mod queries;
pub mod resources;
mod translator;
pub mod weight;

pub use errors::ResourceError;
pub use input::InputMap;
pub use pagination::{Direction, Page, PageInfo, PageParams};
pub use translator::{decode, require, shape, shape_list, shape_page, Operation, Translator};
