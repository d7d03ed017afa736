//! HTTP transport and GraphQL executor.
//!
//! # Overview
//!
//! - [`HttpClient`]: async transport that POSTs JSON to the shop
//! - [`HttpResponse`]: raw status, headers and body text
//! - [`HttpError`]: what went wrong below GraphQL
//! - [`graphql::GraphqlClient`]: the query executor
//! - [`graphql::GraphqlOutcome`]: the classified result of one call
//!
//! # Retry Behavior
//!
//! None. Each executor call issues exactly one request. Throttling is
//! reported to the caller, who owns any backoff.

mod errors;
pub mod graphql;
mod http_client;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_response::HttpResponse;

pub use graphql::{GraphqlClient, GraphqlOutcome, QueryEnvelope, TransportFailure};
