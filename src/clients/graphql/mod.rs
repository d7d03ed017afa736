//! GraphQL query executor for the Shopify Admin API.
//!
//! Every REST-shaped operation in this crate ends up here: a
//! [`QueryEnvelope`] is POSTed to `/admin/api/{version}/graphql.json` and the
//! response is classified into a [`GraphqlOutcome`].
//!
//! # Overview
//!
//! - [`GraphqlClient`]: the executor, one network request per call
//! - [`QueryEnvelope`]: the `{query, variables?}` payload
//! - [`GraphqlOutcome`]: success, application errors, throttled, or
//!   transport failure
//! - [`TransportFailure`]: a call that failed below the GraphQL layer
//!
//! # Throttling
//!
//! The GraphQL Admin API rate-limits by query cost and reports throttling
//! as a top-level error with `extensions.code == "THROTTLED"`, usually with
//! HTTP 200. The executor surfaces it as [`GraphqlOutcome::Throttled`] and
//! never retries; [`ThrottleInfo::suggested_wait`] tells the caller how long
//! to back off.

mod client;
mod envelope;
mod errors;
mod outcome;

pub use client::{classify, GraphqlClient, THROTTLED_CODE};
pub use envelope::QueryEnvelope;
pub use errors::TransportFailure;
pub use outcome::{GraphqlErrorEntry, GraphqlOutcome, QueryCost, ThrottleInfo, ThrottleStatus};
