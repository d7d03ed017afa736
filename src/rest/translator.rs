//! The shared runtime every resource family runs on.
//!
//! A family describes each GraphQL call as an [`Operation`] (name, document,
//! payload key, user-error path) and hands it to a [`Translator`] together
//! with the variables. The translator executes it, converts every
//! non-success outcome into a [`ResourceError`] and returns the payload for
//! shaping with a [`FieldMap`].

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::graphql::{GraphqlClient, GraphqlOutcome, QueryEnvelope};
use crate::rest::errors::{entries_to_values, ResourceError};
use crate::rest::fields::{flatten, lookup, map_fields, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::pagination::{Page, PageInfo, PageParams};

/// One GraphQL query or mutation, described as data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operation {
    /// Operation name, used in errors and logs.
    pub name: &'static str,
    /// The GraphQL document.
    pub document: &'static str,
    /// The key of the payload under `data`.
    pub root: &'static str,
    /// Path of the embedded user-error list inside the payload.
    pub user_errors: Option<&'static str>,
}

impl Operation {
    /// A query with no embedded user errors.
    #[must_use]
    pub const fn query(name: &'static str, document: &'static str, root: &'static str) -> Self {
        Self {
            name,
            document,
            root,
            user_errors: None,
        }
    }

    /// A mutation whose payload carries a user-error list at `user_errors`.
    #[must_use]
    pub const fn mutation(
        name: &'static str,
        document: &'static str,
        root: &'static str,
        user_errors: &'static str,
    ) -> Self {
        Self {
            name,
            document,
            root,
            user_errors: Some(user_errors),
        }
    }
}

/// Executes [`Operation`]s against a borrowed [`GraphqlClient`].
#[derive(Clone, Copy, Debug)]
pub struct Translator<'c> {
    client: &'c GraphqlClient,
}

// Verify Translator is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Translator<'static>>();
};

impl<'c> Translator<'c> {
    /// Creates a translator over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self { client }
    }

    /// Returns the executor.
    #[must_use]
    pub const fn client(&self) -> &'c GraphqlClient {
        self.client
    }

    /// Default page size for list operations.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.client.page_size()
    }

    /// Runs `operation` and returns `data[root]` (`null` when absent).
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Validation`] for top-level GraphQL errors or a
    ///   non-empty user-error list, even when a payload is also present
    /// - [`ResourceError::Throttled`] when the API throttled the request
    /// - [`ResourceError::Transport`] for HTTP and connection failures
    pub async fn run(&self, operation: &Operation, variables: InputMap) -> Result<Value, ResourceError> {
        tracing::debug!(operation = operation.name, "Executing GraphQL operation");

        let envelope = QueryEnvelope::with_variables(operation.document, variables.into_map());
        match self.client.execute(&envelope).await {
            GraphqlOutcome::Success(mut data) => {
                let payload = data
                    .get_mut(operation.root)
                    .map(Value::take)
                    .unwrap_or(Value::Null);

                if let Some(path) = operation.user_errors {
                    if let Some(Value::Array(errors)) = lookup(&payload, path) {
                        if !errors.is_empty() {
                            return Err(ResourceError::Validation {
                                operation: operation.name,
                                errors: errors.clone(),
                            });
                        }
                    }
                }
                Ok(payload)
            }
            GraphqlOutcome::ApplicationErrors(errors) => Err(ResourceError::Validation {
                operation: operation.name,
                errors: entries_to_values(&errors),
            }),
            GraphqlOutcome::Throttled(info) => {
                tracing::warn!(
                    operation = operation.name,
                    wait = ?info.suggested_wait(),
                    "GraphQL operation throttled"
                );
                Err(ResourceError::Throttled {
                    operation: operation.name,
                    info,
                })
            }
            GraphqlOutcome::TransportFailure(failure) => Err(ResourceError::Transport {
                operation: operation.name,
                failure,
            }),
        }
    }

    /// Runs a single-resource read.
    ///
    /// # Errors
    ///
    /// Everything [`run`](Self::run) returns, plus
    /// [`ResourceError::NotFound`] when the payload is `null`.
    pub async fn find(
        &self,
        operation: &Operation,
        variables: InputMap,
        resource: &'static str,
        id: &str,
    ) -> Result<Value, ResourceError> {
        let payload = self.run(operation, variables).await?;
        if payload.is_null() {
            return Err(ResourceError::not_found(resource, id));
        }
        Ok(payload)
    }

    /// Runs one page of a list operation whose connection sits at `path`
    /// inside the payload (`""` when the payload is the connection).
    ///
    /// # Errors
    ///
    /// Everything [`run`](Self::run) returns, plus
    /// [`ResourceError::MalformedResponse`] when the connection is missing
    /// or a node cannot be decoded.
    pub async fn list<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: InputMap,
        page: &PageParams,
        path: &str,
        map: &FieldMap,
    ) -> Result<Page<T>, ResourceError> {
        let variables = page.apply(variables, self.page_size());
        let payload = self.run(operation, variables).await?;
        let connection = require(operation.name, &payload, path)?;
        shape_page(operation.name, map, connection)
    }

    /// Follows `endCursor` until `hasNextPage` is false and returns every
    /// raw node in order.
    ///
    /// `first` and `after` are written into `variables` on each request. The
    /// connection sits at `path` inside the payload; a `null` payload is
    /// reported as [`ResourceError::NotFound`] for `resource`/`id`.
    ///
    /// # Errors
    ///
    /// The first error of any page is returned and nothing collected so far
    /// is kept. A cursor that repeats is a
    /// [`ResourceError::MalformedResponse`].
    pub async fn collect_all(
        &self,
        operation: &Operation,
        variables: InputMap,
        path: &str,
        resource: &'static str,
        id: &str,
    ) -> Result<Vec<Value>, ResourceError> {
        let mut nodes = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut page = 0_u32;

        loop {
            page += 1;
            let request = variables
                .clone()
                .field("first", self.page_size())
                .optional("after", cursor.clone());

            let payload = self.find(operation, request, resource, id).await?;
            let connection = require(operation.name, &payload, path)?;
            let info = PageInfo::from_connection(operation.name, connection)?;
            let batch = flatten(Some(connection));

            tracing::debug!(
                operation = operation.name,
                page,
                count = batch.len(),
                has_next_page = info.has_next_page,
                "Fetched page"
            );
            nodes.extend(batch.into_iter().cloned());

            if !info.has_next_page {
                return Ok(nodes);
            }

            let next = info
                .end_cursor
                .ok_or_else(|| ResourceError::malformed(operation.name, "endCursor is missing"))?;
            if !seen.insert(next.clone()) {
                return Err(ResourceError::malformed(
                    operation.name,
                    format!("cursor {next} was returned twice"),
                ));
            }
            cursor = Some(next);
        }
    }
}

/// Returns the non-null value at `path`.
///
/// # Errors
///
/// Returns [`ResourceError::MalformedResponse`] when it is missing or `null`.
pub fn require<'v>(operation: &'static str, value: &'v Value, path: &str) -> Result<&'v Value, ResourceError> {
    match lookup(value, path) {
        Some(found) if !found.is_null() => Ok(found),
        _ => Err(ResourceError::malformed(
            operation,
            if path.is_empty() {
                "payload is null".to_string()
            } else {
                format!("{path} is missing from the payload")
            },
        )),
    }
}

/// Decodes a REST-shaped JSON value into a record.
///
/// # Errors
///
/// Returns [`ResourceError::MalformedResponse`] with the decode error as its
/// source.
pub fn decode<T: DeserializeOwned>(operation: &'static str, value: Value) -> Result<T, ResourceError> {
    serde_json::from_value(value).map_err(|source| ResourceError::MalformedResponse {
        operation,
        message: "record could not be decoded".to_string(),
        source: Some(source),
    })
}

/// Maps one node with `map` and decodes it.
///
/// # Errors
///
/// See [`decode`].
pub fn shape<T: DeserializeOwned>(operation: &'static str, map: &FieldMap, node: &Value) -> Result<T, ResourceError> {
    decode(operation, map_fields(map, node))
}

/// Flattens a connection or list and shapes every node.
///
/// # Errors
///
/// See [`decode`].
pub fn shape_list<T: DeserializeOwned>(
    operation: &'static str,
    map: &FieldMap,
    connection: Option<&Value>,
) -> Result<Vec<T>, ResourceError> {
    flatten(connection)
        .into_iter()
        .map(|node| shape(operation, map, node))
        .collect()
}

/// Shapes a connection into a [`Page`].
///
/// # Errors
///
/// See [`PageInfo::from_connection`] and [`decode`].
pub fn shape_page<T: DeserializeOwned>(
    operation: &'static str,
    map: &FieldMap,
    connection: &Value,
) -> Result<Page<T>, ResourceError> {
    let page_info = PageInfo::from_connection(operation, connection)?;
    let items = shape_list(operation, map, Some(connection))?;
    Ok(Page::new(items, page_info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::Field;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Location {
        id: Option<u64>,
        name: Option<String>,
    }

    const LOCATION: &FieldMap = &[Field::id("id", "id"), Field::copy("name", "name")];

    #[test]
    fn test_operation_constructors() {
        let op = Operation::mutation("productCreate", "mutation {}", "productCreate", "userErrors");
        assert_eq!(op.user_errors, Some("userErrors"));
        assert_eq!(Operation::query("shop", "{ shop { id } }", "shop").user_errors, None);
    }

    #[test]
    fn test_shape_page_flattens_edges() {
        let connection = json!({
            "edges": [
                { "node": { "id": "gid://shopify/Location/1", "name": "A" } },
                { "node": { "id": "gid://shopify/Location/2", "name": "B" } }
            ],
            "pageInfo": { "hasNextPage": false, "hasPreviousPage": false }
        });
        let page: Page<Location> = shape_page("locations", LOCATION, &connection).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[1].id, Some(2));
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_shape_reports_decode_errors_as_malformed() {
        let result: Result<Location, _> = shape("location", LOCATION, &json!({ "id": "gid://shopify/Location/abc" }));
        let error = result.unwrap_err();
        assert_eq!(error.status(), 502);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_require_rejects_null_and_missing() {
        let payload = json!({ "product": null, "shop": { "id": "x" } });
        assert!(require("op", &payload, "product").is_err());
        assert!(require("op", &payload, "missing").is_err());
        assert!(require("op", &Value::Null, "").is_err());
        assert_eq!(require("op", &payload, "shop.id").unwrap(), "x");
    }
}
