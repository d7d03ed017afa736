//! The request payload sent to the GraphQL endpoint.

use serde::Serialize;
use serde_json::{Map, Value};

/// A GraphQL document plus its variables, serialized as `{query, variables?}`.
///
/// The envelope is immutable once built. An absent or empty variable map
/// omits the `variables` key from the wire payload entirely.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::clients::graphql::QueryEnvelope;
/// use serde_json::json;
///
/// let bare = QueryEnvelope::new("query { shop { name } }");
/// assert_eq!(bare.to_json(), json!({ "query": "query { shop { name } }" }));
///
/// let mut variables = serde_json::Map::new();
/// variables.insert("id".to_string(), json!("gid://shopify/Product/1"));
/// let with_vars = QueryEnvelope::with_variables("query($id: ID!) { product(id: $id) { id } }", variables);
/// assert!(with_vars.to_json().get("variables").is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryEnvelope {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Map<String, Value>>,
}

impl QueryEnvelope {
    /// Creates an envelope with no variables.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    /// Creates an envelope with variables. An empty map is treated as absent.
    #[must_use]
    pub fn with_variables(query: impl Into<String>, variables: Map<String, Value>) -> Self {
        Self {
            query: query.into(),
            variables: (!variables.is_empty()).then_some(variables),
        }
    }

    /// Returns the query document.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the variables, if any.
    #[must_use]
    pub const fn variables(&self) -> Option<&Map<String, Value>> {
        self.variables.as_ref()
    }

    /// Returns the wire payload.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("query".to_string(), Value::String(self.query.clone()));
        if let Some(variables) = &self.variables {
            payload.insert("variables".to_string(), Value::Object(variables.clone()));
        }
        Value::Object(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_variables_are_omitted() {
        let envelope = QueryEnvelope::with_variables("query { shop { id } }", Map::new());
        assert!(envelope.variables().is_none());
        assert_eq!(envelope.to_json(), json!({ "query": "query { shop { id } }" }));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "query": "query { shop { id } }" })
        );
    }

    #[test]
    fn test_variables_are_serialized_verbatim() {
        let mut variables = Map::new();
        variables.insert("first".to_string(), json!(5));
        let envelope = QueryEnvelope::with_variables("query($first: Int!) { x }", variables);

        assert_eq!(
            envelope.to_json(),
            json!({ "query": "query($first: Int!) { x }", "variables": { "first": 5 } })
        );
    }
}
