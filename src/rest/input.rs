//! Building GraphQL variables and input objects from REST input.
//!
//! Required fields are always written. Optional fields are written only
//! when present and non-empty; an absent value omits the key instead of
//! sending `null`, which GraphQL would read as "clear this field".

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// An ordered JSON object built field by field.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::InputMap;
/// use serde_json::json;
///
/// let input = InputMap::new()
///     .field("title", "Hat")
///     .optional("vendor", None::<String>)
///     .optional("tags", Some(Vec::<String>::new()))
///     .optional("handle", Some("hat"));
///
/// assert_eq!(input.into_value(), json!({ "title": "Hat", "handle": "hat" }));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputMap(Map<String, Value>);

impl InputMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a required field, even if it is `null` or empty.
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Writes an optional field when it is present and not blank.
    #[must_use]
    pub fn optional<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        self.set_optional(key, value);
        self
    }

    /// Writes a nested object when it has at least one field.
    #[must_use]
    pub fn nested(mut self, key: &str, value: Self) -> Self {
        if !value.is_empty() {
            self.0.insert(key.to_string(), value.into_value());
        }
        self
    }

    /// In-place form of [`optional`](Self::optional).
    pub fn set_optional<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value.map(Into::into) {
            if !is_blank(&value) {
                self.0.insert(key.to_string(), value);
            }
        }
    }

    /// Returns `true` if no field has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `key` has been written.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Returns the map as a JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<InputMap> for Value {
    fn from(map: InputMap) -> Self {
        map.into_value()
    }
}

/// Returns `true` for `null`, `""`, `[]` and `{}`.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Formats a timestamp the way the search syntax expects it.
#[must_use]
pub fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Builds the `query:` search string accepted by list fields.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::input::SearchQuery;
///
/// let query = SearchQuery::new()
///     .term("vendor", Some("Acme Co"))
///     .term("product_type", None::<&str>)
///     .range("created_at", ">=", Some("2024-01-01"))
///     .build();
///
/// assert_eq!(query.as_deref(), Some(r#"vendor:"Acme Co" created_at:>=2024-01-01"#));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key:value` when the value is present and non-empty.
    #[must_use]
    pub fn term(self, key: &str, value: Option<impl fmt::Display>) -> Self {
        self.range(key, "", value)
    }

    /// Adds `key:<op>value`, e.g. `created_at:>=2024-01-01`.
    #[must_use]
    pub fn range(mut self, key: &str, op: &str, value: Option<impl fmt::Display>) -> Self {
        if let Some(value) = value.map(|v| v.to_string()) {
            if !value.is_empty() {
                self.terms.push(format!("{key}:{op}{}", quote(&value)));
            }
        }
        self
    }

    /// Adds a timestamp range term.
    #[must_use]
    pub fn since(self, key: &str, op: &str, value: Option<&DateTime<Utc>>) -> Self {
        self.range(key, op, value.map(timestamp))
    }

    /// Adds a pre-formatted term.
    #[must_use]
    pub fn raw(mut self, term: Option<&str>) -> Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            self.terms.push(term.to_string());
        }
        self
    }

    /// Returns the space-joined query, or `None` when no term was added.
    #[must_use]
    pub fn build(self) -> Option<String> {
        (!self.terms.is_empty()).then(|| self.terms.join(" "))
    }
}

fn quote(value: &str) -> String {
    if value.chars().any(|c| c.is_whitespace() || c == ':' || c == '"') {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_optional_skips_blank_values() {
        let input = InputMap::new()
            .optional("a", Some(""))
            .optional("b", Some(json!({})))
            .optional("c", Some(json!(null)))
            .optional("d", Some(false))
            .optional("e", Some(0));

        assert_eq!(input.into_value(), json!({ "d": false, "e": 0 }));
    }

    #[test]
    fn test_required_field_is_always_written() {
        let input = InputMap::new().field("note", "");
        assert_eq!(input.into_value(), json!({ "note": "" }));
    }

    #[test]
    fn test_nested_skips_empty_objects() {
        let input = InputMap::new()
            .nested("inventoryItem", InputMap::new())
            .nested("measurement", InputMap::new().field("x", 1));
        assert_eq!(input.into_value(), json!({ "measurement": { "x": 1 } }));
    }

    #[test]
    fn test_search_query_quotes_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let query = SearchQuery::new()
            .term("status", Some("open"))
            .since("updated_at", ">=", Some(&at))
            .build()
            .unwrap();
        assert_eq!(query, r#"status:open updated_at:>="2024-05-01T12:00:00Z""#);
    }

    #[test]
    fn test_empty_search_query_is_none() {
        assert_eq!(SearchQuery::new().term("x", None::<&str>).build(), None);
    }
}
