//! Declarative mapping from GraphQL nodes to REST-shaped JSON.
//!
//! A [`FieldMap`] is a static table of [`Field`]s. Each field names one REST
//! key and a [`Rule`] for producing its value from the GraphQL node:
//!
//! ```rust
//! use shopify_rest_shim::rest::fields::{map_fields, Field, FieldMap};
//! use serde_json::json;
//!
//! const LOCATION: &FieldMap = &[
//!     Field::id("id", "id"),
//!     Field::copy("name", "name"),
//!     Field::copy("city", "address.city"),
//!     Field::copy("admin_graphql_api_id", "id"),
//! ];
//!
//! let rest = map_fields(LOCATION, &json!({
//!     "id": "gid://shopify/Location/7",
//!     "name": "Warehouse",
//!     "address": { "city": "Ottawa" }
//! }));
//!
//! assert_eq!(rest, json!({
//!     "id": 7,
//!     "name": "Warehouse",
//!     "city": "Ottawa",
//!     "admin_graphql_api_id": "gid://shopify/Location/7"
//! }));
//! ```
//!
//! Every key in the table is always present in the output; a missing source
//! value maps to `null` (or `[]` for lists).

use serde_json::{Map, Value};

use crate::rest::gid::strip_gid;

/// A table of REST fields.
pub type FieldMap = [Field];

/// A function deriving a REST value from the whole GraphQL node.
pub type Compute = fn(&Value) -> Value;

/// A constant REST value with no GraphQL counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Literal {
    /// `null`
    Null,
    /// A boolean.
    Bool(bool),
    /// A string.
    Str(&'static str),
}

impl Literal {
    fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Str(s) => Value::String(s.to_string()),
        }
    }
}

/// How a REST value is produced. Paths are dot-separated (`"image.url"`).
#[derive(Clone, Copy)]
pub enum Rule {
    /// Copy the value unchanged.
    Copy(&'static str),
    /// Strip a global ID to its bare suffix.
    Id(&'static str),
    /// Strip every global ID in a list or connection.
    Ids(&'static str),
    /// Lowercase an upper-case enum value.
    Lower(&'static str),
    /// Take the decimal string from a `MoneyV2`, `MoneyBag` or bare amount.
    Money(&'static str),
    /// Map a nested object with another table.
    Object(&'static str, &'static FieldMap),
    /// Flatten a list or connection and map each node with another table.
    List(&'static str, &'static FieldMap),
    /// A REST-only constant.
    Const(Literal),
    /// Derived from the whole node.
    Computed(Compute),
}

/// One REST field.
#[derive(Clone, Copy)]
pub struct Field {
    /// The REST key.
    pub name: &'static str,
    /// How to produce it.
    pub rule: Rule,
}

impl Field {
    /// See [`Rule::Copy`].
    #[must_use]
    pub const fn copy(name: &'static str, from: &'static str) -> Self {
        Self { name, rule: Rule::Copy(from) }
    }

    /// See [`Rule::Id`].
    #[must_use]
    pub const fn id(name: &'static str, from: &'static str) -> Self {
        Self { name, rule: Rule::Id(from) }
    }

    /// See [`Rule::Ids`].
    #[must_use]
    pub const fn ids(name: &'static str, from: &'static str) -> Self {
        Self { name, rule: Rule::Ids(from) }
    }

    /// See [`Rule::Lower`].
    #[must_use]
    pub const fn lower(name: &'static str, from: &'static str) -> Self {
        Self { name, rule: Rule::Lower(from) }
    }

    /// See [`Rule::Money`].
    #[must_use]
    pub const fn money(name: &'static str, from: &'static str) -> Self {
        Self { name, rule: Rule::Money(from) }
    }

    /// See [`Rule::Object`].
    #[must_use]
    pub const fn object(name: &'static str, from: &'static str, map: &'static FieldMap) -> Self {
        Self { name, rule: Rule::Object(from, map) }
    }

    /// See [`Rule::List`].
    #[must_use]
    pub const fn list(name: &'static str, from: &'static str, map: &'static FieldMap) -> Self {
        Self { name, rule: Rule::List(from, map) }
    }

    /// See [`Rule::Const`].
    #[must_use]
    pub const fn constant(name: &'static str, value: Literal) -> Self {
        Self { name, rule: Rule::Const(value) }
    }

    /// See [`Rule::Computed`].
    #[must_use]
    pub const fn computed(name: &'static str, compute: Compute) -> Self {
        Self { name, rule: Rule::Computed(compute) }
    }

    fn resolve(&self, source: &Value) -> Value {
        match self.rule {
            Rule::Copy(path) => lookup(source, path).cloned().unwrap_or(Value::Null),
            Rule::Id(path) => lookup(source, path).map_or(Value::Null, strip_gid),
            Rule::Ids(path) => Value::Array(
                flatten(lookup(source, path))
                    .into_iter()
                    .map(|node| node.get("id").map_or_else(|| strip_gid(node), strip_gid))
                    .collect(),
            ),
            Rule::Lower(path) => lookup(source, path)
                .and_then(Value::as_str)
                .map_or(Value::Null, |s| Value::String(s.to_lowercase())),
            Rule::Money(path) => lookup(source, path).map_or(Value::Null, money_amount),
            Rule::Object(path, map) => match lookup(source, path) {
                Some(value) if !value.is_null() => map_fields(map, value),
                _ => Value::Null,
            },
            Rule::List(path, map) => Value::Array(map_all(map, flatten(lookup(source, path)))),
            Rule::Const(literal) => literal.to_value(),
            Rule::Computed(compute) => compute(source),
        }
    }
}

/// Maps one GraphQL node to a REST JSON object.
#[must_use]
pub fn map_fields(map: &FieldMap, source: &Value) -> Value {
    let mut out = Map::new();
    for field in map {
        out.insert(field.name.to_string(), field.resolve(source));
    }
    Value::Object(out)
}

/// Maps every node of a flattened sequence.
#[must_use]
pub fn map_all<'a>(map: &FieldMap, nodes: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    nodes.into_iter().map(|node| map_fields(map, node)).collect()
}

/// Follows a dot-separated path. An empty path returns the source itself.
/// Numeric segments index into arrays.
#[must_use]
pub fn lookup<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(source);
    }
    path.split('.').try_fold(source, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Flattens `edges[].node`, `nodes[]` or a plain array into an ordered
/// sequence. Anything else (including `null`) is empty.
#[must_use]
pub fn flatten(value: Option<&Value>) -> Vec<&Value> {
    let Some(value) = value else {
        return Vec::new();
    };

    if let Some(edges) = value.get("edges").and_then(Value::as_array) {
        return edges.iter().filter_map(|edge| edge.get("node")).collect();
    }
    if let Some(nodes) = value.get("nodes").and_then(Value::as_array) {
        return nodes.iter().collect();
    }
    value.as_array().map(|items| items.iter().collect()).unwrap_or_default()
}

/// Extracts the decimal amount from `{amount}`, `{shopMoney: {amount}}` or a
/// bare string. Numbers are rendered as strings so the caller never sees a
/// float round-trip.
#[must_use]
pub fn money_amount(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Object(map) => {
            if let Some(amount) = map.get("amount") {
                money_amount(amount)
            } else if let Some(shop_money) = map.get("shopMoney") {
                money_amount(shop_money)
            } else {
                Value::Null
            }
        }
        _ => Value::Null,
    }
}

/// Joins a list of strings with `", "` (REST `tags`).
#[must_use]
pub fn join_strings(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Array(items)) => Value::String(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Some(Value::String(s)) => Value::String(s.clone()),
        _ => Value::Null,
    }
}

/// Splits REST comma-separated tags into a list.
#[must_use]
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Lowercases an enum, replacing `_` with `-` (`BEST_SELLING` → `best-selling`).
#[must_use]
pub fn kebab_enum(value: &str) -> String {
    value.to_lowercase().replace('_', "-")
}

/// Inverse of [`kebab_enum`].
#[must_use]
pub fn from_kebab_enum(value: &str) -> String {
    value.trim().to_uppercase().replace('-', "_")
}

/// Upper-cases a REST enum for GraphQL (`online_store` → `ONLINE_STORE`).
#[must_use]
pub fn upper_enum(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IMAGE: &FieldMap = &[Field::copy("src", "url"), Field::copy("alt", "altText")];

    const RECORD: &FieldMap = &[
        Field::id("id", "id"),
        Field::lower("status", "status"),
        Field::money("price", "priceSet"),
        Field::object("image", "image", IMAGE),
        Field::list("images", "media", IMAGE),
        Field::ids("product_ids", "products"),
        Field::constant("published_scope", Literal::Str("web")),
        Field::computed("tags", tags),
    ];

    fn tags(node: &Value) -> Value {
        join_strings(node.get("tags"))
    }

    #[test]
    fn test_map_fields_applies_every_rule() {
        let node = json!({
            "id": "gid://shopify/Thing/5",
            "status": "ACTIVE",
            "priceSet": { "shopMoney": { "amount": "19.90", "currencyCode": "CAD" } },
            "image": { "url": "https://cdn/x.png", "altText": null },
            "media": { "edges": [
                { "node": { "url": "a" } },
                { "node": { "url": "b", "altText": "B" } }
            ]},
            "products": { "nodes": [{ "id": "gid://shopify/Product/1" }, { "id": "gid://shopify/Product/2" }] },
            "tags": ["red", "sale"]
        });

        assert_eq!(
            map_fields(RECORD, &node),
            json!({
                "id": 5,
                "status": "active",
                "price": "19.90",
                "image": { "src": "https://cdn/x.png", "alt": null },
                "images": [{ "src": "a", "alt": null }, { "src": "b", "alt": "B" }],
                "product_ids": [1, 2],
                "published_scope": "web",
                "tags": "red, sale"
            })
        );
    }

    #[test]
    fn test_missing_source_values_are_null_or_empty() {
        let mapped = map_fields(RECORD, &json!({}));
        assert_eq!(mapped["id"], Value::Null);
        assert_eq!(mapped["image"], Value::Null);
        assert_eq!(mapped["images"], json!([]));
        assert_eq!(mapped["product_ids"], json!([]));
        assert_eq!(mapped["published_scope"], "web");
    }

    #[test]
    fn test_lookup_handles_array_indexes() {
        let value = json!({ "a": [{ "b": 1 }, { "b": 2 }] });
        assert_eq!(lookup(&value, "a.1.b"), Some(&json!(2)));
        assert_eq!(lookup(&value, "a.9.b"), None);
        assert_eq!(lookup(&value, ""), Some(&value));
    }

    #[test]
    fn test_money_never_becomes_a_float() {
        assert_eq!(money_amount(&json!({ "amount": "10.10" })), json!("10.10"));
        assert_eq!(money_amount(&json!("3.00")), json!("3.00"));
        assert_eq!(money_amount(&json!(null)), Value::Null);
    }

    #[test]
    fn test_enum_helpers() {
        assert_eq!(kebab_enum("BEST_SELLING"), "best-selling");
        assert_eq!(from_kebab_enum("price-desc"), "PRICE_DESC");
        assert_eq!(upper_enum("online_store"), "ONLINE_STORE");
        assert_eq!(split_tags(" a, b ,, c"), vec!["a", "b", "c"]);
    }
}
