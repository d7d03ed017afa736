//! Types and helpers shared by several resource families.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::errors::ResourceError;
use crate::rest::fields::{lookup, Field, FieldMap};
use crate::rest::gid::{qualify, strip_gid};
use crate::rest::input::InputMap;
use crate::rest::translator::require;

/// A postal address embedded in orders.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::resources::Address;
///
/// let address = Address {
///     first_name: Some("Bob".to_string()),
///     address1: Some("Chestnut Street 92".to_string()),
///     city: Some("Louisville".to_string()),
///     country_code: Some("US".to_string()),
///     ..Default::default()
/// };
/// assert!(address.zip.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Address {
    /// The first name of the person at the address.
    pub first_name: Option<String>,
    /// The last name of the person at the address.
    pub last_name: Option<String>,
    /// The full name.
    pub name: Option<String>,
    /// The company name.
    pub company: Option<String>,
    /// The street address.
    pub address1: Option<String>,
    /// Apartment, suite, etc.
    pub address2: Option<String>,
    /// The city.
    pub city: Option<String>,
    /// The province or state.
    pub province: Option<String>,
    /// The province or state code.
    pub province_code: Option<String>,
    /// The country name.
    pub country: Option<String>,
    /// The two-letter country code.
    pub country_code: Option<String>,
    /// The postal code.
    pub zip: Option<String>,
    /// The phone number.
    pub phone: Option<String>,
    /// The latitude.
    pub latitude: Option<f64>,
    /// The longitude.
    pub longitude: Option<f64>,
}

impl Address {
    /// Builds a GraphQL `MailingAddressInput`.
    pub(crate) fn to_graphql(&self) -> InputMap {
        InputMap::new()
            .optional("firstName", self.first_name.clone())
            .optional("lastName", self.last_name.clone())
            .optional("company", self.company.clone())
            .optional("address1", self.address1.clone())
            .optional("address2", self.address2.clone())
            .optional("city", self.city.clone())
            .optional("provinceCode", self.province_code.clone())
            .optional("countryCode", self.country_code.clone())
            .optional("zip", self.zip.clone())
            .optional("phone", self.phone.clone())
    }
}

pub(crate) const ADDRESS: &FieldMap = &[
    Field::copy("first_name", "firstName"),
    Field::copy("last_name", "lastName"),
    Field::copy("name", "name"),
    Field::copy("company", "company"),
    Field::copy("address1", "address1"),
    Field::copy("address2", "address2"),
    Field::copy("city", "city"),
    Field::copy("province", "province"),
    Field::copy("province_code", "provinceCode"),
    Field::copy("country", "country"),
    Field::copy("country_code", "countryCodeV2"),
    Field::copy("zip", "zip"),
    Field::copy("phone", "phone"),
    Field::copy("latitude", "latitude"),
    Field::copy("longitude", "longitude"),
];

/// Qualifies `id` as a `resource_type` global ID and keeps the caller's form
/// for error messages.
pub(crate) fn global_id(resource_type: &str, id: impl fmt::Display) -> Result<(String, String), ResourceError> {
    let raw = id.to_string();
    let gid = qualify(resource_type, &raw)?;
    Ok((gid, raw))
}

/// Qualifies every ID in `ids`.
pub(crate) fn global_ids<I>(resource_type: &str, ids: I) -> Result<Vec<String>, ResourceError>
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    ids.into_iter()
        .map(|id| qualify(resource_type, id).map_err(ResourceError::from))
        .collect()
}

/// Checks that a REST money or decimal value parses, and returns it trimmed.
pub(crate) fn decimal(field: &str, value: &str) -> Result<String, ResourceError> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(trimmed.to_string()),
        _ => Err(ResourceError::invalid_input(format!(
            "{field} must be a decimal amount, got '{value}'"
        ))),
    }
}

/// Reads `{ count }` from a count payload.
pub(crate) fn count(operation: &'static str, payload: &Value) -> Result<u64, ResourceError> {
    require(operation, payload, "count")?
        .as_u64()
        .ok_or_else(|| ResourceError::malformed(operation, "count is not a non-negative integer"))
}

/// Treats a `null` deleted-ID field as a missing resource.
pub(crate) fn deleted(
    payload: &Value,
    key: &str,
    resource: &'static str,
    id: &str,
) -> Result<(), ResourceError> {
    match lookup(payload, key) {
        Some(value) if !value.is_null() => Ok(()),
        _ => Err(ResourceError::not_found(resource, id)),
    }
}

/// Adds `key: parent` to every mapped child object.
pub(crate) fn with_parent(children: Vec<Value>, key: &str, parent: &Value) -> Value {
    Value::Array(
        children
            .into_iter()
            .map(|mut child| {
                if let Value::Object(map) = &mut child {
                    map.insert(key.to_string(), parent.clone());
                }
                child
            })
            .collect(),
    )
}

/// Bare ID of the node's `id`, or `null`.
pub(crate) fn node_id(node: &Value) -> Value {
    node.get("id").map_or(Value::Null, strip_gid)
}

/// Returns `true` for `null` and for the `{}` a `node(id:)` query yields
/// when the ID belongs to another type.
pub(crate) fn is_missing_node(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_decimal_accepts_amounts_and_rejects_text() {
        assert_eq!(decimal("price", " 19.99 ").unwrap(), "19.99");
        assert_eq!(decimal("price", "5").unwrap(), "5");
        assert!(matches!(
            decimal("price", "free"),
            Err(ResourceError::InvalidInput { .. })
        ));
        assert!(decimal("price", "NaN").is_err());
    }

    #[test]
    fn test_count_requires_integer() {
        assert_eq!(count("productsCount", &json!({ "count": 7 })).unwrap(), 7);
        assert!(count("productsCount", &json!({ "count": null })).is_err());
    }

    #[test]
    fn test_deleted_null_is_not_found() {
        let error = deleted(&json!({ "deletedProductId": null }), "deletedProductId", "Product", "9")
            .unwrap_err();
        assert_eq!(error.status(), 404);
        assert!(deleted(&json!({ "deletedProductId": "gid://shopify/Product/9" }), "deletedProductId", "Product", "9").is_ok());
    }

    #[test]
    fn test_address_map() {
        let address: Address = serde_json::from_value(map_fields(
            ADDRESS,
            &json!({ "firstName": "Bob", "countryCodeV2": "US", "latitude": 45.41 }),
        ))
        .unwrap();
        assert_eq!(address.first_name.as_deref(), Some("Bob"));
        assert_eq!(address.country_code.as_deref(), Some("US"));
        assert_eq!(address.latitude, Some(45.41));
        assert!(address.city.is_none());
    }

    #[test]
    fn test_global_ids_rejects_any_bad_entry() {
        assert_eq!(
            global_ids("Product", [1, 2]).unwrap(),
            vec!["gid://shopify/Product/1", "gid://shopify/Product/2"]
        );
        assert!(global_ids("Product", ["1", "x"]).is_err());
    }

    #[test]
    fn test_missing_node() {
        assert!(is_missing_node(&Value::Null));
        assert!(is_missing_node(&json!({})));
        assert!(!is_missing_node(&json!({ "id": "x" })));
    }
}
