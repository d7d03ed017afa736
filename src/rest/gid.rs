//! Global identifiers: `gid://<service>/<Type>/<id>`.
//!
//! REST callers use bare numeric IDs; the GraphQL Admin API uses global
//! IDs. Every REST ID is the last path segment of a global ID, so the
//! translation is lossless for well-formed identifiers.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

const SCHEME: &str = "gid://";
const SERVICE: &str = "shopify";

/// Error returned for identifiers that cannot be qualified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidGidError {
    /// The identifier was empty.
    #[error("Identifier cannot be empty.")]
    Empty,

    /// The identifier is neither a bare numeric ID nor a global ID.
    #[error("Invalid identifier '{value}'. Expected a numeric ID or 'gid://shopify/{resource_type}/<id>'.")]
    Malformed {
        /// The rejected value.
        value: String,
        /// The expected type name.
        resource_type: String,
    },
}

/// A parsed global identifier.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::gid::GlobalId;
///
/// let gid: GlobalId = "gid://shopify/Product/123".parse().unwrap();
/// assert_eq!(gid.resource_type(), "Product");
/// assert_eq!(gid.id(), "123");
/// assert_eq!(gid.numeric_id(), Some(123));
/// assert_eq!(gid.to_string(), "gid://shopify/Product/123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlobalId {
    service: String,
    resource_type: String,
    id: String,
}

impl GlobalId {
    /// Creates a `gid://shopify/...` identifier.
    #[must_use]
    pub fn shopify(resource_type: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            service: SERVICE.to_string(),
            resource_type: resource_type.into(),
            id: id.to_string(),
        }
    }

    /// Returns the service segment (normally `shopify`).
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the type segment (e.g., `Product`).
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the ID segment verbatim, including any query string.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the ID as a number, when it is one.
    #[must_use]
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}/{}", self.service, self.resource_type, self.id)
    }
}

impl FromStr for GlobalId {
    type Err = InvalidGidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidGidError::Malformed {
            value: s.to_string(),
            resource_type: "<Type>".to_string(),
        };

        let rest = s.strip_prefix(SCHEME).ok_or_else(malformed)?;
        let mut parts = rest.splitn(3, '/');
        let service = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;
        let resource_type = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;
        let id = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;

        Ok(Self {
            service: service.to_string(),
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        })
    }
}

/// Turns a bare or namespaced identifier into a global ID string.
///
/// Already-namespaced IDs of `resource_type` are returned unchanged, so the
/// operation is idempotent.
///
/// # Errors
///
/// Returns [`InvalidGidError`] for empty input, non-numeric bare IDs,
/// malformed `gid://` strings and global IDs of another resource type.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::gid::qualify;
///
/// assert_eq!(qualify("Product", 123).unwrap(), "gid://shopify/Product/123");
/// assert_eq!(qualify("Product", "123").unwrap(), "gid://shopify/Product/123");
/// assert_eq!(
///     qualify("Product", "gid://shopify/Product/123").unwrap(),
///     "gid://shopify/Product/123"
/// );
/// assert!(qualify("Product", "").is_err());
/// assert!(qualify("Product", "gid://shopify/Order/123").is_err());
/// ```
pub fn qualify(resource_type: &str, id: impl fmt::Display) -> Result<String, InvalidGidError> {
    let raw = id.to_string();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidGidError::Empty);
    }

    let malformed = || InvalidGidError::Malformed {
        value: trimmed.to_string(),
        resource_type: resource_type.to_string(),
    };

    if trimmed.starts_with(SCHEME) {
        return match trimmed.parse::<GlobalId>() {
            Ok(gid) if gid.resource_type() == resource_type => Ok(gid.to_string()),
            _ => Err(malformed()),
        };
    }

    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }

    Ok(GlobalId::shopify(resource_type, trimmed).to_string())
}

/// Strips a global ID down to its REST form.
///
/// A numeric suffix becomes a JSON number; anything else stays a string.
/// Values that are not global IDs pass through unchanged.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::gid::strip_gid;
/// use serde_json::json;
///
/// assert_eq!(strip_gid(&json!("gid://shopify/Product/123")), json!(123));
/// assert_eq!(strip_gid(&json!("gid://shopify/Job/abc-1")), json!("abc-1"));
/// assert_eq!(strip_gid(&json!(null)), json!(null));
/// ```
#[must_use]
pub fn strip_gid(value: &Value) -> Value {
    match value {
        Value::String(s) => match s.parse::<GlobalId>() {
            Ok(gid) => gid
                .numeric_id()
                .map_or_else(|| Value::String(gid.id().to_string()), Value::from),
            Err(_) => s
                .parse::<u64>()
                .map_or_else(|_| value.clone(), Value::from),
        },
        other => other.clone(),
    }
}

/// Returns the numeric suffix of a global ID string.
#[must_use]
pub fn bare_id(value: &str) -> Option<u64> {
    value.parse::<GlobalId>().ok().and_then(|gid| gid.numeric_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_and_requalify_round_trip() {
        for gid in [
            "gid://shopify/Product/1",
            "gid://shopify/ProductVariant/44012345678",
            "gid://shopify/InventoryItem/9007199254740991",
            "gid://other/Thing/42",
        ] {
            let parsed: GlobalId = gid.parse().unwrap();
            let stripped = strip_gid(&json!(gid));
            let requalified = GlobalId {
                service: parsed.service().to_string(),
                resource_type: parsed.resource_type().to_string(),
                id: stripped.to_string(),
            };
            assert_eq!(requalified.to_string(), gid);
        }
    }

    #[test]
    fn test_qualify_is_idempotent() {
        let once = qualify("Order", 450_789_469).unwrap();
        let twice = qualify("Order", &once).unwrap();
        assert_eq!(once, "gid://shopify/Order/450789469");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_qualify_rejects_bad_input() {
        assert_eq!(qualify("Product", "  "), Err(InvalidGidError::Empty));
        assert!(matches!(
            qualify("Product", "abc"),
            Err(InvalidGidError::Malformed { .. })
        ));
        assert!(matches!(
            qualify("Product", "gid://shopify/Product"),
            Err(InvalidGidError::Malformed { .. })
        ));
        assert!(matches!(
            qualify("Product", "-5"),
            Err(InvalidGidError::Malformed { .. })
        ));
    }

    #[test]
    fn test_qualify_rejects_other_resource_type() {
        assert_eq!(
            qualify("Product", "gid://shopify/Order/450789469"),
            Err(InvalidGidError::Malformed {
                value: "gid://shopify/Order/450789469".to_string(),
                resource_type: "Product".to_string(),
            })
        );
        assert!(qualify("ProductOption", "gid://shopify/ProductOptionValue/1").is_err());
        assert_eq!(
            qualify("Collection", " gid://shopify/Collection/841564295 ").unwrap(),
            "gid://shopify/Collection/841564295"
        );
    }

    #[test]
    fn test_gid_with_query_string_keeps_suffix() {
        let value = json!("gid://shopify/InventoryLevel/123?inventory_item_id=456");
        assert_eq!(strip_gid(&value), json!("123?inventory_item_id=456"));
    }

    #[test]
    fn test_non_gid_values_pass_through() {
        assert_eq!(strip_gid(&json!("hello")), json!("hello"));
        assert_eq!(strip_gid(&json!("77")), json!(77));
        assert_eq!(strip_gid(&json!(5)), json!(5));
        assert_eq!(bare_id("gid://shopify/Shop/9"), Some(9));
        assert_eq!(bare_id("9"), None);
    }
}
