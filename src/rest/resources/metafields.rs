//! Metafields on any owner resource.
//!
//! Writes go through `metafieldsSet`, which creates or updates by
//! namespace and key; the shop owner's ID is looked up first.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{Field, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::queries::metafields as queries;
use crate::rest::resources::common::{global_id, is_missing_node};
use crate::rest::translator::{require, shape, shape_list, shape_page, Operation, Translator};
use crate::rest::{Page, PageParams};

const SHOP_LIST: Operation = Operation::query("shopMetafields", queries::SHOP_METAFIELDS, "shop");
const OWNER_LIST: Operation = Operation::query("ownerMetafields", queries::OWNER_METAFIELDS, "node");
const GET: Operation = Operation::query("metafield", queries::METAFIELD, "node");
const SHOP_ID: Operation = Operation::query("shopId", queries::SHOP_ID, "shop");
const SET: Operation = Operation::mutation("metafieldsSet", queries::METAFIELDS_SET, "metafieldsSet", "userErrors");
const DELETE: Operation =
    Operation::mutation("metafieldsDelete", queries::METAFIELDS_DELETE, "metafieldsDelete", "userErrors");

/// The resource a metafield belongs to.
///
/// IDs may be bare or global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetafieldOwner {
    /// The shop itself.
    Shop,
    /// A product.
    Product(String),
    /// A product variant.
    Variant(String),
    /// A collection.
    Collection(String),
    /// A customer.
    Customer(String),
    /// An order.
    Order(String),
    /// A location.
    Location(String),
}

impl MetafieldOwner {
    /// Returns the owner's global ID, or `None` for the shop.
    fn global_id(&self) -> Result<Option<(String, String)>, ResourceError> {
        let (resource_type, id) = match self {
            Self::Shop => return Ok(None),
            Self::Product(id) => ("Product", id),
            Self::Variant(id) => ("ProductVariant", id),
            Self::Collection(id) => ("Collection", id),
            Self::Customer(id) => ("Customer", id),
            Self::Order(id) => ("Order", id),
            Self::Location(id) => ("Location", id),
        };
        global_id(resource_type, id).map(Some)
    }
}

impl fmt::Display for MetafieldOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shop => write!(f, "shop"),
            Self::Product(id) => write!(f, "product {id}"),
            Self::Variant(id) => write!(f, "variant {id}"),
            Self::Collection(id) => write!(f, "collection {id}"),
            Self::Customer(id) => write!(f, "customer {id}"),
            Self::Order(id) => write!(f, "order {id}"),
            Self::Location(id) => write!(f, "location {id}"),
        }
    }
}

/// A metafield in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Metafield {
    /// The bare metafield ID.
    pub id: Option<u64>,
    /// Namespace.
    pub namespace: Option<String>,
    /// Key within the namespace.
    pub key: Option<String>,
    /// Value, serialized as a string.
    pub value: Option<String>,
    /// Value type, e.g. `single_line_text_field`.
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// The owner.
    pub owner_id: Option<u64>,
    /// The owner's REST resource name, e.g. `product`.
    pub owner_resource: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const METAFIELD: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("namespace", "namespace"),
    Field::copy("key", "key"),
    Field::copy("value", "value"),
    Field::copy("type", "type"),
    Field::copy("description", "description"),
    Field::id("owner_id", "owner.id"),
    Field::computed("owner_resource", owner_resource),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn owner_resource(node: &Value) -> Value {
    match node.get("ownerType").and_then(Value::as_str) {
        Some("PRODUCTVARIANT") => Value::from("variant"),
        Some(owner) => Value::from(owner.to_lowercase()),
        None => Value::Null,
    }
}

/// A metafield to create or update.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MetafieldInput {
    /// Namespace.
    pub namespace: String,
    /// Key within the namespace.
    pub key: String,
    /// Value, serialized as a string.
    pub value: String,
    /// Value type, e.g. `single_line_text_field`.
    #[serde(rename = "type")]
    pub value_type: String,
}

impl MetafieldInput {
    fn to_graphql(&self, owner_id: &str) -> Value {
        InputMap::new()
            .field("ownerId", owner_id)
            .field("namespace", self.namespace.as_str())
            .field("key", self.key.as_str())
            .field("value", self.value.as_str())
            .optional("type", Some(self.value_type.as_str()))
            .into_value()
    }
}

/// Metafield operations.
#[derive(Clone, Copy, Debug)]
pub struct Metafields<'c> {
    translator: Translator<'c>,
}

impl<'c> Metafields<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of an owner's metafields, optionally in one namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the owner does not exist.
    pub async fn list(
        &self,
        owner: &MetafieldOwner,
        namespace: Option<&str>,
        page: &PageParams,
    ) -> Result<Page<Metafield>, ResourceError> {
        let variables = InputMap::new().optional("namespace", namespace);
        match owner.global_id()? {
            None => self.translator.list(&SHOP_LIST, variables, page, "metafields", METAFIELD).await,
            Some((gid, raw)) => {
                let variables = page.apply(variables.field("id", gid), self.translator.page_size());
                let node = self.translator.run(&OWNER_LIST, variables).await?;
                if is_missing_node(&node) {
                    return Err(ResourceError::not_found("Owner", raw));
                }
                let connection = require(OWNER_LIST.name, &node, "metafields")?;
                shape_page(OWNER_LIST.name, METAFIELD, connection)
            }
        }
    }

    /// Fetches one metafield.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the metafield does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Metafield, ResourceError> {
        let (gid, raw) = global_id("Metafield", id)?;
        let node = self.translator.run(&GET, InputMap::new().field("id", gid)).await?;
        if is_missing_node(&node) {
            return Err(ResourceError::not_found("Metafield", raw));
        }
        shape(GET.name, METAFIELD, &node)
    }

    /// Creates or updates metafields on one owner.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an empty input list.
    pub async fn set(&self, owner: &MetafieldOwner, inputs: &[MetafieldInput]) -> Result<Vec<Metafield>, ResourceError> {
        if inputs.is_empty() {
            return Err(ResourceError::invalid_input("at least one metafield is required"));
        }
        let owner_id = self.owner_id(owner).await?;
        let metafields: Vec<Value> = inputs.iter().map(|input| input.to_graphql(&owner_id)).collect();

        let payload = self
            .translator
            .run(&SET, InputMap::new().field("metafields", metafields))
            .await?;
        shape_list(SET.name, METAFIELD, Some(require(SET.name, &payload, "metafields")?))
    }

    /// Deletes the metafield at `namespace`.`key` on `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when no such metafield exists.
    pub async fn delete(&self, owner: &MetafieldOwner, namespace: &str, key: &str) -> Result<(), ResourceError> {
        let owner_id = self.owner_id(owner).await?;
        let identifier = InputMap::new()
            .field("ownerId", owner_id)
            .field("namespace", namespace)
            .field("key", key);
        let payload = self
            .translator
            .run(&DELETE, InputMap::new().field("metafields", vec![identifier.into_value()]))
            .await?;

        let removed = payload
            .get("deletedMetafields")
            .and_then(Value::as_array)
            .is_some_and(|deleted| deleted.iter().any(|entry| !entry.is_null()));
        if removed {
            Ok(())
        } else {
            Err(ResourceError::not_found("Metafield", format!("{namespace}.{key}")))
        }
    }

    async fn owner_id(&self, owner: &MetafieldOwner) -> Result<String, ResourceError> {
        if let Some((gid, _)) = owner.global_id()? {
            return Ok(gid);
        }
        let shop = self.translator.run(&SHOP_ID, InputMap::new()).await?;
        require(SHOP_ID.name, &shop, "id")?
            .as_str()
            .map(String::from)
            .ok_or_else(|| ResourceError::malformed(SHOP_ID.name, "shop id is not a string"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_metafield_map() {
        let node = json!({
            "id": "gid://shopify/Metafield/721389482",
            "namespace": "inventory",
            "key": "warehouse",
            "value": "25",
            "type": "number_integer",
            "ownerType": "PRODUCTVARIANT",
            "owner": { "id": "gid://shopify/ProductVariant/49148385" }
        });
        let metafield: Metafield = serde_json::from_value(map_fields(METAFIELD, &node)).unwrap();
        assert_eq!(metafield.id, Some(721_389_482));
        assert_eq!(metafield.value_type.as_deref(), Some("number_integer"));
        assert_eq!(metafield.owner_id, Some(49_148_385));
        assert_eq!(metafield.owner_resource.as_deref(), Some("variant"));
    }

    #[test]
    fn test_owner_resource_lowercases() {
        assert_eq!(owner_resource(&json!({ "ownerType": "SHOP" })), json!("shop"));
        assert_eq!(owner_resource(&json!({})), Value::Null);
    }

    #[test]
    fn test_owner_global_id() {
        assert_eq!(MetafieldOwner::Shop.global_id().unwrap(), None);
        assert_eq!(
            MetafieldOwner::Variant("49148385".to_string()).global_id().unwrap(),
            Some(("gid://shopify/ProductVariant/49148385".to_string(), "49148385".to_string()))
        );
        assert!(MetafieldOwner::Product(String::new()).global_id().is_err());
    }

    #[test]
    fn test_input_serializes_type_key() {
        let input: MetafieldInput = serde_json::from_value(json!({
            "namespace": "my_fields",
            "key": "sponsor",
            "value": "Shopify",
            "type": "single_line_text_field"
        }))
        .unwrap();
        assert_eq!(
            input.to_graphql("gid://shopify/Product/1"),
            json!({
                "ownerId": "gid://shopify/Product/1",
                "namespace": "my_fields",
                "key": "sponsor",
                "value": "Shopify",
                "type": "single_line_text_field"
            })
        );
    }
}
