//! Inventory items and inventory levels.
//!
//! REST exposes one `available` number per item and location. GraphQL keeps
//! several named quantities; only `available` is read or written here.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, lookup, Field, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::queries::inventory as queries;
use crate::rest::resources::common::{decimal, global_id, global_ids, is_missing_node};
use crate::rest::translator::{require, shape, shape_list, shape_page, Operation, Translator};
use crate::rest::{Page, PageParams};

const GET_ITEM: Operation = Operation::query("inventoryItem", queries::INVENTORY_ITEM, "inventoryItem");
const LIST_ITEMS: Operation = Operation::query("inventoryItems", queries::INVENTORY_ITEMS, "nodes");
const UPDATE_ITEM: Operation = Operation::mutation(
    "inventoryItemUpdate",
    queries::INVENTORY_ITEM_UPDATE,
    "inventoryItemUpdate",
    "userErrors",
);
const LIST_LEVELS: Operation = Operation::query("inventoryLevels", queries::INVENTORY_LEVELS, "inventoryItem");
const ADJUST: Operation = Operation::mutation(
    "inventoryAdjustQuantities",
    queries::INVENTORY_ADJUST,
    "inventoryAdjustQuantities",
    "userErrors",
);
const SET: Operation = Operation::mutation(
    "inventorySetQuantities",
    queries::INVENTORY_SET,
    "inventorySetQuantities",
    "userErrors",
);
const CONNECT: Operation =
    Operation::mutation("inventoryActivate", queries::INVENTORY_ACTIVATE, "inventoryActivate", "userErrors");

/// The quantity name REST `available` corresponds to.
const AVAILABLE: &str = "available";

/// Reason recorded on adjustments made through this API.
const REASON: &str = "correction";

/// An inventory item in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct InventoryItem {
    /// The bare inventory item ID.
    pub id: Option<u64>,
    /// SKU.
    pub sku: Option<String>,
    /// Whether quantities are tracked.
    pub tracked: Option<bool>,
    /// Whether the item ships.
    pub requires_shipping: Option<bool>,
    /// Unit cost.
    pub cost: Option<String>,
    /// ISO country code of origin.
    pub country_code_of_origin: Option<String>,
    /// Province code of origin.
    pub province_code_of_origin: Option<String>,
    /// Harmonized System code.
    pub harmonized_system_code: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

/// The available quantity of one item at one location.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct InventoryLevel {
    /// The inventory item.
    pub inventory_item_id: Option<u64>,
    /// The location.
    pub location_id: Option<u64>,
    /// Quantity available for sale.
    pub available: Option<i64>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced inventory level ID.
    pub admin_graphql_api_id: Option<String>,
}

const ITEM: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("sku", "sku"),
    Field::copy("tracked", "tracked"),
    Field::copy("requires_shipping", "requiresShipping"),
    Field::money("cost", "unitCost"),
    Field::copy("country_code_of_origin", "countryCodeOfOrigin"),
    Field::copy("province_code_of_origin", "provinceCodeOfOrigin"),
    Field::copy("harmonized_system_code", "harmonizedSystemCode"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

pub(crate) const LEVEL: &FieldMap = &[
    Field::id("inventory_item_id", "item.id"),
    Field::id("location_id", "location.id"),
    Field::computed("available", available),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn available(level: &Value) -> Value {
    flatten(level.get("quantities"))
        .into_iter()
        .find(|quantity| quantity.get("name").and_then(Value::as_str) == Some(AVAILABLE))
        .and_then(|quantity| quantity.get("quantity").cloned())
        .unwrap_or(Value::Null)
}

/// Inventory item fields that can change.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InventoryItemInput {
    /// SKU.
    pub sku: Option<String>,
    /// Whether quantities are tracked.
    pub tracked: Option<bool>,
    /// Whether the item ships.
    pub requires_shipping: Option<bool>,
    /// Unit cost as a decimal string.
    pub cost: Option<String>,
    /// ISO country code of origin.
    pub country_code_of_origin: Option<String>,
    /// Province code of origin.
    pub province_code_of_origin: Option<String>,
    /// Harmonized System code.
    pub harmonized_system_code: Option<String>,
}

impl InventoryItemInput {
    fn to_graphql(&self) -> Result<InputMap, ResourceError> {
        let cost = self.cost.as_deref().map(|cost| decimal("cost", cost)).transpose()?;
        Ok(InputMap::new()
            .optional("sku", self.sku.clone())
            .optional("tracked", self.tracked)
            .optional("requiresShipping", self.requires_shipping)
            .optional("cost", cost)
            .optional("countryCodeOfOrigin", self.country_code_of_origin.clone())
            .optional("provinceCodeOfOrigin", self.province_code_of_origin.clone())
            .optional("harmonizedSystemCode", self.harmonized_system_code.clone()))
    }
}

/// Builds the REST level for `item` at `location` from an adjustment group.
///
/// The group is `null` when the request changed nothing; `fallback` is the
/// quantity reported then.
fn level_from_changes(group: &Value, item: &str, location: &str, fallback: Option<i64>) -> Value {
    let change = flatten(group.get("changes")).into_iter().find(|change| {
        change.get("name").and_then(Value::as_str) == Some(AVAILABLE)
            && lookup(change, "item.id").and_then(Value::as_str) == Some(item)
            && lookup(change, "location.id").and_then(Value::as_str) == Some(location)
    });
    let available = change
        .and_then(|change| change.get("quantityAfterChange"))
        .and_then(Value::as_i64)
        .or(fallback);

    json!({
        "item": { "id": item },
        "location": { "id": location },
        "quantities": [{ "name": AVAILABLE, "quantity": available }],
        "updatedAt": group.get("createdAt").cloned().unwrap_or(Value::Null),
        "id": Value::Null,
    })
}

/// Inventory operations.
#[derive(Clone, Copy, Debug)]
pub struct Inventory<'c> {
    translator: Translator<'c>,
}

impl<'c> Inventory<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Fetches one inventory item.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the item does not exist.
    pub async fn get_item(&self, id: impl fmt::Display) -> Result<InventoryItem, ResourceError> {
        let (gid, raw) = global_id("InventoryItem", id)?;
        let node = self
            .translator
            .find(&GET_ITEM, InputMap::new().field("id", gid), "InventoryItem", &raw)
            .await?;
        shape(GET_ITEM.name, ITEM, &node)
    }

    /// Fetches several inventory items. Unknown IDs are left out.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an empty ID list.
    pub async fn list_items<I>(&self, ids: I) -> Result<Vec<InventoryItem>, ResourceError>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let ids = global_ids("InventoryItem", ids)?;
        if ids.is_empty() {
            return Err(ResourceError::invalid_input("at least one inventory item ID is required"));
        }
        let payload = self
            .translator
            .run(&LIST_ITEMS, InputMap::new().field("ids", ids))
            .await?;
        let found: Vec<Value> = payload
            .as_array()
            .map(|nodes| nodes.iter().filter(|node| !is_missing_node(node)).cloned().collect())
            .unwrap_or_default();
        shape_list(LIST_ITEMS.name, ITEM, Some(&Value::Array(found)))
    }

    /// Updates an inventory item.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an unparsable cost.
    pub async fn update_item(
        &self,
        id: impl fmt::Display,
        input: &InventoryItemInput,
    ) -> Result<InventoryItem, ResourceError> {
        let (gid, _) = global_id("InventoryItem", id)?;
        let input = input.to_graphql()?;
        let payload = self
            .translator
            .run(&UPDATE_ITEM, InputMap::new().field("id", gid).field("input", input))
            .await?;
        shape(UPDATE_ITEM.name, ITEM, require(UPDATE_ITEM.name, &payload, "inventoryItem")?)
    }

    /// Lists one page of an item's levels across locations.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the item does not exist.
    pub async fn list_levels(
        &self,
        inventory_item_id: impl fmt::Display,
        page: &PageParams,
    ) -> Result<Page<InventoryLevel>, ResourceError> {
        let (gid, raw) = global_id("InventoryItem", inventory_item_id)?;
        let variables = page.apply(InputMap::new().field("id", gid), self.translator.page_size());
        let item = self
            .translator
            .find(&LIST_LEVELS, variables, "InventoryItem", &raw)
            .await?;
        shape_page(LIST_LEVELS.name, LEVEL, require(LIST_LEVELS.name, &item, "inventoryLevels")?)
    }

    /// Changes the available quantity by `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the item is not stocked at
    /// the location.
    pub async fn adjust_level(
        &self,
        inventory_item_id: impl fmt::Display,
        location_id: impl fmt::Display,
        delta: i64,
    ) -> Result<InventoryLevel, ResourceError> {
        let (item, _) = global_id("InventoryItem", inventory_item_id)?;
        let (location, _) = global_id("Location", location_id)?;

        let change = InputMap::new()
            .field("delta", delta)
            .field("inventoryItemId", item.as_str())
            .field("locationId", location.as_str());
        let input = InputMap::new()
            .field("reason", REASON)
            .field("name", AVAILABLE)
            .field("changes", vec![change.into_value()]);
        let payload = self.translator.run(&ADJUST, InputMap::new().field("input", input)).await?;

        let group = payload.get("inventoryAdjustmentGroup").unwrap_or(&Value::Null);
        let level = level_from_changes(group, &item, &location, None);
        shape(ADJUST.name, LEVEL, &level)
    }

    /// Sets the available quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the item is not stocked at
    /// the location.
    pub async fn set_level(
        &self,
        inventory_item_id: impl fmt::Display,
        location_id: impl fmt::Display,
        available: i64,
    ) -> Result<InventoryLevel, ResourceError> {
        let (item, _) = global_id("InventoryItem", inventory_item_id)?;
        let (location, _) = global_id("Location", location_id)?;

        let quantity = InputMap::new()
            .field("inventoryItemId", item.as_str())
            .field("locationId", location.as_str())
            .field("quantity", available);
        let input = InputMap::new()
            .field("reason", REASON)
            .field("name", AVAILABLE)
            .field("ignoreCompareQuantity", true)
            .field("quantities", vec![quantity.into_value()]);
        let payload = self.translator.run(&SET, InputMap::new().field("input", input)).await?;

        let group = payload.get("inventoryAdjustmentGroup").unwrap_or(&Value::Null);
        let level = level_from_changes(group, &item, &location, Some(available));
        shape(SET.name, LEVEL, &level)
    }

    /// Stocks an item at a location.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the API refuses.
    pub async fn connect_level(
        &self,
        inventory_item_id: impl fmt::Display,
        location_id: impl fmt::Display,
    ) -> Result<InventoryLevel, ResourceError> {
        let (item, _) = global_id("InventoryItem", inventory_item_id)?;
        let (location, _) = global_id("Location", location_id)?;
        let payload = self
            .translator
            .run(
                &CONNECT,
                InputMap::new().field("inventoryItemId", item).field("locationId", location),
            )
            .await?;
        shape(CONNECT.name, LEVEL, require(CONNECT.name, &payload, "inventoryLevel")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;

    const ITEM_GID: &str = "gid://shopify/InventoryItem/808950810";
    const LOCATION_GID: &str = "gid://shopify/Location/655441491";

    #[test]
    fn test_level_map_reads_available_quantity() {
        let node = json!({
            "id": "gid://shopify/InventoryLevel/1?inventory_item_id=808950810",
            "updatedAt": "2024-01-02T09:28:43Z",
            "item": { "id": ITEM_GID },
            "location": { "id": LOCATION_GID },
            "quantities": [{ "name": "available", "quantity": 6 }]
        });
        let level: InventoryLevel = serde_json::from_value(map_fields(LEVEL, &node)).unwrap();
        assert_eq!(level.inventory_item_id, Some(808_950_810));
        assert_eq!(level.location_id, Some(655_441_491));
        assert_eq!(level.available, Some(6));
    }

    #[test]
    fn test_level_from_changes_uses_quantity_after_change() {
        let group = json!({
            "createdAt": "2024-01-02T09:28:43Z",
            "changes": [
                { "name": "on_hand", "delta": 5, "quantityAfterChange": 20, "item": { "id": ITEM_GID }, "location": { "id": LOCATION_GID } },
                { "name": "available", "delta": 5, "quantityAfterChange": 11, "item": { "id": ITEM_GID }, "location": { "id": LOCATION_GID } }
            ]
        });
        let level: InventoryLevel =
            serde_json::from_value(map_fields(LEVEL, &level_from_changes(&group, ITEM_GID, LOCATION_GID, None)))
                .unwrap();
        assert_eq!(level.available, Some(11));
        assert!(level.updated_at.is_some());
    }

    #[test]
    fn test_unchanged_set_reports_requested_quantity() {
        let level: InventoryLevel = serde_json::from_value(map_fields(
            LEVEL,
            &level_from_changes(&Value::Null, ITEM_GID, LOCATION_GID, Some(42)),
        ))
        .unwrap();
        assert_eq!(level.available, Some(42));
        assert_eq!(level.location_id, Some(655_441_491));
    }

    #[test]
    fn test_item_input_validates_cost() {
        let input = InventoryItemInput {
            cost: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(matches!(input.to_graphql(), Err(ResourceError::InvalidInput { .. })));

        let input = InventoryItemInput {
            cost: Some("25.00".to_string()),
            tracked: Some(true),
            ..Default::default()
        };
        assert_eq!(
            input.to_graphql().unwrap().into_value(),
            json!({ "tracked": true, "cost": "25.00" })
        );
    }

    #[test]
    fn test_item_map() {
        let item: InventoryItem = serde_json::from_value(map_fields(
            ITEM,
            &json!({ "id": ITEM_GID, "sku": "IPOD2008PINK", "unitCost": { "amount": "25.0", "currencyCode": "USD" } }),
        ))
        .unwrap();
        assert_eq!(item.id, Some(808_950_810));
        assert_eq!(item.cost.as_deref(), Some("25.0"));
    }
}
