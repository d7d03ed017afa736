//! Fulfillments and fulfillment orders.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, Field, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::queries::fulfillment as queries;
use crate::rest::resources::common::global_id;
use crate::rest::translator::{require, shape, shape_list, Operation, Translator};

const FULFILLMENT_ORDERS: Operation =
    Operation::query("fulfillmentOrders", queries::FULFILLMENT_ORDERS, "order");
const LIST: Operation = Operation::query("fulfillments", queries::FULFILLMENTS, "order");
const GET: Operation = Operation::query("fulfillment", queries::FULFILLMENT, "fulfillment");
const CREATE: Operation =
    Operation::mutation("fulfillmentCreate", queries::FULFILLMENT_CREATE, "fulfillmentCreate", "userErrors");
const UPDATE_TRACKING: Operation = Operation::mutation(
    "fulfillmentTrackingInfoUpdate",
    queries::FULFILLMENT_TRACKING_UPDATE,
    "fulfillmentTrackingInfoUpdate",
    "userErrors",
);
const CANCEL: Operation =
    Operation::mutation("fulfillmentCancel", queries::FULFILLMENT_CANCEL, "fulfillmentCancel", "userErrors");

/// A line of a fulfillment order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FulfillmentOrderLineItem {
    /// The bare fulfillment order line item ID.
    pub id: Option<u64>,
    /// The order line item.
    pub line_item_id: Option<u64>,
    /// The variant.
    pub variant_id: Option<u64>,
    /// Total quantity.
    pub quantity: Option<i64>,
    /// Quantity still to fulfill.
    pub fulfillable_quantity: Option<i64>,
}

/// A group of line items fulfilled from one location.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FulfillmentOrder {
    /// The bare fulfillment order ID.
    pub id: Option<u64>,
    /// The order.
    pub order_id: Option<u64>,
    /// The assigned location.
    pub assigned_location_id: Option<u64>,
    /// E.g. `open` or `closed`.
    pub status: Option<String>,
    /// E.g. `unsubmitted`.
    pub request_status: Option<String>,
    /// When the order can be fulfilled.
    pub fulfill_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Line items.
    #[serde(default)]
    pub line_items: Vec<FulfillmentOrderLineItem>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

/// A line item shipped by a fulfillment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FulfillmentLineItem {
    /// The bare fulfillment line item ID.
    pub id: Option<u64>,
    /// The order line item.
    pub line_item_id: Option<u64>,
    /// Quantity shipped.
    pub quantity: Option<i64>,
}

/// A shipment of line items.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Fulfillment {
    /// The bare fulfillment ID.
    pub id: Option<u64>,
    /// The order.
    pub order_id: Option<u64>,
    /// The location shipped from.
    pub location_id: Option<u64>,
    /// Display name, e.g. `#1001.1`.
    pub name: Option<String>,
    /// E.g. `success` or `cancelled`.
    pub status: Option<String>,
    /// Shipment status, e.g. `in_transit`.
    pub shipment_status: Option<String>,
    /// Carrier of the first tracking entry.
    pub tracking_company: Option<String>,
    /// First tracking number.
    pub tracking_number: Option<String>,
    /// All tracking numbers.
    #[serde(default)]
    pub tracking_numbers: Vec<String>,
    /// First tracking URL.
    pub tracking_url: Option<String>,
    /// All tracking URLs.
    #[serde(default)]
    pub tracking_urls: Vec<String>,
    /// Line items shipped.
    #[serde(default)]
    pub line_items: Vec<FulfillmentLineItem>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const ORDER_LINE: &FieldMap = &[
    Field::id("id", "id"),
    Field::id("line_item_id", "lineItem.id"),
    Field::id("variant_id", "variant.id"),
    Field::copy("quantity", "totalQuantity"),
    Field::copy("fulfillable_quantity", "remainingQuantity"),
];

const FULFILLMENT_ORDER: &FieldMap = &[
    Field::id("id", "id"),
    Field::id("order_id", "orderId"),
    Field::id("assigned_location_id", "assignedLocation.location.id"),
    Field::lower("status", "status"),
    Field::lower("request_status", "requestStatus"),
    Field::copy("fulfill_at", "fulfillAt"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::list("line_items", "lineItems", ORDER_LINE),
    Field::copy("admin_graphql_api_id", "id"),
];

const LINE: &FieldMap = &[
    Field::id("id", "id"),
    Field::id("line_item_id", "lineItem.id"),
    Field::copy("quantity", "quantity"),
];

const FULFILLMENT: &FieldMap = &[
    Field::id("id", "id"),
    Field::id("order_id", "order.id"),
    Field::id("location_id", "location.id"),
    Field::copy("name", "name"),
    Field::lower("status", "status"),
    Field::lower("shipment_status", "displayStatus"),
    Field::computed("tracking_company", tracking_company),
    Field::computed("tracking_number", tracking_number),
    Field::computed("tracking_numbers", tracking_numbers),
    Field::computed("tracking_url", tracking_url),
    Field::computed("tracking_urls", tracking_urls),
    Field::list("line_items", "fulfillmentLineItems", LINE),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn tracking(node: &Value, key: &str) -> Vec<Value> {
    flatten(node.get("trackingInfo"))
        .into_iter()
        .filter_map(|info| info.get(key))
        .filter(|value| !value.is_null())
        .cloned()
        .collect()
}

fn first_tracking(node: &Value, key: &str) -> Value {
    tracking(node, key).into_iter().next().unwrap_or(Value::Null)
}

fn tracking_company(node: &Value) -> Value {
    first_tracking(node, "company")
}

fn tracking_number(node: &Value) -> Value {
    first_tracking(node, "number")
}

fn tracking_numbers(node: &Value) -> Value {
    Value::Array(tracking(node, "number"))
}

fn tracking_url(node: &Value) -> Value {
    first_tracking(node, "url")
}

fn tracking_urls(node: &Value) -> Value {
    Value::Array(tracking(node, "url"))
}

/// Carrier tracking details.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TrackingInfo {
    /// Carrier name.
    pub company: Option<String>,
    /// Tracking number.
    pub number: Option<String>,
    /// Tracking URL.
    pub url: Option<String>,
}

impl TrackingInfo {
    fn to_graphql(&self) -> InputMap {
        InputMap::new()
            .optional("company", self.company.clone())
            .optional("number", self.number.clone())
            .optional("url", self.url.clone())
    }
}

/// A fulfillment order line and the quantity to ship.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FulfillmentOrderLineInput {
    /// The fulfillment order line item.
    pub id: u64,
    /// Quantity to ship.
    pub quantity: i64,
}

/// Lines to ship from one fulfillment order. No lines means all of them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LineItemsByFulfillmentOrder {
    /// The fulfillment order.
    pub fulfillment_order_id: u64,
    /// Lines to ship.
    #[serde(default)]
    pub fulfillment_order_line_items: Vec<FulfillmentOrderLineInput>,
}

/// A new fulfillment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FulfillmentInput {
    /// What to ship.
    pub line_items_by_fulfillment_order: Vec<LineItemsByFulfillmentOrder>,
    /// Carrier tracking.
    pub tracking_info: Option<TrackingInfo>,
    /// Email the customer.
    pub notify_customer: Option<bool>,
    /// Message attached to the fulfillment.
    pub message: Option<String>,
}

impl FulfillmentInput {
    fn to_graphql(&self) -> Result<InputMap, ResourceError> {
        if self.line_items_by_fulfillment_order.is_empty() {
            return Err(ResourceError::invalid_input(
                "line_items_by_fulfillment_order must name at least one fulfillment order",
            ));
        }
        let mut groups = Vec::with_capacity(self.line_items_by_fulfillment_order.len());
        for group in &self.line_items_by_fulfillment_order {
            let (order, _) = global_id("FulfillmentOrder", group.fulfillment_order_id)?;
            let mut lines = Vec::with_capacity(group.fulfillment_order_line_items.len());
            for line in &group.fulfillment_order_line_items {
                let (id, _) = global_id("FulfillmentOrderLineItem", line.id)?;
                lines.push(InputMap::new().field("id", id).field("quantity", line.quantity).into_value());
            }
            groups.push(
                InputMap::new()
                    .field("fulfillmentOrderId", order)
                    .optional("fulfillmentOrderLineItems", Some(lines))
                    .into_value(),
            );
        }

        Ok(InputMap::new()
            .field("lineItemsByFulfillmentOrder", groups)
            .nested(
                "trackingInfo",
                self.tracking_info.as_ref().map(TrackingInfo::to_graphql).unwrap_or_default(),
            )
            .optional("notifyCustomer", self.notify_customer))
    }
}

/// Fulfillment operations.
#[derive(Clone, Copy, Debug)]
pub struct Fulfillments<'c> {
    translator: Translator<'c>,
}

impl<'c> Fulfillments<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists an order's fulfillment orders.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the order does not exist.
    pub async fn list_fulfillment_orders(
        &self,
        order_id: impl fmt::Display,
    ) -> Result<Vec<FulfillmentOrder>, ResourceError> {
        let (gid, raw) = global_id("Order", order_id)?;
        let order = self
            .translator
            .find(&FULFILLMENT_ORDERS, InputMap::new().field("id", gid), "Order", &raw)
            .await?;
        shape_list(FULFILLMENT_ORDERS.name, FULFILLMENT_ORDER, order.get("fulfillmentOrders"))
    }

    /// Lists an order's fulfillments.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the order does not exist.
    pub async fn list(&self, order_id: impl fmt::Display) -> Result<Vec<Fulfillment>, ResourceError> {
        let (gid, raw) = global_id("Order", order_id)?;
        let order = self
            .translator
            .find(&LIST, InputMap::new().field("id", gid), "Order", &raw)
            .await?;
        shape_list(LIST.name, FULFILLMENT, order.get("fulfillments"))
    }

    /// Fetches one fulfillment.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the fulfillment does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Fulfillment, ResourceError> {
        let (gid, raw) = global_id("Fulfillment", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Fulfillment", &raw)
            .await?;
        shape(GET.name, FULFILLMENT, &node)
    }

    /// Ships line items from one or more fulfillment orders.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when no fulfillment order is
    /// named.
    pub async fn create(&self, input: &FulfillmentInput) -> Result<Fulfillment, ResourceError> {
        let fulfillment = input.to_graphql()?;
        let payload = self
            .translator
            .run(
                &CREATE,
                InputMap::new()
                    .field("fulfillment", fulfillment)
                    .optional("message", input.message.clone()),
            )
            .await?;
        shape(CREATE.name, FULFILLMENT, require(CREATE.name, &payload, "fulfillment")?)
    }

    /// Replaces a fulfillment's tracking details.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the API rejects the update.
    pub async fn update_tracking(
        &self,
        id: impl fmt::Display,
        tracking: &TrackingInfo,
        notify_customer: bool,
    ) -> Result<Fulfillment, ResourceError> {
        let (gid, _) = global_id("Fulfillment", id)?;
        let variables = InputMap::new()
            .field("fulfillmentId", gid)
            .field("trackingInfoInput", tracking.to_graphql())
            .field("notifyCustomer", notify_customer);
        let payload = self.translator.run(&UPDATE_TRACKING, variables).await?;
        shape(
            UPDATE_TRACKING.name,
            FULFILLMENT,
            require(UPDATE_TRACKING.name, &payload, "fulfillment")?,
        )
    }

    /// Cancels a fulfillment.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when it cannot be cancelled.
    pub async fn cancel(&self, id: impl fmt::Display) -> Result<Fulfillment, ResourceError> {
        let (gid, _) = global_id("Fulfillment", id)?;
        let payload = self.translator.run(&CANCEL, InputMap::new().field("id", gid)).await?;
        shape(CANCEL.name, FULFILLMENT, require(CANCEL.name, &payload, "fulfillment")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_fulfillment_map_flattens_tracking() {
        let node = json!({
            "id": "gid://shopify/Fulfillment/255858046",
            "name": "#1001.1",
            "status": "SUCCESS",
            "displayStatus": "IN_TRANSIT",
            "order": { "id": "gid://shopify/Order/450789469" },
            "location": { "id": "gid://shopify/Location/655441491" },
            "trackingInfo": [
                { "company": "UPS", "number": "1Z1234", "url": "https://ups.example/1Z1234" },
                { "company": "UPS", "number": "1Z5678", "url": null }
            ],
            "fulfillmentLineItems": { "nodes": [
                { "id": "gid://shopify/FulfillmentLineItem/1", "quantity": 1, "lineItem": { "id": "gid://shopify/LineItem/466157049" } }
            ]}
        });
        let fulfillment: Fulfillment = serde_json::from_value(map_fields(FULFILLMENT, &node)).unwrap();

        assert_eq!(fulfillment.order_id, Some(450_789_469));
        assert_eq!(fulfillment.status.as_deref(), Some("success"));
        assert_eq!(fulfillment.shipment_status.as_deref(), Some("in_transit"));
        assert_eq!(fulfillment.tracking_company.as_deref(), Some("UPS"));
        assert_eq!(fulfillment.tracking_number.as_deref(), Some("1Z1234"));
        assert_eq!(fulfillment.tracking_numbers, vec!["1Z1234", "1Z5678"]);
        assert_eq!(fulfillment.tracking_urls, vec!["https://ups.example/1Z1234"]);
        assert_eq!(fulfillment.line_items[0].line_item_id, Some(466_157_049));
    }

    #[test]
    fn test_fulfillment_order_map() {
        let node = json!({
            "id": "gid://shopify/FulfillmentOrder/1046000778",
            "orderId": "gid://shopify/Order/450789469",
            "status": "OPEN",
            "requestStatus": "UNSUBMITTED",
            "assignedLocation": { "location": { "id": "gid://shopify/Location/24826418" } },
            "lineItems": { "nodes": [{
                "id": "gid://shopify/FulfillmentOrderLineItem/1058737482",
                "totalQuantity": 1,
                "remainingQuantity": 1,
                "lineItem": { "id": "gid://shopify/LineItem/466157049" },
                "variant": { "id": "gid://shopify/ProductVariant/39072856" }
            }]}
        });
        let order: FulfillmentOrder = serde_json::from_value(map_fields(FULFILLMENT_ORDER, &node)).unwrap();
        assert_eq!(order.order_id, Some(450_789_469));
        assert_eq!(order.assigned_location_id, Some(24_826_418));
        assert_eq!(order.request_status.as_deref(), Some("unsubmitted"));
        assert_eq!(order.line_items[0].fulfillable_quantity, Some(1));
    }

    #[test]
    fn test_fulfillment_input() {
        let input = FulfillmentInput {
            line_items_by_fulfillment_order: vec![LineItemsByFulfillmentOrder {
                fulfillment_order_id: 1_046_000_778,
                fulfillment_order_line_items: Vec::new(),
            }],
            tracking_info: Some(TrackingInfo {
                number: Some("1Z1234".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            input.to_graphql().unwrap().into_value(),
            json!({
                "lineItemsByFulfillmentOrder": [{ "fulfillmentOrderId": "gid://shopify/FulfillmentOrder/1046000778" }],
                "trackingInfo": { "number": "1Z1234" }
            })
        );

        assert!(matches!(
            FulfillmentInput::default().to_graphql(),
            Err(ResourceError::InvalidInput { .. })
        ));
    }
}
