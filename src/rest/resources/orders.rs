//! Orders.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{join_strings, split_tags, upper_enum, Field, FieldMap};
use crate::rest::input::{InputMap, SearchQuery};
use crate::rest::queries::orders as queries;
use crate::rest::resources::common::{count, global_id, Address, ADDRESS};
use crate::rest::translator::{require, shape, Operation, Translator};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("orders", queries::ORDERS, "orders");
const GET: Operation = Operation::query("order", queries::ORDER, "order");
const COUNT: Operation = Operation::query("ordersCount", queries::ORDERS_COUNT, "ordersCount");
const UPDATE: Operation = Operation::mutation("orderUpdate", queries::ORDER_UPDATE, "orderUpdate", "userErrors");
const CANCEL: Operation =
    Operation::mutation("orderCancel", queries::ORDER_CANCEL, "orderCancel", "orderCancelUserErrors");
const CLOSE: Operation = Operation::mutation("orderClose", queries::ORDER_CLOSE, "orderClose", "userErrors");
const OPEN: Operation = Operation::mutation("orderOpen", queries::ORDER_OPEN, "orderOpen", "userErrors");

/// The customer attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OrderCustomer {
    /// The bare customer ID.
    pub id: Option<u64>,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

/// A line item of an order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LineItem {
    /// The bare line item ID.
    pub id: Option<u64>,
    /// Product title.
    pub title: Option<String>,
    /// Product and variant title.
    pub name: Option<String>,
    /// Quantity ordered.
    pub quantity: Option<i64>,
    /// Quantity still to fulfill.
    pub fulfillable_quantity: Option<i64>,
    /// SKU.
    pub sku: Option<String>,
    /// Vendor.
    pub vendor: Option<String>,
    /// Unit price before discounts.
    pub price: Option<String>,
    /// Whether the item ships.
    pub requires_shipping: Option<bool>,
    /// Whether the item is taxed.
    pub taxable: Option<bool>,
    /// The variant, if it still exists.
    pub variant_id: Option<u64>,
    /// The product, if it still exists.
    pub product_id: Option<u64>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

/// An order in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Order {
    /// The bare order ID.
    pub id: Option<u64>,
    /// Display name, e.g. `#1001`.
    pub name: Option<String>,
    /// The number in `name`.
    pub order_number: Option<u64>,
    /// Customer email.
    pub email: Option<String>,
    /// Customer phone.
    pub phone: Option<String>,
    /// Order note.
    pub note: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Whether inventory has been reserved.
    pub confirmed: Option<bool>,
    /// Whether this is a test order.
    pub test: Option<bool>,
    /// Whether prices include taxes.
    pub taxes_included: Option<bool>,
    /// Shop currency.
    pub currency: Option<String>,
    /// Presentment currency.
    pub presentment_currency: Option<String>,
    /// Payment status, e.g. `paid`.
    pub financial_status: Option<String>,
    /// `fulfilled`, `partial`, `restocked` or `null`.
    pub fulfillment_status: Option<String>,
    /// Why the order was cancelled.
    pub cancel_reason: Option<String>,
    /// Cancellation time.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Close time.
    pub closed_at: Option<DateTime<Utc>>,
    /// Processing time.
    pub processed_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Total price.
    pub total_price: Option<String>,
    /// Price of line items after discounts.
    pub subtotal_price: Option<String>,
    /// Total tax.
    pub total_tax: Option<String>,
    /// Total discounts.
    pub total_discounts: Option<String>,
    /// Total shipping.
    pub total_shipping_price: Option<String>,
    /// The customer.
    pub customer: Option<OrderCustomer>,
    /// Billing address.
    pub billing_address: Option<Address>,
    /// Shipping address.
    pub shipping_address: Option<Address>,
    /// Line items.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const CUSTOMER: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("email", "email"),
    Field::copy("first_name", "firstName"),
    Field::copy("last_name", "lastName"),
    Field::copy("phone", "phone"),
    Field::copy("admin_graphql_api_id", "id"),
];

const LINE_ITEM: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("title", "title"),
    Field::copy("name", "name"),
    Field::copy("quantity", "quantity"),
    Field::copy("fulfillable_quantity", "unfulfilledQuantity"),
    Field::copy("sku", "sku"),
    Field::copy("vendor", "vendor"),
    Field::money("price", "originalUnitPriceSet"),
    Field::copy("requires_shipping", "requiresShipping"),
    Field::copy("taxable", "taxable"),
    Field::id("variant_id", "variant.id"),
    Field::id("product_id", "product.id"),
    Field::copy("admin_graphql_api_id", "id"),
];

const ORDER: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("name", "name"),
    Field::computed("order_number", order_number),
    Field::copy("email", "email"),
    Field::copy("phone", "phone"),
    Field::copy("note", "note"),
    Field::computed("tags", tags),
    Field::copy("confirmed", "confirmed"),
    Field::copy("test", "test"),
    Field::copy("taxes_included", "taxesIncluded"),
    Field::copy("currency", "currencyCode"),
    Field::copy("presentment_currency", "presentmentCurrencyCode"),
    Field::lower("financial_status", "displayFinancialStatus"),
    Field::computed("fulfillment_status", fulfillment_status),
    Field::lower("cancel_reason", "cancelReason"),
    Field::copy("cancelled_at", "cancelledAt"),
    Field::copy("closed_at", "closedAt"),
    Field::copy("processed_at", "processedAt"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::money("total_price", "totalPriceSet"),
    Field::money("subtotal_price", "subtotalPriceSet"),
    Field::money("total_tax", "totalTaxSet"),
    Field::money("total_discounts", "totalDiscountsSet"),
    Field::money("total_shipping_price", "totalShippingPriceSet"),
    Field::object("customer", "customer", CUSTOMER),
    Field::object("billing_address", "billingAddress", ADDRESS),
    Field::object("shipping_address", "shippingAddress", ADDRESS),
    Field::list("line_items", "lineItems", LINE_ITEM),
    Field::copy("admin_graphql_api_id", "id"),
];

fn tags(node: &Value) -> Value {
    join_strings(node.get("tags"))
}

fn order_number(node: &Value) -> Value {
    let digits: String = node
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse::<u64>().map_or(Value::Null, Value::from)
}

fn fulfillment_status(node: &Value) -> Value {
    match node.get("displayFulfillmentStatus").and_then(Value::as_str) {
        Some("FULFILLED") => Value::from("fulfilled"),
        Some("PARTIALLY_FULFILLED") => Value::from("partial"),
        Some("RESTOCKED") => Value::from("restocked"),
        _ => Value::Null,
    }
}

/// Filters for [`Orders::list`] and [`Orders::count`].
///
/// Without a `status`, only open orders match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderListParams {
    /// Restrict to these IDs.
    pub ids: Vec<u64>,
    /// `open`, `closed`, `cancelled` or `any`.
    pub status: Option<String>,
    /// Payment status, e.g. `paid`.
    pub financial_status: Option<String>,
    /// Fulfillment status, e.g. `shipped` or `unshipped`.
    pub fulfillment_status: Option<String>,
    /// Only orders with an ID greater than this.
    pub since_id: Option<u64>,
    /// Created at or after.
    pub created_at_min: Option<DateTime<Utc>>,
    /// Created at or before.
    pub created_at_max: Option<DateTime<Utc>>,
    /// Updated at or after.
    pub updated_at_min: Option<DateTime<Utc>>,
    /// Updated at or before.
    pub updated_at_max: Option<DateTime<Utc>>,
    /// Processed at or after.
    pub processed_at_min: Option<DateTime<Utc>>,
    /// Processed at or before.
    pub processed_at_max: Option<DateTime<Utc>>,
}

impl OrderListParams {
    fn search(&self) -> Option<String> {
        let ids = (!self.ids.is_empty()).then(|| {
            let terms: Vec<String> = self.ids.iter().map(|id| format!("id:{id}")).collect();
            format!("({})", terms.join(" OR "))
        });
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => Some("open"),
            Some(status) if status.eq_ignore_ascii_case("any") => None,
            Some(status) => Some(status),
        };

        SearchQuery::new()
            .raw(ids.as_deref())
            .term("status", status)
            .term("financial_status", self.financial_status.as_deref())
            .term("fulfillment_status", self.fulfillment_status.as_deref())
            .range("id", ">", self.since_id)
            .since("created_at", ">=", self.created_at_min.as_ref())
            .since("created_at", "<=", self.created_at_max.as_ref())
            .since("updated_at", ">=", self.updated_at_min.as_ref())
            .since("updated_at", "<=", self.updated_at_max.as_ref())
            .since("processed_at", ">=", self.processed_at_min.as_ref())
            .since("processed_at", "<=", self.processed_at_max.as_ref())
            .build()
    }
}

/// A REST note attribute (GraphQL custom attribute).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NoteAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// Order fields that can change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OrderInput {
    /// Customer email.
    pub email: Option<String>,
    /// Order note.
    pub note: Option<String>,
    /// Comma-separated tags; replaces the current tags.
    pub tags: Option<String>,
    /// Shipping address.
    pub shipping_address: Option<Address>,
    /// Note attributes; replace the current ones.
    pub note_attributes: Vec<NoteAttribute>,
}

impl OrderInput {
    fn to_graphql(&self) -> InputMap {
        let attributes: Vec<Value> = self
            .note_attributes
            .iter()
            .map(|attribute| {
                InputMap::new()
                    .field("key", attribute.name.as_str())
                    .field("value", attribute.value.as_str())
                    .into_value()
            })
            .collect();
        InputMap::new()
            .optional("email", self.email.clone())
            .optional("note", self.note.clone())
            .optional("tags", self.tags.as_deref().map(split_tags))
            .optional("shippingAddress", self.shipping_address.as_ref().map(Address::to_graphql))
            .optional("customAttributes", Some(attributes))
    }
}

/// Options for [`Orders::cancel`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CancelOptions {
    /// `customer`, `fraud`, `inventory`, `declined`, `staff` or `other`
    /// (the default).
    pub reason: Option<String>,
    /// Refund the payment.
    pub refund: bool,
    /// Restock the items.
    pub restock: bool,
    /// Email the customer.
    pub email: Option<bool>,
    /// Internal note.
    pub staff_note: Option<String>,
}

/// The asynchronous job started by [`Orders::cancel`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OrderCancelJob {
    /// The job ID.
    pub job_id: Option<String>,
    /// Whether the job has finished.
    pub done: Option<bool>,
    /// The namespaced job ID.
    pub admin_graphql_api_id: Option<String>,
}

const CANCEL_JOB: &FieldMap = &[
    Field::computed("job_id", job_id),
    Field::copy("done", "done"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn job_id(job: &Value) -> Value {
    job.get("id")
        .and_then(Value::as_str)
        .and_then(|id| id.rsplit('/').next())
        .map_or(Value::Null, Value::from)
}

/// Order operations.
#[derive(Clone, Copy, Debug)]
pub struct Orders<'c> {
    translator: Translator<'c>,
}

impl<'c> Orders<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of orders.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list(&self, params: &OrderListParams, page: &PageParams) -> Result<Page<Order>, ResourceError> {
        let variables = InputMap::new().optional("query", params.search());
        self.translator.list(&LIST, variables, page, "", ORDER).await
    }

    /// Fetches one order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the order does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Order, ResourceError> {
        let (gid, raw) = global_id("Order", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Order", &raw)
            .await?;
        shape(GET.name, ORDER, &node)
    }

    /// Counts orders matching `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote failure.
    pub async fn count(&self, params: &OrderListParams) -> Result<u64, ResourceError> {
        let payload = self
            .translator
            .run(&COUNT, InputMap::new().optional("query", params.search()))
            .await?;
        count(COUNT.name, &payload)
    }

    /// Updates an order's editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the API rejects the input.
    pub async fn update(&self, id: impl fmt::Display, input: &OrderInput) -> Result<Order, ResourceError> {
        let (gid, _) = global_id("Order", id)?;
        let payload = self
            .translator
            .run(&UPDATE, InputMap::new().field("input", input.to_graphql().field("id", gid)))
            .await?;
        shape(UPDATE.name, ORDER, require(UPDATE.name, &payload, "order")?)
    }

    /// Starts cancelling an order.
    ///
    /// Cancellation runs asynchronously; the returned job reports whether it
    /// has finished.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the order cannot be
    /// cancelled.
    pub async fn cancel(&self, id: impl fmt::Display, options: &CancelOptions) -> Result<OrderCancelJob, ResourceError> {
        let (gid, _) = global_id("Order", id)?;
        let reason = options
            .reason
            .as_deref()
            .filter(|reason| !reason.trim().is_empty())
            .map_or_else(|| "OTHER".to_string(), upper_enum);

        let variables = InputMap::new()
            .field("orderId", gid)
            .field("reason", reason)
            .field("refund", options.refund)
            .field("restock", options.restock)
            .optional("notifyCustomer", options.email)
            .optional("staffNote", options.staff_note.clone());
        let payload = self.translator.run(&CANCEL, variables).await?;
        shape(CANCEL.name, CANCEL_JOB, require(CANCEL.name, &payload, "job")?)
    }

    /// Closes an order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn close(&self, id: impl fmt::Display) -> Result<Order, ResourceError> {
        self.transition(&CLOSE, id).await
    }

    /// Re-opens a closed order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn open(&self, id: impl fmt::Display) -> Result<Order, ResourceError> {
        self.transition(&OPEN, id).await
    }

    async fn transition(&self, operation: &Operation, id: impl fmt::Display) -> Result<Order, ResourceError> {
        let (gid, _) = global_id("Order", id)?;
        let payload = self
            .translator
            .run(operation, InputMap::new().field("input", InputMap::new().field("id", gid)))
            .await?;
        shape(operation.name, ORDER, require(operation.name, &payload, "order")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_order_map() {
        let node = json!({
            "id": "gid://shopify/Order/450789469",
            "name": "#1001",
            "email": "bob.norman@mail.example.com",
            "tags": ["imported", "rush"],
            "currencyCode": "USD",
            "displayFinancialStatus": "PARTIALLY_REFUNDED",
            "displayFulfillmentStatus": "PARTIALLY_FULFILLED",
            "cancelReason": null,
            "totalPriceSet": { "shopMoney": { "amount": "598.94", "currencyCode": "USD" } },
            "customer": { "id": "gid://shopify/Customer/207119551", "email": "bob.norman@mail.example.com" },
            "shippingAddress": { "city": "Drayton Valley", "countryCodeV2": "CA" },
            "billingAddress": null,
            "lineItems": { "nodes": [{
                "id": "gid://shopify/LineItem/466157049",
                "quantity": 1,
                "unfulfilledQuantity": 0,
                "originalUnitPriceSet": { "shopMoney": { "amount": "199.00", "currencyCode": "USD" } },
                "variant": { "id": "gid://shopify/ProductVariant/39072856" },
                "product": null
            }]}
        });
        let order: Order = serde_json::from_value(map_fields(ORDER, &node)).unwrap();

        assert_eq!(order.id, Some(450_789_469));
        assert_eq!(order.order_number, Some(1001));
        assert_eq!(order.tags.as_deref(), Some("imported, rush"));
        assert_eq!(order.financial_status.as_deref(), Some("partially_refunded"));
        assert_eq!(order.fulfillment_status.as_deref(), Some("partial"));
        assert_eq!(order.total_price.as_deref(), Some("598.94"));
        assert_eq!(order.customer.as_ref().and_then(|c| c.id), Some(207_119_551));
        assert_eq!(
            order.shipping_address.as_ref().and_then(|a| a.country_code.as_deref()),
            Some("CA")
        );
        assert!(order.billing_address.is_none());
        assert_eq!(order.line_items[0].price.as_deref(), Some("199.00"));
        assert_eq!(order.line_items[0].variant_id, Some(39_072_856));
        assert_eq!(order.line_items[0].product_id, None);
    }

    #[test]
    fn test_unfulfilled_status_is_null() {
        assert_eq!(fulfillment_status(&json!({ "displayFulfillmentStatus": "UNFULFILLED" })), Value::Null);
        assert_eq!(fulfillment_status(&json!({ "displayFulfillmentStatus": "FULFILLED" })), json!("fulfilled"));
    }

    #[test]
    fn test_status_defaults_to_open() {
        assert_eq!(OrderListParams::default().search().as_deref(), Some("status:open"));

        let any = OrderListParams {
            status: Some("any".to_string()),
            since_id: Some(123),
            ..Default::default()
        };
        assert_eq!(any.search().as_deref(), Some("id:>123"));
    }

    #[test]
    fn test_cancel_job_map() {
        let job: OrderCancelJob = serde_json::from_value(map_fields(
            CANCEL_JOB,
            &json!({ "id": "gid://shopify/Job/4e2b6cd5-8f37-4c7a-bb38-b0a1d1c2e3f4", "done": false }),
        ))
        .unwrap();
        assert_eq!(job.job_id.as_deref(), Some("4e2b6cd5-8f37-4c7a-bb38-b0a1d1c2e3f4"));
        assert_eq!(job.done, Some(false));
    }

    #[test]
    fn test_order_input_replaces_attributes() {
        let input = OrderInput {
            note: Some("Customer contacted us".to_string()),
            note_attributes: vec![NoteAttribute {
                name: "colour".to_string(),
                value: "red".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(
            input.to_graphql().into_value(),
            json!({
                "note": "Customer contacted us",
                "customAttributes": [{ "key": "colour", "value": "red" }]
            })
        );
    }
}
