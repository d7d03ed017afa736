//! Price rules, backed by code discounts.
//!
//! A line-item rule is a `DiscountCodeBasic`; a shipping-line rule is a
//! `DiscountCodeFreeShipping`. REST values are negative (`-10.0` for ten
//! percent off), GraphQL percentages are fractions (`0.1`).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{lookup, money_amount, Field, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::queries::discounts as queries;
use crate::rest::resources::common::{decimal, deleted, global_id, global_ids};
use crate::rest::translator::{require, shape, Operation, Translator};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("codeDiscountNodes", queries::DISCOUNTS, "codeDiscountNodes");
const GET: Operation = Operation::query("codeDiscountNode", queries::DISCOUNT, "codeDiscountNode");
const BY_CODE: Operation =
    Operation::query("codeDiscountNodeByCode", queries::DISCOUNT_BY_CODE, "codeDiscountNodeByCode");
const KIND: Operation = Operation::query("codeDiscountKind", queries::DISCOUNT_KIND, "codeDiscountNode");
const BASIC_CREATE: Operation = Operation::mutation(
    "discountCodeBasicCreate",
    queries::BASIC_CREATE,
    "discountCodeBasicCreate",
    "userErrors",
);
const BASIC_UPDATE: Operation = Operation::mutation(
    "discountCodeBasicUpdate",
    queries::BASIC_UPDATE,
    "discountCodeBasicUpdate",
    "userErrors",
);
const FREE_SHIPPING_CREATE: Operation = Operation::mutation(
    "discountCodeFreeShippingCreate",
    queries::FREE_SHIPPING_CREATE,
    "discountCodeFreeShippingCreate",
    "userErrors",
);
const FREE_SHIPPING_UPDATE: Operation = Operation::mutation(
    "discountCodeFreeShippingUpdate",
    queries::FREE_SHIPPING_UPDATE,
    "discountCodeFreeShippingUpdate",
    "userErrors",
);
const DELETE: Operation =
    Operation::mutation("discountCodeDelete", queries::DISCOUNT_DELETE, "discountCodeDelete", "userErrors");

const FREE_SHIPPING: &str = "DiscountCodeFreeShipping";

/// A discount code attached to a price rule.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DiscountCode {
    /// The bare code ID.
    pub id: Option<u64>,
    /// The code customers enter.
    pub code: Option<String>,
    /// Times the code has been used.
    pub usage_count: Option<u64>,
}

/// A price rule in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PriceRule {
    /// The bare discount ID.
    pub id: Option<u64>,
    /// Internal name.
    pub title: Option<String>,
    /// `percentage` or `fixed_amount`.
    pub value_type: Option<String>,
    /// Negative discount, e.g. `-10.0`.
    pub value: Option<String>,
    /// `line_item` or `shipping_line`.
    pub target_type: Option<String>,
    /// `all` or `entitled`.
    pub target_selection: Option<String>,
    /// `across` or `each`.
    pub allocation_method: Option<String>,
    /// `all` or `prerequisite`.
    pub customer_selection: Option<String>,
    /// Whether each customer may use it once.
    pub once_per_customer: Option<bool>,
    /// Maximum total uses.
    pub usage_limit: Option<u64>,
    /// `active`, `expired` or `scheduled`.
    pub status: Option<String>,
    /// Start time.
    pub starts_at: Option<DateTime<Utc>>,
    /// End time.
    pub ends_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Products the rule applies to.
    #[serde(default)]
    pub entitled_product_ids: Vec<u64>,
    /// Variants the rule applies to.
    #[serde(default)]
    pub entitled_variant_ids: Vec<u64>,
    /// Collections the rule applies to.
    #[serde(default)]
    pub entitled_collection_ids: Vec<u64>,
    /// Codes redeeming the rule.
    #[serde(default)]
    pub discount_codes: Vec<DiscountCode>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const CODE: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("code", "code"),
    Field::copy("usage_count", "asyncUsageCount"),
];

const PRICE_RULE: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("title", "codeDiscount.title"),
    Field::computed("value_type", value_type),
    Field::computed("value", value),
    Field::computed("target_type", target_type),
    Field::computed("target_selection", target_selection),
    Field::computed("allocation_method", allocation_method),
    Field::computed("customer_selection", customer_selection),
    Field::copy("once_per_customer", "codeDiscount.appliesOncePerCustomer"),
    Field::copy("usage_limit", "codeDiscount.usageLimit"),
    Field::lower("status", "codeDiscount.status"),
    Field::copy("starts_at", "codeDiscount.startsAt"),
    Field::copy("ends_at", "codeDiscount.endsAt"),
    Field::copy("created_at", "codeDiscount.createdAt"),
    Field::copy("updated_at", "codeDiscount.updatedAt"),
    Field::ids("entitled_product_ids", "codeDiscount.customerGets.items.products"),
    Field::ids("entitled_variant_ids", "codeDiscount.customerGets.items.productVariants"),
    Field::ids("entitled_collection_ids", "codeDiscount.customerGets.items.collections"),
    Field::list("discount_codes", "codeDiscount.codes", CODE),
    Field::copy("admin_graphql_api_id", "id"),
];

fn typename<'v>(node: &'v Value, path: &str) -> Option<&'v str> {
    lookup(node, path).and_then(Value::as_str)
}

fn is_free_shipping(node: &Value) -> bool {
    typename(node, "codeDiscount.__typename") == Some(FREE_SHIPPING)
}

fn value_type(node: &Value) -> Value {
    if is_free_shipping(node) {
        return Value::from("percentage");
    }
    match typename(node, "codeDiscount.customerGets.value.__typename") {
        Some("DiscountPercentage") => Value::from("percentage"),
        Some("DiscountAmount") => Value::from("fixed_amount"),
        _ => Value::Null,
    }
}

fn value(node: &Value) -> Value {
    if is_free_shipping(node) {
        return Value::from("-100.0");
    }
    let Some(gets) = lookup(node, "codeDiscount.customerGets.value") else {
        return Value::Null;
    };
    if let Some(fraction) = gets.get("percentage").and_then(Value::as_f64) {
        let percent = (fraction * 10_000.0).round() / 100.0;
        return Value::String(format!("{:?}", -percent));
    }
    match gets.get("amount").map(money_amount) {
        Some(Value::String(amount)) => Value::String(format!("-{amount}")),
        _ => Value::Null,
    }
}

fn target_type(node: &Value) -> Value {
    match typename(node, "codeDiscount.__typename") {
        Some(FREE_SHIPPING) => Value::from("shipping_line"),
        Some(_) => Value::from("line_item"),
        None => Value::Null,
    }
}

fn target_selection(node: &Value) -> Value {
    match typename(node, "codeDiscount.customerGets.items.__typename") {
        Some("DiscountProducts" | "DiscountCollections") => Value::from("entitled"),
        _ if typename(node, "codeDiscount.__typename").is_some() => Value::from("all"),
        _ => Value::Null,
    }
}

fn allocation_method(node: &Value) -> Value {
    if is_free_shipping(node) {
        return Value::from("each");
    }
    let each = lookup(node, "codeDiscount.customerGets.value.appliesOnEachItem").and_then(Value::as_bool);
    Value::from(if each == Some(true) { "each" } else { "across" })
}

fn customer_selection(node: &Value) -> Value {
    match typename(node, "codeDiscount.customerSelection.__typename") {
        Some("DiscountCustomerAll") => Value::from("all"),
        Some(_) => Value::from("prerequisite"),
        None => Value::Null,
    }
}

/// REST price rule fields accepted by create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PriceRuleInput {
    /// Internal name.
    pub title: Option<String>,
    /// The code customers enter; defaults to the title on create.
    pub code: Option<String>,
    /// `percentage` or `fixed_amount`.
    pub value_type: Option<String>,
    /// Negative discount, e.g. `-10.0`.
    pub value: Option<String>,
    /// `line_item` (default) or `shipping_line`.
    pub target_type: Option<String>,
    /// `across` (default) or `each`.
    pub allocation_method: Option<String>,
    /// Whether each customer may use it once.
    pub once_per_customer: Option<bool>,
    /// Maximum total uses.
    pub usage_limit: Option<u64>,
    /// Start time; required on create.
    pub starts_at: Option<DateTime<Utc>>,
    /// End time.
    pub ends_at: Option<DateTime<Utc>>,
    /// Restrict to these products.
    pub entitled_product_ids: Vec<u64>,
    /// Restrict to these variants.
    pub entitled_variant_ids: Vec<u64>,
    /// Restrict to these collections.
    pub entitled_collection_ids: Vec<u64>,
}

impl PriceRuleInput {
    fn is_shipping(&self) -> bool {
        self.target_type.as_deref() == Some("shipping_line")
    }

    /// Fields shared by both discount types.
    fn common(&self, creating: bool) -> Result<InputMap, ResourceError> {
        let code = self.code.clone().or_else(|| if creating { self.title.clone() } else { None });
        if creating {
            if self.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
                return Err(ResourceError::invalid_input("title is required"));
            }
            if self.starts_at.is_none() {
                return Err(ResourceError::invalid_input("starts_at is required"));
            }
        }
        let mut input = InputMap::new()
            .optional("title", self.title.clone())
            .optional("code", code)
            .optional("startsAt", self.starts_at.map(|at| at.to_rfc3339()))
            .optional("endsAt", self.ends_at.map(|at| at.to_rfc3339()))
            .optional("usageLimit", self.usage_limit)
            .optional("appliesOncePerCustomer", self.once_per_customer);
        if creating {
            input = input.field("customerSelection", InputMap::new().field("all", true));
        }
        Ok(input)
    }

    fn free_shipping(&self, creating: bool) -> Result<InputMap, ResourceError> {
        let input = self.common(creating)?;
        Ok(if creating {
            input.field("destination", InputMap::new().field("all", true))
        } else {
            input
        })
    }

    fn basic(&self, creating: bool) -> Result<InputMap, ResourceError> {
        let input = self.common(creating)?;
        let value = self.discount_value()?;
        if creating && value.is_none() {
            return Err(ResourceError::invalid_input("value and value_type are required"));
        }
        let items = self.items()?;

        let gets = InputMap::new().optional("value", value).optional(
            "items",
            items.or_else(|| creating.then(|| InputMap::new().field("all", true))),
        );
        Ok(input.nested("customerGets", gets))
    }

    fn discount_value(&self) -> Result<Option<InputMap>, ResourceError> {
        let Some(raw) = self.value.as_deref() else {
            return Ok(None);
        };
        let amount = decimal("value", raw)?;
        let amount = amount.trim_start_matches('-');
        match self.value_type.as_deref() {
            Some("percentage") => {
                let percent: f64 = amount
                    .parse()
                    .map_err(|_| ResourceError::invalid_input(format!("value must be a decimal, got '{raw}'")))?;
                if percent > 100.0 {
                    return Err(ResourceError::invalid_input("a percentage value cannot exceed 100"));
                }
                Ok(Some(InputMap::new().field("percentage", percent / 100.0)))
            }
            Some("fixed_amount") => Ok(Some(
                InputMap::new().field(
                    "discountAmount",
                    InputMap::new()
                        .field("amount", amount)
                        .field("appliesOnEachItem", self.allocation_method.as_deref() == Some("each")),
                ),
            )),
            _ => Err(ResourceError::invalid_input(
                "value_type must be 'percentage' or 'fixed_amount'",
            )),
        }
    }

    fn items(&self) -> Result<Option<InputMap>, ResourceError> {
        if !self.entitled_collection_ids.is_empty() {
            let collections = global_ids("Collection", &self.entitled_collection_ids)?;
            return Ok(Some(
                InputMap::new().field("collections", InputMap::new().field("add", collections)),
            ));
        }
        if self.entitled_product_ids.is_empty() && self.entitled_variant_ids.is_empty() {
            return Ok(None);
        }
        let products = InputMap::new()
            .optional("productsToAdd", Some(global_ids("Product", &self.entitled_product_ids)?))
            .optional(
                "productVariantsToAdd",
                Some(global_ids("ProductVariant", &self.entitled_variant_ids)?),
            );
        Ok(Some(InputMap::new().field("products", products)))
    }
}

/// Price rule operations.
#[derive(Clone, Copy, Debug)]
pub struct PriceRules<'c> {
    translator: Translator<'c>,
}

impl<'c> PriceRules<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of price rules, optionally filtered by a search query.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list(&self, query: Option<&str>, page: &PageParams) -> Result<Page<PriceRule>, ResourceError> {
        let variables = InputMap::new().optional("query", query);
        self.translator.list(&LIST, variables, page, "", PRICE_RULE).await
    }

    /// Fetches one price rule.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the rule does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<PriceRule, ResourceError> {
        let (gid, raw) = global_id("DiscountCodeNode", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "PriceRule", &raw)
            .await?;
        shape(GET.name, PRICE_RULE, &node)
    }

    /// Finds the price rule redeemed by `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when no rule has the code.
    pub async fn lookup(&self, code: &str) -> Result<PriceRule, ResourceError> {
        let node = self
            .translator
            .find(&BY_CODE, InputMap::new().field("code", code), "DiscountCode", code)
            .await?;
        shape(BY_CODE.name, PRICE_RULE, &node)
    }

    /// Creates a price rule.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when `title` or `starts_at`
    /// is missing or the value cannot be parsed.
    pub async fn create(&self, input: &PriceRuleInput) -> Result<PriceRule, ResourceError> {
        let (operation, variables) = if input.is_shipping() {
            (
                &FREE_SHIPPING_CREATE,
                InputMap::new().field("freeShippingCodeDiscount", input.free_shipping(true)?),
            )
        } else {
            (
                &BASIC_CREATE,
                InputMap::new().field("basicCodeDiscount", input.basic(true)?),
            )
        };
        let payload = self.translator.run(operation, variables).await?;
        shape(operation.name, PRICE_RULE, require(operation.name, &payload, "codeDiscountNode")?)
    }

    /// Updates a price rule. Its current type decides which mutation runs.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the rule does not exist.
    pub async fn update(&self, id: impl fmt::Display, input: &PriceRuleInput) -> Result<PriceRule, ResourceError> {
        let (gid, raw) = global_id("DiscountCodeNode", id)?;
        let current = self
            .translator
            .find(&KIND, InputMap::new().field("id", gid.as_str()), "PriceRule", &raw)
            .await?;

        let (operation, variables) = if is_free_shipping(&current) {
            (
                &FREE_SHIPPING_UPDATE,
                InputMap::new().field("freeShippingCodeDiscount", input.free_shipping(false)?),
            )
        } else {
            (
                &BASIC_UPDATE,
                InputMap::new().field("basicCodeDiscount", input.basic(false)?),
            )
        };
        let payload = self.translator.run(operation, variables.field("id", gid)).await?;
        shape(operation.name, PRICE_RULE, require(operation.name, &payload, "codeDiscountNode")?)
    }

    /// Deletes a price rule.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ResourceError> {
        let (gid, raw) = global_id("DiscountCodeNode", id)?;
        let payload = self.translator.run(&DELETE, InputMap::new().field("id", gid)).await?;
        deleted(&payload, "deletedCodeDiscountId", "PriceRule", &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use chrono::TimeZone;
    use serde_json::json;

    fn basic_node() -> Value {
        json!({
            "id": "gid://shopify/DiscountCodeNode/507328175",
            "codeDiscount": {
                "__typename": "DiscountCodeBasic",
                "title": "SUMMERSALE10OFF",
                "status": "ACTIVE",
                "startsAt": "2024-01-01T00:00:00Z",
                "endsAt": null,
                "usageLimit": null,
                "appliesOncePerCustomer": false,
                "codes": { "nodes": [{ "id": "gid://shopify/DiscountRedeemCode/1", "code": "SUMMER10", "asyncUsageCount": 3 }] },
                "customerSelection": { "__typename": "DiscountCustomerAll" },
                "customerGets": {
                    "value": { "__typename": "DiscountPercentage", "percentage": 0.155 },
                    "items": {
                        "__typename": "DiscountProducts",
                        "products": { "nodes": [{ "id": "gid://shopify/Product/632910392" }] },
                        "productVariants": { "nodes": [] }
                    }
                }
            }
        })
    }

    #[test]
    fn test_basic_percentage_map() {
        let rule: PriceRule = serde_json::from_value(map_fields(PRICE_RULE, &basic_node())).unwrap();
        assert_eq!(rule.id, Some(507_328_175));
        assert_eq!(rule.value_type.as_deref(), Some("percentage"));
        assert_eq!(rule.value.as_deref(), Some("-15.5"));
        assert_eq!(rule.target_type.as_deref(), Some("line_item"));
        assert_eq!(rule.target_selection.as_deref(), Some("entitled"));
        assert_eq!(rule.allocation_method.as_deref(), Some("across"));
        assert_eq!(rule.customer_selection.as_deref(), Some("all"));
        assert_eq!(rule.entitled_product_ids, vec![632_910_392]);
        assert_eq!(rule.discount_codes[0].code.as_deref(), Some("SUMMER10"));
        assert_eq!(rule.discount_codes[0].usage_count, Some(3));
    }

    #[test]
    fn test_fixed_amount_and_free_shipping_values() {
        let amount = json!({
            "codeDiscount": {
                "__typename": "DiscountCodeBasic",
                "customerGets": {
                    "value": { "__typename": "DiscountAmount", "amount": { "amount": "10.00", "currencyCode": "USD" }, "appliesOnEachItem": true },
                    "items": { "__typename": "AllDiscountItems" }
                }
            }
        });
        assert_eq!(value(&amount), json!("-10.00"));
        assert_eq!(value_type(&amount), json!("fixed_amount"));
        assert_eq!(allocation_method(&amount), json!("each"));
        assert_eq!(target_selection(&amount), json!("all"));

        let shipping = json!({ "codeDiscount": { "__typename": "DiscountCodeFreeShipping" } });
        assert_eq!(value(&shipping), json!("-100.0"));
        assert_eq!(target_type(&shipping), json!("shipping_line"));
    }

    #[test]
    fn test_create_requires_starts_at() {
        let input = PriceRuleInput {
            title: Some("SALE".to_string()),
            value_type: Some("percentage".to_string()),
            value: Some("-10.0".to_string()),
            ..Default::default()
        };
        assert!(matches!(input.basic(true), Err(ResourceError::InvalidInput { .. })));
    }

    #[test]
    fn test_basic_input() {
        let input = PriceRuleInput {
            title: Some("SALE".to_string()),
            value_type: Some("percentage".to_string()),
            value: Some("-10.0".to_string()),
            starts_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            entitled_collection_ids: vec![841_564_295],
            ..Default::default()
        };
        assert_eq!(
            input.basic(true).unwrap().into_value(),
            json!({
                "title": "SALE",
                "code": "SALE",
                "startsAt": "2024-01-01T00:00:00+00:00",
                "customerSelection": { "all": true },
                "customerGets": {
                    "value": { "percentage": 0.1 },
                    "items": { "collections": { "add": ["gid://shopify/Collection/841564295"] } }
                }
            })
        );
    }

    #[test]
    fn test_rejects_unparsable_value() {
        let input = PriceRuleInput {
            value_type: Some("fixed_amount".to_string()),
            value: Some("ten".to_string()),
            ..Default::default()
        };
        assert!(matches!(input.discount_value(), Err(ResourceError::InvalidInput { .. })));
    }
}
