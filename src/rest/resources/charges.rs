//! App billing: recurring, one-time and usage charges.
//!
//! Recurring charges are app subscriptions with a 30-day recurring line item
//! and, when a capped amount is given, a usage line item. Usage charges are
//! usage records against that second line item.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, lookup, money_amount, Field, FieldMap};
use crate::rest::gid::bare_id;
use crate::rest::input::InputMap;
use crate::rest::queries::charges as queries;
use crate::rest::resources::common::{decimal, global_id, is_missing_node};
use crate::rest::translator::{require, shape, Operation, Translator};
use crate::rest::{Page, PageParams};

const SUBSCRIPTIONS: Operation = Operation::query("appSubscriptions", queries::SUBSCRIPTIONS, "currentAppInstallation");
const SUBSCRIPTION: Operation = Operation::query("appSubscription", queries::SUBSCRIPTION, "node");
const SHOP_CURRENCY: Operation = Operation::query("shopCurrency", queries::SHOP_CURRENCY, "shop");
const SUBSCRIPTION_CREATE: Operation = Operation::mutation(
    "appSubscriptionCreate",
    queries::SUBSCRIPTION_CREATE,
    "appSubscriptionCreate",
    "userErrors",
);
const SUBSCRIPTION_CANCEL: Operation = Operation::mutation(
    "appSubscriptionCancel",
    queries::SUBSCRIPTION_CANCEL,
    "appSubscriptionCancel",
    "userErrors",
);
const ONE_TIME_PURCHASES: Operation =
    Operation::query("appPurchasesOneTime", queries::ONE_TIME_PURCHASES, "currentAppInstallation");
const ONE_TIME_CREATE: Operation = Operation::mutation(
    "appPurchaseOneTimeCreate",
    queries::ONE_TIME_CREATE,
    "appPurchaseOneTimeCreate",
    "userErrors",
);
const USAGE_RECORD_CREATE: Operation = Operation::mutation(
    "appUsageRecordCreate",
    queries::USAGE_RECORD_CREATE,
    "appUsageRecordCreate",
    "userErrors",
);

const RECURRING_PRICING: &str = "AppRecurringPricing";
const USAGE_PRICING: &str = "AppUsagePricing";
const INTERVAL: &str = "EVERY_30_DAYS";

/// A recurring application charge in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RecurringApplicationCharge {
    /// The bare subscription ID.
    pub id: Option<u64>,
    /// Plan name.
    pub name: Option<String>,
    /// Price per 30-day interval.
    pub price: Option<String>,
    /// Currency of the price.
    pub currency: Option<String>,
    /// Status, e.g. `active`.
    pub status: Option<String>,
    /// Whether this is a test charge.
    pub test: Option<bool>,
    /// Trial length in days.
    pub trial_days: Option<u32>,
    /// End of the current billing period.
    pub billing_on: Option<DateTime<Utc>>,
    /// Usage cap, when the plan has usage pricing.
    pub capped_amount: Option<String>,
    /// Usage terms, when the plan has usage pricing.
    pub terms: Option<String>,
    /// Where the merchant returns after approving.
    pub return_url: Option<String>,
    /// Approval URL; only set on create.
    pub confirmation_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

/// A one-time application charge in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApplicationCharge {
    /// The bare purchase ID.
    pub id: Option<u64>,
    /// Charge name.
    pub name: Option<String>,
    /// Price.
    pub price: Option<String>,
    /// Currency of the price.
    pub currency: Option<String>,
    /// Status, e.g. `pending`.
    pub status: Option<String>,
    /// Whether this is a test charge.
    pub test: Option<bool>,
    /// Approval URL; only set on create.
    pub confirmation_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

/// A usage charge in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UsageCharge {
    /// The bare usage record ID.
    pub id: Option<u64>,
    /// What was used.
    pub description: Option<String>,
    /// Price.
    pub price: Option<String>,
    /// Currency of the price.
    pub currency: Option<String>,
    /// The recurring charge this usage is billed against.
    pub recurring_application_charge_id: Option<u64>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const RECURRING: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("name", "name"),
    Field::computed("price", recurring_price),
    Field::computed("currency", recurring_currency),
    Field::lower("status", "status"),
    Field::copy("test", "test"),
    Field::copy("trial_days", "trialDays"),
    Field::copy("billing_on", "currentPeriodEnd"),
    Field::computed("capped_amount", capped_amount),
    Field::computed("terms", terms),
    Field::copy("return_url", "returnUrl"),
    Field::copy("created_at", "createdAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

const ONE_TIME: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("name", "name"),
    Field::money("price", "price"),
    Field::copy("currency", "price.currencyCode"),
    Field::lower("status", "status"),
    Field::copy("test", "test"),
    Field::copy("created_at", "createdAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

const USAGE: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("description", "description"),
    Field::money("price", "price"),
    Field::copy("currency", "price.currencyCode"),
    Field::copy("created_at", "createdAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

/// The first line item whose pricing has `typename`.
fn line_item<'a>(subscription: &'a Value, typename: &str) -> Option<&'a Value> {
    flatten(subscription.get("lineItems"))
        .into_iter()
        .find(|item| {
            lookup(item, "plan.pricingDetails.__typename").and_then(Value::as_str) == Some(typename)
        })
}

fn pricing<'a>(subscription: &'a Value, typename: &str, path: &str) -> Option<&'a Value> {
    line_item(subscription, typename).and_then(|item| lookup(item, &format!("plan.pricingDetails.{path}")))
}

fn recurring_price(node: &Value) -> Value {
    pricing(node, RECURRING_PRICING, "price").map_or(Value::Null, money_amount)
}

fn recurring_currency(node: &Value) -> Value {
    pricing(node, RECURRING_PRICING, "price.currencyCode")
        .or_else(|| pricing(node, USAGE_PRICING, "cappedAmount.currencyCode"))
        .cloned()
        .unwrap_or(Value::Null)
}

fn capped_amount(node: &Value) -> Value {
    pricing(node, USAGE_PRICING, "cappedAmount").map_or(Value::Null, money_amount)
}

fn terms(node: &Value) -> Value {
    pricing(node, USAGE_PRICING, "terms").cloned().unwrap_or(Value::Null)
}

fn money(amount: &str, currency: &str) -> Value {
    json!({ "amount": amount, "currencyCode": currency })
}

/// A recurring charge to create.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RecurringChargeInput {
    /// Plan name.
    pub name: String,
    /// Price per 30-day interval.
    pub price: String,
    /// Where the merchant returns after approving.
    pub return_url: String,
    /// Currency; the shop currency when absent.
    #[serde(default)]
    pub currency: Option<String>,
    /// Whether this is a test charge.
    #[serde(default)]
    pub test: Option<bool>,
    /// Trial length in days.
    #[serde(default)]
    pub trial_days: Option<u32>,
    /// Usage cap; adds a usage line item.
    #[serde(default)]
    pub capped_amount: Option<String>,
    /// Usage terms; required with `capped_amount`.
    #[serde(default)]
    pub terms: Option<String>,
}

impl RecurringChargeInput {
    fn validate(&self) -> Result<(), ResourceError> {
        decimal("price", &self.price)?;
        match (&self.capped_amount, &self.terms) {
            (Some(cap), Some(_)) => decimal("capped_amount", cap).map(drop),
            (Some(_), None) => Err(ResourceError::invalid_input("terms are required with capped_amount")),
            (None, _) => Ok(()),
        }
    }

    fn line_items(&self, currency: &str) -> Result<Vec<Value>, ResourceError> {
        let mut items = vec![json!({
            "plan": {
                "appRecurringPricingDetails": {
                    "price": money(&decimal("price", &self.price)?, currency),
                    "interval": INTERVAL,
                }
            }
        })];
        if let (Some(cap), Some(terms)) = (&self.capped_amount, &self.terms) {
            items.push(json!({
                "plan": {
                    "appUsagePricingDetails": {
                        "terms": terms,
                        "cappedAmount": money(&decimal("capped_amount", cap)?, currency),
                    }
                }
            }));
        }
        Ok(items)
    }
}

/// A one-time charge to create.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApplicationChargeInput {
    /// Charge name.
    pub name: String,
    /// Price.
    pub price: String,
    /// Where the merchant returns after approving.
    pub return_url: String,
    /// Currency; the shop currency when absent.
    #[serde(default)]
    pub currency: Option<String>,
    /// Whether this is a test charge.
    #[serde(default)]
    pub test: Option<bool>,
}

/// A usage charge to record.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UsageChargeInput {
    /// What was used.
    pub description: String,
    /// Price, in the currency of the subscription's cap.
    pub price: String,
}

fn confirmation_url(payload: &Value) -> Option<String> {
    payload.get("confirmationUrl").and_then(Value::as_str).map(String::from)
}

/// Billing operations.
#[derive(Clone, Copy, Debug)]
pub struct Charges<'c> {
    translator: Translator<'c>,
}

impl<'c> Charges<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of the app's recurring charges.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list_recurring(&self, page: &PageParams) -> Result<Page<RecurringApplicationCharge>, ResourceError> {
        self.translator
            .list(&SUBSCRIPTIONS, InputMap::new(), page, "allSubscriptions", RECURRING)
            .await
    }

    /// Fetches one recurring charge.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the charge does not exist.
    pub async fn get_recurring(&self, id: impl fmt::Display) -> Result<RecurringApplicationCharge, ResourceError> {
        let node = self.subscription(id).await?;
        shape(SUBSCRIPTION.name, RECURRING, &node)
    }

    /// Creates a recurring charge and returns it with its confirmation URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an unparsable amount or a
    /// cap without terms.
    pub async fn create_recurring(
        &self,
        input: &RecurringChargeInput,
    ) -> Result<RecurringApplicationCharge, ResourceError> {
        input.validate()?;
        let currency = self.currency(input.currency.as_deref()).await?;

        let variables = InputMap::new()
            .field("name", input.name.as_str())
            .field("returnUrl", input.return_url.as_str())
            .field("lineItems", input.line_items(&currency)?)
            .optional("test", input.test)
            .optional("trialDays", input.trial_days);
        let payload = self.translator.run(&SUBSCRIPTION_CREATE, variables).await?;

        let subscription = require(SUBSCRIPTION_CREATE.name, &payload, "appSubscription")?;
        let mut charge: RecurringApplicationCharge = shape(SUBSCRIPTION_CREATE.name, RECURRING, subscription)?;
        charge.confirmation_url = confirmation_url(&payload);
        Ok(charge)
    }

    /// Cancels a recurring charge.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for a malformed ID.
    pub async fn cancel_recurring(&self, id: impl fmt::Display) -> Result<RecurringApplicationCharge, ResourceError> {
        let (gid, _) = global_id("AppSubscription", id)?;
        let payload = self
            .translator
            .run(&SUBSCRIPTION_CANCEL, InputMap::new().field("id", gid))
            .await?;
        let subscription = require(SUBSCRIPTION_CANCEL.name, &payload, "appSubscription")?;
        shape(SUBSCRIPTION_CANCEL.name, RECURRING, subscription)
    }

    /// Lists one page of the app's one-time charges.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list_one_time(&self, page: &PageParams) -> Result<Page<ApplicationCharge>, ResourceError> {
        self.translator
            .list(&ONE_TIME_PURCHASES, InputMap::new(), page, "oneTimePurchases", ONE_TIME)
            .await
    }

    /// Creates a one-time charge and returns it with its confirmation URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an unparsable price.
    pub async fn create_one_time(&self, input: &ApplicationChargeInput) -> Result<ApplicationCharge, ResourceError> {
        let amount = decimal("price", &input.price)?;
        let currency = self.currency(input.currency.as_deref()).await?;

        let variables = InputMap::new()
            .field("name", input.name.as_str())
            .field("price", money(&amount, &currency))
            .field("returnUrl", input.return_url.as_str())
            .optional("test", input.test);
        let payload = self.translator.run(&ONE_TIME_CREATE, variables).await?;

        let purchase = require(ONE_TIME_CREATE.name, &payload, "appPurchaseOneTime")?;
        let mut charge: ApplicationCharge = shape(ONE_TIME_CREATE.name, ONE_TIME, purchase)?;
        charge.confirmation_url = confirmation_url(&payload);
        Ok(charge)
    }

    /// Records usage against a recurring charge's usage line item.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when the charge has no usage
    /// pricing, and [`ResourceError::NotFound`] when it does not exist.
    pub async fn create_usage(
        &self,
        subscription_id: impl fmt::Display,
        input: &UsageChargeInput,
    ) -> Result<UsageCharge, ResourceError> {
        let amount = decimal("price", &input.price)?;
        let subscription = self.subscription(subscription_id).await?;

        let item = line_item(&subscription, USAGE_PRICING)
            .ok_or_else(|| ResourceError::invalid_input("recurring charge has no usage pricing"))?;
        let item_id = require(SUBSCRIPTION.name, item, "id")?.clone();
        let currency = pricing(&subscription, USAGE_PRICING, "cappedAmount.currencyCode")
            .and_then(Value::as_str)
            .ok_or_else(|| ResourceError::malformed(SUBSCRIPTION.name, "usage cap has no currency"))?;

        let variables = InputMap::new()
            .field("subscriptionLineItemId", item_id)
            .field("description", input.description.as_str())
            .field("price", money(&amount, currency));
        let payload = self.translator.run(&USAGE_RECORD_CREATE, variables).await?;

        let record = require(USAGE_RECORD_CREATE.name, &payload, "appUsageRecord")?;
        let mut charge: UsageCharge = shape(USAGE_RECORD_CREATE.name, USAGE, record)?;
        charge.recurring_application_charge_id = subscription
            .get("id")
            .and_then(Value::as_str)
            .and_then(bare_id);
        Ok(charge)
    }

    async fn subscription(&self, id: impl fmt::Display) -> Result<Value, ResourceError> {
        let (gid, raw) = global_id("AppSubscription", id)?;
        let node = self.translator.run(&SUBSCRIPTION, InputMap::new().field("id", gid)).await?;
        if is_missing_node(&node) {
            return Err(ResourceError::not_found("RecurringApplicationCharge", raw));
        }
        Ok(node)
    }

    async fn currency(&self, requested: Option<&str>) -> Result<String, ResourceError> {
        if let Some(currency) = requested.filter(|c| !c.trim().is_empty()) {
            return Ok(currency.trim().to_uppercase());
        }
        let shop = self.translator.run(&SHOP_CURRENCY, InputMap::new()).await?;
        require(SHOP_CURRENCY.name, &shop, "currencyCode")?
            .as_str()
            .map(String::from)
            .ok_or_else(|| ResourceError::malformed(SHOP_CURRENCY.name, "currencyCode is not a string"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;

    fn subscription() -> Value {
        json!({
            "id": "gid://shopify/AppSubscription/455696195",
            "name": "Super Mega Plan",
            "status": "ACTIVE",
            "test": true,
            "trialDays": 7,
            "currentPeriodEnd": "2026-11-01T00:00:00Z",
            "returnUrl": "http://super-duper.shopifyapps.com/",
            "createdAt": "2026-10-01T00:00:00Z",
            "lineItems": [
                {
                    "id": "gid://shopify/AppSubscriptionLineItem/1?v=1&index=0",
                    "plan": { "pricingDetails": {
                        "__typename": "AppRecurringPricing",
                        "interval": "EVERY_30_DAYS",
                        "price": { "amount": "15.0", "currencyCode": "USD" }
                    }}
                },
                {
                    "id": "gid://shopify/AppSubscriptionLineItem/1?v=1&index=1",
                    "plan": { "pricingDetails": {
                        "__typename": "AppUsagePricing",
                        "terms": "$1 per 1000 emails",
                        "cappedAmount": { "amount": "100.0", "currencyCode": "USD" },
                        "balanceUsed": { "amount": "0.0", "currencyCode": "USD" }
                    }}
                }
            ]
        })
    }

    #[test]
    fn test_recurring_map_reads_line_items() {
        let charge: RecurringApplicationCharge = serde_json::from_value(map_fields(RECURRING, &subscription())).unwrap();
        assert_eq!(charge.id, Some(455_696_195));
        assert_eq!(charge.price.as_deref(), Some("15.0"));
        assert_eq!(charge.currency.as_deref(), Some("USD"));
        assert_eq!(charge.status.as_deref(), Some("active"));
        assert_eq!(charge.trial_days, Some(7));
        assert_eq!(charge.capped_amount.as_deref(), Some("100.0"));
        assert_eq!(charge.terms.as_deref(), Some("$1 per 1000 emails"));
        assert!(charge.confirmation_url.is_none());
    }

    #[test]
    fn test_usage_line_item_lookup() {
        let node = subscription();
        let item = line_item(&node, USAGE_PRICING).unwrap();
        assert_eq!(item["id"], json!("gid://shopify/AppSubscriptionLineItem/1?v=1&index=1"));

        let recurring_only = json!({ "lineItems": [subscription()["lineItems"][0].clone()] });
        assert!(line_item(&recurring_only, USAGE_PRICING).is_none());
        assert_eq!(capped_amount(&recurring_only), Value::Null);
    }

    #[test]
    fn test_recurring_line_items() {
        let input = RecurringChargeInput {
            name: "Plan".to_string(),
            price: " 10.00 ".to_string(),
            return_url: "https://example.com".to_string(),
            capped_amount: Some("50".to_string()),
            terms: Some("per email".to_string()),
            ..Default::default()
        };
        input.validate().unwrap();
        let items = input.line_items("CAD").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0]["plan"]["appRecurringPricingDetails"]["price"],
            json!({ "amount": "10.00", "currencyCode": "CAD" })
        );
        assert_eq!(items[1]["plan"]["appUsagePricingDetails"]["terms"], json!("per email"));
    }

    #[test]
    fn test_recurring_input_validation() {
        let mut input = RecurringChargeInput {
            name: "Plan".to_string(),
            price: "ten".to_string(),
            return_url: "https://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(ResourceError::InvalidInput { .. })));

        input.price = "10".to_string();
        input.capped_amount = Some("100".to_string());
        assert!(matches!(input.validate(), Err(ResourceError::InvalidInput { .. })));
    }

    #[test]
    fn test_one_time_map() {
        let node = json!({
            "id": "gid://shopify/AppPurchaseOneTime/675931192",
            "name": "iPod Cleaning",
            "status": "PENDING",
            "test": false,
            "price": { "amount": "5.0", "currencyCode": "USD" }
        });
        let charge: ApplicationCharge = serde_json::from_value(map_fields(ONE_TIME, &node)).unwrap();
        assert_eq!(charge.id, Some(675_931_192));
        assert_eq!(charge.price.as_deref(), Some("5.0"));
        assert_eq!(charge.status.as_deref(), Some("pending"));
    }
}
