//! Webhook subscriptions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{upper_enum, Field, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::queries::webhooks as queries;
use crate::rest::resources::common::{count, deleted, global_id};
use crate::rest::translator::{require, shape, Operation, Translator};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("webhookSubscriptions", queries::WEBHOOKS, "webhookSubscriptions");
const GET: Operation = Operation::query("webhookSubscription", queries::WEBHOOK, "webhookSubscription");
const COUNT: Operation =
    Operation::query("webhookSubscriptionsCount", queries::WEBHOOKS_COUNT, "webhookSubscriptionsCount");
const CREATE: Operation = Operation::mutation(
    "webhookSubscriptionCreate",
    queries::WEBHOOK_CREATE,
    "webhookSubscriptionCreate",
    "userErrors",
);
const UPDATE: Operation = Operation::mutation(
    "webhookSubscriptionUpdate",
    queries::WEBHOOK_UPDATE,
    "webhookSubscriptionUpdate",
    "userErrors",
);
const DELETE: Operation = Operation::mutation(
    "webhookSubscriptionDelete",
    queries::WEBHOOK_DELETE,
    "webhookSubscriptionDelete",
    "userErrors",
);

/// Topic resources whose names span more than one word.
///
/// The longest resource a topic starts with wins.
const MULTI_WORD_RESOURCES: &[&str] = &[
    "APP_PURCHASES_ONE_TIME",
    "APP_SUBSCRIPTIONS",
    "AUDIT_EVENTS",
    "BULK_OPERATIONS",
    "COLLECTION_LISTINGS",
    "COLLECTION_PUBLICATIONS",
    "COMPANY_CONTACT_ROLES",
    "COMPANY_CONTACTS",
    "COMPANY_LOCATIONS",
    "CUSTOMER_ACCOUNT_SETTINGS",
    "CUSTOMER_GROUPS",
    "CUSTOMER_PAYMENT_METHODS",
    "CUSTOMER_TAGS",
    "CUSTOMERS_EMAIL_MARKETING_CONSENT",
    "CUSTOMERS_MARKETING_CONSENT",
    "DELIVERY_PROMISE_SETTINGS",
    "DRAFT_ORDERS",
    "FULFILLMENT_EVENTS",
    "FULFILLMENT_HOLDS",
    "FULFILLMENT_ORDERS",
    "INVENTORY_ITEMS",
    "INVENTORY_LEVELS",
    "ORDER_TRANSACTIONS",
    "PAYMENT_SCHEDULES",
    "PAYMENT_TERMS",
    "PRODUCT_FEEDS",
    "PRODUCT_LISTINGS",
    "PRODUCT_PUBLICATIONS",
    "REVERSE_DELIVERIES",
    "REVERSE_FULFILLMENT_ORDERS",
    "SCHEDULED_PRODUCT_LISTINGS",
    "SELLING_PLAN_GROUPS",
    "SUBSCRIPTION_BILLING_ATTEMPTS",
    "SUBSCRIPTION_BILLING_CYCLE_EDITS",
    "SUBSCRIPTION_BILLING_CYCLES",
    "SUBSCRIPTION_CONTRACTS",
    "TAX_SERVICES",
    "TENDER_TRANSACTIONS",
];

/// Converts a GraphQL topic to REST form (`ORDERS_CREATE` → `orders/create`).
#[must_use]
pub fn rest_topic(topic: &str) -> String {
    let split = MULTI_WORD_RESOURCES
        .iter()
        .filter(|resource| {
            topic
                .strip_prefix(**resource)
                .is_some_and(|rest| rest.starts_with('_'))
        })
        .map(|resource| resource.len())
        .max()
        .or_else(|| topic.find('_'));

    match split {
        Some(at) => format!("{}/{}", &topic[..at], &topic[at + 1..]).to_lowercase(),
        None => topic.to_lowercase(),
    }
}

/// Converts a REST topic to GraphQL form (`orders/create` → `ORDERS_CREATE`).
///
/// # Errors
///
/// Returns [`ResourceError::InvalidInput`] when the topic has no `/`.
pub fn graphql_topic(topic: &str) -> Result<String, ResourceError> {
    let topic = topic.trim();
    match topic.split_once('/') {
        Some((resource, event)) if !resource.is_empty() && !event.is_empty() => {
            Ok(format!("{resource}_{event}").to_uppercase())
        }
        _ => Err(ResourceError::invalid_input(format!(
            "webhook topic '{topic}' must look like 'resource/event'"
        ))),
    }
}

/// A webhook subscription in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Webhook {
    /// The bare subscription ID.
    pub id: Option<u64>,
    /// Where events are delivered.
    pub address: Option<String>,
    /// E.g. `orders/create`.
    pub topic: Option<String>,
    /// `json` or `xml`.
    pub format: Option<String>,
    /// Fields included in the payload.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Metafield namespaces included in the payload.
    #[serde(default)]
    pub metafield_namespaces: Vec<String>,
    /// API version of the payload.
    pub api_version: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const WEBHOOK: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("address", "uri"),
    Field::computed("topic", topic),
    Field::lower("format", "format"),
    Field::computed("fields", include_fields),
    Field::computed("metafield_namespaces", metafield_namespaces),
    Field::copy("api_version", "apiVersion.handle"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn topic(node: &Value) -> Value {
    node.get("topic")
        .and_then(Value::as_str)
        .map_or(Value::Null, |topic| Value::String(rest_topic(topic)))
}

fn string_list(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        _ => Value::Array(Vec::new()),
    }
}

fn include_fields(node: &Value) -> Value {
    string_list(node.get("includeFields"))
}

fn metafield_namespaces(node: &Value) -> Value {
    string_list(node.get("metafieldNamespaces"))
}

/// A webhook subscription to create or change.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WebhookInput {
    /// E.g. `orders/create`. Required on create; cannot change.
    pub topic: Option<String>,
    /// Where events are delivered.
    pub address: Option<String>,
    /// `json` or `xml`.
    pub format: Option<String>,
    /// Fields to include in the payload.
    pub fields: Vec<String>,
    /// Metafield namespaces to include in the payload.
    pub metafield_namespaces: Vec<String>,
}

impl WebhookInput {
    fn to_graphql(&self) -> InputMap {
        InputMap::new()
            .optional("uri", self.address.clone())
            .optional("format", self.format.as_deref().map(upper_enum))
            .optional("includeFields", Some(self.fields.clone()))
            .optional("metafieldNamespaces", Some(self.metafield_namespaces.clone()))
    }
}

/// Webhook subscription operations.
#[derive(Clone, Copy, Debug)]
pub struct Webhooks<'c> {
    translator: Translator<'c>,
}

impl<'c> Webhooks<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of subscriptions, optionally for one topic.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for a malformed topic.
    pub async fn list(&self, topic: Option<&str>, page: &PageParams) -> Result<Page<Webhook>, ResourceError> {
        let topics = topic.map(graphql_topic).transpose()?.map(|topic| vec![topic]);
        let variables = InputMap::new().optional("topics", topics);
        self.translator.list(&LIST, variables, page, "", WEBHOOK).await
    }

    /// Fetches one subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the subscription does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Webhook, ResourceError> {
        let (gid, raw) = global_id("WebhookSubscription", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Webhook", &raw)
            .await?;
        shape(GET.name, WEBHOOK, &node)
    }

    /// Counts subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote failure.
    pub async fn count(&self) -> Result<u64, ResourceError> {
        let payload = self.translator.run(&COUNT, InputMap::new()).await?;
        count(COUNT.name, &payload)
    }

    /// Subscribes to a topic.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when the topic is missing or
    /// malformed.
    pub async fn create(&self, input: &WebhookInput) -> Result<Webhook, ResourceError> {
        let topic = input
            .topic
            .as_deref()
            .ok_or_else(|| ResourceError::invalid_input("topic is required"))
            .and_then(graphql_topic)?;
        let payload = self
            .translator
            .run(
                &CREATE,
                InputMap::new()
                    .field("topic", topic)
                    .field("webhookSubscription", input.to_graphql()),
            )
            .await?;
        shape(CREATE.name, WEBHOOK, require(CREATE.name, &payload, "webhookSubscription")?)
    }

    /// Changes a subscription's delivery settings.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when a topic is given; topics
    /// cannot change.
    pub async fn update(&self, id: impl fmt::Display, input: &WebhookInput) -> Result<Webhook, ResourceError> {
        if input.topic.is_some() {
            return Err(ResourceError::invalid_input("a webhook's topic cannot be changed"));
        }
        let (gid, _) = global_id("WebhookSubscription", id)?;
        let payload = self
            .translator
            .run(
                &UPDATE,
                InputMap::new()
                    .field("id", gid)
                    .field("webhookSubscription", input.to_graphql()),
            )
            .await?;
        shape(UPDATE.name, WEBHOOK, require(UPDATE.name, &payload, "webhookSubscription")?)
    }

    /// Unsubscribes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ResourceError> {
        let (gid, raw) = global_id("WebhookSubscription", id)?;
        let payload = self.translator.run(&DELETE, InputMap::new().field("id", gid)).await?;
        deleted(&payload, "deletedWebhookSubscriptionId", "Webhook", &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_rest_topic() {
        assert_eq!(rest_topic("ORDERS_CREATE"), "orders/create");
        assert_eq!(rest_topic("ORDERS_PARTIALLY_FULFILLED"), "orders/partially_fulfilled");
        assert_eq!(rest_topic("INVENTORY_LEVELS_UPDATE"), "inventory_levels/update");
        assert_eq!(rest_topic("APP_UNINSTALLED"), "app/uninstalled");
        assert_eq!(rest_topic("APP_SUBSCRIPTIONS_UPDATE"), "app_subscriptions/update");
        assert_eq!(rest_topic("TENDER_TRANSACTIONS_CREATE"), "tender_transactions/create");
        assert_eq!(rest_topic("PAYMENT_TERMS_CREATE"), "payment_terms/create");
        assert_eq!(rest_topic("PAYMENT_SCHEDULES_DUE"), "payment_schedules/due");
        assert_eq!(rest_topic("COMPANY_LOCATIONS_CREATE"), "company_locations/create");
        assert_eq!(rest_topic("COMPANY_CONTACTS_DELETE"), "company_contacts/delete");
        assert_eq!(rest_topic("COMPANY_CONTACT_ROLES_ASSIGN"), "company_contact_roles/assign");
        assert_eq!(rest_topic("FULFILLMENT_HOLDS_ADDED"), "fulfillment_holds/added");
        assert_eq!(rest_topic("REVERSE_FULFILLMENT_ORDERS_DISPOSE"), "reverse_fulfillment_orders/dispose");
        assert_eq!(rest_topic("SCHEDULED_PRODUCT_LISTINGS_ADD"), "scheduled_product_listings/add");
        assert_eq!(rest_topic("CUSTOMER_ACCOUNT_SETTINGS_UPDATE"), "customer_account_settings/update");
        assert_eq!(rest_topic("AUDIT_EVENTS_ADMIN_API_ACTIVITY"), "audit_events/admin_api_activity");
        assert_eq!(rest_topic("SUBSCRIPTION_BILLING_CYCLES_SKIP"), "subscription_billing_cycles/skip");
        assert_eq!(
            rest_topic("SUBSCRIPTION_BILLING_CYCLE_EDITS_CREATE"),
            "subscription_billing_cycle_edits/create"
        );
    }

    #[test]
    fn test_graphql_topic() {
        assert_eq!(graphql_topic("orders/create").unwrap(), "ORDERS_CREATE");
        assert_eq!(graphql_topic("inventory_levels/update").unwrap(), "INVENTORY_LEVELS_UPDATE");
        assert!(matches!(graphql_topic("orders"), Err(ResourceError::InvalidInput { .. })));
        assert!(graphql_topic("/create").is_err());
    }

    #[test]
    fn test_webhook_map() {
        let node = json!({
            "id": "gid://shopify/WebhookSubscription/4759306",
            "topic": "ORDERS_CREATE",
            "uri": "https://example.org/endpoint",
            "format": "JSON",
            "includeFields": ["id", "note"],
            "metafieldNamespaces": [],
            "apiVersion": { "handle": "2025-10" }
        });
        let webhook: Webhook = serde_json::from_value(map_fields(WEBHOOK, &node)).unwrap();
        assert_eq!(webhook.id, Some(4_759_306));
        assert_eq!(webhook.topic.as_deref(), Some("orders/create"));
        assert_eq!(webhook.address.as_deref(), Some("https://example.org/endpoint"));
        assert_eq!(webhook.format.as_deref(), Some("json"));
        assert_eq!(webhook.fields, vec!["id", "note"]);
        assert_eq!(webhook.api_version.as_deref(), Some("2025-10"));
    }

    #[test]
    fn test_input_omits_empty_lists() {
        let input = WebhookInput {
            address: Some("https://example.org/endpoint".to_string()),
            format: Some("json".to_string()),
            ..Default::default()
        };
        assert_eq!(
            input.to_graphql().into_value(),
            json!({ "uri": "https://example.org/endpoint", "format": "JSON" })
        );
    }
}
