//! The shop record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{Field, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::queries::shop as queries;
use crate::rest::translator::{require, shape, Operation, Translator};
use crate::rest::weight::WeightUnit;

const GET: Operation = Operation::query("shop", queries::SHOP, "shop");

/// The shop in REST form. Address fields are the billing address.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Shop {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub customer_email: Option<String>,
    pub domain: Option<String>,
    pub myshopify_domain: Option<String>,
    pub shop_owner: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    pub enabled_presentment_currencies: Vec<String>,
    pub money_format: Option<String>,
    pub money_with_currency_format: Option<String>,
    pub iana_timezone: Option<String>,
    pub timezone: Option<String>,
    pub weight_unit: Option<WeightUnit>,
    pub taxes_included: Option<bool>,
    pub tax_shipping: Option<bool>,
    pub plan_name: Option<String>,
    pub plan_display_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub province_code: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub admin_graphql_api_id: Option<String>,
}

const SHOP: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("name", "name"),
    Field::copy("email", "email"),
    Field::copy("customer_email", "contactEmail"),
    Field::copy("domain", "primaryDomain.host"),
    Field::copy("myshopify_domain", "myshopifyDomain"),
    Field::copy("shop_owner", "shopOwnerName"),
    Field::copy("currency", "currencyCode"),
    Field::computed("enabled_presentment_currencies", presentment_currencies),
    Field::copy("money_format", "currencyFormats.moneyFormat"),
    Field::copy("money_with_currency_format", "currencyFormats.moneyWithCurrencyFormat"),
    Field::copy("iana_timezone", "ianaTimezone"),
    Field::copy("timezone", "timezoneAbbreviation"),
    Field::computed("weight_unit", weight_unit),
    Field::copy("taxes_included", "taxesIncluded"),
    Field::copy("tax_shipping", "taxShipping"),
    Field::computed("plan_name", plan_name),
    Field::copy("plan_display_name", "plan.displayName"),
    Field::copy("address1", "billingAddress.address1"),
    Field::copy("address2", "billingAddress.address2"),
    Field::copy("city", "billingAddress.city"),
    Field::copy("province", "billingAddress.province"),
    Field::copy("province_code", "billingAddress.provinceCode"),
    Field::copy("country", "billingAddress.countryCodeV2"),
    Field::copy("country_code", "billingAddress.countryCodeV2"),
    Field::copy("country_name", "billingAddress.country"),
    Field::copy("zip", "billingAddress.zip"),
    Field::copy("phone", "billingAddress.phone"),
    Field::copy("latitude", "billingAddress.latitude"),
    Field::copy("longitude", "billingAddress.longitude"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn weight_unit(node: &Value) -> Value {
    node.get("weightUnit")
        .and_then(Value::as_str)
        .and_then(WeightUnit::from_graphql)
        .map_or(Value::Null, |unit| Value::from(unit.as_rest()))
}

fn presentment_currencies(node: &Value) -> Value {
    match node.get("enabledPresentmentCurrencies") {
        Some(Value::Array(codes)) => Value::Array(codes.clone()),
        _ => Value::Array(Vec::new()),
    }
}

// REST plan names are the snake_case form of the display name.
fn plan_name(node: &Value) -> Value {
    let plan = node.get("plan");
    if plan.and_then(|p| p.get("partnerDevelopment")).and_then(Value::as_bool) == Some(true) {
        return Value::from("affiliate");
    }
    if plan.and_then(|p| p.get("shopifyPlus")).and_then(Value::as_bool) == Some(true) {
        return Value::from("shopify_plus");
    }
    plan.and_then(|p| p.get("displayName"))
        .and_then(Value::as_str)
        .map_or(Value::Null, |name| {
            Value::from(name.trim().to_lowercase().replace([' ', '-'], "_"))
        })
}

/// Shop operations.
#[derive(Clone, Copy, Debug)]
pub struct Shops<'c> {
    translator: Translator<'c>,
}

impl<'c> Shops<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Fetches the current shop.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn get(&self) -> Result<Shop, ResourceError> {
        let payload = self.translator.run(&GET, InputMap::new()).await?;
        shape(GET.name, SHOP, require(GET.name, &payload, "")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_shop_map() {
        let node = json!({
            "id": "gid://shopify/Shop/548380009",
            "name": "John Smith Test Store",
            "contactEmail": "j.smith@example.com",
            "primaryDomain": { "host": "shop.apple.com" },
            "myshopifyDomain": "jsmith.myshopify.com",
            "currencyCode": "USD",
            "enabledPresentmentCurrencies": ["USD", "CAD"],
            "weightUnit": "POUNDS",
            "plan": { "displayName": "Basic Shopify", "partnerDevelopment": false, "shopifyPlus": false },
            "currencyFormats": { "moneyFormat": "${{amount}}" },
            "billingAddress": { "address1": "1 Infinite Loop", "country": "United States", "countryCodeV2": "US" }
        });
        let shop: Shop = serde_json::from_value(map_fields(SHOP, &node)).unwrap();
        assert_eq!(shop.id, Some(548_380_009));
        assert_eq!(shop.customer_email.as_deref(), Some("j.smith@example.com"));
        assert_eq!(shop.domain.as_deref(), Some("shop.apple.com"));
        assert_eq!(shop.weight_unit, Some(WeightUnit::Pounds));
        assert_eq!(shop.plan_name.as_deref(), Some("basic_shopify"));
        assert_eq!(shop.country.as_deref(), Some("US"));
        assert_eq!(shop.country_name.as_deref(), Some("United States"));
        assert_eq!(shop.enabled_presentment_currencies, vec!["USD", "CAD"]);
        assert_eq!(shop.money_format.as_deref(), Some("${{amount}}"));
    }

    #[test]
    fn test_plan_name_flags() {
        assert_eq!(plan_name(&json!({ "plan": { "partnerDevelopment": true } })), json!("affiliate"));
        assert_eq!(
            plan_name(&json!({ "plan": { "shopifyPlus": true, "displayName": "Shopify Plus" } })),
            json!("shopify_plus")
        );
        assert_eq!(plan_name(&json!({})), Value::Null);
        assert_eq!(presentment_currencies(&json!({})), json!([]));
    }
}
