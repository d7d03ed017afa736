//! Shipping zones, flattened from delivery profiles.
//!
//! GraphQL nests zones under profiles and location groups, and describes
//! rates as method definitions with conditions. REST sees a flat zone list
//! where each method becomes a weight-based rate, a price-based rate or a
//! carrier provider.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, lookup, money_amount};
use crate::rest::gid::strip_gid;
use crate::rest::input::InputMap;
use crate::rest::queries::shipping as queries;
use crate::rest::translator::{decode, Operation, Translator};
use crate::rest::weight::WeightUnit;

const LIST_ZONES: Operation = Operation::query("deliveryProfiles", queries::DELIVERY_ZONES, "deliveryProfiles");

/// A province within a shipping country.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ShippingProvince {
    /// Province name.
    pub name: Option<String>,
    /// Province code.
    pub code: Option<String>,
    /// The owning zone.
    pub shipping_zone_id: Option<u64>,
}

/// A country within a shipping zone.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ShippingCountry {
    /// The bare country ID.
    pub id: Option<u64>,
    /// Country name.
    pub name: Option<String>,
    /// ISO code, or `*` for the rest of the world.
    pub code: Option<String>,
    /// The owning zone.
    pub shipping_zone_id: Option<u64>,
    /// Provinces.
    #[serde(default)]
    pub provinces: Vec<ShippingProvince>,
}

/// A rate that applies within a weight range (kilograms).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeightBasedShippingRate {
    /// The bare method definition ID.
    pub id: Option<u64>,
    /// Rate name.
    pub name: Option<String>,
    /// Price.
    pub price: Option<String>,
    /// Lower bound in kilograms.
    pub weight_low: Option<f64>,
    /// Upper bound in kilograms.
    pub weight_high: Option<f64>,
    /// The owning zone.
    pub shipping_zone_id: Option<u64>,
}

/// A rate that applies within an order subtotal range.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PriceBasedShippingRate {
    /// The bare method definition ID.
    pub id: Option<u64>,
    /// Rate name.
    pub name: Option<String>,
    /// Price.
    pub price: Option<String>,
    /// Lower subtotal bound.
    pub min_order_subtotal: Option<String>,
    /// Upper subtotal bound.
    pub max_order_subtotal: Option<String>,
    /// The owning zone.
    pub shipping_zone_id: Option<u64>,
}

/// Rates calculated by a carrier service.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CarrierShippingRateProvider {
    /// The bare participant ID.
    pub id: Option<u64>,
    /// The carrier service.
    pub carrier_service_id: Option<u64>,
    /// Fixed amount added to carrier rates.
    pub flat_modifier: Option<String>,
    /// Percentage added to carrier rates.
    pub percent_modifier: Option<f64>,
    /// The owning zone.
    pub shipping_zone_id: Option<u64>,
}

/// A shipping zone in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ShippingZone {
    /// The bare zone ID.
    pub id: Option<u64>,
    /// Zone name.
    pub name: Option<String>,
    /// The delivery profile, as a global ID.
    pub profile_id: Option<String>,
    /// The location group, as a global ID.
    pub location_group_id: Option<String>,
    /// Countries in the zone.
    #[serde(default)]
    pub countries: Vec<ShippingCountry>,
    /// Weight-based rates.
    #[serde(default)]
    pub weight_based_shipping_rates: Vec<WeightBasedShippingRate>,
    /// Price-based rates.
    #[serde(default)]
    pub price_based_shipping_rates: Vec<PriceBasedShippingRate>,
    /// Carrier-calculated rates.
    #[serde(default)]
    pub carrier_shipping_rate_providers: Vec<CarrierShippingRateProvider>,
    /// The namespaced zone ID.
    pub admin_graphql_api_id: Option<String>,
}

fn id_of(node: &Value, path: &str) -> Value {
    lookup(node, path).map_or(Value::Null, strip_gid)
}

fn text(node: &Value, path: &str) -> Value {
    lookup(node, path).cloned().unwrap_or(Value::Null)
}

fn country(country: &Value, zone_id: &Value) -> Value {
    let rest_of_world = lookup(country, "code.restOfWorld").and_then(Value::as_bool) == Some(true);
    let code = if rest_of_world {
        Value::from("*")
    } else {
        text(country, "code.countryCode")
    };
    let provinces: Vec<Value> = flatten(country.get("provinces"))
        .into_iter()
        .map(|province| {
            json!({
                "name": text(province, "name"),
                "code": text(province, "code"),
                "shipping_zone_id": zone_id,
            })
        })
        .collect();
    json!({
        "id": id_of(country, "id"),
        "name": text(country, "name"),
        "code": code,
        "shipping_zone_id": zone_id,
        "provinces": provinces,
    })
}

/// Bounds read from a method's conditions.
#[derive(Default)]
struct Bounds {
    weight_low: Option<f64>,
    weight_high: Option<f64>,
    price_low: Option<Value>,
    price_high: Option<Value>,
}

impl Bounds {
    fn from_conditions(method: &Value) -> Self {
        let mut bounds = Self::default();
        for condition in flatten(method.get("methodConditions")) {
            let lower = match condition.get("operator").and_then(Value::as_str) {
                Some("GREATER_THAN_OR_EQUAL_TO") => true,
                Some("LESS_THAN_OR_EQUAL_TO") => false,
                _ => continue,
            };
            let Some(criteria) = condition.get("conditionCriteria") else {
                continue;
            };
            match condition.get("field").and_then(Value::as_str) {
                Some("TOTAL_WEIGHT") => {
                    let kilograms = kilograms(criteria);
                    if lower {
                        bounds.weight_low = kilograms;
                    } else {
                        bounds.weight_high = kilograms;
                    }
                }
                Some("TOTAL_PRICE") => {
                    let amount = Some(money_amount(criteria));
                    if lower {
                        bounds.price_low = amount;
                    } else {
                        bounds.price_high = amount;
                    }
                }
                _ => {}
            }
        }
        bounds
    }

    const fn is_weight_based(&self) -> bool {
        self.weight_low.is_some() || self.weight_high.is_some()
    }
}

fn kilograms(weight: &Value) -> Option<f64> {
    let value = weight.get("value").and_then(Value::as_f64)?;
    let unit = weight
        .get("unit")
        .and_then(Value::as_str)
        .and_then(WeightUnit::from_graphql)?;
    Some(value * unit.grams_per_unit() / 1000.0)
}

#[derive(Default)]
struct Rates {
    weight_based: Vec<Value>,
    price_based: Vec<Value>,
    carriers: Vec<Value>,
}

impl Rates {
    fn add(&mut self, method: &Value, zone_id: &Value) {
        let Some(provider) = method.get("rateProvider") else {
            return;
        };
        match provider.get("__typename").and_then(Value::as_str) {
            Some("DeliveryParticipant") => self.carriers.push(json!({
                "id": id_of(provider, "id"),
                "carrier_service_id": id_of(provider, "carrierService.id"),
                "flat_modifier": provider.get("fixedFee").map_or(Value::Null, money_amount),
                "percent_modifier": text(provider, "percentageOfRateFee"),
                "shipping_zone_id": zone_id,
            })),
            Some("DeliveryRateDefinition") => {
                let bounds = Bounds::from_conditions(method);
                let price = provider.get("price").map_or(Value::Null, money_amount);
                if bounds.is_weight_based() {
                    self.weight_based.push(json!({
                        "id": id_of(method, "id"),
                        "name": text(method, "name"),
                        "price": price,
                        "weight_low": bounds.weight_low,
                        "weight_high": bounds.weight_high,
                        "shipping_zone_id": zone_id,
                    }));
                } else {
                    self.price_based.push(json!({
                        "id": id_of(method, "id"),
                        "name": text(method, "name"),
                        "price": price,
                        "min_order_subtotal": bounds.price_low,
                        "max_order_subtotal": bounds.price_high,
                        "shipping_zone_id": zone_id,
                    }));
                }
            }
            _ => {}
        }
    }
}

/// Flattens a `deliveryProfiles` connection into REST zones.
fn zones(profiles: &Value) -> Vec<Value> {
    let mut zones = Vec::new();
    for profile in flatten(Some(profiles)) {
        for group in flatten(profile.get("profileLocationGroups")) {
            for entry in flatten(group.get("locationGroupZones")) {
                let zone = entry.get("zone").unwrap_or(&Value::Null);
                let zone_id = id_of(zone, "id");

                let countries: Vec<Value> = flatten(zone.get("countries"))
                    .into_iter()
                    .map(|c| country(c, &zone_id))
                    .collect();
                let mut rates = Rates::default();
                for method in flatten(entry.get("methodDefinitions")) {
                    rates.add(method, &zone_id);
                }

                zones.push(json!({
                    "id": zone_id,
                    "name": text(zone, "name"),
                    "profile_id": text(profile, "id"),
                    "location_group_id": text(group, "locationGroup.id"),
                    "countries": countries,
                    "weight_based_shipping_rates": rates.weight_based,
                    "price_based_shipping_rates": rates.price_based,
                    "carrier_shipping_rate_providers": rates.carriers,
                    "admin_graphql_api_id": text(zone, "id"),
                }));
            }
        }
    }
    zones
}

/// Shipping zone operations.
#[derive(Clone, Copy, Debug)]
pub struct ShippingZones<'c> {
    translator: Translator<'c>,
}

impl<'c> ShippingZones<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists every shipping zone across delivery profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list_zones(&self) -> Result<Vec<ShippingZone>, ResourceError> {
        let payload = self.translator.run(&LIST_ZONES, InputMap::new()).await?;
        decode(LIST_ZONES.name, Value::Array(zones(&payload)))
    }
}
