//! Product variants.
//!
//! Variant writes go through the bulk mutations, which address options by
//! name. REST addresses them by position (`option1..3`), so create and
//! update first read the owning product's option names.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, lookup, upper_enum, Field, FieldMap, Literal};
use crate::rest::input::InputMap;
use crate::rest::queries::variants as queries;
use crate::rest::resources::common::{decimal, global_id};
use crate::rest::translator::{require, shape, shape_page, Operation, Translator};
use crate::rest::weight::{rest_weight, WeightUnit};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("productVariants", queries::PRODUCT_VARIANTS, "product");
const GET: Operation = Operation::query("productVariant", queries::VARIANT, "productVariant");
const OPTION_NAMES: Operation = Operation::query("productOptionNames", queries::PRODUCT_OPTION_NAMES, "product");
const OWNER: Operation = Operation::query("variantOwner", queries::VARIANT_OWNER, "productVariant");
const CREATE: Operation = Operation::mutation(
    "productVariantsBulkCreate",
    queries::VARIANTS_BULK_CREATE,
    "productVariantsBulkCreate",
    "userErrors",
);
const UPDATE: Operation = Operation::mutation(
    "productVariantsBulkUpdate",
    queries::VARIANTS_BULK_UPDATE,
    "productVariantsBulkUpdate",
    "userErrors",
);
const DELETE: Operation = Operation::mutation(
    "productVariantsBulkDelete",
    queries::VARIANTS_BULK_DELETE,
    "productVariantsBulkDelete",
    "userErrors",
);

/// A product variant in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Variant {
    /// The bare variant ID.
    pub id: Option<u64>,
    /// The owning product.
    pub product_id: Option<u64>,
    /// The variant title (option values joined by ` / `).
    pub title: Option<String>,
    /// The price as a decimal string.
    pub price: Option<String>,
    /// The compare-at price as a decimal string.
    pub compare_at_price: Option<String>,
    /// The SKU.
    pub sku: Option<String>,
    /// The barcode.
    pub barcode: Option<String>,
    /// 1-based position among the product's variants.
    pub position: Option<i64>,
    /// `deny` or `continue`.
    pub inventory_policy: Option<String>,
    /// Total available quantity across locations.
    pub inventory_quantity: Option<i64>,
    /// `shopify` when inventory is tracked, otherwise `null`.
    pub inventory_management: Option<String>,
    /// Always `manual`.
    pub fulfillment_service: Option<String>,
    /// Whether tax is charged.
    pub taxable: Option<bool>,
    /// Whether the variant needs shipping.
    pub requires_shipping: Option<bool>,
    /// First option value.
    pub option1: Option<String>,
    /// Second option value.
    pub option2: Option<String>,
    /// Third option value.
    pub option3: Option<String>,
    /// Weight in whole grams.
    pub grams: Option<i64>,
    /// Weight in `weight_unit`.
    pub weight: Option<f64>,
    /// Unit of `weight`.
    pub weight_unit: Option<WeightUnit>,
    /// The attached image.
    pub image_id: Option<u64>,
    /// The inventory item backing this variant.
    pub inventory_item_id: Option<u64>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

pub(crate) const VARIANT: &FieldMap = &[
    Field::id("id", "id"),
    Field::id("product_id", "product.id"),
    Field::copy("title", "title"),
    Field::money("price", "price"),
    Field::money("compare_at_price", "compareAtPrice"),
    Field::copy("sku", "sku"),
    Field::copy("barcode", "barcode"),
    Field::copy("position", "position"),
    Field::lower("inventory_policy", "inventoryPolicy"),
    Field::copy("inventory_quantity", "inventoryQuantity"),
    Field::computed("inventory_management", inventory_management),
    Field::constant("fulfillment_service", Literal::Str("manual")),
    Field::copy("taxable", "taxable"),
    Field::copy("requires_shipping", "inventoryItem.requiresShipping"),
    Field::computed("option1", option1),
    Field::computed("option2", option2),
    Field::computed("option3", option3),
    Field::computed("grams", grams),
    Field::computed("weight", weight),
    Field::computed("weight_unit", weight_unit),
    Field::id("image_id", "image.id"),
    Field::id("inventory_item_id", "inventoryItem.id"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn inventory_management(node: &Value) -> Value {
    match lookup(node, "inventoryItem.tracked") {
        Some(Value::Bool(true)) => Value::from("shopify"),
        _ => Value::Null,
    }
}

fn option_value(node: &Value, index: usize) -> Value {
    flatten(node.get("selectedOptions"))
        .get(index)
        .and_then(|option| option.get("value"))
        .cloned()
        .unwrap_or(Value::Null)
}

fn option1(node: &Value) -> Value {
    option_value(node, 0)
}

fn option2(node: &Value) -> Value {
    option_value(node, 1)
}

fn option3(node: &Value) -> Value {
    option_value(node, 2)
}

fn measurement(node: &Value) -> Value {
    rest_weight(lookup(node, "inventoryItem.measurement.weight").unwrap_or(&Value::Null))
}

fn field_of(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or(Value::Null)
}

fn grams(node: &Value) -> Value {
    field_of(&measurement(node), "grams")
}

fn weight(node: &Value) -> Value {
    field_of(&measurement(node), "weight")
}

fn weight_unit(node: &Value) -> Value {
    field_of(&measurement(node), "weight_unit")
}

/// REST variant fields accepted by create and update.
///
/// Only the fields that are set are sent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct VariantInput {
    /// First option value.
    pub option1: Option<String>,
    /// Second option value.
    pub option2: Option<String>,
    /// Third option value.
    pub option3: Option<String>,
    /// Price as a decimal string.
    pub price: Option<String>,
    /// Compare-at price as a decimal string.
    pub compare_at_price: Option<String>,
    /// SKU.
    pub sku: Option<String>,
    /// Barcode.
    pub barcode: Option<String>,
    /// Whether tax is charged.
    pub taxable: Option<bool>,
    /// `deny` or `continue`.
    pub inventory_policy: Option<String>,
    /// `shopify` turns on tracking; any other value turns it off.
    pub inventory_management: Option<String>,
    /// Whether the variant needs shipping.
    pub requires_shipping: Option<bool>,
    /// Weight in `weight_unit`.
    pub weight: Option<f64>,
    /// Unit of `weight`. Required when `weight` is set.
    pub weight_unit: Option<WeightUnit>,
    /// Weight in grams, used when `weight` is not set.
    pub grams: Option<i64>,
}

impl VariantInput {
    /// Builds a `ProductVariantsBulkInput`, mapping `option1..3` onto
    /// `option_names` by position.
    pub(crate) fn to_graphql(&self, option_names: &[String]) -> Result<InputMap, ResourceError> {
        let price = self.price.as_deref().map(|p| decimal("price", p)).transpose()?;
        let compare_at_price = self
            .compare_at_price
            .as_deref()
            .map(|p| decimal("compare_at_price", p))
            .transpose()?;

        let mut option_values = Vec::new();
        for (index, value) in [&self.option1, &self.option2, &self.option3].into_iter().enumerate() {
            let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else {
                continue;
            };
            let name = option_names.get(index).ok_or_else(|| {
                ResourceError::invalid_input(format!(
                    "option{} is set but the product has only {} option(s)",
                    index + 1,
                    option_names.len()
                ))
            })?;
            option_values.push(
                InputMap::new()
                    .field("optionName", name.as_str())
                    .field("name", value)
                    .into_value(),
            );
        }

        let inventory_item = InputMap::new()
            .optional("sku", self.sku.clone())
            .optional(
                "tracked",
                self.inventory_management
                    .as_deref()
                    .map(|m| m.eq_ignore_ascii_case("shopify")),
            )
            .optional("requiresShipping", self.requires_shipping)
            .nested("measurement", self.measurement()?);

        Ok(InputMap::new()
            .optional("price", price)
            .optional("compareAtPrice", compare_at_price)
            .optional("barcode", self.barcode.clone())
            .optional("taxable", self.taxable)
            .optional("inventoryPolicy", self.inventory_policy.as_deref().map(upper_enum))
            .optional("optionValues", Some(option_values))
            .nested("inventoryItem", inventory_item))
    }

    fn measurement(&self) -> Result<InputMap, ResourceError> {
        let weight = match (self.weight, self.weight_unit, self.grams) {
            (Some(value), Some(unit), _) => Some((value, unit)),
            (Some(_), None, _) => {
                return Err(ResourceError::invalid_input("weight_unit is required when weight is set"));
            }
            #[allow(clippy::cast_precision_loss)]
            (None, _, Some(grams)) => Some((grams as f64, WeightUnit::Grams)),
            (None, _, None) => None,
        };

        Ok(match weight {
            Some((value, unit)) => InputMap::new().field(
                "weight",
                InputMap::new().field("value", value).field("unit", unit.as_graphql()),
            ),
            None => InputMap::new(),
        })
    }
}

/// Names of a product's options ordered by position.
pub(crate) fn option_names(product: &Value) -> Vec<String> {
    let mut options: Vec<(i64, String)> = flatten(product.get("options"))
        .into_iter()
        .filter_map(|option| {
            let name = option.get("name")?.as_str()?.to_string();
            let position = option.get("position").and_then(Value::as_i64).unwrap_or(i64::MAX);
            Some((position, name))
        })
        .collect();
    options.sort_by_key(|(position, _)| *position);
    options.into_iter().map(|(_, name)| name).collect()
}

/// Variant operations.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_rest_shim::rest::resources::{Variants, VariantInput};
///
/// let variants = Variants::new(&client);
/// let variant = variants
///     .create(632_910_392, &VariantInput {
///         option1: Some("Yellow".to_string()),
///         price: Some("1.00".to_string()),
///         ..Default::default()
///     })
///     .await?;
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Variants<'c> {
    translator: Translator<'c>,
}

impl<'c> Variants<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of a product's variants.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the product does not exist.
    pub async fn list(&self, product_id: impl fmt::Display, page: &PageParams) -> Result<Page<Variant>, ResourceError> {
        let (gid, raw) = global_id("Product", product_id)?;
        let variables = page.apply(InputMap::new().field("id", gid), self.translator.page_size());
        let product = self.translator.find(&LIST, variables, "Product", &raw).await?;
        shape_page(LIST.name, VARIANT, require(LIST.name, &product, "variants")?)
    }

    /// Fetches one variant.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the variant does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Variant, ResourceError> {
        let (gid, raw) = global_id("ProductVariant", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Variant", &raw)
            .await?;
        shape(GET.name, VARIANT, &node)
    }

    /// Adds a variant to a product.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for unparsable prices or an
    /// option value without a matching product option, and
    /// [`ResourceError::NotFound`] when the product does not exist.
    pub async fn create(&self, product_id: impl fmt::Display, input: &VariantInput) -> Result<Variant, ResourceError> {
        let (gid, raw) = global_id("Product", product_id)?;
        let product = self
            .translator
            .find(&OPTION_NAMES, InputMap::new().field("id", gid.as_str()), "Product", &raw)
            .await?;
        let variant = input.to_graphql(&option_names(&product))?;

        let payload = self
            .translator
            .run(
                &CREATE,
                InputMap::new()
                    .field("productId", gid)
                    .field("variants", vec![variant.into_value()]),
            )
            .await?;
        first_variant(CREATE.name, &payload)
    }

    /// Updates a variant.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn update(&self, id: impl fmt::Display, input: &VariantInput) -> Result<Variant, ResourceError> {
        let (gid, raw) = global_id("ProductVariant", id)?;
        let owner = self
            .translator
            .find(&OWNER, InputMap::new().field("id", gid.as_str()), "Variant", &raw)
            .await?;
        let product = require(OWNER.name, &owner, "product")?;
        let product_id = require(OWNER.name, product, "id")?.clone();
        let variant = input
            .to_graphql(&option_names(product))?
            .field("id", gid);

        let payload = self
            .translator
            .run(
                &UPDATE,
                InputMap::new()
                    .field("productId", product_id)
                    .field("variants", vec![variant.into_value()]),
            )
            .await?;
        first_variant(UPDATE.name, &payload)
    }

    /// Deletes a variant.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the variant does not exist.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ResourceError> {
        let (gid, raw) = global_id("ProductVariant", id)?;
        let owner = self
            .translator
            .find(&OWNER, InputMap::new().field("id", gid.as_str()), "Variant", &raw)
            .await?;
        let product_id = require(OWNER.name, &owner, "product.id")?.clone();

        self.translator
            .run(
                &DELETE,
                InputMap::new()
                    .field("productId", product_id)
                    .field("variantsIds", vec![gid]),
            )
            .await?;
        Ok(())
    }
}

fn first_variant(operation: &'static str, payload: &Value) -> Result<Variant, ResourceError> {
    let variants = require(operation, payload, "productVariants")?;
    let node = flatten(Some(variants))
        .into_iter()
        .next()
        .ok_or_else(|| ResourceError::malformed(operation, "no variant was returned"))?;
    shape(operation, VARIANT, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    fn variant_node() -> Value {
        json!({
            "id": "gid://shopify/ProductVariant/808950810",
            "title": "Pink",
            "price": "199.00",
            "compareAtPrice": null,
            "sku": "IPOD2008PINK",
            "position": 1,
            "inventoryQuantity": 10,
            "inventoryPolicy": "CONTINUE",
            "taxable": true,
            "createdAt": "2024-01-02T09:28:43Z",
            "selectedOptions": [{ "name": "Color", "value": "Pink" }],
            "image": null,
            "product": { "id": "gid://shopify/Product/632910392" },
            "inventoryItem": {
                "id": "gid://shopify/InventoryItem/808950810",
                "tracked": true,
                "requiresShipping": true,
                "measurement": { "weight": { "value": 1.25, "unit": "POUNDS" } }
            }
        })
    }

    #[test]
    fn test_variant_map() {
        let variant: Variant = serde_json::from_value(map_fields(VARIANT, &variant_node())).unwrap();

        assert_eq!(variant.id, Some(808_950_810));
        assert_eq!(variant.product_id, Some(632_910_392));
        assert_eq!(variant.price.as_deref(), Some("199.00"));
        assert_eq!(variant.compare_at_price, None);
        assert_eq!(variant.inventory_policy.as_deref(), Some("continue"));
        assert_eq!(variant.inventory_management.as_deref(), Some("shopify"));
        assert_eq!(variant.fulfillment_service.as_deref(), Some("manual"));
        assert_eq!(variant.option1.as_deref(), Some("Pink"));
        assert_eq!(variant.option2, None);
        assert_eq!(variant.grams, Some(567));
        assert_eq!(variant.weight, Some(1.25));
        assert_eq!(variant.weight_unit, Some(WeightUnit::Pounds));
        assert_eq!(variant.inventory_item_id, Some(808_950_810));
        assert_eq!(
            variant.admin_graphql_api_id.as_deref(),
            Some("gid://shopify/ProductVariant/808950810")
        );
    }

    #[test]
    fn test_untracked_variant_has_null_management() {
        let mut node = variant_node();
        node["inventoryItem"]["tracked"] = json!(false);
        let mapped = map_fields(VARIANT, &node);
        assert_eq!(mapped["inventory_management"], Value::Null);
    }

    #[test]
    fn test_input_maps_options_by_position() {
        let input = VariantInput {
            option1: Some("Blue".to_string()),
            option2: Some("Large".to_string()),
            price: Some("12.50".to_string()),
            inventory_policy: Some("deny".to_string()),
            inventory_management: Some("shopify".to_string()),
            weight: Some(2.0),
            weight_unit: Some(WeightUnit::Kilograms),
            ..Default::default()
        };
        let names = vec!["Color".to_string(), "Size".to_string()];

        assert_eq!(
            input.to_graphql(&names).unwrap().into_value(),
            json!({
                "price": "12.50",
                "inventoryPolicy": "DENY",
                "optionValues": [
                    { "optionName": "Color", "name": "Blue" },
                    { "optionName": "Size", "name": "Large" }
                ],
                "inventoryItem": {
                    "tracked": true,
                    "measurement": { "weight": { "value": 2.0, "unit": "KILOGRAMS" } }
                }
            })
        );
    }

    #[test]
    fn test_input_rejects_bad_price_and_orphan_option() {
        let bad_price = VariantInput {
            price: Some("ten".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_price.to_graphql(&[]),
            Err(ResourceError::InvalidInput { .. })
        ));

        let orphan = VariantInput {
            option2: Some("Large".to_string()),
            ..Default::default()
        };
        assert!(orphan.to_graphql(&["Color".to_string()]).is_err());

        let unitless = VariantInput {
            weight: Some(1.0),
            ..Default::default()
        };
        assert!(unitless.to_graphql(&[]).is_err());
    }

    #[test]
    fn test_grams_only_becomes_gram_weight() {
        let input = VariantInput {
            grams: Some(300),
            ..Default::default()
        };
        assert_eq!(
            input.to_graphql(&[]).unwrap().into_value(),
            json!({ "inventoryItem": { "measurement": { "weight": { "value": 300.0, "unit": "GRAMS" } } } })
        );
    }

    #[test]
    fn test_option_names_sorted_by_position() {
        let product = json!({ "options": [
            { "name": "Size", "position": 2 },
            { "name": "Color", "position": 1 }
        ]});
        assert_eq!(option_names(&product), vec!["Color", "Size"]);
    }
}
