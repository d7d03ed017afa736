//! Product options.
//!
//! REST replaces an option's whole value list on update. GraphQL needs the
//! change spelled out as values to add, rename and delete, so update reads
//! the current values first and diffs them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, map_all, Field, FieldMap};
use crate::rest::gid::strip_gid;
use crate::rest::input::InputMap;
use crate::rest::queries::options as queries;
use crate::rest::resources::common::{global_id, global_ids, node_id, with_parent};
use crate::rest::translator::{decode, require, Operation, Translator};

const LIST: Operation = Operation::query("productOptions", queries::PRODUCT_OPTIONS, "product");
const CREATE: Operation = Operation::mutation(
    "productOptionsCreate",
    queries::OPTIONS_CREATE,
    "productOptionsCreate",
    "userErrors",
);
const UPDATE: Operation = Operation::mutation(
    "productOptionUpdate",
    queries::OPTION_UPDATE,
    "productOptionUpdate",
    "userErrors",
);
const DELETE: Operation = Operation::mutation(
    "productOptionsDelete",
    queries::OPTIONS_DELETE,
    "productOptionsDelete",
    "userErrors",
);

/// A product option (e.g., "Size") and its values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProductOption {
    /// The bare option ID.
    pub id: Option<u64>,
    /// The owning product.
    pub product_id: Option<u64>,
    /// The option name.
    pub name: Option<String>,
    /// 1-based position.
    pub position: Option<i64>,
    /// Value names in display order.
    #[serde(default)]
    pub values: Vec<String>,
}

pub(crate) const OPTION: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("name", "name"),
    Field::copy("position", "position"),
    Field::computed("values", value_names),
];

fn value_names(node: &Value) -> Value {
    Value::Array(
        flatten(node.get("optionValues"))
            .into_iter()
            .filter_map(|value| value.get("name").cloned())
            .collect(),
    )
}

/// Maps `product.options` with `product_id` filled in.
pub(crate) fn product_options(product: &Value) -> Value {
    with_parent(
        map_all(OPTION, flatten(product.get("options"))),
        "product_id",
        &node_id(product),
    )
}

/// A new option.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OptionInput {
    /// The option name.
    pub name: String,
    /// 1-based position; appended when absent.
    pub position: Option<i64>,
    /// Value names.
    pub values: Vec<String>,
}

impl OptionInput {
    pub(crate) fn to_graphql(&self) -> InputMap {
        let values: Vec<Value> = self
            .values
            .iter()
            .map(|name| InputMap::new().field("name", name.as_str()).into_value())
            .collect();
        InputMap::new()
            .field("name", self.name.as_str())
            .optional("position", self.position)
            .optional("values", Some(values))
    }
}

/// Changes to an existing option.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OptionUpdate {
    /// New name.
    pub name: Option<String>,
    /// New position.
    pub position: Option<i64>,
    /// The complete new value list. `None` leaves values alone.
    pub values: Option<Vec<String>>,
}

/// Value changes needed to turn one list into another.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ValueDiff {
    pub add: Vec<String>,
    pub rename: Vec<(String, String)>,
    pub delete: Vec<String>,
}

/// Diffs `(id, name)` pairs against the desired names.
///
/// Names present on both sides are kept. Removed and added names are paired
/// in order as renames, so existing variants keep their value IDs; any
/// surplus becomes an add or a delete.
pub(crate) fn diff_values(current: &[(String, String)], desired: &[String]) -> ValueDiff {
    let removed: Vec<&String> = current
        .iter()
        .filter(|(_, name)| !desired.contains(name))
        .map(|(id, _)| id)
        .collect();
    let added: Vec<&String> = desired
        .iter()
        .filter(|name| !current.iter().any(|(_, existing)| existing == *name))
        .collect();

    let mut diff = ValueDiff::default();
    for index in 0..removed.len().max(added.len()) {
        match (removed.get(index), added.get(index)) {
            (Some(id), Some(name)) => diff.rename.push(((*id).clone(), (*name).clone())),
            (Some(id), None) => diff.delete.push((*id).clone()),
            (None, Some(name)) => diff.add.push((*name).clone()),
            (None, None) => {}
        }
    }
    diff
}

/// Product option operations.
#[derive(Clone, Copy, Debug)]
pub struct Options<'c> {
    translator: Translator<'c>,
}

impl<'c> Options<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists a product's options.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the product does not exist.
    pub async fn list(&self, product_id: impl fmt::Display) -> Result<Vec<ProductOption>, ResourceError> {
        let (gid, raw) = global_id("Product", product_id)?;
        let product = self
            .translator
            .find(&LIST, InputMap::new().field("id", gid), "Product", &raw)
            .await?;
        decode(LIST.name, product_options(&product))
    }

    /// Adds options to a product and returns all of its options.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when `inputs` is empty.
    pub async fn create(
        &self,
        product_id: impl fmt::Display,
        inputs: &[OptionInput],
    ) -> Result<Vec<ProductOption>, ResourceError> {
        if inputs.is_empty() {
            return Err(ResourceError::invalid_input("at least one option is required"));
        }
        let (gid, _) = global_id("Product", product_id)?;
        let options: Vec<Value> = inputs.iter().map(|o| o.to_graphql().into_value()).collect();

        let payload = self
            .translator
            .run(
                &CREATE,
                InputMap::new().field("productId", gid).field("options", options),
            )
            .await?;
        let product = require(CREATE.name, &payload, "product")?;
        decode(CREATE.name, product_options(product))
    }

    /// Renames, repositions or replaces the values of an option.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the product or the option
    /// does not exist.
    pub async fn update(
        &self,
        product_id: impl fmt::Display,
        option_id: impl fmt::Display,
        input: &OptionUpdate,
    ) -> Result<ProductOption, ResourceError> {
        let (product_gid, product_raw) = global_id("Product", product_id)?;
        let (option_gid, option_raw) = global_id("ProductOption", option_id)?;

        let product = self
            .translator
            .find(&LIST, InputMap::new().field("id", product_gid.as_str()), "Product", &product_raw)
            .await?;
        let current = find_option(&product, &option_gid)
            .ok_or_else(|| ResourceError::not_found("ProductOption", option_raw.as_str()))?;

        let mut variables = InputMap::new().field("productId", product_gid).field(
            "option",
            InputMap::new()
                .field("id", option_gid.as_str())
                .optional("name", input.name.clone())
                .optional("position", input.position),
        );

        if let Some(desired) = &input.values {
            let existing: Vec<(String, String)> = flatten(current.get("optionValues"))
                .into_iter()
                .filter_map(|value| {
                    Some((
                        value.get("id")?.as_str()?.to_string(),
                        value.get("name")?.as_str()?.to_string(),
                    ))
                })
                .collect();
            let diff = diff_values(&existing, desired);

            let add: Vec<Value> = diff
                .add
                .iter()
                .map(|name| InputMap::new().field("name", name.as_str()).into_value())
                .collect();
            let rename: Vec<Value> = diff
                .rename
                .iter()
                .map(|(id, name)| {
                    InputMap::new()
                        .field("id", id.as_str())
                        .field("name", name.as_str())
                        .into_value()
                })
                .collect();
            variables = variables
                .optional("optionValuesToAdd", Some(add))
                .optional("optionValuesToUpdate", Some(rename))
                .optional("optionValuesToDelete", Some(diff.delete));
        }

        let payload = self.translator.run(&UPDATE, variables).await?;
        let product = require(UPDATE.name, &payload, "product")?;
        let options: Vec<ProductOption> = decode(UPDATE.name, product_options(product))?;
        let wanted = strip_gid(&Value::from(option_gid.as_str())).as_u64();
        options
            .into_iter()
            .find(|option| option.id.is_some() && option.id == wanted)
            .ok_or_else(|| ResourceError::malformed(UPDATE.name, "updated option is missing from the product"))
    }

    /// Deletes options and returns the deleted IDs.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the remote rejects the
    /// deletion (for example, an unknown option ID).
    pub async fn delete<I>(&self, product_id: impl fmt::Display, option_ids: I) -> Result<Vec<u64>, ResourceError>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let (gid, _) = global_id("Product", product_id)?;
        let options = global_ids("ProductOption", option_ids)?;

        let payload = self
            .translator
            .run(
                &DELETE,
                InputMap::new().field("productId", gid).field("options", options),
            )
            .await?;
        let ids: Vec<Value> = flatten(Some(require(DELETE.name, &payload, "deletedOptionsIds")?))
            .into_iter()
            .map(strip_gid)
            .collect();
        decode(DELETE.name, Value::Array(ids))
    }
}

fn find_option<'v>(product: &'v Value, option_gid: &str) -> Option<&'v Value> {
    flatten(product.get("options"))
        .into_iter()
        .find(|option| option.get("id").and_then(Value::as_str) == Some(option_gid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(id, name)| ((*id).to_string(), (*name).to_string())).collect()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_diff_keeps_unchanged_values() {
        let diff = diff_values(&pairs(&[("v1", "S"), ("v2", "M")]), &names(&["S", "M"]));
        assert_eq!(diff, ValueDiff::default());
    }

    #[test]
    fn test_diff_pairs_removed_and_added_as_renames() {
        let diff = diff_values(
            &pairs(&[("v1", "S"), ("v2", "M"), ("v3", "L")]),
            &names(&["S", "Medium", "XL", "XXL"]),
        );
        assert_eq!(
            diff.rename,
            vec![("v2".to_string(), "Medium".to_string()), ("v3".to_string(), "XL".to_string())]
        );
        assert_eq!(diff.add, vec!["XXL"]);
        assert!(diff.delete.is_empty());
    }

    #[test]
    fn test_diff_deletes_surplus() {
        let diff = diff_values(&pairs(&[("v1", "S"), ("v2", "M"), ("v3", "L")]), &names(&["M"]));
        assert!(diff.rename.is_empty());
        assert_eq!(diff.delete, vec!["v1", "v3"]);
    }

    #[test]
    fn test_product_options_carry_product_id() {
        let product = json!({
            "id": "gid://shopify/Product/7",
            "options": [{
                "id": "gid://shopify/ProductOption/11",
                "name": "Size",
                "position": 1,
                "optionValues": [{ "id": "gid://shopify/ProductOptionValue/1", "name": "S" }]
            }]
        });
        let options: Vec<ProductOption> = serde_json::from_value(product_options(&product)).unwrap();
        assert_eq!(
            options,
            vec![ProductOption {
                id: Some(11),
                product_id: Some(7),
                name: Some("Size".to_string()),
                position: Some(1),
                values: vec!["S".to_string()],
            }]
        );
    }

    #[test]
    fn test_option_input_shape() {
        let input = OptionInput {
            name: "Color".to_string(),
            position: None,
            values: names(&["Red", "Blue"]),
        };
        assert_eq!(
            input.to_graphql().into_value(),
            json!({ "name": "Color", "values": [{ "name": "Red" }, { "name": "Blue" }] })
        );
    }
}
