//! Custom and smart collections.
//!
//! GraphQL has one `Collection` type; a collection is smart when it has a
//! rule set.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, from_kebab_enum, kebab_enum, map_all, upper_enum, Field, FieldMap, Literal};
use crate::rest::input::{InputMap, SearchQuery};
use crate::rest::queries::collections as queries;
use crate::rest::resources::common::{deleted, global_id, global_ids};
use crate::rest::resources::products::{Product, PRODUCT};
use crate::rest::translator::{require, shape, shape_page, Operation, Translator};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("collections", queries::COLLECTIONS, "collections");
const GET: Operation = Operation::query("collection", queries::COLLECTION, "collection");
const BY_HANDLE: Operation =
    Operation::query("collectionByHandle", queries::COLLECTION_BY_HANDLE, "collectionByHandle");
const HANDLE: Operation = Operation::query("collectionHandle", queries::COLLECTION_HANDLE, "collection");
const PRODUCTS: Operation =
    Operation::query("collectionProducts", queries::COLLECTION_PRODUCTS, "collectionByHandle");
const CREATE: Operation =
    Operation::mutation("collectionCreate", queries::COLLECTION_CREATE, "collectionCreate", "userErrors");
const UPDATE: Operation =
    Operation::mutation("collectionUpdate", queries::COLLECTION_UPDATE, "collectionUpdate", "userErrors");
const DELETE: Operation =
    Operation::mutation("collectionDelete", queries::COLLECTION_DELETE, "collectionDelete", "userErrors");
const ADD_PRODUCTS: Operation = Operation::mutation(
    "collectionAddProducts",
    queries::COLLECTION_ADD_PRODUCTS,
    "collectionAddProducts",
    "userErrors",
);

/// A smart-collection rule.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CollectionRule {
    /// The product property, e.g. `tag` or `variant_price`.
    pub column: String,
    /// The comparison, e.g. `equals` or `greater_than`.
    pub relation: String,
    /// The value compared against.
    pub condition: String,
}

/// A collection image.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CollectionImage {
    /// Image URL.
    pub src: Option<String>,
    /// Alt text.
    pub alt: Option<String>,
    /// Width in pixels.
    pub width: Option<i64>,
    /// Height in pixels.
    pub height: Option<i64>,
}

/// A collection in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Collection {
    /// The bare collection ID.
    pub id: Option<u64>,
    /// The URL handle.
    pub handle: Option<String>,
    /// The collection name.
    pub title: Option<String>,
    /// The description in HTML.
    pub body_html: Option<String>,
    /// Product ordering, e.g. `best-selling`.
    pub sort_order: Option<String>,
    /// Template suffix.
    pub template_suffix: Option<String>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Always `web`.
    pub published_scope: Option<String>,
    /// `smart` or `custom`.
    pub collection_type: Option<String>,
    /// Whether a product must match any rule instead of all of them.
    pub disjunctive: Option<bool>,
    /// Smart-collection rules.
    #[serde(default)]
    pub rules: Vec<CollectionRule>,
    /// The image.
    pub image: Option<CollectionImage>,
    /// Number of products.
    pub products_count: Option<u64>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const IMAGE: &FieldMap = &[
    Field::copy("src", "url"),
    Field::copy("alt", "altText"),
    Field::copy("width", "width"),
    Field::copy("height", "height"),
];

const COLLECTION: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("handle", "handle"),
    Field::copy("title", "title"),
    Field::copy("body_html", "descriptionHtml"),
    Field::computed("sort_order", sort_order),
    Field::copy("template_suffix", "templateSuffix"),
    Field::copy("updated_at", "updatedAt"),
    Field::constant("published_scope", Literal::Str("web")),
    Field::computed("collection_type", collection_type),
    Field::copy("disjunctive", "ruleSet.appliedDisjunctively"),
    Field::computed("rules", rules),
    Field::object("image", "image", IMAGE),
    Field::copy("products_count", "productsCount.count"),
    Field::copy("admin_graphql_api_id", "id"),
];

const RULE: &FieldMap = &[
    Field::lower("column", "column"),
    Field::lower("relation", "relation"),
    Field::copy("condition", "condition"),
];

fn sort_order(node: &Value) -> Value {
    node.get("sortOrder")
        .and_then(Value::as_str)
        .map_or(Value::Null, |order| Value::String(kebab_enum(order)))
}

fn collection_type(node: &Value) -> Value {
    let smart = node.get("ruleSet").is_some_and(|rules| !rules.is_null());
    Value::from(if smart { "smart" } else { "custom" })
}

fn rules(node: &Value) -> Value {
    Value::Array(map_all(RULE, flatten(node.get("ruleSet").and_then(|set| set.get("rules")))))
}

/// Filters for [`Collections::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionListParams {
    /// Restrict to these IDs.
    pub ids: Vec<u64>,
    /// Title.
    pub title: Option<String>,
    /// Handle.
    pub handle: Option<String>,
    /// `smart` or `custom`.
    pub collection_type: Option<String>,
    /// Restrict to collections containing this product.
    pub product_id: Option<u64>,
    /// Updated at or after.
    pub updated_at_min: Option<DateTime<Utc>>,
    /// Updated at or before.
    pub updated_at_max: Option<DateTime<Utc>>,
}

impl CollectionListParams {
    fn search(&self) -> Option<String> {
        let ids = (!self.ids.is_empty()).then(|| {
            let terms: Vec<String> = self.ids.iter().map(|id| format!("id:{id}")).collect();
            format!("({})", terms.join(" OR "))
        });
        SearchQuery::new()
            .raw(ids.as_deref())
            .term("title", self.title.as_deref())
            .term("handle", self.handle.as_deref())
            .term("collection_type", self.collection_type.as_deref())
            .term("product_id", self.product_id)
            .since("updated_at", ">=", self.updated_at_min.as_ref())
            .since("updated_at", "<=", self.updated_at_max.as_ref())
            .build()
    }
}

/// An image to set on a collection.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CollectionImageInput {
    /// Image URL.
    pub src: Option<String>,
    /// Alt text.
    pub alt: Option<String>,
}

/// REST collection fields accepted by create and update.
///
/// Giving `rules` makes a smart collection. `products` seeds a custom
/// collection on create.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CollectionInput {
    /// Collection name.
    pub title: Option<String>,
    /// Description in HTML.
    pub body_html: Option<String>,
    /// URL handle.
    pub handle: Option<String>,
    /// Product ordering, e.g. `best-selling`.
    pub sort_order: Option<String>,
    /// Template suffix.
    pub template_suffix: Option<String>,
    /// The image.
    pub image: Option<CollectionImageInput>,
    /// Smart-collection rules.
    pub rules: Vec<CollectionRule>,
    /// Whether any rule may match.
    pub disjunctive: Option<bool>,
    /// Products to add (create only).
    pub products: Vec<u64>,
}

impl CollectionInput {
    fn to_graphql(&self) -> Result<InputMap, ResourceError> {
        let image = self.image.as_ref().map(|image| {
            InputMap::new()
                .optional("src", image.src.clone())
                .optional("altText", image.alt.clone())
        });
        let rule_set = (!self.rules.is_empty()).then(|| {
            let rules: Vec<Value> = self
                .rules
                .iter()
                .map(|rule| {
                    InputMap::new()
                        .field("column", upper_enum(&rule.column))
                        .field("relation", upper_enum(&rule.relation))
                        .field("condition", rule.condition.as_str())
                        .into_value()
                })
                .collect();
            InputMap::new()
                .field("appliedDisjunctively", self.disjunctive.unwrap_or(false))
                .field("rules", rules)
        });

        Ok(InputMap::new()
            .optional("title", self.title.clone())
            .optional("descriptionHtml", self.body_html.clone())
            .optional("handle", self.handle.clone())
            .optional("sortOrder", self.sort_order.as_deref().map(from_kebab_enum))
            .optional("templateSuffix", self.template_suffix.clone())
            .optional("image", image)
            .optional("ruleSet", rule_set)
            .optional("products", Some(global_ids("Product", &self.products)?)))
    }
}

/// Collection operations.
#[derive(Clone, Copy, Debug)]
pub struct Collections<'c> {
    translator: Translator<'c>,
}

impl<'c> Collections<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of collections.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list(
        &self,
        params: &CollectionListParams,
        page: &PageParams,
    ) -> Result<Page<Collection>, ResourceError> {
        let variables = InputMap::new().optional("query", params.search());
        self.translator.list(&LIST, variables, page, "", COLLECTION).await
    }

    /// Fetches one collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the collection does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Collection, ResourceError> {
        let (gid, raw) = global_id("Collection", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Collection", &raw)
            .await?;
        shape(GET.name, COLLECTION, &node)
    }

    /// Fetches one collection by handle.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when no collection has the handle.
    pub async fn get_by_handle(&self, handle: &str) -> Result<Collection, ResourceError> {
        let node = self
            .translator
            .find(&BY_HANDLE, InputMap::new().field("handle", handle), "Collection", handle)
            .await?;
        shape(BY_HANDLE.name, COLLECTION, &node)
    }

    /// Lists one page of a collection's products.
    ///
    /// Resolves the collection's handle first.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the collection does not exist.
    pub async fn products(&self, id: impl fmt::Display, page: &PageParams) -> Result<Page<Product>, ResourceError> {
        let (gid, raw) = global_id("Collection", id)?;
        let collection = self
            .translator
            .find(&HANDLE, InputMap::new().field("id", gid), "Collection", &raw)
            .await?;
        let handle = require(HANDLE.name, &collection, "handle")?.clone();

        let variables = page.apply(InputMap::new().field("handle", handle), self.translator.page_size());
        let payload = self
            .translator
            .find(&PRODUCTS, variables, "Collection", &raw)
            .await?;
        shape_page(PRODUCTS.name, PRODUCT, require(PRODUCTS.name, &payload, "products")?)
    }

    /// Creates a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the API rejects the input.
    pub async fn create(&self, input: &CollectionInput) -> Result<Collection, ResourceError> {
        let payload = self
            .translator
            .run(&CREATE, InputMap::new().field("input", input.to_graphql()?))
            .await?;
        shape(CREATE.name, COLLECTION, require(CREATE.name, &payload, "collection")?)
    }

    /// Updates a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when `products` is given;
    /// use [`add_products`](Self::add_products) instead.
    pub async fn update(&self, id: impl fmt::Display, input: &CollectionInput) -> Result<Collection, ResourceError> {
        if !input.products.is_empty() {
            return Err(ResourceError::invalid_input(
                "products cannot be set through a collection update",
            ));
        }
        let (gid, _) = global_id("Collection", id)?;
        let payload = self
            .translator
            .run(&UPDATE, InputMap::new().field("input", input.to_graphql()?.field("id", gid)))
            .await?;
        shape(UPDATE.name, COLLECTION, require(UPDATE.name, &payload, "collection")?)
    }

    /// Deletes a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ResourceError> {
        let (gid, raw) = global_id("Collection", id)?;
        let payload = self
            .translator
            .run(&DELETE, InputMap::new().field("input", InputMap::new().field("id", gid)))
            .await?;
        deleted(&payload, "deletedCollectionId", "Collection", &raw)
    }

    /// Adds products to a custom collection (REST collects).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an empty product list.
    pub async fn add_products<I>(&self, id: impl fmt::Display, product_ids: I) -> Result<Collection, ResourceError>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let (gid, _) = global_id("Collection", id)?;
        let products = global_ids("Product", product_ids)?;
        if products.is_empty() {
            return Err(ResourceError::invalid_input("at least one product ID is required"));
        }
        let payload = self
            .translator
            .run(
                &ADD_PRODUCTS,
                InputMap::new().field("id", gid).field("productIds", products),
            )
            .await?;
        shape(ADD_PRODUCTS.name, COLLECTION, require(ADD_PRODUCTS.name, &payload, "collection")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_smart_collection_map() {
        let node = json!({
            "id": "gid://shopify/Collection/482865238",
            "handle": "smart-ipods",
            "title": "Smart iPods",
            "descriptionHtml": null,
            "sortOrder": "BEST_SELLING",
            "updatedAt": "2024-01-02T09:28:43Z",
            "image": { "url": "https://cdn.shopify.com/ipod.jpg", "altText": null, "width": 123, "height": 456 },
            "productsCount": { "count": 1 },
            "ruleSet": {
                "appliedDisjunctively": false,
                "rules": [{ "column": "TYPE", "relation": "EQUALS", "condition": "Cult Products" }]
            }
        });
        let collection: Collection = serde_json::from_value(map_fields(COLLECTION, &node)).unwrap();

        assert_eq!(collection.id, Some(482_865_238));
        assert_eq!(collection.sort_order.as_deref(), Some("best-selling"));
        assert_eq!(collection.collection_type.as_deref(), Some("smart"));
        assert_eq!(collection.disjunctive, Some(false));
        assert_eq!(
            collection.rules,
            vec![CollectionRule {
                column: "type".to_string(),
                relation: "equals".to_string(),
                condition: "Cult Products".to_string(),
            }]
        );
        assert_eq!(collection.products_count, Some(1));
        assert_eq!(collection.image.and_then(|i| i.width), Some(123));
    }

    #[test]
    fn test_custom_collection_has_no_rules() {
        let node = json!({ "id": "gid://shopify/Collection/1", "ruleSet": null });
        let collection: Collection = serde_json::from_value(map_fields(COLLECTION, &node)).unwrap();
        assert_eq!(collection.collection_type.as_deref(), Some("custom"));
        assert!(collection.rules.is_empty());
        assert!(collection.image.is_none());
    }

    #[test]
    fn test_collection_input() {
        let input = CollectionInput {
            title: Some("Macbooks".to_string()),
            sort_order: Some("price-desc".to_string()),
            rules: vec![CollectionRule {
                column: "vendor".to_string(),
                relation: "equals".to_string(),
                condition: "Apple".to_string(),
            }],
            products: vec![632_910_392],
            ..Default::default()
        };
        assert_eq!(
            input.to_graphql().unwrap().into_value(),
            json!({
                "title": "Macbooks",
                "sortOrder": "PRICE_DESC",
                "ruleSet": {
                    "appliedDisjunctively": false,
                    "rules": [{ "column": "VENDOR", "relation": "EQUALS", "condition": "Apple" }]
                },
                "products": ["gid://shopify/Product/632910392"]
            })
        );
    }

    #[test]
    fn test_list_search() {
        let params = CollectionListParams {
            ids: vec![5],
            collection_type: Some("smart".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search().as_deref(), Some("(id:5) collection_type:smart"));
    }
}
