//! Products.
//!
//! Images become `MediaImage` media on the GraphQL side; variants are added
//! after creation with a bulk mutation that replaces the standalone default
//! variant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, join_strings, map_fields, split_tags, Field, FieldMap, Literal};
use crate::rest::input::{InputMap, SearchQuery};
use crate::rest::queries::products as queries;
use crate::rest::resources::common::{count, deleted, global_id, node_id};
use crate::rest::resources::options::{product_options, OptionInput, ProductOption};
use crate::rest::resources::variants::{Variant, VariantInput, VARIANT};
use crate::rest::translator::{require, shape, Operation, Translator};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("products", queries::PRODUCTS, "products");
const GET: Operation = Operation::query("product", queries::PRODUCT, "product");
const COUNT: Operation = Operation::query("productsCount", queries::PRODUCTS_COUNT, "productsCount");
const CREATE: Operation = Operation::mutation("productCreate", queries::PRODUCT_CREATE, "productCreate", "userErrors");
const UPDATE: Operation = Operation::mutation("productUpdate", queries::PRODUCT_UPDATE, "productUpdate", "userErrors");
const DELETE: Operation = Operation::mutation("productDelete", queries::PRODUCT_DELETE, "productDelete", "userErrors");
const ADD_VARIANTS: Operation = Operation::mutation(
    "productVariantsBulkCreate",
    queries::PRODUCT_VARIANTS_REPLACE,
    "productVariantsBulkCreate",
    "userErrors",
);

/// Option names used when variants are given without options.
const DEFAULT_OPTION_NAMES: [&str; 3] = ["Title", "Option2", "Option3"];

/// The status of a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible to customers.
    #[default]
    Active,
    /// Hidden and archived.
    Archived,
    /// Hidden draft.
    Draft,
    /// Reachable by URL but not listed.
    Unlisted,
}

impl ProductStatus {
    /// Returns the GraphQL enum value.
    #[must_use]
    pub const fn as_graphql(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Archived => "ARCHIVED",
            Self::Draft => "DRAFT",
            Self::Unlisted => "UNLISTED",
        }
    }

    const fn as_rest(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Draft => "draft",
            Self::Unlisted => "unlisted",
        }
    }
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProductImage {
    /// The bare media ID.
    pub id: Option<u64>,
    /// The owning product.
    pub product_id: Option<u64>,
    /// 1-based position among the product's images.
    pub position: Option<i64>,
    /// Alt text.
    pub alt: Option<String>,
    /// Width in pixels.
    pub width: Option<i64>,
    /// Height in pixels.
    pub height: Option<i64>,
    /// The image URL.
    pub src: Option<String>,
    /// Variants showing this image.
    #[serde(default)]
    pub variant_ids: Vec<u64>,
    /// The namespaced media ID.
    pub admin_graphql_api_id: Option<String>,
}

/// A product in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Product {
    /// The bare product ID.
    pub id: Option<u64>,
    /// The product name.
    pub title: Option<String>,
    /// The description in HTML.
    pub body_html: Option<String>,
    /// The vendor.
    pub vendor: Option<String>,
    /// The product type.
    pub product_type: Option<String>,
    /// The URL handle.
    pub handle: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Publication time on the online store.
    pub published_at: Option<DateTime<Utc>>,
    /// Always `web`.
    pub published_scope: Option<String>,
    /// Product status.
    pub status: Option<ProductStatus>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Alternate template suffix.
    pub template_suffix: Option<String>,
    /// Variants.
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Options.
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// The first image.
    pub image: Option<ProductImage>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const IMAGE: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("alt", "alt"),
    Field::copy("width", "image.width"),
    Field::copy("height", "image.height"),
    Field::copy("src", "image.url"),
    Field::copy("admin_graphql_api_id", "id"),
];

pub(crate) const PRODUCT: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("title", "title"),
    Field::copy("body_html", "descriptionHtml"),
    Field::copy("vendor", "vendor"),
    Field::copy("product_type", "productType"),
    Field::copy("handle", "handle"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("published_at", "publishedAt"),
    Field::constant("published_scope", Literal::Str("web")),
    Field::lower("status", "status"),
    Field::computed("tags", tags),
    Field::copy("template_suffix", "templateSuffix"),
    Field::list("variants", "variants", VARIANT),
    Field::computed("options", product_options),
    Field::computed("images", images),
    Field::computed("image", first_image),
    Field::copy("admin_graphql_api_id", "id"),
];

fn tags(node: &Value) -> Value {
    join_strings(node.get("tags"))
}

/// Media that are images, numbered from 1 and tagged with the product ID.
fn images(node: &Value) -> Value {
    let product_id = node_id(node);
    Value::Array(
        flatten(node.get("media"))
            .into_iter()
            .filter(|media| media.get("image").is_some_and(|image| !image.is_null()))
            .enumerate()
            .map(|(index, media)| {
                let mut image = map_fields(IMAGE, media);
                image["position"] = Value::from(index + 1);
                image["product_id"] = product_id.clone();
                image
            })
            .collect(),
    )
}

fn first_image(node: &Value) -> Value {
    match images(node) {
        Value::Array(mut all) if !all.is_empty() => all.swap_remove(0),
        _ => Value::Null,
    }
}

/// Filters for [`Products::list`] and [`Products::count`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListParams {
    /// Restrict to these IDs.
    pub ids: Vec<u64>,
    /// Exact title.
    pub title: Option<String>,
    /// Vendor.
    pub vendor: Option<String>,
    /// Handle.
    pub handle: Option<String>,
    /// Product type.
    pub product_type: Option<String>,
    /// Status.
    pub status: Option<ProductStatus>,
    /// Restrict to a collection.
    pub collection_id: Option<u64>,
    /// `published`, `unpublished` or `any`.
    pub published_status: Option<String>,
    /// Created at or after.
    pub created_at_min: Option<DateTime<Utc>>,
    /// Created at or before.
    pub created_at_max: Option<DateTime<Utc>>,
    /// Updated at or after.
    pub updated_at_min: Option<DateTime<Utc>>,
    /// Updated at or before.
    pub updated_at_max: Option<DateTime<Utc>>,
}

impl ProductListParams {
    pub(crate) fn search(&self) -> Option<String> {
        let ids = (!self.ids.is_empty()).then(|| {
            let terms: Vec<String> = self.ids.iter().map(|id| format!("id:{id}")).collect();
            format!("({})", terms.join(" OR "))
        });
        let published = self
            .published_status
            .as_deref()
            .filter(|status| !status.eq_ignore_ascii_case("any"));

        SearchQuery::new()
            .raw(ids.as_deref())
            .term("title", self.title.as_deref())
            .term("vendor", self.vendor.as_deref())
            .term("handle", self.handle.as_deref())
            .term("product_type", self.product_type.as_deref())
            .term("status", self.status.map(ProductStatus::as_rest))
            .term("collection_id", self.collection_id)
            .term("published_status", published)
            .since("created_at", ">=", self.created_at_min.as_ref())
            .since("created_at", "<=", self.created_at_max.as_ref())
            .since("updated_at", ">=", self.updated_at_min.as_ref())
            .since("updated_at", "<=", self.updated_at_max.as_ref())
            .build()
    }
}

/// An image to attach.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ImageInput {
    /// Image URL. Images without one are skipped.
    pub src: Option<String>,
    /// Alt text; omitted when absent.
    pub alt: Option<String>,
}

/// REST product fields accepted by create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProductInput {
    /// Product name.
    pub title: Option<String>,
    /// Description in HTML.
    pub body_html: Option<String>,
    /// Vendor.
    pub vendor: Option<String>,
    /// Product type.
    pub product_type: Option<String>,
    /// URL handle.
    pub handle: Option<String>,
    /// Status.
    pub status: Option<ProductStatus>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Template suffix.
    pub template_suffix: Option<String>,
    /// Images to attach.
    pub images: Vec<ImageInput>,
    /// Options (create only).
    pub options: Vec<OptionInput>,
    /// Variants (create only).
    pub variants: Vec<VariantInput>,
}

impl ProductInput {
    fn to_graphql(&self) -> InputMap {
        InputMap::new()
            .optional("title", self.title.clone())
            .optional("descriptionHtml", self.body_html.clone())
            .optional("vendor", self.vendor.clone())
            .optional("productType", self.product_type.clone())
            .optional("handle", self.handle.clone())
            .optional("status", self.status.map(ProductStatus::as_graphql))
            .optional("tags", self.tags.as_deref().map(split_tags))
            .optional("templateSuffix", self.template_suffix.clone())
    }

    /// `CreateMediaInput` for every image that has a source.
    fn media(&self) -> Vec<Value> {
        self.images
            .iter()
            .filter_map(|image| {
                let src = image.src.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
                Some(
                    InputMap::new()
                        .field("originalSource", src)
                        .field("mediaContentType", "IMAGE")
                        .optional("alt", image.alt.clone())
                        .into_value(),
                )
            })
            .collect()
    }

    /// Option names for the variants: the given options, or defaults sized
    /// to the deepest `optionN` any variant uses.
    fn option_names(&self) -> Vec<String> {
        if !self.options.is_empty() {
            return self.options.iter().map(|option| option.name.clone()).collect();
        }
        let depth = self
            .variants
            .iter()
            .map(|v| {
                [&v.option1, &v.option2, &v.option3]
                    .iter()
                    .rposition(|o| o.is_some())
                    .map_or(0, |i| i + 1)
            })
            .max()
            .unwrap_or(0);
        DEFAULT_OPTION_NAMES[..depth].iter().map(ToString::to_string).collect()
    }

    /// `productOptions` for creation, derived from the variants when no
    /// options are given.
    fn product_options(&self, names: &[String]) -> Vec<Value> {
        if !self.options.is_empty() {
            return self.options.iter().map(|o| o.to_graphql().into_value()).collect();
        }
        names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let mut values: Vec<String> = Vec::new();
                for variant in &self.variants {
                    let value = [&variant.option1, &variant.option2, &variant.option3][index];
                    if let Some(value) = value {
                        if !values.contains(value) {
                            values.push(value.clone());
                        }
                    }
                }
                OptionInput {
                    name: name.clone(),
                    position: None,
                    values,
                }
                .to_graphql()
                .into_value()
            })
            .collect()
    }
}

/// Product operations.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_rest_shim::rest::resources::{ImageInput, ProductInput, Products};
///
/// let products = Products::new(&client);
/// let product = products
///     .create(&ProductInput {
///         title: Some("Burton Custom Freestyle 151".to_string()),
///         tags: Some("Barnes & Noble, Big Air".to_string()),
///         images: vec![ImageInput { src: Some("https://example.com/a.png".to_string()), alt: None }],
///         ..Default::default()
///     })
///     .await?;
/// println!("created {:?}", product.id);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Products<'c> {
    translator: Translator<'c>,
}

impl<'c> Products<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of products.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list(&self, params: &ProductListParams, page: &PageParams) -> Result<Page<Product>, ResourceError> {
        let variables = InputMap::new().optional("query", params.search());
        self.translator.list(&LIST, variables, page, "", PRODUCT).await
    }

    /// Fetches one product.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the product does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Product, ResourceError> {
        let (gid, raw) = global_id("Product", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Product", &raw)
            .await?;
        shape(GET.name, PRODUCT, &node)
    }

    /// Counts products matching `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote failure.
    pub async fn count(&self, params: &ProductListParams) -> Result<u64, ResourceError> {
        let payload = self
            .translator
            .run(&COUNT, InputMap::new().optional("query", params.search()))
            .await?;
        count(COUNT.name, &payload)
    }

    /// Creates a product, then its variants when any are given.
    ///
    /// Images without a `src` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an unparsable variant
    /// price, before any request is sent.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, ResourceError> {
        let names = input.option_names();
        let variants = input
            .variants
            .iter()
            .map(|variant| variant.to_graphql(&names).map(InputMap::into_value))
            .collect::<Result<Vec<_>, _>>()?;

        let product = input
            .to_graphql()
            .optional("productOptions", Some(input.product_options(&names)));
        let payload = self
            .translator
            .run(
                &CREATE,
                InputMap::new()
                    .field("product", product)
                    .optional("media", Some(input.media())),
            )
            .await?;
        let created = require(CREATE.name, &payload, "product")?;

        if variants.is_empty() {
            return shape(CREATE.name, PRODUCT, created);
        }

        let product_id = require(CREATE.name, created, "id")?.clone();
        let payload = self
            .translator
            .run(
                &ADD_VARIANTS,
                InputMap::new()
                    .field("productId", product_id)
                    .field("variants", variants),
            )
            .await?;
        shape(ADD_VARIANTS.name, PRODUCT, require(ADD_VARIANTS.name, &payload, "product")?)
    }

    /// Updates a product's own fields and attaches any new images.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when variants or options are
    /// given; those change through [`Variants`](super::Variants) and
    /// [`Options`](super::Options).
    pub async fn update(&self, id: impl fmt::Display, input: &ProductInput) -> Result<Product, ResourceError> {
        if !input.variants.is_empty() || !input.options.is_empty() {
            return Err(ResourceError::invalid_input(
                "variants and options cannot be changed through a product update",
            ));
        }
        let (gid, _) = global_id("Product", id)?;

        let payload = self
            .translator
            .run(
                &UPDATE,
                InputMap::new()
                    .field("product", input.to_graphql().field("id", gid))
                    .optional("media", Some(input.media())),
            )
            .await?;
        shape(UPDATE.name, PRODUCT, require(UPDATE.name, &payload, "product")?)
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ResourceError> {
        let (gid, raw) = global_id("Product", id)?;
        let payload = self
            .translator
            .run(
                &DELETE,
                InputMap::new().field("input", InputMap::new().field("id", gid)),
            )
            .await?;
        deleted(&payload, "deletedProductId", "Product", &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_node() -> Value {
        json!({
            "id": "gid://shopify/Product/632910392",
            "title": "IPod Nano - 8GB",
            "descriptionHtml": "<p>It's the small iPod.</p>",
            "vendor": "Apple",
            "productType": "Cult Products",
            "handle": "ipod-nano",
            "createdAt": "2024-01-02T09:28:43Z",
            "updatedAt": "2024-01-02T09:28:43Z",
            "publishedAt": null,
            "status": "ACTIVE",
            "tags": ["Emotive", "Flash Memory"],
            "templateSuffix": null,
            "options": [{
                "id": "gid://shopify/ProductOption/594680422",
                "name": "Color",
                "position": 1,
                "optionValues": [{ "id": "gid://shopify/ProductOptionValue/1", "name": "Pink" }]
            }],
            "media": { "nodes": [
                { },
                {
                    "id": "gid://shopify/MediaImage/850703190",
                    "alt": null,
                    "image": { "url": "https://cdn.shopify.com/ipod.png", "width": 123, "height": 456 }
                }
            ]},
            "variants": { "nodes": [{
                "id": "gid://shopify/ProductVariant/808950810",
                "price": "199.00",
                "product": { "id": "gid://shopify/Product/632910392" },
                "selectedOptions": [{ "name": "Color", "value": "Pink" }]
            }]}
        })
    }

    #[test]
    fn test_product_map() {
        let product: Product = serde_json::from_value(map_fields(PRODUCT, &product_node())).unwrap();

        assert_eq!(product.id, Some(632_910_392));
        assert_eq!(product.body_html.as_deref(), Some("<p>It's the small iPod.</p>"));
        assert_eq!(product.status, Some(ProductStatus::Active));
        assert_eq!(product.tags.as_deref(), Some("Emotive, Flash Memory"));
        assert_eq!(product.published_scope.as_deref(), Some("web"));
        assert_eq!(product.variants.len(), 1);
        assert_eq!(product.variants[0].option1.as_deref(), Some("Pink"));
        assert_eq!(product.options[0].product_id, Some(632_910_392));
        assert_eq!(product.images.len(), 1);
        assert_eq!(product.images[0].id, Some(850_703_190));
        assert_eq!(product.images[0].position, Some(1));
        assert_eq!(product.images[0].product_id, Some(632_910_392));
        assert_eq!(product.image.as_ref().and_then(|i| i.width), Some(123));
    }

    #[test]
    fn test_media_skips_empty_src_and_omits_missing_alt() {
        let input = ProductInput {
            images: vec![
                ImageInput {
                    src: Some("https://example.com/a.png".to_string()),
                    alt: None,
                },
                ImageInput {
                    src: Some(String::new()),
                    alt: Some("ignored".to_string()),
                },
                ImageInput {
                    src: Some("https://example.com/b.png".to_string()),
                    alt: Some("B".to_string()),
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            input.media(),
            vec![
                json!({ "originalSource": "https://example.com/a.png", "mediaContentType": "IMAGE" }),
                json!({ "originalSource": "https://example.com/b.png", "mediaContentType": "IMAGE", "alt": "B" }),
            ]
        );
    }

    #[test]
    fn test_options_derived_from_variants() {
        let input = ProductInput {
            variants: vec![
                VariantInput {
                    option1: Some("First".to_string()),
                    ..Default::default()
                },
                VariantInput {
                    option1: Some("Second".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let names = input.option_names();
        assert_eq!(names, vec!["Title"]);
        assert_eq!(
            input.product_options(&names),
            vec![json!({ "name": "Title", "values": [{ "name": "First" }, { "name": "Second" }] })]
        );
    }

    #[test]
    fn test_search_query() {
        let params = ProductListParams {
            ids: vec![1, 2],
            vendor: Some("Apple".to_string()),
            status: Some(ProductStatus::Draft),
            published_status: Some("any".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.search().as_deref(),
            Some("(id:1 OR id:2) vendor:Apple status:draft")
        );
        assert_eq!(ProductListParams::default().search(), None);
    }

    #[test]
    fn test_product_fields_omit_absent_values() {
        let input = ProductInput {
            title: Some("Hat".to_string()),
            tags: Some("a, b".to_string()),
            status: Some(ProductStatus::Draft),
            ..Default::default()
        };
        assert_eq!(
            input.to_graphql().into_value(),
            json!({ "title": "Hat", "tags": ["a", "b"], "status": "DRAFT" })
        );
    }
}
