//! GraphQL documents for every resource family.
//!
//! Documents are plain `&'static str` data. Selections shared by several
//! families are GraphQL fragments, spliced in with `concat!` so that each
//! document is still a single literal.

/// `pageInfo` selection for cursor pagination.
macro_rules! page_info {
    () => {
        "pageInfo { hasNextPage hasPreviousPage startCursor endCursor }"
    };
}

/// `userErrors` selection for mutations.
macro_rules! user_errors {
    () => {
        "userErrors { field message }"
    };
}

macro_rules! variant_fragment {
    () => {
        r"
fragment VariantFields on ProductVariant {
  id
  title
  price
  compareAtPrice
  sku
  barcode
  position
  inventoryQuantity
  inventoryPolicy
  taxable
  createdAt
  updatedAt
  selectedOptions { name value }
  image { id }
  product { id }
  inventoryItem {
    id
    tracked
    requiresShipping
    measurement { weight { value unit } }
  }
}
"
    };
}

macro_rules! product_fragment {
    () => {
        concat!(
            r"
fragment ProductFields on Product {
  id
  title
  descriptionHtml
  vendor
  productType
  handle
  createdAt
  updatedAt
  publishedAt
  status
  tags
  templateSuffix
  options { id name position optionValues { id name } }
  media(first: 250) {
    nodes {
      ... on MediaImage {
        id
        alt
        image { url width height }
      }
    }
  }
  variants(first: 250) { nodes { ...VariantFields } }
}
",
            variant_fragment!()
        )
    };
}

macro_rules! address_fields {
    () => {
        "firstName lastName name company address1 address2 city province provinceCode country countryCodeV2 zip phone latitude longitude"
    };
}

macro_rules! inventory_level_fragment {
    () => {
        r#"
fragment InventoryLevelFields on InventoryLevel {
  id
  updatedAt
  item { id }
  location { id }
  quantities(names: ["available"]) { name quantity }
}
"#
    };
}

pub mod charges;
pub mod collections;
pub mod discounts;
pub mod fulfillment;
pub mod inventory;
pub mod locations;
pub mod metafields;
pub mod options;
pub mod orders;
pub mod products;
pub mod script_tags;
pub mod shipping;
pub mod shop;
pub mod themes;
pub mod variants;
pub mod webhooks;
