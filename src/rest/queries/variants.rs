//! Product variant documents.

pub const PRODUCT_VARIANTS: &str = concat!(
    r"
query productVariants($id: ID!, $first: Int, $after: String, $last: Int, $before: String) {
  product(id: $id) {
    id
    variants(first: $first, after: $after, last: $last, before: $before) {
      nodes { ...VariantFields }
      ",
    page_info!(),
    r"
    }
  }
}
",
    variant_fragment!()
);

pub const VARIANT: &str = concat!(
    r"
query productVariant($id: ID!) {
  productVariant(id: $id) { ...VariantFields }
}
",
    variant_fragment!()
);

/// Option names of a product, needed to map `option1..3`.
pub const PRODUCT_OPTION_NAMES: &str = r"
query productOptionNames($id: ID!) {
  product(id: $id) {
    id
    options { name position }
  }
}
";

/// Owning product (and its option names) of a variant.
pub const VARIANT_OWNER: &str = r"
query variantOwner($id: ID!) {
  productVariant(id: $id) {
    id
    product {
      id
      options { name position }
    }
  }
}
";

pub const VARIANTS_BULK_CREATE: &str = concat!(
    r"
mutation productVariantsBulkCreate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkCreate(productId: $productId, variants: $variants) {
    productVariants { ...VariantFields }
    ",
    user_errors!(),
    r"
  }
}
",
    variant_fragment!()
);

pub const VARIANTS_BULK_UPDATE: &str = concat!(
    r"
mutation productVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {
    productVariants { ...VariantFields }
    ",
    user_errors!(),
    r"
  }
}
",
    variant_fragment!()
);

pub const VARIANTS_BULK_DELETE: &str = concat!(
    r"
mutation productVariantsBulkDelete($productId: ID!, $variantsIds: [ID!]!) {
  productVariantsBulkDelete(productId: $productId, variantsIds: $variantsIds) {
    product { id }
    ",
    user_errors!(),
    r"
  }
}
"
);
