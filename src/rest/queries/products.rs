//! Product documents.

pub const PRODUCTS: &str = concat!(
    r"
query products($first: Int, $after: String, $last: Int, $before: String, $query: String) {
  products(first: $first, after: $after, last: $last, before: $before, query: $query) {
    nodes { ...ProductFields }
    ",
    page_info!(),
    r"
  }
}
",
    product_fragment!()
);

pub const PRODUCT: &str = concat!(
    r"
query product($id: ID!) {
  product(id: $id) { ...ProductFields }
}
",
    product_fragment!()
);

pub const PRODUCTS_COUNT: &str = r"
query productsCount($query: String) {
  productsCount(query: $query, limit: null) { count }
}
";

pub const PRODUCT_CREATE: &str = concat!(
    r"
mutation productCreate($product: ProductCreateInput!, $media: [CreateMediaInput!]) {
  productCreate(product: $product, media: $media) {
    product { ...ProductFields }
    ",
    user_errors!(),
    r"
  }
}
",
    product_fragment!()
);

pub const PRODUCT_UPDATE: &str = concat!(
    r"
mutation productUpdate($product: ProductUpdateInput!, $media: [CreateMediaInput!]) {
  productUpdate(product: $product, media: $media) {
    product { ...ProductFields }
    ",
    user_errors!(),
    r"
  }
}
",
    product_fragment!()
);

pub const PRODUCT_DELETE: &str = concat!(
    r"
mutation productDelete($input: ProductDeleteInput!) {
  productDelete(input: $input) {
    deletedProductId
    ",
    user_errors!(),
    r"
  }
}
"
);

/// Adds the variants given at creation, replacing the standalone default.
pub const PRODUCT_VARIANTS_REPLACE: &str = concat!(
    r"
mutation productVariantsBulkCreate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkCreate(productId: $productId, variants: $variants, strategy: REMOVE_STANDALONE_VARIANT) {
    product { ...ProductFields }
    ",
    user_errors!(),
    r"
  }
}
",
    product_fragment!()
);
