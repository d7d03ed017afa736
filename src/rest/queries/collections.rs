//! Collection documents.

macro_rules! collection_fragment {
    () => {
        r"
fragment CollectionFields on Collection {
  id
  handle
  title
  descriptionHtml
  sortOrder
  templateSuffix
  updatedAt
  image { url altText width height }
  productsCount { count }
  ruleSet {
    appliedDisjunctively
    rules { column relation condition }
  }
}
"
    };
}

pub const COLLECTIONS: &str = concat!(
    r"
query collections($first: Int, $after: String, $last: Int, $before: String, $query: String) {
  collections(first: $first, after: $after, last: $last, before: $before, query: $query) {
    nodes { ...CollectionFields }
    ",
    page_info!(),
    r"
  }
}
",
    collection_fragment!()
);

pub const COLLECTION: &str = concat!(
    r"
query collection($id: ID!) {
  collection(id: $id) { ...CollectionFields }
}
",
    collection_fragment!()
);

pub const COLLECTION_BY_HANDLE: &str = concat!(
    r"
query collectionByHandle($handle: String!) {
  collectionByHandle(handle: $handle) { ...CollectionFields }
}
",
    collection_fragment!()
);

/// Resolves a collection's handle from its ID.
pub const COLLECTION_HANDLE: &str = r"
query collectionHandle($id: ID!) {
  collection(id: $id) { id handle }
}
";

pub const COLLECTION_PRODUCTS: &str = concat!(
    r"
query collectionProducts($handle: String!, $first: Int, $after: String, $last: Int, $before: String) {
  collectionByHandle(handle: $handle) {
    id
    products(first: $first, after: $after, last: $last, before: $before) {
      nodes { ...ProductFields }
      ",
    page_info!(),
    r"
    }
  }
}
",
    product_fragment!()
);

pub const COLLECTION_CREATE: &str = concat!(
    r"
mutation collectionCreate($input: CollectionInput!) {
  collectionCreate(input: $input) {
    collection { ...CollectionFields }
    ",
    user_errors!(),
    r"
  }
}
",
    collection_fragment!()
);

pub const COLLECTION_UPDATE: &str = concat!(
    r"
mutation collectionUpdate($input: CollectionInput!) {
  collectionUpdate(input: $input) {
    collection { ...CollectionFields }
    ",
    user_errors!(),
    r"
  }
}
",
    collection_fragment!()
);

pub const COLLECTION_DELETE: &str = concat!(
    r"
mutation collectionDelete($input: CollectionDeleteInput!) {
  collectionDelete(input: $input) {
    deletedCollectionId
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const COLLECTION_ADD_PRODUCTS: &str = concat!(
    r"
mutation collectionAddProducts($id: ID!, $productIds: [ID!]!) {
  collectionAddProducts(id: $id, productIds: $productIds) {
    collection { ...CollectionFields }
    ",
    user_errors!(),
    r"
  }
}
",
    collection_fragment!()
);
