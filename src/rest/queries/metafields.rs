//! Metafield documents.

macro_rules! metafield_fragment {
    () => {
        r"
fragment MetafieldFields on Metafield {
  id
  namespace
  key
  value
  type
  description
  createdAt
  updatedAt
  ownerType
  owner { ... on Node { id } }
}
"
    };
}

pub const SHOP_METAFIELDS: &str = concat!(
    r"
query shopMetafields($namespace: String, $first: Int, $after: String, $last: Int, $before: String) {
  shop {
    id
    metafields(namespace: $namespace, first: $first, after: $after, last: $last, before: $before) {
      nodes { ...MetafieldFields }
      ",
    page_info!(),
    r"
    }
  }
}
",
    metafield_fragment!()
);

pub const OWNER_METAFIELDS: &str = concat!(
    r"
query ownerMetafields($id: ID!, $namespace: String, $first: Int, $after: String, $last: Int, $before: String) {
  node(id: $id) {
    id
    ... on HasMetafields {
      metafields(namespace: $namespace, first: $first, after: $after, last: $last, before: $before) {
        nodes { ...MetafieldFields }
        ",
    page_info!(),
    r"
      }
    }
  }
}
",
    metafield_fragment!()
);

pub const METAFIELD: &str = concat!(
    r"
query metafield($id: ID!) {
  node(id: $id) { ...MetafieldFields }
}
",
    metafield_fragment!()
);

pub const SHOP_ID: &str = r"
query shopId {
  shop { id }
}
";

pub const METAFIELDS_SET: &str = concat!(
    r"
mutation metafieldsSet($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields { ...MetafieldFields }
    userErrors { field message code }
  }
}
",
    metafield_fragment!()
);

pub const METAFIELDS_DELETE: &str = r"
mutation metafieldsDelete($metafields: [MetafieldIdentifierInput!]!) {
  metafieldsDelete(metafields: $metafields) {
    deletedMetafields { ownerId namespace key }
    userErrors { field message }
  }
}
";
