//! Code discount documents (REST price rules).

macro_rules! discount_fragment {
    () => {
        r"
fragment DiscountFields on DiscountCodeNode {
  id
  codeDiscount {
    __typename
    ... on DiscountCodeBasic {
      title
      status
      startsAt
      endsAt
      createdAt
      updatedAt
      usageLimit
      appliesOncePerCustomer
      codes(first: 250) { nodes { id code asyncUsageCount } }
      customerSelection { __typename }
      customerGets {
        value {
          __typename
          ... on DiscountPercentage { percentage }
          ... on DiscountAmount { amount { amount currencyCode } appliesOnEachItem }
        }
        items {
          __typename
          ... on DiscountProducts {
            products(first: 250) { nodes { id } }
            productVariants(first: 250) { nodes { id } }
          }
          ... on DiscountCollections {
            collections(first: 250) { nodes { id } }
          }
        }
      }
    }
    ... on DiscountCodeFreeShipping {
      title
      status
      startsAt
      endsAt
      createdAt
      updatedAt
      usageLimit
      appliesOncePerCustomer
      codes(first: 250) { nodes { id code asyncUsageCount } }
      customerSelection { __typename }
    }
  }
}
"
    };
}

pub const DISCOUNTS: &str = concat!(
    r"
query codeDiscountNodes($first: Int, $after: String, $last: Int, $before: String, $query: String) {
  codeDiscountNodes(first: $first, after: $after, last: $last, before: $before, query: $query) {
    nodes { ...DiscountFields }
    ",
    page_info!(),
    r"
  }
}
",
    discount_fragment!()
);

pub const DISCOUNT: &str = concat!(
    r"
query codeDiscountNode($id: ID!) {
  codeDiscountNode(id: $id) { ...DiscountFields }
}
",
    discount_fragment!()
);

pub const DISCOUNT_BY_CODE: &str = concat!(
    r"
query codeDiscountNodeByCode($code: String!) {
  codeDiscountNodeByCode(code: $code) { ...DiscountFields }
}
",
    discount_fragment!()
);

/// Reads which discount type an ID refers to.
pub const DISCOUNT_KIND: &str = r"
query codeDiscountKind($id: ID!) {
  codeDiscountNode(id: $id) {
    id
    codeDiscount { __typename }
  }
}
";

pub const BASIC_CREATE: &str = concat!(
    r"
mutation discountCodeBasicCreate($basicCodeDiscount: DiscountCodeBasicInput!) {
  discountCodeBasicCreate(basicCodeDiscount: $basicCodeDiscount) {
    codeDiscountNode { ...DiscountFields }
    ",
    user_errors!(),
    r"
  }
}
",
    discount_fragment!()
);

pub const BASIC_UPDATE: &str = concat!(
    r"
mutation discountCodeBasicUpdate($id: ID!, $basicCodeDiscount: DiscountCodeBasicInput!) {
  discountCodeBasicUpdate(id: $id, basicCodeDiscount: $basicCodeDiscount) {
    codeDiscountNode { ...DiscountFields }
    ",
    user_errors!(),
    r"
  }
}
",
    discount_fragment!()
);

pub const FREE_SHIPPING_CREATE: &str = concat!(
    r"
mutation discountCodeFreeShippingCreate($freeShippingCodeDiscount: DiscountCodeFreeShippingInput!) {
  discountCodeFreeShippingCreate(freeShippingCodeDiscount: $freeShippingCodeDiscount) {
    codeDiscountNode { ...DiscountFields }
    ",
    user_errors!(),
    r"
  }
}
",
    discount_fragment!()
);

pub const FREE_SHIPPING_UPDATE: &str = concat!(
    r"
mutation discountCodeFreeShippingUpdate($id: ID!, $freeShippingCodeDiscount: DiscountCodeFreeShippingInput!) {
  discountCodeFreeShippingUpdate(id: $id, freeShippingCodeDiscount: $freeShippingCodeDiscount) {
    codeDiscountNode { ...DiscountFields }
    ",
    user_errors!(),
    r"
  }
}
",
    discount_fragment!()
);

pub const DISCOUNT_DELETE: &str = concat!(
    r"
mutation discountCodeDelete($id: ID!) {
  discountCodeDelete(id: $id) {
    deletedCodeDiscountId
    ",
    user_errors!(),
    r"
  }
}
"
);
