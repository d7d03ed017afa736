//! Product option documents.

macro_rules! option_selection {
    () => {
        "options { id name position optionValues { id name } }"
    };
}

pub const PRODUCT_OPTIONS: &str = concat!(
    r"
query productOptions($id: ID!) {
  product(id: $id) {
    id
    ",
    option_selection!(),
    r"
  }
}
"
);

pub const OPTIONS_CREATE: &str = concat!(
    r"
mutation productOptionsCreate($productId: ID!, $options: [OptionCreateInput!]!) {
  productOptionsCreate(productId: $productId, options: $options) {
    product {
      id
      ",
    option_selection!(),
    r"
    }
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const OPTION_UPDATE: &str = concat!(
    r"
mutation productOptionUpdate(
  $productId: ID!
  $option: OptionUpdateInput!
  $optionValuesToAdd: [OptionValueCreateInput!]
  $optionValuesToUpdate: [OptionValueUpdateInput!]
  $optionValuesToDelete: [ID!]
) {
  productOptionUpdate(
    productId: $productId
    option: $option
    optionValuesToAdd: $optionValuesToAdd
    optionValuesToUpdate: $optionValuesToUpdate
    optionValuesToDelete: $optionValuesToDelete
    variantStrategy: LEAVE_AS_IS
  ) {
    product {
      id
      ",
    option_selection!(),
    r"
    }
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const OPTIONS_DELETE: &str = concat!(
    r"
mutation productOptionsDelete($productId: ID!, $options: [ID!]!) {
  productOptionsDelete(productId: $productId, options: $options) {
    deletedOptionsIds
    ",
    user_errors!(),
    r"
  }
}
"
);
