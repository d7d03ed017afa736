//! Order documents.

macro_rules! order_fragment {
    () => {
        concat!(
            r"
fragment OrderFields on Order {
  id
  name
  email
  phone
  note
  tags
  confirmed
  test
  taxesIncluded
  closed
  currencyCode
  presentmentCurrencyCode
  displayFinancialStatus
  displayFulfillmentStatus
  cancelReason
  cancelledAt
  closedAt
  processedAt
  createdAt
  updatedAt
  totalPriceSet { shopMoney { amount currencyCode } }
  subtotalPriceSet { shopMoney { amount currencyCode } }
  totalTaxSet { shopMoney { amount currencyCode } }
  totalDiscountsSet { shopMoney { amount currencyCode } }
  totalShippingPriceSet { shopMoney { amount currencyCode } }
  customer { id email firstName lastName phone }
  billingAddress { ",
            address_fields!(),
            r" }
  shippingAddress { ",
            address_fields!(),
            r" }
  lineItems(first: 250) {
    nodes {
      id
      title
      name
      quantity
      sku
      vendor
      requiresShipping
      taxable
      unfulfilledQuantity
      originalUnitPriceSet { shopMoney { amount currencyCode } }
      variant { id }
      product { id }
    }
  }
}
"
        )
    };
}

pub const ORDERS: &str = concat!(
    r"
query orders($first: Int, $after: String, $last: Int, $before: String, $query: String) {
  orders(first: $first, after: $after, last: $last, before: $before, query: $query) {
    nodes { ...OrderFields }
    ",
    page_info!(),
    r"
  }
}
",
    order_fragment!()
);

pub const ORDER: &str = concat!(
    r"
query order($id: ID!) {
  order(id: $id) { ...OrderFields }
}
",
    order_fragment!()
);

pub const ORDERS_COUNT: &str = r"
query ordersCount($query: String) {
  ordersCount(query: $query, limit: null) { count }
}
";

pub const ORDER_UPDATE: &str = concat!(
    r"
mutation orderUpdate($input: OrderInput!) {
  orderUpdate(input: $input) {
    order { ...OrderFields }
    ",
    user_errors!(),
    r"
  }
}
",
    order_fragment!()
);

pub const ORDER_CANCEL: &str = r"
mutation orderCancel(
  $orderId: ID!
  $reason: OrderCancelReason!
  $refund: Boolean!
  $restock: Boolean!
  $notifyCustomer: Boolean
  $staffNote: String
) {
  orderCancel(
    orderId: $orderId
    reason: $reason
    refund: $refund
    restock: $restock
    notifyCustomer: $notifyCustomer
    staffNote: $staffNote
  ) {
    job { id done }
    orderCancelUserErrors { field message code }
  }
}
";

pub const ORDER_CLOSE: &str = concat!(
    r"
mutation orderClose($input: OrderCloseInput!) {
  orderClose(input: $input) {
    order { ...OrderFields }
    ",
    user_errors!(),
    r"
  }
}
",
    order_fragment!()
);

pub const ORDER_OPEN: &str = concat!(
    r"
mutation orderOpen($input: OrderOpenInput!) {
  orderOpen(input: $input) {
    order { ...OrderFields }
    ",
    user_errors!(),
    r"
  }
}
",
    order_fragment!()
);
