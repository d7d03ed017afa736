//! Fulfillment and fulfillment order documents.

macro_rules! fulfillment_fragment {
    () => {
        r"
fragment FulfillmentFields on Fulfillment {
  id
  name
  status
  displayStatus
  createdAt
  updatedAt
  order { id }
  location { id }
  trackingInfo(first: 10) { company number url }
  fulfillmentLineItems(first: 250) {
    nodes { id quantity lineItem { id } }
  }
}
"
    };
}

pub const FULFILLMENT_ORDERS: &str = r"
query fulfillmentOrders($id: ID!) {
  order(id: $id) {
    id
    fulfillmentOrders(first: 250) {
      nodes {
        id
        status
        requestStatus
        fulfillAt
        createdAt
        updatedAt
        orderId
        assignedLocation { location { id } }
        lineItems(first: 250) {
          nodes {
            id
            totalQuantity
            remainingQuantity
            lineItem { id }
            variant { id }
          }
        }
      }
    }
  }
}
";

pub const FULFILLMENTS: &str = concat!(
    r"
query fulfillments($id: ID!) {
  order(id: $id) {
    id
    fulfillments(first: 250) { ...FulfillmentFields }
  }
}
",
    fulfillment_fragment!()
);

pub const FULFILLMENT: &str = concat!(
    r"
query fulfillment($id: ID!) {
  fulfillment(id: $id) { ...FulfillmentFields }
}
",
    fulfillment_fragment!()
);

pub const FULFILLMENT_CREATE: &str = concat!(
    r"
mutation fulfillmentCreate($fulfillment: FulfillmentInput!, $message: String) {
  fulfillmentCreate(fulfillment: $fulfillment, message: $message) {
    fulfillment { ...FulfillmentFields }
    ",
    user_errors!(),
    r"
  }
}
",
    fulfillment_fragment!()
);

pub const FULFILLMENT_TRACKING_UPDATE: &str = concat!(
    r"
mutation fulfillmentTrackingInfoUpdate(
  $fulfillmentId: ID!
  $trackingInfoInput: FulfillmentTrackingInput!
  $notifyCustomer: Boolean
) {
  fulfillmentTrackingInfoUpdate(
    fulfillmentId: $fulfillmentId
    trackingInfoInput: $trackingInfoInput
    notifyCustomer: $notifyCustomer
  ) {
    fulfillment { ...FulfillmentFields }
    ",
    user_errors!(),
    r"
  }
}
",
    fulfillment_fragment!()
);

pub const FULFILLMENT_CANCEL: &str = concat!(
    r"
mutation fulfillmentCancel($id: ID!) {
  fulfillmentCancel(id: $id) {
    fulfillment { ...FulfillmentFields }
    ",
    user_errors!(),
    r"
  }
}
",
    fulfillment_fragment!()
);
