//! App billing documents (REST application charges).

macro_rules! subscription_fragment {
    () => {
        r"
fragment SubscriptionFields on AppSubscription {
  id
  name
  status
  test
  trialDays
  createdAt
  currentPeriodEnd
  returnUrl
  lineItems {
    id
    plan {
      pricingDetails {
        __typename
        ... on AppRecurringPricing { interval price { amount currencyCode } }
        ... on AppUsagePricing { terms cappedAmount { amount currencyCode } balanceUsed { amount currencyCode } }
      }
    }
  }
}
"
    };
}

macro_rules! purchase_fields {
    () => {
        "id name status test createdAt price { amount currencyCode }"
    };
}

pub const SUBSCRIPTIONS: &str = concat!(
    r"
query appSubscriptions($first: Int, $after: String, $last: Int, $before: String) {
  currentAppInstallation {
    id
    allSubscriptions(first: $first, after: $after, last: $last, before: $before) {
      nodes { ...SubscriptionFields }
      ",
    page_info!(),
    r"
    }
  }
}
",
    subscription_fragment!()
);

pub const SUBSCRIPTION: &str = concat!(
    r"
query appSubscription($id: ID!) {
  node(id: $id) { ...SubscriptionFields }
}
",
    subscription_fragment!()
);

pub const SHOP_CURRENCY: &str = r"
query shopCurrency {
  shop { currencyCode }
}
";

pub const SUBSCRIPTION_CREATE: &str = concat!(
    r"
mutation appSubscriptionCreate(
  $name: String!
  $returnUrl: URL!
  $lineItems: [AppSubscriptionLineItemInput!]!
  $test: Boolean
  $trialDays: Int
) {
  appSubscriptionCreate(name: $name, returnUrl: $returnUrl, lineItems: $lineItems, test: $test, trialDays: $trialDays) {
    appSubscription { ...SubscriptionFields }
    confirmationUrl
    ",
    user_errors!(),
    r"
  }
}
",
    subscription_fragment!()
);

pub const SUBSCRIPTION_CANCEL: &str = concat!(
    r"
mutation appSubscriptionCancel($id: ID!) {
  appSubscriptionCancel(id: $id) {
    appSubscription { ...SubscriptionFields }
    ",
    user_errors!(),
    r"
  }
}
",
    subscription_fragment!()
);

pub const ONE_TIME_PURCHASES: &str = concat!(
    r"
query appPurchasesOneTime($first: Int, $after: String, $last: Int, $before: String) {
  currentAppInstallation {
    id
    oneTimePurchases(first: $first, after: $after, last: $last, before: $before) {
      nodes { ",
    purchase_fields!(),
    r" }
      ",
    page_info!(),
    r"
    }
  }
}
"
);

pub const ONE_TIME_CREATE: &str = concat!(
    r"
mutation appPurchaseOneTimeCreate($name: String!, $price: MoneyInput!, $returnUrl: URL!, $test: Boolean) {
  appPurchaseOneTimeCreate(name: $name, price: $price, returnUrl: $returnUrl, test: $test) {
    appPurchaseOneTime { ",
    purchase_fields!(),
    r" }
    confirmationUrl
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const USAGE_RECORD_CREATE: &str = concat!(
    r"
mutation appUsageRecordCreate($subscriptionLineItemId: ID!, $description: String!, $price: MoneyInput!) {
  appUsageRecordCreate(subscriptionLineItemId: $subscriptionLineItemId, description: $description, price: $price) {
    appUsageRecord {
      id
      description
      createdAt
      price { amount currencyCode }
    }
    ",
    user_errors!(),
    r"
  }
}
"
);
