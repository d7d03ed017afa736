//! Webhook subscription documents.

macro_rules! webhook_fragment {
    () => {
        r"
fragment WebhookFields on WebhookSubscription {
  id
  topic
  uri
  format
  includeFields
  metafieldNamespaces
  createdAt
  updatedAt
  apiVersion { handle }
}
"
    };
}

pub const WEBHOOKS: &str = concat!(
    r"
query webhookSubscriptions($topics: [WebhookSubscriptionTopic!], $first: Int, $after: String, $last: Int, $before: String) {
  webhookSubscriptions(topics: $topics, first: $first, after: $after, last: $last, before: $before) {
    nodes { ...WebhookFields }
    ",
    page_info!(),
    r"
  }
}
",
    webhook_fragment!()
);

pub const WEBHOOK: &str = concat!(
    r"
query webhookSubscription($id: ID!) {
  webhookSubscription(id: $id) { ...WebhookFields }
}
",
    webhook_fragment!()
);

pub const WEBHOOKS_COUNT: &str = r"
query webhookSubscriptionsCount {
  webhookSubscriptionsCount(limit: null) { count }
}
";

pub const WEBHOOK_CREATE: &str = concat!(
    r"
mutation webhookSubscriptionCreate($topic: WebhookSubscriptionTopic!, $webhookSubscription: WebhookSubscriptionInput!) {
  webhookSubscriptionCreate(topic: $topic, webhookSubscription: $webhookSubscription) {
    webhookSubscription { ...WebhookFields }
    ",
    user_errors!(),
    r"
  }
}
",
    webhook_fragment!()
);

pub const WEBHOOK_UPDATE: &str = concat!(
    r"
mutation webhookSubscriptionUpdate($id: ID!, $webhookSubscription: WebhookSubscriptionInput!) {
  webhookSubscriptionUpdate(id: $id, webhookSubscription: $webhookSubscription) {
    webhookSubscription { ...WebhookFields }
    ",
    user_errors!(),
    r"
  }
}
",
    webhook_fragment!()
);

pub const WEBHOOK_DELETE: &str = concat!(
    r"
mutation webhookSubscriptionDelete($id: ID!) {
  webhookSubscriptionDelete(id: $id) {
    deletedWebhookSubscriptionId
    ",
    user_errors!(),
    r"
  }
}
"
);
