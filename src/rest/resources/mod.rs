//! REST resource families.
//!
//! Each family is a small `Copy` handle over a borrowed [`GraphqlClient`]
//! exposing the legacy REST operations for one resource. Families are
//! independent; the [`RestShim`] facade owns the client and hands them out.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_rest_shim::{AccessToken, RestShim, ShimConfig, ShopDomain};
//! use shopify_rest_shim::rest::PageParams;
//!
//! let config = ShimConfig::builder()
//!     .shop(ShopDomain::new("my-store")?)
//!     .access_token(AccessToken::new("shpat_...")?)
//!     .build()?;
//! let shim = RestShim::new(&config);
//!
//! let zones = shim.shipping_zones().list_zones().await?;
//! let hooks = shim.webhooks().list(Some("orders/create"), &PageParams::new()).await?;
//! ```

mod charges;
mod collections;
mod common;
mod discounts;
mod fulfillment;
mod inventory;
mod locations;
mod metafields;
mod options;
mod orders;
mod products;
mod script_tags;
mod shipping;
mod shop;
mod themes;
mod variants;
mod webhooks;

pub use charges::{
    ApplicationCharge, ApplicationChargeInput, Charges, RecurringApplicationCharge, RecurringChargeInput,
    UsageCharge, UsageChargeInput,
};
pub use collections::{
    Collection, CollectionImage, CollectionImageInput, CollectionInput, CollectionListParams, CollectionRule,
    Collections,
};
pub use common::Address;
pub use discounts::{DiscountCode, PriceRule, PriceRuleInput, PriceRules};
pub use fulfillment::{
    Fulfillment, FulfillmentInput, FulfillmentLineItem, FulfillmentOrder, FulfillmentOrderLineInput,
    FulfillmentOrderLineItem, Fulfillments, LineItemsByFulfillmentOrder, TrackingInfo,
};
pub use inventory::{Inventory, InventoryItem, InventoryItemInput, InventoryLevel};
pub use locations::{Location, Locations};
pub use metafields::{Metafield, MetafieldInput, MetafieldOwner, Metafields};
pub use options::{OptionInput, OptionUpdate, Options, ProductOption};
pub use orders::{
    CancelOptions, LineItem, NoteAttribute, Order, OrderCancelJob, OrderCustomer, OrderInput, OrderListParams,
    Orders,
};
pub use products::{ImageInput, Product, ProductImage, ProductInput, ProductListParams, ProductStatus, Products};
pub use script_tags::{ScriptTag, ScriptTagInput, ScriptTags, ONLOAD};
pub use shipping::{
    CarrierShippingRateProvider, PriceBasedShippingRate, ShippingCountry, ShippingProvince, ShippingZone,
    ShippingZones, WeightBasedShippingRate,
};
pub use shop::{Shop, Shops};
pub use themes::{Asset, AssetInput, Theme, ThemeInput, Themes};
pub use variants::{Variant, VariantInput, Variants};
pub use webhooks::{graphql_topic, rest_topic, Webhook, WebhookInput, Webhooks};

use crate::clients::graphql::GraphqlClient;
use crate::config::ShimConfig;

/// Entry point to every resource family.
///
/// Owns the [`GraphqlClient`]; family handles borrow it, so they are cheap
/// to create per call.
#[derive(Debug)]
pub struct RestShim {
    client: GraphqlClient,
}

// Verify RestShim is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestShim>();
};

impl RestShim {
    /// Creates a shim for the shop in `config`.
    #[must_use]
    pub fn new(config: &ShimConfig) -> Self {
        Self {
            client: GraphqlClient::new(config),
        }
    }

    /// Wraps an existing executor.
    #[must_use]
    pub const fn from_client(client: GraphqlClient) -> Self {
        Self { client }
    }

    /// Returns the executor.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Products.
    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(&self.client)
    }

    /// Product variants.
    #[must_use]
    pub const fn variants(&self) -> Variants<'_> {
        Variants::new(&self.client)
    }

    /// Product options.
    #[must_use]
    pub const fn options(&self) -> Options<'_> {
        Options::new(&self.client)
    }

    /// Custom and smart collections.
    #[must_use]
    pub const fn collections(&self) -> Collections<'_> {
        Collections::new(&self.client)
    }

    /// Orders.
    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        Orders::new(&self.client)
    }

    /// Inventory items and levels.
    #[must_use]
    pub const fn inventory(&self) -> Inventory<'_> {
        Inventory::new(&self.client)
    }

    /// Fulfillment orders and fulfillments.
    #[must_use]
    pub const fn fulfillments(&self) -> Fulfillments<'_> {
        Fulfillments::new(&self.client)
    }

    /// Metafields on any owner.
    #[must_use]
    pub const fn metafields(&self) -> Metafields<'_> {
        Metafields::new(&self.client)
    }

    /// Webhook subscriptions.
    #[must_use]
    pub const fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(&self.client)
    }

    /// Themes and theme assets.
    #[must_use]
    pub const fn themes(&self) -> Themes<'_> {
        Themes::new(&self.client)
    }

    /// Price rules and discount codes.
    #[must_use]
    pub const fn price_rules(&self) -> PriceRules<'_> {
        PriceRules::new(&self.client)
    }

    /// Shipping zones.
    #[must_use]
    pub const fn shipping_zones(&self) -> ShippingZones<'_> {
        ShippingZones::new(&self.client)
    }

    /// Application charges.
    #[must_use]
    pub const fn charges(&self) -> Charges<'_> {
        Charges::new(&self.client)
    }

    /// The shop.
    #[must_use]
    pub const fn shop(&self) -> Shops<'_> {
        Shops::new(&self.client)
    }

    /// Locations.
    #[must_use]
    pub const fn locations(&self) -> Locations<'_> {
        Locations::new(&self.client)
    }

    /// Script tags.
    #[must_use]
    pub const fn script_tags(&self) -> ScriptTags<'_> {
        ScriptTags::new(&self.client)
    }
}
