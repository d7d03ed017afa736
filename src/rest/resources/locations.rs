//! Locations and the inventory stocked at them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{Field, FieldMap};
use crate::rest::input::InputMap;
use crate::rest::queries::locations as queries;
use crate::rest::resources::common::{count, global_id};
use crate::rest::resources::inventory::{InventoryLevel, LEVEL};
use crate::rest::translator::{require, shape, shape_page, Operation, Translator};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("locations", queries::LOCATIONS, "locations");
const GET: Operation = Operation::query("location", queries::LOCATION, "location");
const COUNT: Operation = Operation::query("locationsCount", queries::LOCATIONS_COUNT, "locationsCount");
const INVENTORY_LEVELS: Operation =
    Operation::query("locationInventoryLevels", queries::LOCATION_INVENTORY_LEVELS, "location");

/// A location in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Location {
    /// The bare location ID.
    pub id: Option<u64>,
    /// Location name.
    pub name: Option<String>,
    /// Whether the location is active.
    pub active: Option<bool>,
    /// Street address.
    pub address1: Option<String>,
    /// Apartment, suite, etc.
    pub address2: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Province or state.
    pub province: Option<String>,
    /// Province or state code.
    pub province_code: Option<String>,
    /// Two-letter country code.
    pub country: Option<String>,
    /// Two-letter country code.
    pub country_code: Option<String>,
    /// Country name.
    pub country_name: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const LOCATION: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("name", "name"),
    Field::copy("active", "isActive"),
    Field::copy("address1", "address.address1"),
    Field::copy("address2", "address.address2"),
    Field::copy("city", "address.city"),
    Field::copy("province", "address.province"),
    Field::copy("province_code", "address.provinceCode"),
    Field::copy("country", "address.countryCode"),
    Field::copy("country_code", "address.countryCode"),
    Field::copy("country_name", "address.country"),
    Field::copy("zip", "address.zip"),
    Field::copy("phone", "address.phone"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

/// Location operations.
#[derive(Clone, Copy, Debug)]
pub struct Locations<'c> {
    translator: Translator<'c>,
}

impl<'c> Locations<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of locations, inactive ones included.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list(&self, page: &PageParams) -> Result<Page<Location>, ResourceError> {
        self.translator.list(&LIST, InputMap::new(), page, "", LOCATION).await
    }

    /// Fetches one location.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the location does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Location, ResourceError> {
        let (gid, raw) = global_id("Location", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Location", &raw)
            .await?;
        shape(GET.name, LOCATION, &node)
    }

    /// Counts locations.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn count(&self) -> Result<u64, ResourceError> {
        let payload = self.translator.run(&COUNT, InputMap::new()).await?;
        count(COUNT.name, &payload)
    }

    /// Lists one page of the inventory levels at a location.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the location does not exist.
    pub async fn list_inventory_levels(
        &self,
        location_id: impl fmt::Display,
        page: &PageParams,
    ) -> Result<Page<InventoryLevel>, ResourceError> {
        let (gid, raw) = global_id("Location", location_id)?;
        let variables = page.apply(InputMap::new().field("id", gid), self.translator.page_size());
        let location = self
            .translator
            .find(&INVENTORY_LEVELS, variables, "Location", &raw)
            .await?;
        shape_page(
            INVENTORY_LEVELS.name,
            LEVEL,
            require(INVENTORY_LEVELS.name, &location, "inventoryLevels")?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_location_map_flattens_address() {
        let node = json!({
            "id": "gid://shopify/Location/487838322",
            "name": "Fifth Avenue AppleStore",
            "isActive": true,
            "address": {
                "address1": "123 Fifth Avenue",
                "city": "New York",
                "province": "New York",
                "provinceCode": "NY",
                "country": "United States",
                "countryCode": "US",
                "zip": "10001"
            }
        });
        let location: Location = serde_json::from_value(map_fields(LOCATION, &node)).unwrap();
        assert_eq!(location.id, Some(487_838_322));
        assert_eq!(location.active, Some(true));
        assert_eq!(location.country.as_deref(), Some("US"));
        assert_eq!(location.country_name.as_deref(), Some("United States"));
        assert_eq!(location.province_code.as_deref(), Some("NY"));
        assert!(location.phone.is_none());
    }
}
