//! Location documents.

macro_rules! location_fragment {
    () => {
        r"
fragment LocationFields on Location {
  id
  name
  isActive
  createdAt
  updatedAt
  address {
    address1
    address2
    city
    province
    provinceCode
    country
    countryCode
    zip
    phone
  }
}
"
    };
}

pub const LOCATIONS: &str = concat!(
    r"
query locations($first: Int, $after: String, $last: Int, $before: String) {
  locations(first: $first, after: $after, last: $last, before: $before, includeInactive: true) {
    nodes { ...LocationFields }
    ",
    page_info!(),
    r"
  }
}
",
    location_fragment!()
);

pub const LOCATION: &str = concat!(
    r"
query location($id: ID!) {
  location(id: $id) { ...LocationFields }
}
",
    location_fragment!()
);

pub const LOCATIONS_COUNT: &str = r"
query locationsCount {
  locationsCount { count }
}
";

pub const LOCATION_INVENTORY_LEVELS: &str = concat!(
    r"
query locationInventoryLevels($id: ID!, $first: Int, $after: String, $last: Int, $before: String) {
  location(id: $id) {
    id
    inventoryLevels(first: $first, after: $after, last: $last, before: $before) {
      nodes { ...InventoryLevelFields }
      ",
    page_info!(),
    r"
    }
  }
}
",
    inventory_level_fragment!()
);
