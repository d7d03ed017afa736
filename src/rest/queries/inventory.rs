//! Inventory item and level documents.

macro_rules! inventory_item_fragment {
    () => {
        r"
fragment InventoryItemFields on InventoryItem {
  id
  sku
  tracked
  requiresShipping
  countryCodeOfOrigin
  provinceCodeOfOrigin
  harmonizedSystemCode
  createdAt
  updatedAt
  unitCost { amount currencyCode }
}
"
    };
}

pub const INVENTORY_ITEM: &str = concat!(
    r"
query inventoryItem($id: ID!) {
  inventoryItem(id: $id) { ...InventoryItemFields }
}
",
    inventory_item_fragment!()
);

pub const INVENTORY_ITEMS: &str = concat!(
    r"
query inventoryItems($ids: [ID!]!) {
  nodes(ids: $ids) { ...InventoryItemFields }
}
",
    inventory_item_fragment!()
);

pub const INVENTORY_ITEM_UPDATE: &str = concat!(
    r"
mutation inventoryItemUpdate($id: ID!, $input: InventoryItemInput!) {
  inventoryItemUpdate(id: $id, input: $input) {
    inventoryItem { ...InventoryItemFields }
    ",
    user_errors!(),
    r"
  }
}
",
    inventory_item_fragment!()
);

pub const INVENTORY_LEVELS: &str = concat!(
    r"
query inventoryLevels($id: ID!, $first: Int, $after: String, $last: Int, $before: String) {
  inventoryItem(id: $id) {
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

macro_rules! adjustment_changes {
    () => {
        "inventoryAdjustmentGroup { createdAt changes { name delta quantityAfterChange item { id } location { id } } }"
    };
}

pub const INVENTORY_ADJUST: &str = concat!(
    r"
mutation inventoryAdjustQuantities($input: InventoryAdjustQuantitiesInput!) {
  inventoryAdjustQuantities(input: $input) {
    ",
    adjustment_changes!(),
    r"
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const INVENTORY_SET: &str = concat!(
    r"
mutation inventorySetQuantities($input: InventorySetQuantitiesInput!) {
  inventorySetQuantities(input: $input) {
    ",
    adjustment_changes!(),
    r"
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const INVENTORY_ACTIVATE: &str = concat!(
    r"
mutation inventoryActivate($inventoryItemId: ID!, $locationId: ID!) {
  inventoryActivate(inventoryItemId: $inventoryItemId, locationId: $locationId) {
    inventoryLevel { ...InventoryLevelFields }
    ",
    user_errors!(),
    r"
  }
}
",
    inventory_level_fragment!()
);
