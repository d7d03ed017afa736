//! Cursor pagination pass-through.
//!
//! REST callers page with `limit` and `page_info`; GraphQL pages with
//! `first`/`after` or `last`/`before`. [`PageParams`] carries the REST side
//! and writes the GraphQL variables; [`Page`] hands the resulting
//! [`PageInfo`] back so the caller can ask for the next page.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::MAX_PAGE_SIZE;
use crate::rest::errors::ResourceError;
use crate::rest::input::InputMap;

/// Which way to page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// `first`/`after`.
    #[default]
    Forward,
    /// `last`/`before`.
    Backward,
}

/// Pagination request for a list operation.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::PageParams;
///
/// let first_page = PageParams::new().limit(50);
/// let next_page = PageParams::new().limit(50).after("eyJsYXN0X2lkIjo0fQ");
/// let previous_page = PageParams::new().before("eyJsYXN0X2lkIjoxfQ");
///
/// assert_eq!(first_page.effective_limit(250), 50);
/// assert_eq!(PageParams::new().limit(1000).effective_limit(250), 250);
/// # let _ = (next_page, previous_page);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageParams {
    /// Page size. `None` or `0` means the default; larger values clamp to 250.
    pub limit: Option<u32>,
    /// The cursor to continue from.
    pub cursor: Option<String>,
    /// Which way to page from the cursor.
    pub direction: Direction,
}

impl PageParams {
    /// First page with the default size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Pages forward from `cursor` (a previous page's `end_cursor`).
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self.direction = Direction::Forward;
        self
    }

    /// Pages backward from `cursor` (a previous page's `start_cursor`).
    #[must_use]
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self.direction = Direction::Backward;
        self
    }

    /// Resolves the page size against a default.
    #[must_use]
    pub fn effective_limit(&self, default: u32) -> u32 {
        match self.limit {
            None | Some(0) => default.min(MAX_PAGE_SIZE),
            Some(limit) => limit.min(MAX_PAGE_SIZE),
        }
    }

    /// Writes `first`/`after` or `last`/`before` into `variables`.
    #[must_use]
    pub fn apply(&self, variables: InputMap, default: u32) -> InputMap {
        let limit = self.effective_limit(default);
        match self.direction {
            Direction::Forward => variables
                .field("first", limit)
                .optional("after", self.cursor.clone()),
            Direction::Backward => variables
                .field("last", limit)
                .optional("before", self.cursor.clone()),
        }
    }
}

/// Cursor state of one page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Another page follows.
    #[serde(rename(deserialize = "hasNextPage"), default)]
    pub has_next_page: bool,
    /// Another page precedes.
    #[serde(rename(deserialize = "hasPreviousPage"), default)]
    pub has_previous_page: bool,
    /// Cursor of the first item.
    #[serde(rename(deserialize = "startCursor"), default)]
    pub start_cursor: Option<String>,
    /// Cursor of the last item.
    #[serde(rename(deserialize = "endCursor"), default)]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Reads and checks the `pageInfo` of a connection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if `pageInfo` is
    /// missing, or claims a next/previous page without the matching cursor.
    pub fn from_connection(operation: &'static str, connection: &Value) -> Result<Self, ResourceError> {
        let raw = connection
            .get("pageInfo")
            .ok_or_else(|| ResourceError::malformed(operation, "connection has no pageInfo"))?;

        let info: Self = serde_json::from_value(raw.clone()).map_err(|source| {
            ResourceError::MalformedResponse {
                operation,
                message: "pageInfo could not be decoded".to_string(),
                source: Some(source),
            }
        })?;

        if info.has_next_page && info.end_cursor.is_none() {
            return Err(ResourceError::malformed(
                operation,
                "hasNextPage is true but endCursor is missing",
            ));
        }
        if info.has_previous_page && info.start_cursor.is_none() {
            return Err(ResourceError::malformed(
                operation,
                "hasPreviousPage is true but startCursor is missing",
            ));
        }
        Ok(info)
    }
}

/// One page of REST records plus its cursors.
///
/// Derefs to the item slice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    page_info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub const fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Returns the cursor state.
    #[must_use]
    pub const fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    /// Returns `true` if another page follows.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.page_info.has_next_page
    }

    /// Returns params for the following page, keeping `limit`.
    #[must_use]
    pub fn next_page(&self, limit: Option<u32>) -> Option<PageParams> {
        if !self.page_info.has_next_page {
            return None;
        }
        let cursor = self.page_info.end_cursor.clone()?;
        Some(PageParams {
            limit,
            ..PageParams::new().after(cursor)
        })
    }

    /// Returns params for the preceding page, keeping `limit`.
    #[must_use]
    pub fn previous_page(&self, limit: Option<u32>) -> Option<PageParams> {
        if !self.page_info.has_previous_page {
            return None;
        }
        let cursor = self.page_info.start_cursor.clone()?;
        Some(PageParams {
            limit,
            ..PageParams::new().before(cursor)
        })
    }

    /// Consumes the page and returns its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for Page<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_limit_means_default_and_large_limits_clamp() {
        assert_eq!(PageParams::new().effective_limit(250), 250);
        assert_eq!(PageParams::new().limit(0).effective_limit(100), 100);
        assert_eq!(PageParams::new().limit(251).effective_limit(250), 250);
        assert_eq!(PageParams::new().limit(10).effective_limit(250), 10);
    }

    #[test]
    fn test_apply_writes_direction_specific_variables() {
        let forward = PageParams::new().limit(5).after("c1").apply(InputMap::new(), 250);
        assert_eq!(forward.into_value(), json!({ "first": 5, "after": "c1" }));

        let backward = PageParams::new().before("c0").apply(InputMap::new(), 50);
        assert_eq!(backward.into_value(), json!({ "last": 50, "before": "c0" }));

        let first = PageParams::new().apply(InputMap::new(), 250);
        assert_eq!(first.into_value(), json!({ "first": 250 }));
    }

    #[test]
    fn test_page_info_requires_cursor_when_more_pages() {
        let ok = PageInfo::from_connection(
            "products",
            &json!({ "pageInfo": { "hasNextPage": true, "hasPreviousPage": false, "startCursor": "a", "endCursor": "b" } }),
        )
        .unwrap();
        assert_eq!(ok.end_cursor.as_deref(), Some("b"));

        let missing = PageInfo::from_connection(
            "products",
            &json!({ "pageInfo": { "hasNextPage": true, "endCursor": null } }),
        );
        assert!(matches!(missing, Err(ResourceError::MalformedResponse { .. })));

        let absent = PageInfo::from_connection("products", &json!({ "nodes": [] }));
        assert!(matches!(absent, Err(ResourceError::MalformedResponse { .. })));
    }

    #[test]
    fn test_page_next_params() {
        let page = Page::new(
            vec![1, 2],
            PageInfo {
                has_next_page: true,
                has_previous_page: false,
                start_cursor: Some("s".to_string()),
                end_cursor: Some("e".to_string()),
            },
        );
        assert_eq!(page.len(), 2);
        let next = page.next_page(Some(2)).unwrap();
        assert_eq!(next.cursor.as_deref(), Some("e"));
        assert_eq!(next.limit, Some(2));
        assert!(page.previous_page(None).is_none());
    }

    #[test]
    fn test_page_info_serializes_snake_case() {
        let info = PageInfo {
            has_next_page: true,
            ..PageInfo::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["has_next_page"], true);
    }
}
