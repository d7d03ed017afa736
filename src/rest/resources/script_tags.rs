//! Script tags.
//!
//! GraphQL has no event field: every script tag loads on `onload`, so that
//! is the only event accepted on input and the one reported on output.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{upper_enum, Field, FieldMap, Literal};
use crate::rest::input::InputMap;
use crate::rest::queries::script_tags as queries;
use crate::rest::resources::common::{deleted, global_id};
use crate::rest::translator::{require, shape, Operation, Translator};
use crate::rest::{Page, PageParams};

const LIST: Operation = Operation::query("scriptTags", queries::SCRIPT_TAGS, "scriptTags");
const GET: Operation = Operation::query("scriptTag", queries::SCRIPT_TAG, "scriptTag");
const CREATE: Operation = Operation::mutation("scriptTagCreate", queries::SCRIPT_TAG_CREATE, "scriptTagCreate", "userErrors");
const UPDATE: Operation = Operation::mutation("scriptTagUpdate", queries::SCRIPT_TAG_UPDATE, "scriptTagUpdate", "userErrors");
const DELETE: Operation = Operation::mutation("scriptTagDelete", queries::SCRIPT_TAG_DELETE, "scriptTagDelete", "userErrors");

/// The only script tag event.
pub const ONLOAD: &str = "onload";

/// A script tag in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScriptTag {
    /// The bare script tag ID.
    pub id: Option<u64>,
    /// Script URL.
    pub src: Option<String>,
    /// Always `onload`.
    pub event: Option<String>,
    /// Where the script is included: `online_store`, `order_status` or `all`.
    pub display_scope: Option<String>,
    /// Whether the script is served from the CDN cache.
    pub cache: Option<bool>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const SCRIPT_TAG: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("src", "src"),
    Field::constant("event", Literal::Str(ONLOAD)),
    Field::lower("display_scope", "displayScope"),
    Field::copy("cache", "cache"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

/// Script tag fields to create or update.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScriptTagInput {
    /// Script URL; required on create.
    pub src: Option<String>,
    /// Must be `onload` when given.
    pub event: Option<String>,
    /// `online_store`, `order_status` or `all`.
    pub display_scope: Option<String>,
    /// Serve from the CDN cache.
    pub cache: Option<bool>,
}

impl ScriptTagInput {
    fn to_graphql(&self) -> Result<InputMap, ResourceError> {
        if let Some(event) = self.event.as_deref() {
            if !event.trim().eq_ignore_ascii_case(ONLOAD) {
                return Err(ResourceError::invalid_input(format!(
                    "unsupported script tag event '{event}'; only '{ONLOAD}' is available"
                )));
            }
        }
        Ok(InputMap::new()
            .optional("src", self.src.clone())
            .optional("displayScope", self.display_scope.as_deref().map(upper_enum))
            .optional("cache", self.cache))
    }
}

/// Script tag operations.
#[derive(Clone, Copy, Debug)]
pub struct ScriptTags<'c> {
    translator: Translator<'c>,
}

impl<'c> ScriptTags<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists one page of script tags, optionally only those loading `src`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list(&self, src: Option<&str>, page: &PageParams) -> Result<Page<ScriptTag>, ResourceError> {
        let variables = InputMap::new().optional("src", src);
        self.translator.list(&LIST, variables, page, "", SCRIPT_TAG).await
    }

    /// Fetches one script tag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the script tag does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<ScriptTag, ResourceError> {
        let (gid, raw) = global_id("ScriptTag", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "ScriptTag", &raw)
            .await?;
        shape(GET.name, SCRIPT_TAG, &node)
    }

    /// Creates a script tag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] without `src` or for an event
    /// other than `onload`.
    pub async fn create(&self, input: &ScriptTagInput) -> Result<ScriptTag, ResourceError> {
        let fields = input.to_graphql()?;
        if !fields.contains("src") {
            return Err(ResourceError::invalid_input("src is required"));
        }
        let payload = self.translator.run(&CREATE, InputMap::new().nested("input", fields)).await?;
        shape(CREATE.name, SCRIPT_TAG, require(CREATE.name, &payload, "scriptTag")?)
    }

    /// Updates a script tag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an event other than `onload`.
    pub async fn update(&self, id: impl fmt::Display, input: &ScriptTagInput) -> Result<ScriptTag, ResourceError> {
        let (gid, _) = global_id("ScriptTag", id)?;
        let fields = input.to_graphql()?;
        let payload = self
            .translator
            .run(&UPDATE, InputMap::new().field("id", gid).field("input", fields))
            .await?;
        shape(UPDATE.name, SCRIPT_TAG, require(UPDATE.name, &payload, "scriptTag")?)
    }

    /// Deletes a script tag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ResourceError> {
        let (gid, raw) = global_id("ScriptTag", id)?;
        let payload = self.translator.run(&DELETE, InputMap::new().field("id", gid)).await?;
        deleted(&payload, "deletedScriptTagId", "ScriptTag", &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_script_tag_map() {
        let node = json!({
            "id": "gid://shopify/ScriptTag/596726825",
            "src": "https://js.example.org/foo.js",
            "displayScope": "ONLINE_STORE",
            "cache": false
        });
        let tag: ScriptTag = serde_json::from_value(map_fields(SCRIPT_TAG, &node)).unwrap();
        assert_eq!(tag.id, Some(596_726_825));
        assert_eq!(tag.event.as_deref(), Some("onload"));
        assert_eq!(tag.display_scope.as_deref(), Some("online_store"));
    }

    #[test]
    fn test_input_rejects_other_events() {
        let input = ScriptTagInput {
            src: Some("https://js.example.org/foo.js".to_string()),
            event: Some("onclick".to_string()),
            ..Default::default()
        };
        assert!(matches!(input.to_graphql(), Err(ResourceError::InvalidInput { .. })));
    }

    #[test]
    fn test_input_maps_display_scope() {
        let input = ScriptTagInput {
            src: Some("https://js.example.org/foo.js".to_string()),
            event: Some("onload".to_string()),
            display_scope: Some("order_status".to_string()),
            cache: None,
        };
        assert_eq!(
            input.to_graphql().unwrap().into_value(),
            json!({ "src": "https://js.example.org/foo.js", "displayScope": "ORDER_STATUS" })
        );
    }
}
