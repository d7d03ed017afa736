//! Themes and theme assets.
//!
//! REST assets are GraphQL theme files. Listing assets follows every page of
//! the `files` connection and returns one combined list.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::GraphqlClient;
use crate::rest::errors::ResourceError;
use crate::rest::fields::{flatten, map_all, upper_enum, Field, FieldMap};
use crate::rest::gid::strip_gid;
use crate::rest::input::InputMap;
use crate::rest::queries::themes as queries;
use crate::rest::resources::common::{deleted, global_id, with_parent};
use crate::rest::translator::{decode, require, shape, shape_list, Operation, Translator};

const LIST: Operation = Operation::query("themes", queries::THEMES, "themes");
const GET: Operation = Operation::query("theme", queries::THEME, "theme");
const CREATE: Operation = Operation::mutation("themeCreate", queries::THEME_CREATE, "themeCreate", "userErrors");
const UPDATE: Operation = Operation::mutation("themeUpdate", queries::THEME_UPDATE, "themeUpdate", "userErrors");
const PUBLISH: Operation = Operation::mutation("themePublish", queries::THEME_PUBLISH, "themePublish", "userErrors");
const DELETE: Operation = Operation::mutation("themeDelete", queries::THEME_DELETE, "themeDelete", "userErrors");
const FILES: Operation = Operation::query("themeFiles", queries::THEME_FILES, "theme");
const FILE: Operation = Operation::query("themeFile", queries::THEME_FILE, "theme");
const UPSERT: Operation =
    Operation::mutation("themeFilesUpsert", queries::THEME_FILES_UPSERT, "themeFilesUpsert", "userErrors");
const DELETE_FILES: Operation =
    Operation::mutation("themeFilesDelete", queries::THEME_FILES_DELETE, "themeFilesDelete", "userErrors");

/// A theme in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Theme {
    /// The bare theme ID.
    pub id: Option<u64>,
    /// Theme name.
    pub name: Option<String>,
    /// `main`, `unpublished`, `demo` or `development`.
    pub role: Option<String>,
    /// Whether the theme can be previewed.
    pub previewable: Option<bool>,
    /// Whether files are still being processed.
    pub processing: Option<bool>,
    /// Theme Store listing ID.
    pub theme_store_id: Option<u64>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The namespaced ID.
    pub admin_graphql_api_id: Option<String>,
}

const THEME: &FieldMap = &[
    Field::id("id", "id"),
    Field::copy("name", "name"),
    Field::lower("role", "role"),
    Field::computed("previewable", previewable),
    Field::copy("processing", "processing"),
    Field::copy("theme_store_id", "themeStoreId"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
    Field::copy("admin_graphql_api_id", "id"),
];

fn previewable(node: &Value) -> Value {
    node.get("processing")
        .and_then(Value::as_bool)
        .map_or(Value::Null, |processing| Value::Bool(!processing))
}

/// A theme file in REST form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Asset {
    /// Path within the theme, e.g. `templates/index.liquid`.
    pub key: Option<String>,
    /// The owning theme.
    pub theme_id: Option<u64>,
    /// MIME type.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
    /// MD5 checksum.
    pub checksum: Option<String>,
    /// Text body, for text files.
    pub value: Option<String>,
    /// Base64 body, for binary files.
    pub attachment: Option<String>,
    /// CDN URL, for files served from one.
    pub public_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

const ASSET: &FieldMap = &[
    Field::copy("key", "filename"),
    Field::copy("content_type", "contentType"),
    Field::computed("size", file_size),
    Field::copy("checksum", "checksumMd5"),
    Field::copy("value", "body.content"),
    Field::copy("attachment", "body.contentBase64"),
    Field::copy("public_url", "body.url"),
    Field::copy("created_at", "createdAt"),
    Field::copy("updated_at", "updatedAt"),
];

// UnsignedInt64 arrives as a string.
fn file_size(node: &Value) -> Value {
    match node.get("size") {
        Some(Value::String(size)) => size.parse::<u64>().map_or(Value::Null, Value::from),
        Some(size @ Value::Number(_)) => size.clone(),
        _ => Value::Null,
    }
}

/// A new theme.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeInput {
    /// URL of the theme archive.
    pub src: Option<String>,
    /// Theme name.
    pub name: Option<String>,
    /// Initial role.
    pub role: Option<String>,
}

/// A theme file to create or replace.
///
/// Exactly one of `value`, `attachment` and `src` must be given.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AssetInput {
    /// Path within the theme.
    pub key: String,
    /// Text body.
    pub value: Option<String>,
    /// Base64 body.
    pub attachment: Option<String>,
    /// URL to copy the body from.
    pub src: Option<String>,
}

impl AssetInput {
    fn to_graphql(&self) -> Result<Value, ResourceError> {
        let body = match (&self.value, &self.attachment, &self.src) {
            (Some(value), None, None) => ("TEXT", value),
            (None, Some(attachment), None) => ("BASE64", attachment),
            (None, None, Some(src)) => ("URL", src),
            _ => {
                return Err(ResourceError::invalid_input(format!(
                    "asset {} needs exactly one of value, attachment or src",
                    self.key
                )))
            }
        };
        if self.key.trim().is_empty() {
            return Err(ResourceError::invalid_input("asset key is required"));
        }
        Ok(InputMap::new()
            .field("filename", self.key.as_str())
            .field(
                "body",
                InputMap::new().field("type", body.0).field("value", body.1.as_str()),
            )
            .into_value())
    }
}

/// Filenames listed under `key` in a mutation payload.
fn filenames(operation: &'static str, payload: &Value, key: &str) -> Result<Vec<String>, ResourceError> {
    flatten(Some(require(operation, payload, key)?))
        .into_iter()
        .map(|file| {
            file.get("filename")
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| ResourceError::malformed(operation, "file without a filename"))
        })
        .collect()
}

/// Theme and asset operations.
#[derive(Clone, Copy, Debug)]
pub struct Themes<'c> {
    translator: Translator<'c>,
}

impl<'c> Themes<'c> {
    /// Creates the family over `client`.
    #[must_use]
    pub const fn new(client: &'c GraphqlClient) -> Self {
        Self {
            translator: Translator::new(client),
        }
    }

    /// Lists themes, optionally with one role.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] on any remote or shaping failure.
    pub async fn list(&self, role: Option<&str>) -> Result<Vec<Theme>, ResourceError> {
        let roles = role.map(|role| vec![upper_enum(role)]);
        let payload = self
            .translator
            .run(&LIST, InputMap::new().optional("roles", roles))
            .await?;
        shape_list(LIST.name, THEME, Some(&payload))
    }

    /// Fetches one theme.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the theme does not exist.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Theme, ResourceError> {
        let (gid, raw) = global_id("OnlineStoreTheme", id)?;
        let node = self
            .translator
            .find(&GET, InputMap::new().field("id", gid), "Theme", &raw)
            .await?;
        shape(GET.name, THEME, &node)
    }

    /// Creates a theme from an archive URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when `src` is missing.
    pub async fn create(&self, input: &ThemeInput) -> Result<Theme, ResourceError> {
        let source = input
            .src
            .as_deref()
            .filter(|src| !src.trim().is_empty())
            .ok_or_else(|| ResourceError::invalid_input("src is required to create a theme"))?;
        let variables = InputMap::new()
            .field("source", source)
            .optional("name", input.name.clone())
            .optional("role", input.role.as_deref().map(upper_enum));
        let payload = self.translator.run(&CREATE, variables).await?;
        shape(CREATE.name, THEME, require(CREATE.name, &payload, "theme")?)
    }

    /// Renames a theme.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the API rejects the name.
    pub async fn update(&self, id: impl fmt::Display, name: &str) -> Result<Theme, ResourceError> {
        let (gid, _) = global_id("OnlineStoreTheme", id)?;
        let payload = self
            .translator
            .run(
                &UPDATE,
                InputMap::new()
                    .field("id", gid)
                    .field("input", InputMap::new().field("name", name)),
            )
            .await?;
        shape(UPDATE.name, THEME, require(UPDATE.name, &payload, "theme")?)
    }

    /// Makes a theme the live theme.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when the theme cannot be published.
    pub async fn publish(&self, id: impl fmt::Display) -> Result<Theme, ResourceError> {
        let (gid, _) = global_id("OnlineStoreTheme", id)?;
        let payload = self.translator.run(&PUBLISH, InputMap::new().field("id", gid)).await?;
        shape(PUBLISH.name, THEME, require(PUBLISH.name, &payload, "theme")?)
    }

    /// Deletes a theme.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), ResourceError> {
        let (gid, raw) = global_id("OnlineStoreTheme", id)?;
        let payload = self.translator.run(&DELETE, InputMap::new().field("id", gid)).await?;
        deleted(&payload, "deletedThemeId", "Theme", &raw)
    }

    /// Lists a theme's assets without their bodies, following every page.
    ///
    /// An empty `keys` lists all assets.
    ///
    /// # Errors
    ///
    /// Returns the first error of any page; nothing is returned partially.
    pub async fn list_assets(&self, theme_id: impl fmt::Display, keys: &[&str]) -> Result<Vec<Asset>, ResourceError> {
        let (gid, raw) = global_id("OnlineStoreTheme", theme_id)?;
        let theme = strip_gid(&Value::from(gid.as_str()));
        let variables = InputMap::new()
            .field("id", gid)
            .optional("filenames", Some(keys.to_vec()));

        let nodes = self
            .translator
            .collect_all(&FILES, variables, "files", "Theme", &raw)
            .await?;
        decode(FILES.name, with_parent(map_all(ASSET, &nodes), "theme_id", &theme))
    }

    /// Fetches one asset with its body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the theme or the asset does
    /// not exist.
    pub async fn get_asset(&self, theme_id: impl fmt::Display, key: &str) -> Result<Asset, ResourceError> {
        let (gid, raw) = global_id("OnlineStoreTheme", theme_id)?;
        let theme = self
            .translator
            .find(
                &FILE,
                InputMap::new().field("id", gid).field("filenames", vec![key]),
                "Theme",
                &raw,
            )
            .await?;

        let Some(file) = flatten(theme.get("files")).into_iter().next() else {
            return Err(ResourceError::not_found("Asset", key));
        };
        let assets = with_parent(map_all(ASSET, [file]), "theme_id", &strip_gid(&theme["id"]));
        let mut assets: Vec<Asset> = decode(FILE.name, assets)?;
        assets
            .pop()
            .ok_or_else(|| ResourceError::not_found("Asset", key))
    }

    /// Creates or replaces assets and returns the keys written.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] when an asset gives no body or
    /// more than one.
    pub async fn upsert_assets(
        &self,
        theme_id: impl fmt::Display,
        assets: &[AssetInput],
    ) -> Result<Vec<String>, ResourceError> {
        let (gid, _) = global_id("OnlineStoreTheme", theme_id)?;
        let files = assets
            .iter()
            .map(AssetInput::to_graphql)
            .collect::<Result<Vec<_>, _>>()?;
        if files.is_empty() {
            return Err(ResourceError::invalid_input("at least one asset is required"));
        }
        let payload = self
            .translator
            .run(&UPSERT, InputMap::new().field("themeId", gid).field("files", files))
            .await?;
        filenames(UPSERT.name, &payload, "upsertedThemeFiles")
    }

    /// Deletes assets and returns the keys removed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for an empty key list.
    pub async fn delete_assets(&self, theme_id: impl fmt::Display, keys: &[&str]) -> Result<Vec<String>, ResourceError> {
        let (gid, _) = global_id("OnlineStoreTheme", theme_id)?;
        if keys.is_empty() {
            return Err(ResourceError::invalid_input("at least one asset key is required"));
        }
        let payload = self
            .translator
            .run(
                &DELETE_FILES,
                InputMap::new().field("themeId", gid).field("files", keys.to_vec()),
            )
            .await?;
        filenames(DELETE_FILES.name, &payload, "deletedThemeFiles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::fields::map_fields;
    use serde_json::json;

    #[test]
    fn test_theme_map() {
        let node = json!({
            "id": "gid://shopify/OnlineStoreTheme/828155753",
            "name": "Comfort",
            "role": "MAIN",
            "processing": false,
            "themeStoreId": null
        });
        let theme: Theme = serde_json::from_value(map_fields(THEME, &node)).unwrap();
        assert_eq!(theme.id, Some(828_155_753));
        assert_eq!(theme.role.as_deref(), Some("main"));
        assert_eq!(theme.previewable, Some(true));
    }

    #[test]
    fn test_asset_map_reads_body_variants() {
        let text = map_fields(ASSET, &json!({ "filename": "layout/theme.liquid", "body": { "content": "<html>" } }));
        assert_eq!(text["key"], "layout/theme.liquid");
        assert_eq!(text["value"], "<html>");
        assert_eq!(text["attachment"], Value::Null);

        let binary = map_fields(ASSET, &json!({ "filename": "assets/logo.png", "body": { "contentBase64": "iVBORw0=" } }));
        assert_eq!(binary["attachment"], "iVBORw0=");

        assert_eq!(file_size(&json!({ "size": "4096" })), json!(4096));
        assert_eq!(file_size(&json!({ "size": 12 })), json!(12));
        assert_eq!(file_size(&json!({})), Value::Null);
    }

    #[test]
    fn test_asset_input_needs_exactly_one_body() {
        let text = AssetInput {
            key: "templates/index.liquid".to_string(),
            value: Some("{{ content_for_layout }}".to_string()),
            ..Default::default()
        };
        assert_eq!(
            text.to_graphql().unwrap(),
            json!({
                "filename": "templates/index.liquid",
                "body": { "type": "TEXT", "value": "{{ content_for_layout }}" }
            })
        );

        let none = AssetInput {
            key: "a.css".to_string(),
            ..Default::default()
        };
        assert!(matches!(none.to_graphql(), Err(ResourceError::InvalidInput { .. })));

        let both = AssetInput {
            key: "a.css".to_string(),
            value: Some("x".to_string()),
            src: Some("https://example.com/a.css".to_string()),
            ..Default::default()
        };
        assert!(both.to_graphql().is_err());
    }

    #[test]
    fn test_filenames() {
        let payload = json!({ "deletedThemeFiles": [{ "filename": "a.css" }, { "filename": "b.js" }] });
        assert_eq!(
            filenames("themeFilesDelete", &payload, "deletedThemeFiles").unwrap(),
            vec!["a.css", "b.js"]
        );
        assert!(filenames("themeFilesDelete", &json!({ "deletedThemeFiles": null }), "deletedThemeFiles").is_err());
    }
}
