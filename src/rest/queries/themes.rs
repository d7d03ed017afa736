//! Theme and theme file (asset) documents.

macro_rules! theme_fields {
    () => {
        "id name role processing themeStoreId createdAt updatedAt"
    };
}

macro_rules! file_fields {
    () => {
        "filename size contentType checksumMd5 createdAt updatedAt"
    };
}

pub const THEMES: &str = concat!(
    r"
query themes($roles: [ThemeRole!]) {
  themes(first: 250, roles: $roles) {
    nodes { ",
    theme_fields!(),
    r" }
  }
}
"
);

pub const THEME: &str = concat!(
    r"
query theme($id: ID!) {
  theme(id: $id) { ",
    theme_fields!(),
    r" }
}
"
);

pub const THEME_CREATE: &str = concat!(
    r"
mutation themeCreate($source: URL!, $name: String, $role: ThemeRole) {
  themeCreate(source: $source, name: $name, role: $role) {
    theme { ",
    theme_fields!(),
    r" }
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const THEME_UPDATE: &str = concat!(
    r"
mutation themeUpdate($id: ID!, $input: OnlineStoreThemeInput!) {
  themeUpdate(id: $id, input: $input) {
    theme { ",
    theme_fields!(),
    r" }
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const THEME_PUBLISH: &str = concat!(
    r"
mutation themePublish($id: ID!) {
  themePublish(id: $id) {
    theme { ",
    theme_fields!(),
    r" }
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const THEME_DELETE: &str = concat!(
    r"
mutation themeDelete($id: ID!) {
  themeDelete(id: $id) {
    deletedThemeId
    ",
    user_errors!(),
    r"
  }
}
"
);

/// One page of file metadata, without bodies.
pub const THEME_FILES: &str = concat!(
    r"
query themeFiles($id: ID!, $filenames: [String!], $first: Int, $after: String) {
  theme(id: $id) {
    id
    files(filenames: $filenames, first: $first, after: $after) {
      nodes { ",
    file_fields!(),
    r" }
      ",
    page_info!(),
    r"
    }
  }
}
"
);

/// A single file including its body.
pub const THEME_FILE: &str = concat!(
    r"
query themeFile($id: ID!, $filenames: [String!]) {
  theme(id: $id) {
    id
    files(filenames: $filenames, first: 1) {
      nodes {
        ",
    file_fields!(),
    r"
        body {
          ... on OnlineStoreThemeFileBodyText { content }
          ... on OnlineStoreThemeFileBodyBase64 { contentBase64 }
          ... on OnlineStoreThemeFileBodyUrl { url }
        }
      }
    }
  }
}
"
);

pub const THEME_FILES_UPSERT: &str = r"
mutation themeFilesUpsert($themeId: ID!, $files: [OnlineStoreThemeFilesUpsertFileInput!]!) {
  themeFilesUpsert(themeId: $themeId, files: $files) {
    upsertedThemeFiles { filename }
    userErrors { field message code filename }
  }
}
";

pub const THEME_FILES_DELETE: &str = r"
mutation themeFilesDelete($themeId: ID!, $files: [String!]!) {
  themeFilesDelete(themeId: $themeId, files: $files) {
    deletedThemeFiles { filename }
    userErrors { field message code filename }
  }
}
";
