//! Script tag documents.

macro_rules! script_tag_fields {
    () => {
        "id src displayScope cache createdAt updatedAt"
    };
}

pub const SCRIPT_TAGS: &str = concat!(
    r"
query scriptTags($src: URL, $first: Int, $after: String, $last: Int, $before: String) {
  scriptTags(src: $src, first: $first, after: $after, last: $last, before: $before) {
    nodes { ",
    script_tag_fields!(),
    r" }
    ",
    page_info!(),
    r"
  }
}
"
);

pub const SCRIPT_TAG: &str = concat!(
    r"
query scriptTag($id: ID!) {
  scriptTag(id: $id) { ",
    script_tag_fields!(),
    r" }
}
"
);

pub const SCRIPT_TAG_CREATE: &str = concat!(
    r"
mutation scriptTagCreate($input: ScriptTagInput!) {
  scriptTagCreate(input: $input) {
    scriptTag { ",
    script_tag_fields!(),
    r" }
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const SCRIPT_TAG_UPDATE: &str = concat!(
    r"
mutation scriptTagUpdate($id: ID!, $input: ScriptTagInput!) {
  scriptTagUpdate(id: $id, input: $input) {
    scriptTag { ",
    script_tag_fields!(),
    r" }
    ",
    user_errors!(),
    r"
  }
}
"
);

pub const SCRIPT_TAG_DELETE: &str = concat!(
    r"
mutation scriptTagDelete($id: ID!) {
  scriptTagDelete(id: $id) {
    deletedScriptTagId
    ",
    user_errors!(),
    r"
  }
}
"
);
