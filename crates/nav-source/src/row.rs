//! Page rows and extras as delivered by a [`PageSource`](crate::PageSource).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Navigation bucket a page is stored under.
///
/// The content store defines `page`, `root`, `footer` and `meta`; any other
/// value is carried through unchanged as [`PageType::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageType {
    /// Regular page, also the shared bucket for subpages of other types.
    Page,
    /// Top-level page outside the main navigation.
    Root,
    /// Footer navigation page.
    Footer,
    /// Meta navigation page.
    Meta,
    /// Bucket defined by the surrounding system.
    Other(String),
}

impl PageType {
    /// Bucket name as stored in the content store.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "page",
            Self::Root => "root",
            Self::Footer => "footer",
            Self::Meta => "meta",
            Self::Other(name) => name,
        }
    }

    /// Whether subpages of this bucket are stored under [`PageType::Page`].
    #[must_use]
    pub fn grafts_children(&self) -> bool {
        matches!(self, Self::Root | Self::Footer | Self::Meta)
    }
}

impl From<&str> for PageType {
    fn from(value: &str) -> Self {
        match value {
            "page" => Self::Page,
            "root" => Self::Root,
            "footer" => Self::Footer,
            "meta" => Self::Meta,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for PageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "page" | "root" | "footer" | "meta" => Self::from(value.as_str()),
            _ => Self::Other(value),
        }
    }
}

impl From<PageType> for String {
    fn from(value: PageType) -> Self {
        match value {
            PageType::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page as listed by the content store.
///
/// `meta_data` and `data` are kept as unparsed blobs. Interpreting them is the
/// cache builder's job, so a malformed blob never fails the row source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRow {
    /// Page id. `1` is the home page, `404` the error page.
    pub id: u32,
    /// Parent page id, `0` for top-level pages.
    pub parent_id: u32,
    /// URL slug of this page (empty for home).
    #[serde(default)]
    pub url: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Title used in navigation menus.
    #[serde(default)]
    pub navigation_title: String,
    /// Navigation bucket.
    #[serde(rename = "type")]
    pub page_type: PageType,
    /// Hidden from navigation.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub hidden: bool,
    /// Page has subpages.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub has_children: bool,
    /// Page has at least one extra attached.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub has_extra: bool,
    /// Comma-joined extra ids (e.g. `"3,9"`).
    #[serde(default)]
    pub extra_ids: Option<String>,
    /// Serialized page metadata (`seo_follow` and friends).
    #[serde(default, deserialize_with = "deserialize_blob")]
    pub meta_data: Option<String>,
    /// Serialized page payload (redirects, direct action flag).
    #[serde(default, deserialize_with = "deserialize_blob")]
    pub data: Option<String>,
}

impl PageRow {
    /// Create a visible `page`-typed row with no extras or payloads.
    #[must_use]
    pub fn new(id: u32, parent_id: u32, url: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            url: url.into(),
            title: String::new(),
            navigation_title: String::new(),
            page_type: PageType::Page,
            hidden: false,
            has_children: false,
            has_extra: false,
            extra_ids: None,
            meta_data: None,
            data: None,
        }
    }
}

/// Kind of module extra.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraKind {
    /// Embeddable content block.
    Block,
    /// Widget (including the sitemap widget).
    Widget,
}

impl ExtraKind {
    /// Kind name as stored in the content store.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Widget => "widget",
        }
    }
}

/// A module extra that can be attached to pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    /// Extra id.
    pub id: u32,
    /// Owning module.
    pub module: String,
    /// Module action, if any.
    #[serde(default)]
    pub action: Option<String>,
}

/// Accept JSON booleans as well as the content store's `"Y"`/`"N"` strings.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.as_str() {
            "Y" | "y" | "true" | "1" => Ok(true),
            "N" | "n" | "false" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid flag value: {other:?}"
            ))),
        },
    }
}

/// Keep strings verbatim, re-encode any other JSON value as a string blob.
fn deserialize_blob<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_type_known_names() {
        assert_eq!(PageType::from("page"), PageType::Page);
        assert_eq!(PageType::from("root"), PageType::Root);
        assert_eq!(PageType::from("footer"), PageType::Footer);
        assert_eq!(PageType::from("meta"), PageType::Meta);
    }

    #[test]
    fn test_page_type_other_preserved() {
        let page_type = PageType::from("sidebar".to_owned());
        assert_eq!(page_type, PageType::Other("sidebar".to_owned()));
        assert_eq!(page_type.as_str(), "sidebar");
        assert_eq!(String::from(page_type), "sidebar");
    }

    #[test]
    fn test_page_type_grafts_children() {
        assert!(!PageType::Page.grafts_children());
        assert!(PageType::Root.grafts_children());
        assert!(PageType::Footer.grafts_children());
        assert!(PageType::Meta.grafts_children());
        assert!(!PageType::Other("sidebar".to_owned()).grafts_children());
    }

    #[test]
    fn test_row_parses_store_flags() {
        let json = r#"{
            "id": 2, "parent_id": 1, "url": "about", "title": "About",
            "navigation_title": "About us", "type": "page",
            "hidden": "Y", "has_children": "N", "has_extra": true,
            "extra_ids": "3,9"
        }"#;
        let row: PageRow = serde_json::from_str(json).unwrap();

        assert_eq!(row.id, 2);
        assert_eq!(row.parent_id, 1);
        assert_eq!(row.page_type, PageType::Page);
        assert!(row.hidden);
        assert!(!row.has_children);
        assert!(row.has_extra);
        assert_eq!(row.extra_ids.as_deref(), Some("3,9"));
        assert_eq!(row.meta_data, None);
    }

    #[test]
    fn test_row_invalid_flag_is_error() {
        let json = r#"{"id": 2, "parent_id": 1, "type": "page", "hidden": "maybe"}"#;
        assert!(serde_json::from_str::<PageRow>(json).is_err());
    }

    #[test]
    fn test_row_object_blob_kept_as_text() {
        let json = r#"{
            "id": 3, "parent_id": 1, "type": "page",
            "meta_data": {"seo_follow": "nofollow"},
            "data": "{\"is_action\": true}"
        }"#;
        let row: PageRow = serde_json::from_str(json).unwrap();

        let meta: serde_json::Value = serde_json::from_str(row.meta_data.as_deref().unwrap()).unwrap();
        assert_eq!(meta["seo_follow"], "nofollow");
        assert_eq!(row.data.as_deref(), Some("{\"is_action\": true}"));
    }

    #[test]
    fn test_extra_kind_names() {
        assert_eq!(ExtraKind::Block.as_str(), "block");
        assert_eq!(ExtraKind::Widget.as_str(), "widget");
    }
}
