//! Breadcrumb-annotated link list for the authoring UI.
//!
//! Every linearized page that has an active navigation title becomes one
//! [`EditorLink`]. Its title is prefixed with the titles of its ancestors,
//! found by cutting the URL one segment at a time and looking the remainder
//! up in the [`KeyMap`].

use std::collections::HashMap;

use indexmap::IndexMap;
use nav_source::PageType;
use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::escape::decode_html_entities;
use crate::keys::KeyMap;
use crate::linearize::OrderEntry;

/// Type buckets in the order they appear in the link list.
pub const LINK_LIST_TYPE_ORDER: [PageType; 4] =
    [PageType::Page, PageType::Meta, PageType::Footer, PageType::Root];

/// Separator between breadcrumb titles.
const SEPARATOR: &str = " > ";

/// One entry of the editor link list.
///
/// Serialised as a `[title, url]` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorLink {
    /// Breadcrumb title (e.g. `"About > Team"`).
    pub title: String,
    /// Full URL of the page.
    pub url: String,
}

impl Serialize for EditorLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.title)?;
        pair.serialize_element(&self.url)?;
        pair.end()
    }
}

/// Builds the editor link list from linearized orders.
pub struct LinkListBuilder<'a> {
    keys: &'a KeyMap,
    titles: &'a HashMap<u32, String>,
    multi_language: bool,
}

impl<'a> LinkListBuilder<'a> {
    /// Create a builder.
    ///
    /// `titles` holds the navigation titles of active pages only; pages
    /// without a title are left out of the list.
    #[must_use]
    pub fn new(keys: &'a KeyMap, titles: &'a HashMap<u32, String>, multi_language: bool) -> Self {
        Self {
            keys,
            titles,
            multi_language,
        }
    }

    /// Build the list, bucket by bucket in [`LINK_LIST_TYPE_ORDER`].
    ///
    /// Buckets outside that order are not listed.
    #[must_use]
    pub fn build(&self, orders: &IndexMap<&PageType, Vec<OrderEntry<'_>>>) -> Vec<EditorLink> {
        let index = self.keys.reverse_index();

        LINK_LIST_TYPE_ORDER
            .iter()
            .filter_map(|page_type| orders.get(page_type))
            .flatten()
            .filter_map(|&(page_id, url)| {
                let title = self.breadcrumb_title(&index, page_id, url)?;
                Some(EditorLink {
                    title,
                    url: url.to_owned(),
                })
            })
            .collect()
    }

    /// Prefix the page title with its ancestors' titles.
    ///
    /// `None` when the page itself has no title.
    fn breadcrumb_title(&self, index: &HashMap<&str, u32>, page_id: u32, url: &str) -> Option<String> {
        let mut title = decode_html_entities(self.titles.get(&page_id)?);

        // Drop the empty segment before the leading slash, and the language.
        let skip = if self.multi_language { 2 } else { 1 };
        let mut chunks: Vec<&str> = url.split('/').skip(skip).collect();

        while chunks.len() > 1 {
            chunks.pop();
            let partial_url = chunks.join("/");

            let ancestor_title = index
                .get(partial_url.as_str())
                .and_then(|ancestor_id| self.titles.get(ancestor_id));
            title = match ancestor_title {
                // Ancestor titles are decoded as well, not prepended raw, so the
                // whole breadcrumb is plain text.
                Some(ancestor_title) => {
                    format!("{}{SEPARATOR}{title}", decode_html_entities(ancestor_title))
                }
                None => {
                    tracing::debug!(page_id, partial_url = %partial_url, "No titled ancestor for breadcrumb");
                    format!("{SEPARATOR}{title}")
                }
            };
        }

        Some(title)
    }
}
