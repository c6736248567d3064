//! Navigation tree types.
//!
//! [`NavTree`] nests [`NavNode`]s as `type → parent_id → page_id`. Every level
//! keeps insertion order, so serialising the same build twice produces the
//! same bytes.

use indexmap::IndexMap;
use nav_source::PageType;
use serde::Serialize;

/// Reference to a content block attached to a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContentBlockRef {
    /// Extra id.
    pub id: u32,
    /// Owning module.
    pub module: String,
    /// Module action.
    pub action: Option<String>,
}

/// Navigational role of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeType {
    /// Regular page.
    Page,
    /// Hidden from navigation.
    Hidden,
    /// The home page.
    Home,
    /// The error (404) page.
    Error,
    /// Page hosting the sitemap widget.
    Sitemap,
    /// Internal or external redirect.
    Redirect,
    /// Page that runs a module action directly.
    DirectAction,
}

impl TreeType {
    /// Label as emitted in the navigation artifact.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Hidden => "hidden",
            Self::Home => "home",
            Self::Error => "error",
            Self::Sitemap => "sitemap",
            Self::Redirect => "redirect",
            Self::DirectAction => "direct_action",
        }
    }
}

/// Redirect target of a [`TreeType::Redirect`] page.
///
/// Serialised flat into the owning node as `redirect_page_id`/`redirect_url`
/// plus `redirect_code`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Redirect {
    /// Redirect to another page of the site.
    Internal {
        /// Target page id.
        #[serde(rename = "redirect_page_id")]
        page_id: u32,
        /// HTTP status code.
        #[serde(rename = "redirect_code")]
        code: u16,
    },
    /// Redirect to an absolute URL.
    External {
        /// Target URL.
        #[serde(rename = "redirect_url")]
        url: String,
        /// HTTP status code.
        #[serde(rename = "redirect_code")]
        code: u16,
    },
}

/// Derived navigation data for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    /// Page id.
    pub page_id: u32,
    /// URL slug (empty for home).
    pub url: String,
    /// Absolute path including the language prefix.
    pub full_url: String,
    /// Quote-escaped page title.
    pub title: String,
    /// Quote-escaped navigation title.
    pub navigation_title: String,
    /// Page has extras.
    pub has_extra: bool,
    /// Metadata asks search engines not to follow links.
    pub no_follow: bool,
    /// Hidden from navigation.
    pub hidden: bool,
    /// Resolved content blocks, `None` when the page has no extra ids at all.
    pub extra_blocks: Option<Vec<ContentBlockRef>>,
    /// Page has subpages.
    pub has_children: bool,
    /// Navigational role.
    pub tree_type: TreeType,
    /// Redirect target, present only for [`TreeType::Redirect`].
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

/// Sibling nodes under one parent, keyed by page id.
pub type Siblings = IndexMap<u32, NavNode>;

/// Navigation tree: `type → parent_id → page_id → node`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavTree {
    buckets: IndexMap<PageType, IndexMap<u32, Siblings>>,
}

impl NavTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File `node` under `page_type` and `parent_id`.
    ///
    /// Returns the node previously stored at the same position, if any.
    pub fn insert(&mut self, page_type: PageType, parent_id: u32, node: NavNode) -> Option<NavNode> {
        self.buckets
            .entry(page_type)
            .or_default()
            .entry(parent_id)
            .or_default()
            .insert(node.page_id, node)
    }

    /// Look up a node by its full position.
    #[must_use]
    pub fn get(&self, page_type: &PageType, parent_id: u32, page_id: u32) -> Option<&NavNode> {
        self.children(page_type, parent_id)?.get(&page_id)
    }

    /// Nodes filed under `page_type` with parent `parent_id`.
    #[must_use]
    pub fn children(&self, page_type: &PageType, parent_id: u32) -> Option<&Siblings> {
        self.buckets.get(page_type)?.get(&parent_id)
    }

    /// Like [`NavTree::children`], also returning the tree's own type key.
    pub(crate) fn bucket(&self, page_type: &PageType, parent_id: u32) -> Option<(&PageType, &Siblings)> {
        let (key, parents) = self.buckets.get_key_value(page_type)?;
        Some((key, parents.get(&parent_id)?))
    }

    /// Type buckets in first-seen order.
    pub fn types(&self) -> impl Iterator<Item = &PageType> {
        self.buckets.keys()
    }

    /// Every node in storage order.
    pub fn nodes(&self) -> impl Iterator<Item = &NavNode> {
        self.buckets
            .values()
            .flat_map(IndexMap::values)
            .flat_map(IndexMap::values)
    }

    /// Find a node by page id in any bucket.
    #[must_use]
    pub fn find(&self, page_id: u32) -> Option<&NavNode> {
        self.nodes().find(|node| node.page_id == page_id)
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    /// Whether the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
