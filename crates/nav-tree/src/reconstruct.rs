//! Page tree reconstruction from level-ordered rows.
//!
//! [`TreeBuilder`] walks the rows root-first, so every parent URL is already
//! in the [`KeyMap`] when its children are processed. For each row it
//! composes the URL, resolves attached blocks, classifies the page and files
//! the resulting [`NavNode`] under `type → parent_id → page_id`.

use nav_source::PageRow;

use crate::escape::escape_quotes;
use crate::extras::BlockRegistry;
use crate::keys::KeyMap;
use crate::node::{ContentBlockRef, NavNode, NavTree, Redirect, TreeType};
use crate::payload::{PagePayload, parse_no_follow, parse_payload};

/// Page id of the home page.
pub const HOME_PAGE_ID: u32 = 1;

/// Page id of the error page.
pub const ERROR_PAGE_ID: u32 = 404;

/// Rebuilds the key map and navigation tree for one language.
pub struct TreeBuilder<'a> {
    language: &'a str,
    multi_language: bool,
    blocks: &'a BlockRegistry,
    sitemap_id: Option<u32>,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder.
    ///
    /// # Arguments
    ///
    /// * `language` - Language code used as URL prefix in multi-language mode
    /// * `multi_language` - Prefix every full URL with `/{language}`
    /// * `blocks` - Registry used to resolve extra ids
    /// * `sitemap_id` - Id of the sitemap widget, if any
    #[must_use]
    pub fn new(
        language: &'a str,
        multi_language: bool,
        blocks: &'a BlockRegistry,
        sitemap_id: Option<u32>,
    ) -> Self {
        Self {
            language,
            multi_language,
            blocks,
            sitemap_id,
        }
    }

    /// Process every level of rows, root-first.
    #[must_use]
    pub fn build(&self, levels: &[Vec<PageRow>]) -> (KeyMap, NavTree) {
        let mut keys = KeyMap::new();
        let mut navigation = NavTree::new();

        for row in levels.iter().flatten() {
            let node = self.page_node(&mut keys, row);
            navigation.insert(row.page_type.clone(), row.parent_id, node);
        }

        tracing::debug!(
            language = self.language,
            page_count = keys.len(),
            "Rebuilt page tree"
        );

        (keys, navigation)
    }

    /// Derive the node for `row`, recording its URL in `keys`.
    fn page_node(&self, keys: &mut KeyMap, row: &PageRow) -> NavNode {
        let parent_url = match keys.get(row.parent_id) {
            Some(url) => url.to_owned(),
            None => {
                if row.parent_id != 0 {
                    tracing::warn!(
                        page_id = row.id,
                        parent_id = row.parent_id,
                        "Parent page not processed yet, URL is built from an empty parent"
                    );
                }
                String::new()
            }
        };

        let is_home = row.id == HOME_PAGE_ID;
        let slug = if is_home { "" } else { row.url.as_str() };

        let mut language_url = if self.multi_language {
            format!("/{}/", self.language)
        } else {
            "/".to_owned()
        };
        if is_home && self.multi_language {
            language_url.pop();
        }

        let relative_url = format!("{parent_url}/{slug}")
            .trim_matches('/')
            .to_owned();
        let full_url = format!("{language_url}{relative_url}");
        if keys.insert(row.id, relative_url).is_some() {
            tracing::warn!(page_id = row.id, "Page id listed twice, URL replaced");
        }

        let extra_ids = parse_extra_ids(row.extra_ids.as_deref());
        let extra_blocks = extra_ids.as_deref().map(|ids| self.resolve_blocks(row.id, ids));
        let payload = parse_payload(row.id, row.data.as_deref());
        let (tree_type, redirect) = classify(
            row,
            extra_ids.as_deref().unwrap_or_default(),
            self.sitemap_id,
            payload,
        );

        NavNode {
            page_id: row.id,
            url: slug.to_owned(),
            full_url,
            title: escape_quotes(&row.title),
            navigation_title: escape_quotes(&row.navigation_title),
            has_extra: row.has_extra,
            no_follow: parse_no_follow(row.id, row.meta_data.as_deref()),
            hidden: row.hidden,
            extra_blocks,
            has_children: row.has_children,
            tree_type,
            redirect,
        }
    }

    /// Resolve extra ids against the registry, keeping the first occurrence
    /// of each id and dropping ids that are not registered blocks.
    fn resolve_blocks(&self, page_id: u32, ids: &[u32]) -> Vec<ContentBlockRef> {
        let mut blocks: Vec<ContentBlockRef> = Vec::with_capacity(ids.len());
        for &id in ids {
            if blocks.iter().any(|block| block.id == id) {
                continue;
            }
            match self.blocks.resolve(id) {
                Some(block) => blocks.push(block.clone()),
                None => tracing::debug!(page_id, extra_id = id, "Extra is not a content block"),
            }
        }
        blocks
    }
}

/// Split a comma-joined id list, `None` when the page has no list at all.
///
/// Tokens that are not integers are skipped.
fn parse_extra_ids(extra_ids: Option<&str>) -> Option<Vec<u32>> {
    extra_ids.map(|list| {
        list.split(',')
            .filter_map(|token| token.trim().parse().ok())
            .collect()
    })
}

/// Determine the navigational role of a page.
///
/// Later rules override earlier ones: hidden, then the id-based rules (home,
/// error, sitemap), then the payload (internal redirect, external redirect,
/// direct action).
fn classify(
    row: &PageRow,
    extra_ids: &[u32],
    sitemap_id: Option<u32>,
    payload: Option<PagePayload>,
) -> (TreeType, Option<Redirect>) {
    let mut tree_type = if row.hidden {
        TreeType::Hidden
    } else {
        TreeType::Page
    };

    if row.id == HOME_PAGE_ID {
        tree_type = TreeType::Home;
    } else if row.id == ERROR_PAGE_ID {
        tree_type = TreeType::Error;
    } else if row.id < ERROR_PAGE_ID
        && sitemap_id.is_some_and(|sitemap_id| extra_ids.contains(&sitemap_id))
    {
        tree_type = TreeType::Sitemap;
    }

    let Some(payload) = payload else {
        return (tree_type, None);
    };

    let mut redirect = None;
    if let Some(internal) = payload.internal {
        redirect = Some(internal);
        tree_type = TreeType::Redirect;
    }
    if let Some(external) = payload.external {
        redirect = Some(external);
        tree_type = TreeType::Redirect;
    }
    if payload.is_action {
        tree_type = TreeType::DirectAction;
    }

    if tree_type == TreeType::Redirect {
        (tree_type, redirect)
    } else {
        (tree_type, None)
    }
}
