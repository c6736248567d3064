//! Per-language build orchestration.

use std::collections::HashMap;

use nav_source::{PageSource, SourceError};

use crate::extras::{BlockRegistry, SitemapResolver};
use crate::keys::KeyMap;
use crate::linearize::linearize_all;
use crate::link_list::{EditorLink, LinkListBuilder};
use crate::node::NavTree;
use crate::reconstruct::TreeBuilder;

/// Error returned by [`CacheBuilder::build`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The page source failed.
    #[error("Failed to build navigation for '{language}': {source}")]
    Source {
        /// Language being built.
        language: String,
        /// Underlying source error.
        #[source]
        source: SourceError,
    },
}

/// Options shared by every language build.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildOptions {
    /// Prefix full URLs with `/{language}`.
    pub multi_language: bool,
}

/// Complete artifact set for one language.
#[derive(Clone, Debug)]
pub struct NavigationCache {
    /// Language code.
    pub language: String,
    /// Page id to relative URL.
    pub keys: KeyMap,
    /// Navigation tree.
    pub navigation: NavTree,
    /// Editor link list.
    pub link_list: Vec<EditorLink>,
}

/// Builds [`NavigationCache`]s from a [`PageSource`].
pub struct CacheBuilder<'a> {
    source: &'a dyn PageSource,
    options: BuildOptions,
}

impl<'a> CacheBuilder<'a> {
    /// Create a new builder.
    #[must_use]
    pub fn new(source: &'a dyn PageSource, options: BuildOptions) -> Self {
        Self { source, options }
    }

    /// Build the artifact set for `language`.
    ///
    /// Block and widget extras are loaded fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Source`] if any read from the source fails.
    pub fn build(&self, language: &str) -> Result<NavigationCache, BuildError> {
        let source_error = |source| BuildError::Source {
            language: language.to_owned(),
            source,
        };

        let blocks = BlockRegistry::load(self.source).map_err(source_error)?;
        let sitemap = SitemapResolver::load(self.source).map_err(source_error)?;
        let levels = self.source.page_levels(language).map_err(source_error)?;

        let (keys, navigation) = TreeBuilder::new(
            language,
            self.options.multi_language,
            &blocks,
            sitemap.sitemap_extra_id(),
        )
        .build(&levels);

        let titles: HashMap<u32, String> = self
            .source
            .navigation_titles(language, &keys.ids())
            .map_err(source_error)?;

        let orders = linearize_all(&navigation);
        let link_list =
            LinkListBuilder::new(&keys, &titles, self.options.multi_language).build(&orders);

        tracing::debug!(
            language,
            page_count = keys.len(),
            link_count = link_list.len(),
            "Built navigation cache"
        );

        Ok(NavigationCache {
            language: language.to_owned(),
            keys,
            navigation,
            link_list,
        })
    }
}
