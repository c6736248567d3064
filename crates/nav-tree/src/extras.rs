//! Block registry and sitemap widget lookup.
//!
//! Both are loaded once per [`CacheBuilder::build`](crate::CacheBuilder::build)
//! call and owned by that call, so builds for different languages never share
//! a stale snapshot.

use std::collections::HashMap;

use nav_source::{Extra, ExtraKind, PageSource, SourceError};

use crate::node::ContentBlockRef;

/// Widget action identifying the sitemap widget.
const SITEMAP_ACTION: &str = "Sitemap";

/// Content blocks available for attachment to pages, keyed by extra id.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    blocks: HashMap<u32, ContentBlockRef>,
}

impl BlockRegistry {
    /// Load every non-hidden block extra from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the extras cannot be read.
    pub fn load(source: &dyn PageSource) -> Result<Self, SourceError> {
        let extras = source.extras(ExtraKind::Block)?;
        tracing::debug!(block_count = extras.len(), "Loaded content blocks");
        Ok(Self::from_extras(extras))
    }

    /// Build a registry from already fetched block extras.
    #[must_use]
    pub fn from_extras(extras: impl IntoIterator<Item = Extra>) -> Self {
        let blocks = extras
            .into_iter()
            .map(|extra| {
                (
                    extra.id,
                    ContentBlockRef {
                        id: extra.id,
                        module: extra.module,
                        action: extra.action,
                    },
                )
            })
            .collect();
        Self { blocks }
    }

    /// Look up a block by extra id.
    #[must_use]
    pub fn resolve(&self, extra_id: u32) -> Option<&ContentBlockRef> {
        self.blocks.get(&extra_id)
    }

    /// Number of registered blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no blocks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Id of the widget extra that renders the sitemap.
#[derive(Debug, Default, Clone, Copy)]
pub struct SitemapResolver {
    sitemap_id: Option<u32>,
}

impl SitemapResolver {
    /// Load the widget extras from `source` and find the sitemap widget.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the extras cannot be read.
    pub fn load(source: &dyn PageSource) -> Result<Self, SourceError> {
        let resolver = Self::from_widgets(&source.extras(ExtraKind::Widget)?);
        if resolver.sitemap_id.is_none() {
            tracing::debug!("No sitemap widget found");
        }
        Ok(resolver)
    }

    /// Pick the first widget whose action is exactly `Sitemap`.
    #[must_use]
    pub fn from_widgets(widgets: &[Extra]) -> Self {
        let sitemap_id = widgets
            .iter()
            .find(|widget| widget.action.as_deref() == Some(SITEMAP_ACTION))
            .map(|widget| widget.id);
        Self { sitemap_id }
    }

    /// The sitemap widget id, if the site has one.
    #[must_use]
    pub fn sitemap_extra_id(&self) -> Option<u32> {
        self.sitemap_id
    }
}

#[cfg(test)]
mod tests {
    use nav_source::MockSource;

    use super::*;

    fn extra(id: u32, module: &str, action: Option<&str>) -> Extra {
        Extra {
            id,
            module: module.to_owned(),
            action: action.map(str::to_owned),
        }
    }

    #[test]
    fn test_registry_resolve() {
        let registry = BlockRegistry::from_extras([
            extra(3, "ContentBlocks", None),
            extra(9, "Search", Some("Form")),
        ]);

        let block = registry.resolve(9).unwrap();
        assert_eq!(block.module, "Search");
        assert_eq!(block.action.as_deref(), Some("Form"));
        assert!(registry.resolve(3).unwrap().action.is_none());
        assert!(registry.resolve(4).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_load_from_source() {
        let source = MockSource::new()
            .with_extra(ExtraKind::Block, 3, "ContentBlocks", None)
            .with_extra(ExtraKind::Widget, 12, "Pages", Some("Sitemap"));

        let registry = BlockRegistry::load(&source).unwrap();

        assert!(registry.resolve(3).is_some());
        assert!(registry.resolve(12).is_none());
    }

    #[test]
    fn test_sitemap_first_match() {
        let resolver = SitemapResolver::from_widgets(&[
            extra(10, "Search", Some("Form")),
            extra(12, "Pages", Some("Sitemap")),
            extra(14, "Pages", Some("Sitemap")),
        ]);
        assert_eq!(resolver.sitemap_extra_id(), Some(12));
    }

    #[test]
    fn test_sitemap_match_is_case_sensitive() {
        let resolver = SitemapResolver::from_widgets(&[extra(12, "Pages", Some("sitemap"))]);
        assert_eq!(resolver.sitemap_extra_id(), None);
    }

    #[test]
    fn test_sitemap_absent() {
        let source = MockSource::new();
        let resolver = SitemapResolver::load(&source).unwrap();
        assert_eq!(resolver.sitemap_extra_id(), None);
    }
}
