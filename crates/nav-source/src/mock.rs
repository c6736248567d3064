//! Mock source implementation for testing.
//!
//! Provides [`MockSource`] for unit testing without a content store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::row::{Extra, ExtraKind, PageRow};
use crate::source::{PageSource, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Which source call a [`MockSource`] should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockFailure {
    /// Fail `page_levels`.
    Rows,
    /// Fail `extras`.
    Extras,
    /// Fail `navigation_titles`.
    Titles,
}

/// Mock source for testing.
///
/// Stores levels, extras and titles in memory. Use the builder methods
/// to configure the mock with test data. Levels are shared by every
/// language; titles are per language.
///
/// # Example
///
/// ```ignore
/// use nav_source::{ExtraKind, MockSource, PageRow, PageSource};
///
/// let source = MockSource::new()
///     .with_level(vec![PageRow::new(1, 0, "")])
///     .with_level(vec![PageRow::new(2, 1, "about")])
///     .with_title("en", 2, "About");
///
/// let levels = source.page_levels("en").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    levels: Vec<Vec<PageRow>>,
    extras: HashMap<ExtraKind, Vec<Extra>>,
    titles: HashMap<(String, u32), String>,
    failure: Option<MockFailure>,
    extras_calls: AtomicUsize,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tree level (all rows at the next depth).
    #[must_use]
    pub fn with_level(mut self, rows: Vec<PageRow>) -> Self {
        self.levels.push(rows);
        self
    }

    /// Add a non-hidden extra of the given kind.
    #[must_use]
    pub fn with_extra(
        mut self,
        kind: ExtraKind,
        id: u32,
        module: impl Into<String>,
        action: Option<&str>,
    ) -> Self {
        self.extras.entry(kind).or_default().push(Extra {
            id,
            module: module.into(),
            action: action.map(str::to_owned),
        });
        self
    }

    /// Mark page `id` as active in `language` with a navigation title.
    #[must_use]
    pub fn with_title(mut self, language: &str, id: u32, title: impl Into<String>) -> Self {
        self.titles.insert((language.to_owned(), id), title.into());
        self
    }

    /// Make one of the source calls fail with [`SourceErrorKind::Unavailable`].
    #[must_use]
    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Number of `extras` calls served so far.
    pub fn extras_calls(&self) -> usize {
        self.extras_calls.load(Ordering::Relaxed)
    }

    fn check(&self, call: MockFailure) -> Result<(), SourceError> {
        if self.failure == Some(call) {
            return Err(SourceError::new(SourceErrorKind::Unavailable).with_backend(BACKEND));
        }
        Ok(())
    }
}

impl PageSource for MockSource {
    fn page_levels(&self, _language: &str) -> Result<Vec<Vec<PageRow>>, SourceError> {
        self.check(MockFailure::Rows)?;
        Ok(self.levels.clone())
    }

    fn extras(&self, kind: ExtraKind) -> Result<Vec<Extra>, SourceError> {
        self.extras_calls.fetch_add(1, Ordering::Relaxed);
        self.check(MockFailure::Extras)?;
        Ok(self.extras.get(&kind).cloned().unwrap_or_default())
    }

    fn navigation_titles(
        &self,
        language: &str,
        ids: &[u32],
    ) -> Result<HashMap<u32, String>, SourceError> {
        self.check(MockFailure::Titles)?;
        Ok(ids
            .iter()
            .filter_map(|&id| {
                self.titles
                    .get(&(language.to_owned(), id))
                    .map(|title| (id, title.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_levels() {
        let source = MockSource::new()
            .with_level(vec![PageRow::new(1, 0, "")])
            .with_level(vec![PageRow::new(2, 1, "about")]);

        let levels = source.page_levels("en").unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1][0].url, "about");
    }

    #[test]
    fn test_mock_extras_by_kind() {
        let source = MockSource::new()
            .with_extra(ExtraKind::Block, 3, "ContentBlocks", None)
            .with_extra(ExtraKind::Widget, 12, "Pages", Some("Sitemap"));

        assert_eq!(source.extras(ExtraKind::Block).unwrap()[0].id, 3);
        assert_eq!(source.extras(ExtraKind::Widget).unwrap()[0].id, 12);
        assert_eq!(source.extras_calls(), 2);
    }

    #[test]
    fn test_mock_titles_per_language() {
        let source = MockSource::new()
            .with_title("en", 2, "About")
            .with_title("nl", 2, "Over ons");

        let titles = source.navigation_titles("nl", &[1, 2]).unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[&2], "Over ons");
    }

    #[test]
    fn test_mock_failure() {
        let source = MockSource::new().with_failure(MockFailure::Titles);

        assert!(source.page_levels("en").is_ok());
        let err = source.navigation_titles("en", &[1]).unwrap_err();
        assert_eq!(err.kind(), &SourceErrorKind::Unavailable);
    }
}
