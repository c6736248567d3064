//! Source trait and error types.
//!
//! Provides the core [`PageSource`] trait for the three collaborators the
//! cache builder reads from (page rows, extras, navigation titles), along with
//! [`SourceError`] for unified error handling across backends.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::row::{Extra, ExtraKind, PageRow};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Backing resource does not exist.
    NotFound,
    /// Backing resource exists but cannot be decoded.
    Malformed,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Source error with semantic kind and backend-specific source.
///
/// Any source error is fatal to the build that triggered it.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted => {
                SourceErrorKind::Unavailable
            }
            _ => SourceErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// Get the semantic error kind.
    #[must_use]
    pub fn kind(&self) -> &SourceErrorKind {
        &self.kind
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::Malformed => "Malformed data",
            SourceErrorKind::Unavailable => "Unavailable",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Content store access for one cache build.
///
/// Implementations perform all blocking I/O; the cache builder only consumes
/// the returned collections.
pub trait PageSource: Send + Sync {
    /// Return the page tree of a language grouped by depth.
    ///
    /// The outer vector is ordered root-first: level 0 holds every row whose
    /// parent is `0`, level n+1 every row whose parent is in level n. Within
    /// a level, rows are in navigation (sequence) order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the rows cannot be read.
    fn page_levels(&self, language: &str) -> Result<Vec<Vec<PageRow>>, SourceError>;

    /// Return all non-hidden extras of a kind, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the extras cannot be read.
    fn extras(&self, kind: ExtraKind) -> Result<Vec<Extra>, SourceError>;

    /// Return the navigation title of every active page among `ids`.
    ///
    /// Ids of pages that are not active in `language` are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the titles cannot be read.
    fn navigation_titles(
        &self,
        language: &str,
        ids: &[u32],
    ) -> Result<HashMap<u32, String>, SourceError>;
}
