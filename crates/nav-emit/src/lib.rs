//! Publishing of navigation cache artifacts.
//!
//! An [`ArtifactSink`] takes the complete [`NavigationCache`] of one language
//! and makes its three artifacts visible to consumers all at once:
//!
//! - `keys_{lang}.json`: page id to relative URL, sorted by URL
//! - `navigation_{lang}.json`: the nested navigation tree
//! - `editor_link_list_{lang}.js`: `var linkList = [...];` for the editor
//!
//! # Implementations
//!
//! - [`FileSink`]: stages files next to their targets and renames them into place
//! - [`NullSink`]: publishes nothing (dry runs)

mod artifact;
mod file;

use std::path::PathBuf;

use nav_tree::NavigationCache;

pub use artifact::{Artifact, ArtifactKind, encode};
pub use file::FileSink;

/// Error returned when publishing fails.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// Writing a staging file or creating the target directory failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An artifact could not be encoded.
    #[error("Failed to encode artifact: {0}")]
    Encode(#[from] serde_json::Error),
    /// A staging file could not be moved into place.
    #[error("Failed to publish {}: {source}", path.display())]
    Persist {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, Default)]
pub struct Published {
    /// Language published.
    pub language: String,
    /// Artifact paths written, empty for sinks that write nothing.
    pub paths: Vec<PathBuf>,
    /// Total encoded size in bytes.
    pub bytes: usize,
}

/// Destination for the artifact set of one language.
pub trait ArtifactSink: Send + Sync {
    /// Publish every artifact of `cache`.
    ///
    /// Either all artifacts of the language become visible or, on error,
    /// none of the previously published ones change.
    fn publish(&self, cache: &NavigationCache) -> Result<Published, EmitError>;
}

/// No-op [`ArtifactSink`] that writes nothing.
pub struct NullSink;

impl ArtifactSink for NullSink {
    fn publish(&self, cache: &NavigationCache) -> Result<Published, EmitError> {
        Ok(Published {
            language: cache.language.clone(),
            ..Published::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use nav_tree::{KeyMap, NavTree};

    use super::*;

    #[test]
    fn test_null_sink_writes_nothing() {
        let cache = NavigationCache {
            language: "en".to_owned(),
            keys: KeyMap::new(),
            navigation: NavTree::new(),
            link_list: Vec::new(),
        };

        let published = NullSink.publish(&cache).unwrap();

        assert_eq!(published.language, "en");
        assert!(published.paths.is_empty());
        assert_eq!(published.bytes, 0);
    }

    #[test]
    fn test_error_display_names_path() {
        let err = EmitError::Persist {
            path: PathBuf::from("/cache/keys_en.json"),
            source: std::io::Error::other("cross-device link"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to publish /cache/keys_en.json: cross-device link"
        );
    }
}
