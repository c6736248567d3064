//! Directory-backed artifact sink.
//!
//! [`FileSink`] publishes a language in three phases:
//!
//! 1. encode all artifacts in memory
//! 2. write every artifact to a staging file inside the target directory
//! 3. copy each published file aside, then rename its staging file over it
//!
//! A failure in phase 1 or 2 drops the staging files and leaves the
//! previously published set untouched. A failure in phase 3 moves the
//! copies back over the files already replaced and removes the ones that
//! did not exist before. Staging files and copies live next to their
//! targets, so every rename stays on one filesystem.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use nav_tree::NavigationCache;
use tempfile::NamedTempFile;

use crate::artifact::{Artifact, encode};
use crate::{ArtifactSink, EmitError, Published};

/// Publishes artifacts as files in one directory.
///
/// Directory layout:
/// ```text
/// {dir}/
/// +-- keys_en.json
/// +-- navigation_en.json
/// +-- editor_link_list_en.js
/// +-- keys_nl.json
/// +-- ...
/// ```
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into `dir`. The directory is created on first publish.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn stage(&self, artifact: &Artifact) -> Result<(NamedTempFile, PathBuf), EmitError> {
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(|e| EmitError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        staged
            .write_all(&artifact.contents)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| EmitError::Io {
                path: staged.path().to_path_buf(),
                source: e,
            })?;
        Ok((staged, self.dir.join(&artifact.file_name)))
    }

    /// Copy the currently published `target` aside, `None` if there is none.
    fn back_up(&self, target: &Path) -> Result<Option<NamedTempFile>, EmitError> {
        let io_error = |source| EmitError::Io {
            path: target.to_path_buf(),
            source,
        };
        match fs::symlink_metadata(target) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        }

        let backup = NamedTempFile::new_in(&self.dir).map_err(|e| EmitError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        fs::copy(target, backup.path()).map_err(io_error)?;
        Ok(Some(backup))
    }

    /// Move `staged` over `target`, returning the copy of the replaced file.
    fn replace(
        &self,
        staged: NamedTempFile,
        target: &Path,
    ) -> Result<Option<NamedTempFile>, EmitError> {
        let backup = self.back_up(target)?;
        staged.persist(target).map_err(|e| EmitError::Persist {
            path: target.to_path_buf(),
            source: e.error,
        })?;
        Ok(backup)
    }
}

/// Undo replacements in reverse order.
fn roll_back(replaced: Vec<(PathBuf, Option<NamedTempFile>)>) {
    for (path, backup) in replaced.into_iter().rev() {
        let restored = match backup {
            Some(backup) => backup.persist(&path).map(|_| ()).map_err(|e| e.error),
            None => fs::remove_file(&path),
        };
        if let Err(e) = restored {
            tracing::warn!(path = %path.display(), error = %e, "Failed to restore artifact");
        }
    }
}

impl ArtifactSink for FileSink {
    fn publish(&self, cache: &NavigationCache) -> Result<Published, EmitError> {
        let artifacts = encode(cache)?;

        fs::create_dir_all(&self.dir).map_err(|e| EmitError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let staged = artifacts
            .iter()
            .map(|artifact| self.stage(artifact))
            .collect::<Result<Vec<_>, _>>()?;

        let bytes: usize = artifacts.iter().map(|artifact| artifact.contents.len()).sum();
        let mut replaced = Vec::with_capacity(staged.len());
        for (file, path) in staged {
            match self.replace(file, &path) {
                Ok(backup) => replaced.push((path, backup)),
                Err(err) => {
                    roll_back(replaced);
                    return Err(err);
                }
            }
        }
        let paths: Vec<PathBuf> = replaced.into_iter().map(|(path, _)| path).collect();

        tracing::debug!(
            language = %cache.language,
            dir = %self.dir.display(),
            bytes,
            "Published navigation artifacts"
        );

        Ok(Published {
            language: cache.language.clone(),
            paths,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use nav_source::{MockSource, PageRow};
    use nav_tree::{BuildOptions, CacheBuilder};
    use tempfile::TempDir;

    use super::*;

    fn create_cache(language: &str) -> NavigationCache {
        let source = MockSource::new()
            .with_level(vec![PageRow::new(1, 0, "")])
            .with_level(vec![PageRow::new(2, 1, "about")])
            .with_title(language, 1, "Home")
            .with_title(language, 2, "About");
        CacheBuilder::new(
            &source,
            BuildOptions {
                multi_language: true,
            },
        )
        .build(language)
        .unwrap()
    }

    #[test]
    fn test_publish_writes_three_files() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new(temp.path().join("navigation"));

        let published = sink.publish(&create_cache("en")).unwrap();

        assert_eq!(published.language, "en");
        assert_eq!(published.paths.len(), 3);
        for name in ["keys_en.json", "navigation_en.json", "editor_link_list_en.js"] {
            assert!(sink.dir().join(name).is_file(), "{name} missing");
        }

        let keys: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(sink.dir().join("keys_en.json")).unwrap())
                .unwrap();
        assert_eq!(keys["2"], "about");

        let script = fs::read_to_string(sink.dir().join("editor_link_list_en.js")).unwrap();
        assert!(script.contains(r#"["About","/en/about"]"#));
    }

    #[test]
    fn test_publish_leaves_no_staging_files() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new(temp.path().to_path_buf());

        sink.publish(&create_cache("en")).unwrap();

        let count = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_republish_replaces_files() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new(temp.path().to_path_buf());
        fs::write(temp.path().join("keys_en.json"), "stale").unwrap();

        sink.publish(&create_cache("en")).unwrap();

        let keys = fs::read_to_string(temp.path().join("keys_en.json")).unwrap();
        assert!(keys.contains("about"));
    }

    #[test]
    fn test_languages_published_side_by_side() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new(temp.path().to_path_buf());

        sink.publish(&create_cache("en")).unwrap();
        sink.publish(&create_cache("nl")).unwrap();

        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 6);
    }

    #[test]
    fn test_failed_rename_restores_replaced_files() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new(temp.path().to_path_buf());
        fs::write(temp.path().join("keys_en.json"), "OLD").unwrap();
        let blocker = temp.path().join("navigation_en.json");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("entry"), "x").unwrap();

        let err = sink.publish(&create_cache("en")).unwrap_err();

        assert!(err.to_string().contains("navigation_en.json"));
        assert_eq!(
            fs::read_to_string(temp.path().join("keys_en.json")).unwrap(),
            "OLD"
        );
        assert!(blocker.is_dir());
        assert!(!temp.path().join("editor_link_list_en.js").exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_rename_removes_new_files() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new(temp.path().to_path_buf());
        let blocker = temp.path().join("editor_link_list_en.js");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("entry"), "x").unwrap();

        sink.publish(&create_cache("en")).unwrap_err();

        assert!(!temp.path().join("keys_en.json").exists());
        assert!(!temp.path().join("navigation_en.json").exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_republish_leaves_no_backups() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new(temp.path().to_path_buf());

        sink.publish(&create_cache("en")).unwrap();
        sink.publish(&create_cache("en")).unwrap();

        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_unwritable_dir_keeps_nothing() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("navigation");
        fs::write(&blocker, "not a directory").unwrap();
        let sink = FileSink::new(blocker.clone());

        let err = sink.publish(&create_cache("en")).unwrap_err();

        assert!(matches!(err, EmitError::Io { .. }));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }
}
