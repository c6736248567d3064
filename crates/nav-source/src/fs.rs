//! JSON fixture source.
//!
//! [`FsSource`] reads a content store export from a directory:
//!
//! ```text
//! {root}/
//! +-- pages.json     # array of page rows with language, status and sequence
//! +-- extras.json    # array of module extras with type and hidden flag
//! ```
//!
//! Both files are read on every call so a rebuild always sees the current
//! export.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::row::{Extra, ExtraKind, PageRow, deserialize_flag};
use crate::source::{PageSource, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

const PAGES_FILE: &str = "pages.json";
const EXTRAS_FILE: &str = "extras.json";

/// Status of published pages.
const ACTIVE_STATUS: &str = "active";

/// Page row as stored in `pages.json`.
#[derive(Deserialize)]
struct StoredPage {
    #[serde(flatten)]
    row: PageRow,
    language: String,
    #[serde(default = "default_status")]
    status: String,
    #[serde(default)]
    sequence: i64,
}

fn default_status() -> String {
    ACTIVE_STATUS.to_owned()
}

/// Extra as stored in `extras.json`.
#[derive(Deserialize)]
struct StoredExtra {
    #[serde(flatten)]
    extra: Extra,
    #[serde(rename = "type")]
    kind: ExtraKind,
    #[serde(default, deserialize_with = "deserialize_flag")]
    hidden: bool,
}

/// Directory-backed [`PageSource`] reading JSON exports.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source reading from `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory this source reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, SourceError> {
        let path = self.root.join(name);
        let content = fs::read_to_string(&path)
            .map_err(|e| SourceError::io(e, Some(path.clone())).with_backend(BACKEND))?;
        serde_json::from_str(&content).map_err(|e| {
            SourceError::new(SourceErrorKind::Malformed)
                .with_backend(BACKEND)
                .with_path(path)
                .with_source(e)
        })
    }

    fn pages(&self) -> Result<Vec<StoredPage>, SourceError> {
        self.read_json(PAGES_FILE)
    }
}

/// Group pages into levels by walking parent ids down from `0`.
///
/// Each id is placed at most once, so a parent cycle cannot loop forever;
/// pages whose parent never appears are left out.
fn group_levels(mut pages: Vec<&StoredPage>) -> Vec<Vec<PageRow>> {
    pages.sort_by_key(|page| (page.sequence, page.row.id));

    let mut levels = Vec::new();
    let mut parents: HashSet<u32> = HashSet::from([0]);
    let mut placed: HashSet<u32> = HashSet::new();

    loop {
        let level: Vec<PageRow> = pages
            .iter()
            .filter(|page| parents.contains(&page.row.parent_id) && !placed.contains(&page.row.id))
            .map(|page| page.row.clone())
            .collect();
        if level.is_empty() {
            break;
        }

        parents = level.iter().map(|row| row.id).collect();
        placed.extend(parents.iter().copied());
        levels.push(level);
    }

    let orphaned = pages.len().saturating_sub(placed.len());
    if orphaned > 0 {
        tracing::debug!(orphaned, "Pages not reachable from the root were skipped");
    }

    levels
}

impl PageSource for FsSource {
    fn page_levels(&self, language: &str) -> Result<Vec<Vec<PageRow>>, SourceError> {
        let pages = self.pages()?;
        let pages = pages.iter().filter(|page| page.language == language).collect();
        Ok(group_levels(pages))
    }

    fn extras(&self, kind: ExtraKind) -> Result<Vec<Extra>, SourceError> {
        let stored: Vec<StoredExtra> = self.read_json(EXTRAS_FILE)?;
        let mut extras: Vec<Extra> = stored
            .into_iter()
            .filter(|extra| extra.kind == kind && !extra.hidden)
            .map(|extra| extra.extra)
            .collect();
        extras.sort_by_key(|extra| extra.id);
        Ok(extras)
    }

    fn navigation_titles(
        &self,
        language: &str,
        ids: &[u32],
    ) -> Result<HashMap<u32, String>, SourceError> {
        let wanted: HashSet<u32> = ids.iter().copied().collect();
        Ok(self
            .pages()?
            .into_iter()
            .filter(|page| {
                page.language == language
                    && page.status == ACTIVE_STATUS
                    && wanted.contains(&page.row.id)
            })
            .map(|page| (page.row.id, page.row.navigation_title))
            .collect())
    }
}
