//! Page id to relative URL mapping.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Mapping from page id to its relative URL (no leading slash, home is `""`).
///
/// Entries are stored in insertion order and presented (iterated and
/// serialised) sorted by URL. The sort is stable, so pages sharing a URL keep
/// their insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMap {
    entries: IndexMap<u32, String>,
}

impl KeyMap {
    /// Create an empty key map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL of `page_id`, returning the previous URL if there was one.
    ///
    /// A replaced entry keeps its original insertion position.
    pub fn insert(&mut self, page_id: u32, url: String) -> Option<String> {
        self.entries.insert(page_id, url)
    }

    /// Relative URL of `page_id`.
    #[must_use]
    pub fn get(&self, page_id: u32) -> Option<&str> {
        self.entries.get(&page_id).map(String::as_str)
    }

    /// Whether `page_id` has an entry.
    #[must_use]
    pub fn contains(&self, page_id: u32) -> bool {
        self.entries.contains_key(&page_id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Page ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    /// Entries sorted by URL.
    #[must_use]
    pub fn sorted(&self) -> Vec<(u32, &str)> {
        let mut sorted: Vec<(u32, &str)> = self
            .entries
            .iter()
            .map(|(&id, url)| (id, url.as_str()))
            .collect();
        sorted.sort_by(|a, b| a.1.cmp(b.1));
        sorted
    }

    /// URL to page id index for reverse lookups.
    ///
    /// When several pages share a URL, the first one in presentation order
    /// wins.
    #[must_use]
    pub fn reverse_index(&self) -> HashMap<&str, u32> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (&id, url) in &self.entries {
            index.entry(url.as_str()).or_insert(id);
        }
        index
    }
}

impl Serialize for KeyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (id, url) in sorted {
            map.serialize_entry(&id, url)?;
        }
        map.end()
    }
}
