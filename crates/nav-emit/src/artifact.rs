//! In-memory encoding of the three navigation artifacts.

use nav_tree::NavigationCache;

use crate::EmitError;

/// One of the three files published per language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Page id to relative URL, `keys_{lang}.json`.
    Keys,
    /// Navigation tree, `navigation_{lang}.json`.
    Navigation,
    /// Editor link list script, `editor_link_list_{lang}.js`.
    LinkList,
}

impl ArtifactKind {
    /// Every artifact kind in publish order.
    pub const ALL: [Self; 3] = [Self::Keys, Self::Navigation, Self::LinkList];

    /// File name of this artifact for `language`.
    #[must_use]
    pub fn file_name(self, language: &str) -> String {
        match self {
            Self::Keys => format!("keys_{language}.json"),
            Self::Navigation => format!("navigation_{language}.json"),
            Self::LinkList => format!("editor_link_list_{language}.js"),
        }
    }
}

/// Encoded artifact ready to be written.
#[derive(Clone, Debug)]
pub struct Artifact {
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Target file name.
    pub file_name: String,
    /// Encoded file contents.
    pub contents: Vec<u8>,
}

/// Encode every artifact of `cache` without touching the filesystem.
pub fn encode(cache: &NavigationCache) -> Result<Vec<Artifact>, EmitError> {
    ArtifactKind::ALL
        .into_iter()
        .map(|kind| {
            Ok(Artifact {
                kind,
                file_name: kind.file_name(&cache.language),
                contents: encode_one(kind, cache)?,
            })
        })
        .collect()
}

fn encode_one(kind: ArtifactKind, cache: &NavigationCache) -> Result<Vec<u8>, EmitError> {
    match kind {
        ArtifactKind::Keys => Ok(serde_json::to_vec_pretty(&cache.keys)?),
        ArtifactKind::Navigation => Ok(serde_json::to_vec_pretty(&cache.navigation)?),
        ArtifactKind::LinkList => {
            let links = serde_json::to_string(&cache.link_list)?;
            Ok(link_list_script(&cache.language, &links).into_bytes())
        }
    }
}

/// Wrap the JSON link list into the script the editor loads.
fn link_list_script(language: &str, links_json: &str) -> String {
    format!(
        "/**\n * Generated by navcache, do not edit.\n * Links to every page of the '{language}' site, used by the editor.\n */\nvar linkList = {links_json};"
    )
}
