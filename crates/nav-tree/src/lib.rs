//! Navigation cache construction.
//!
//! Turns the level-ordered page rows of a [`PageSource`](nav_source::PageSource)
//! into the in-memory artifact set of one language:
//!
//! - [`KeyMap`]: page id to relative URL
//! - [`NavTree`]: derived page nodes nested as `type → parent_id → page_id`
//! - editor link list: breadcrumb-titled `[title, url]` pairs in navigation order
//!
//! # Example
//!
//! ```ignore
//! use nav_source::FsSource;
//! use nav_tree::{BuildOptions, CacheBuilder};
//!
//! let source = FsSource::new("data".into());
//! let builder = CacheBuilder::new(&source, BuildOptions { multi_language: true });
//! let cache = builder.build("en")?;
//! println!("{} pages", cache.keys.len());
//! ```

mod builder;
mod escape;
mod extras;
mod keys;
mod linearize;
mod link_list;
mod node;
mod payload;
mod reconstruct;

pub use builder::{BuildError, BuildOptions, CacheBuilder, NavigationCache};
pub use escape::{decode_html_entities, escape_quotes};
pub use extras::{BlockRegistry, SitemapResolver};
pub use keys::KeyMap;
pub use linearize::{OrderEntry, linearize, linearize_all};
pub use link_list::{EditorLink, LINK_LIST_TYPE_ORDER, LinkListBuilder};
pub use node::{ContentBlockRef, NavNode, NavTree, Redirect, Siblings, TreeType};
pub use payload::DEFAULT_REDIRECT_CODE;
pub use reconstruct::{ERROR_PAGE_ID, HOME_PAGE_ID, TreeBuilder};
