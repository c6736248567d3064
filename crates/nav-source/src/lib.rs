//! Data sources for the navigation cache builder.
//!
//! This crate provides a [`PageSource`] trait that decouples the cache builder
//! from the content store holding pages and extras. This enables:
//!
//! - **Unit testing** without a real content store
//! - **Backend flexibility** (JSON fixtures, SQL databases, remote APIs)
//! - **Clean separation** between tree reconstruction and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`PageSource`] trait with `page_levels()`, `extras()` and `navigation_titles()`
//! - [`FsSource`] reading `pages.json` and `extras.json` from a directory
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use nav_source::{FsSource, PageSource};
//!
//! let source = FsSource::new(PathBuf::from("data"));
//! for (depth, level) in source.page_levels("en")?.iter().enumerate() {
//!     println!("level {depth}: {} pages", level.len());
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod row;
mod source;

pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::{MockFailure, MockSource};
pub use row::{Extra, ExtraKind, PageRow, PageType};
pub use source::{PageSource, SourceError, SourceErrorKind};
