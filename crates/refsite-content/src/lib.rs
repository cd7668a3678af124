//! Content loading and route mapping for refsite.
//!
//! This crate turns a directory tree of source files into a [`ContentSet`]:
//!
//! - [`ContentLoader`] walks the tree, skips non-content files, reads and
//!   decodes files in parallel and rejects route collisions
//! - [`file_route`] / [`directory_route`] map source paths to [`Route`]s
//! - [`LanguageMap`] infers language tags from file extensions
//! - [`DirectoryMeta`] carries per-directory titles from `meta.yaml` sidecars
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use refsite_content::{ContentLoader, LoaderConfig};
//!
//! let set = ContentLoader::new(LoaderConfig::default()).load(Path::new("pages"))?;
//! for (route, unit) in set.units() {
//!     println!("{route} <- {}", unit.source_path());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod language;
mod loader;
mod paths;
mod route;
mod scanner;
mod title;
mod unit;

pub use error::LoadError;
pub use language::{LanguageMap, MARKDOWN};
pub use loader::{ContentLoader, ContentSet, LoaderConfig};
pub use paths::{dirs_overlap, resolve_path};
pub use route::{Route, RouteStyle, directory_route, file_route, normalize_segment};
pub use title::{extract_markdown_title, title_from_segment};
pub use unit::{ContentUnit, DirectoryMeta};
