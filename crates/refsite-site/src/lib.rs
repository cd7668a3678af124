//! Navigation tree and static site generation for refsite.
//!
//! [`NavTree`] mirrors the route hierarchy of a loaded
//! [`ContentSet`](refsite_content::ContentSet). [`StaticSiteBuilder`] renders
//! every unit, wraps it in the page template and writes the site:
//!
//! - `<out>/<route>/index.html` per content unit
//! - `<out>/<route>/index.html` per directory without a page of its own
//! - `<out>/index.html` with the full table of contents
//! - `<out>/navigation.json`
//! - `<out>/assets/` (stylesheet and sidebar script)

mod assets;
mod builder;
mod error;
mod links;
mod nav;
mod structure;
mod template;

pub use assets::{asset_names, get as get_asset};
pub use builder::{
    BuildConfig, BuildReport, NAVIGATION_FILE, PreparedSite, RenderWarning, StaticSiteBuilder,
};
pub use error::BuildError;
pub use nav::{NavNode, NavTree};
pub use structure::{StructureWarning, check_structure};
