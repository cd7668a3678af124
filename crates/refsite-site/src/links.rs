//! Link generation between output pages.
//!
//! Every route is published as `<route>/index.html`, so a page's base
//! directory is its own route.

use refsite_content::Route;

/// Directory holding the stylesheet and script.
pub(crate) const ASSETS_DIR: &str = "assets";

/// Builds `href` values for pages and assets.
#[derive(Clone, Debug)]
pub(crate) struct Links {
    relative: bool,
    base_url: String,
}

impl Links {
    pub fn new(relative: bool, base_url: &str) -> Self {
        let mut base_url = base_url.to_owned();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { relative, base_url }
    }

    /// Link from the page at `from` to the page at `to`.
    pub fn page(&self, from: &Route, to: &Route) -> String {
        if self.relative {
            relative_page_href(from, to)
        } else if to.is_root() {
            self.base_url.clone()
        } else {
            format!("{}{to}/", self.base_url)
        }
    }

    /// Link from the page at `from` to an asset file.
    pub fn asset(&self, from: &Route, name: &str) -> String {
        if self.relative {
            format!("{}{ASSETS_DIR}/{name}", "../".repeat(from.depth()))
        } else {
            format!("{}{ASSETS_DIR}/{name}", self.base_url)
        }
    }
}

/// Relative link that works without a server: it names `index.html`
/// explicitly.
fn relative_page_href(from: &Route, to: &Route) -> String {
    let from_segs: Vec<&str> = from.segments().collect();
    let to_segs: Vec<&str> = to.segments().collect();

    let common = from_segs
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut href = "../".repeat(from_segs.len() - common);
    for segment in &to_segs[common..] {
        href.push_str(segment);
        href.push('/');
    }
    href.push_str("index.html");
    href
}
