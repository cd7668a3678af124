//! Breadcrumbs from a unit's ancestor directories.

use std::collections::BTreeMap;

use refsite_content::{Route, RouteStyle, directory_route, title_from_segment};
use serde::Serialize;

/// Title of the root breadcrumb.
pub const HOME_TITLE: &str = "Home";

/// One breadcrumb entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub title: String,
    /// Link target; `None` when the directory has no page of its own.
    pub route: Option<Route>,
}

/// Build breadcrumbs for a unit in `directory` (source path segments,
/// without the file name).
///
/// The trail starts at the site root. Directory titles come from
/// `titles` when present, otherwise from the segment name. Only nested
/// routes give directories their own pages, so flat trails are unlinked
/// below the root.
pub fn breadcrumbs<S: AsRef<str>>(
    directory: &[S],
    style: RouteStyle,
    titles: &BTreeMap<Route, String>,
) -> Vec<Breadcrumb> {
    let mut trail = Vec::with_capacity(directory.len() + 1);
    trail.push(Breadcrumb {
        title: HOME_TITLE.to_owned(),
        route: Some(Route::root()),
    });

    for depth in 1..=directory.len() {
        let route = directory_route(&directory[..depth], style);
        let title = titles
            .get(&route)
            .cloned()
            .unwrap_or_else(|| title_from_segment(directory[depth - 1].as_ref()));
        trail.push(Breadcrumb {
            title,
            route: (style == RouteStyle::Nested).then_some(route),
        });
    }
    trail
}
