//! Path-to-route mapping.
//!
//! A [`Route`] is the URL path a content unit is published under. Routes are
//! derived from source paths (sequences of path segments) by a pure function:
//! the same input always yields byte-identical output.
//!
//! # Normalization
//!
//! Each segment keeps ASCII alphanumerics and `-` (case preserved). Any other
//! ASCII character becomes `-`, non-ASCII alphanumerics are percent-encoded
//! and remaining characters become `-`. Runs of `-` collapse and are trimmed
//! from both ends; a segment left empty becomes `_`.
//!
//! | source path      | nested    | flat     |
//! |------------------|-----------|----------|
//! | `a/b/c.cpp`      | `a/b/c`   | `a-b-c`  |
//! | `a/b.cpp`        | `a/b`     | `a-b`    |
//! | `a_b.cpp`        | `a-b`     | `a-b`    |
//! | `01 Intro/x.hpp` | `01-Intro/x` | `01-Intro-x` |
//!
//! The mapper does not guarantee injectivity; the loader rejects collisions.

use std::fmt;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// Placeholder for segments that normalize to nothing.
const EMPTY_SEGMENT: &str = "_";

/// How path segments are joined into a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RouteStyle {
    /// Keep the directory hierarchy: segments joined with `/`.
    #[default]
    Nested,
    /// One segment per unit: segments joined with `-`.
    Flat,
}

impl RouteStyle {
    fn separator(self) -> char {
        match self {
            Self::Nested => '/',
            Self::Flat => '-',
        }
    }
}

/// Normalized URL path without leading or trailing slash.
///
/// The empty route is the site root.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    /// The site root.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Wrap an already normalized path.
    ///
    /// Used for routes read back from a tree; prefer [`file_route`] and
    /// [`directory_route`] for source paths.
    #[must_use]
    pub fn from_normalized(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Route segments (empty for the root).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Parent route, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rsplit_once('/') {
            Some((parent, _)) => Self(parent.to_owned()),
            None => Self::root(),
        })
    }

    /// Append a normalized segment.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        if self.is_root() {
            Self(segment.to_owned())
        } else {
            Self(format!("{}/{segment}", self.0))
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Map a file path to its route.
///
/// The extension of the last segment is dropped.
///
/// # Examples
///
/// ```
/// use refsite_content::{RouteStyle, file_route};
///
/// assert_eq!(file_route(&["a", "b", "c.cpp"], RouteStyle::Nested).as_str(), "a/b/c");
/// assert_eq!(file_route(&["a", "b.cpp"], RouteStyle::Flat).as_str(), "a-b");
/// assert_eq!(file_route(&["a_b.cpp"], RouteStyle::Flat).as_str(), "a-b");
/// ```
pub fn file_route<S: AsRef<str>>(path: &[S], style: RouteStyle) -> Route {
    let Some((last, dirs)) = path.split_last() else {
        return Route::root();
    };
    let stem = strip_extension(last.as_ref());
    join_segments(
        dirs.iter().map(AsRef::as_ref).chain(std::iter::once(stem)),
        style,
    )
}

/// Map a directory path to its route. All segments are kept verbatim.
pub fn directory_route<S: AsRef<str>>(path: &[S], style: RouteStyle) -> Route {
    join_segments(path.iter().map(AsRef::as_ref), style)
}

fn join_segments<'a>(segments: impl Iterator<Item = &'a str>, style: RouteStyle) -> Route {
    let mut route = String::new();
    for segment in segments {
        if !route.is_empty() {
            route.push(style.separator());
        }
        route.push_str(&normalize_segment(segment));
    }
    Route(route)
}

/// Remove the extension from a file name.
///
/// Names starting with their only dot (`.profile`) are returned unchanged.
pub(crate) fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Normalize one path segment into its URL-safe form.
pub fn normalize_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut pending_dash = false;

    for c in segment.chars() {
        let keep = c.is_ascii_alphanumeric() || (!c.is_ascii() && c.is_alphanumeric());
        if !keep {
            pending_dash = true;
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;

        if c.is_ascii() {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for part in utf8_percent_encode(c.encode_utf8(&mut buf), NON_ALPHANUMERIC) {
                out.push_str(part);
            }
        }
    }

    if out.is_empty() {
        EMPTY_SEGMENT.to_owned()
    } else {
        out
    }
}
