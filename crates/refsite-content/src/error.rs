//! Load error type.

use std::path::PathBuf;

use crate::route::Route;

/// Fatal error raised while loading the content tree.
///
/// Any `LoadError` aborts the build before output is written.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Content root is missing or not a directory.
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// A file or directory could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A file is not valid UTF-8 text.
    #[error("{} is not valid UTF-8 text", path.display())]
    Decode { path: PathBuf },
    /// A file or directory name is not valid UTF-8.
    #[error("File name is not valid UTF-8: {}", path.display())]
    InvalidFileName { path: PathBuf },
    /// Two sources normalize to the same route.
    #[error("Duplicate route \"{route}\": {first} and {second}")]
    DuplicateRoute {
        route: Route,
        first: String,
        second: String,
    },
    /// A directory metadata file is malformed.
    #[error("Invalid metadata in {}: {source}", path.display())]
    InvalidMeta {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// An exclude pattern does not compile.
    #[error("Invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
