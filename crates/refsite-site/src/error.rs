//! Build errors.

use std::io;
use std::path::{Path, PathBuf};

use refsite_content::{LoadError, Route};

/// Error that aborts a site build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Output directory {} overlaps source directory {}",
        output_dir.display(),
        source_dir.display()
    )]
    OutputOverlapsSource {
        source_dir: PathBuf,
        output_dir: PathBuf,
    },

    /// Two routes whose output directories differ only by letter case.
    #[error("Routes {first} and {second} collide on case-insensitive filesystems")]
    CaseCollision { first: Route, second: Route },

    #[error("Failed to serialize navigation: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
