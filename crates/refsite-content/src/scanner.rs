//! Content discovery by filesystem walking.
//!
//! The scanner only identifies files; nothing is read here. The loader turns
//! the returned references into [`ContentUnit`](crate::ContentUnit)s.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::LoadError;
use crate::language::extension;

/// Reference to a discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceRef {
    /// Path segments relative to the content root.
    pub segments: Vec<String>,
    /// Absolute (or root-joined) filesystem path.
    pub path: PathBuf,
}

/// Files found by a scan, in deterministic depth-first name order.
#[derive(Debug, Default)]
pub(crate) struct ScanResult {
    /// Content files.
    pub files: Vec<SourceRef>,
    /// Directory metadata files. `segments` holds the directory path.
    pub metas: Vec<SourceRef>,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Walks a content root and classifies files.
pub(crate) struct Scanner<'a> {
    meta_filename: &'a str,
    ignore_extensions: &'a [String],
    exclude: &'a [Pattern],
}

impl<'a> Scanner<'a> {
    pub fn new(
        meta_filename: &'a str,
        ignore_extensions: &'a [String],
        exclude: &'a [Pattern],
    ) -> Self {
        Self {
            meta_filename,
            ignore_extensions,
            exclude,
        }
    }

    /// Scan `root` recursively.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, LoadError> {
        let mut result = ScanResult::default();
        let mut prefix = Vec::new();
        self.scan_directory(root, &mut prefix, &mut result)?;
        Ok(result)
    }

    fn scan_directory(
        &self,
        dir: &Path,
        prefix: &mut Vec<String>,
        result: &mut ScanResult,
    ) -> Result<(), LoadError> {
        let entries = fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;

        let mut entries: Vec<_> = entries
            .map(|entry| -> Result<_, LoadError> {
                let entry = entry.map_err(|e| LoadError::io(dir, e))?;
                let name = entry
                    .file_name()
                    .into_string()
                    .map_err(|_| LoadError::InvalidFileName { path: entry.path() })?;
                let is_dir = entry
                    .file_type()
                    .map_err(|e| LoadError::io(entry.path(), e))?
                    .is_dir();
                Ok((name, entry.path(), is_dir))
            })
            .collect::<Result<_, _>>()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, path, is_dir) in entries {
            if name.starts_with('.') {
                continue;
            }

            prefix.push(name);
            let relative = prefix.join("/");
            if self.is_excluded(&relative) {
                tracing::debug!(path = %relative, "Excluded by pattern");
                prefix.pop();
                continue;
            }

            if is_dir {
                self.scan_directory(&path, prefix, result)?;
                prefix.pop();
                continue;
            }

            let name = prefix.last().map_or("", String::as_str);
            if name == self.meta_filename {
                result.metas.push(SourceRef {
                    segments: prefix[..prefix.len() - 1].to_vec(),
                    path,
                });
            } else if self.is_content_file(name) {
                result.files.push(SourceRef {
                    segments: prefix.clone(),
                    path,
                });
            } else {
                tracing::debug!(path = %relative, "Skipping non-content file");
            }
            prefix.pop();
        }

        Ok(())
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude
            .iter()
            .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }

    fn is_content_file(&self, name: &str) -> bool {
        match extension(name) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                !self.ignore_extensions.iter().any(|ignored| *ignored == ext)
            }
            None => false,
        }
    }
}
