//! Loaded content units and directory metadata.

use serde::Deserialize;

use crate::language::MARKDOWN;
use crate::route::strip_extension;
use crate::title::{extract_markdown_title, title_from_segment};

/// One loaded source document.
///
/// Immutable after load: the loader builds it once and hands it to the
/// renderer by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentUnit {
    path: Vec<String>,
    text: String,
    language: String,
    title: Option<String>,
}

impl ContentUnit {
    /// Create a unit from its source path segments, text and language tag.
    ///
    /// Markdown units take their title from the first level-1 heading.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty.
    #[must_use]
    pub fn new(path: Vec<String>, text: String, language: impl Into<String>) -> Self {
        assert!(!path.is_empty(), "content unit path cannot be empty");
        let language = language.into();
        let title = if language == MARKDOWN {
            extract_markdown_title(&text)
        } else {
            None
        };
        Self {
            path,
            text,
            language,
            title,
        }
    }

    /// Source path segments relative to the content root.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Ancestor directory segments.
    #[must_use]
    pub fn directory(&self) -> &[String] {
        &self.path[..self.path.len() - 1]
    }

    /// File name including extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.path[self.path.len() - 1]
    }

    /// Source path joined with `/`.
    #[must_use]
    pub fn source_path(&self) -> String {
        self.path.join("/")
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Detected language tag.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn is_markdown(&self) -> bool {
        self.language == MARKDOWN
    }

    /// Explicit title, if the content declares one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title for display: explicit title, else derived from the file stem.
    #[must_use]
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => title_from_segment(strip_extension(self.file_name())),
        }
    }
}

/// Per-directory metadata from a YAML sidecar file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DirectoryMeta {
    /// Section title.
    pub title: Option<String>,
    /// Section description shown on the section page.
    pub description: Option<String>,
}

/// Parse directory metadata. Empty content yields the default.
pub(crate) fn parse_directory_meta(content: &str) -> Result<DirectoryMeta, serde_yaml::Error> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(DirectoryMeta::default());
    }
    serde_yaml::from_str(trimmed)
}
