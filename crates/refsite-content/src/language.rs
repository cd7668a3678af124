//! Language tag detection from file extensions.

use std::collections::BTreeMap;

/// Language tag for Markdown prose units.
pub const MARKDOWN: &str = "markdown";

/// Built-in extension aliases. Extensions not listed keep their own name as tag.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("c++", "cpp"),
    ("hpp", "cpp"),
    ("hh", "cpp"),
    ("hxx", "cpp"),
    ("h++", "cpp"),
    ("ipp", "cpp"),
    ("tpp", "cpp"),
    ("c", "c"),
    ("h", "c"),
    ("py", "python"),
    ("pyw", "python"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("rs", "rust"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("md", MARKDOWN),
    ("markdown", MARKDOWN),
    ("txt", "text"),
    ("text", "text"),
];

/// Maps file extensions to language tags.
///
/// User overrides take precedence over the built-in table.
#[derive(Clone, Debug, Default)]
pub struct LanguageMap {
    overrides: BTreeMap<String, String>,
}

impl LanguageMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add extension overrides (extension without dot, case-insensitive).
    #[must_use]
    pub fn with_overrides<K, V>(mut self, overrides: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.overrides.extend(
            overrides
                .into_iter()
                .map(|(ext, tag)| (ext.as_ref().to_lowercase(), tag.into())),
        );
        self
    }

    /// Language tag for a lowercase extension.
    #[must_use]
    pub fn tag_for_extension(&self, ext: &str) -> String {
        if let Some(tag) = self.overrides.get(ext) {
            return tag.clone();
        }
        BUILTIN_ALIASES
            .iter()
            .find(|(alias, _)| *alias == ext)
            .map_or_else(|| ext.to_owned(), |(_, tag)| (*tag).to_owned())
    }

    /// Detect the language tag of a file name, `None` if it has no extension.
    #[must_use]
    pub fn detect(&self, file_name: &str) -> Option<String> {
        extension(file_name).map(|ext| self.tag_for_extension(&ext.to_lowercase()))
    }
}

/// Extension of a file name. Leading-dot names have none.
pub(crate) fn extension(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => Some(&file_name[idx + 1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_aliases() {
        let map = LanguageMap::new();
        assert_eq!(map.detect("main.cpp").as_deref(), Some("cpp"));
        assert_eq!(map.detect("interface.HPP").as_deref(), Some("cpp"));
        assert_eq!(map.detect("typedef_struct.c").as_deref(), Some("c"));
        assert_eq!(map.detect("print_table.py").as_deref(), Some("python"));
        assert_eq!(map.detect("app.js").as_deref(), Some("javascript"));
        assert_eq!(map.detect("index.md").as_deref(), Some("markdown"));
    }

    #[test]
    fn test_unknown_extension_keeps_name() {
        let map = LanguageMap::new();
        assert_eq!(map.detect("output.ansi").as_deref(), Some("ansi"));
        assert_eq!(map.detect("example.Color").as_deref(), Some("color"));
    }

    #[test]
    fn test_no_extension() {
        let map = LanguageMap::new();
        assert_eq!(map.detect("Makefile"), None);
        assert_eq!(map.detect(".hidden"), None);
        assert_eq!(map.detect("trailing."), None);
    }

    #[test]
    fn test_overrides_win() {
        let map = LanguageMap::new().with_overrides([("H", "cpp"), ("ino", "cpp")]);
        assert_eq!(map.detect("legacy.h").as_deref(), Some("cpp"));
        assert_eq!(map.detect("sketch.ino").as_deref(), Some("cpp"));
        assert_eq!(map.detect("plain.c").as_deref(), Some("c"));
    }
}
