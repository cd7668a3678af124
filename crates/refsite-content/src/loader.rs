//! Content loading.
//!
//! Loading runs in three phases:
//! 1. Discovery: walk the root and classify files (sequential, sorted).
//! 2. Reading: read and decode every content file (parallel, `rayon`).
//! 3. Aggregation: assign routes in path order and reject collisions.
//!
//! Nothing is written anywhere; the result is a pure function of the
//! filesystem state at call time.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use rayon::prelude::*;

use crate::error::LoadError;
use crate::language::LanguageMap;
use crate::route::{Route, RouteStyle, directory_route, file_route};
use crate::scanner::{Scanner, SourceRef};
use crate::unit::{ContentUnit, DirectoryMeta, parse_directory_meta};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Loader settings.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Route layout.
    pub route_style: RouteStyle,
    /// Name of per-directory metadata files.
    pub meta_filename: String,
    /// Glob patterns (relative, `/`-separated) excluded from loading.
    pub exclude: Vec<String>,
    /// Lowercase extensions that are never content.
    pub ignore_extensions: Vec<String>,
    /// Extension to language tag mapping.
    pub languages: LanguageMap,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            route_style: RouteStyle::Nested,
            meta_filename: "meta.yaml".to_owned(),
            exclude: Vec::new(),
            ignore_extensions: Vec::new(),
            languages: LanguageMap::new(),
        }
    }
}

/// All content found beneath a root, keyed by route.
#[derive(Debug, Default)]
pub struct ContentSet {
    root: Option<PathBuf>,
    route_style: RouteStyle,
    units: BTreeMap<Route, ContentUnit>,
    directories: BTreeMap<Route, DirectoryMeta>,
}

impl ContentSet {
    /// Directory the set was loaded from; `None` for sets built in memory.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Route layout the set was loaded with.
    #[must_use]
    pub fn route_style(&self) -> RouteStyle {
        self.route_style
    }

    /// Units in route order.
    pub fn units(&self) -> impl ExactSizeIterator<Item = (&Route, &ContentUnit)> {
        self.units.iter()
    }

    /// Routes in order.
    pub fn routes(&self) -> impl ExactSizeIterator<Item = &Route> {
        self.units.keys()
    }

    #[must_use]
    pub fn get(&self, route: &Route) -> Option<&ContentUnit> {
        self.units.get(route)
    }

    /// Metadata of the directory at `route`, if a sidecar file exists.
    #[must_use]
    pub fn directory_meta(&self, route: &Route) -> Option<&DirectoryMeta> {
        self.directories.get(route)
    }

    /// All directory metadata in route order.
    pub fn directories(&self) -> impl ExactSizeIterator<Item = (&Route, &DirectoryMeta)> {
        self.directories.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Loads a content tree into a [`ContentSet`].
#[derive(Clone, Debug, Default)]
pub struct ContentLoader {
    config: LoaderConfig,
}

impl ContentLoader {
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load every content unit beneath `root`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the root is missing, a file cannot be read or
    /// decoded, a metadata file is malformed, an exclude pattern is invalid,
    /// or two sources normalize to the same route.
    pub fn load(&self, root: &Path) -> Result<ContentSet, LoadError> {
        if !root.is_dir() {
            return Err(LoadError::SourceNotFound(root.to_path_buf()));
        }

        let patterns = self.compile_patterns()?;
        let scan = Scanner::new(
            &self.config.meta_filename,
            &self.config.ignore_extensions,
            &patterns,
        )
        .scan(root)?;
        tracing::debug!(
            files = scan.files.len(),
            metas = scan.metas.len(),
            "Scanned content tree"
        );

        // Indexed parallel map keeps discovery order, so the first error
        // reported is the first failing file in path order.
        let read: Vec<Result<ContentUnit, LoadError>> = scan
            .files
            .par_iter()
            .map(|source| self.read_unit(source))
            .collect();

        let style = self.config.route_style;
        let mut units = BTreeMap::new();
        for result in read {
            let unit = result?;
            let route = file_route(unit.path(), style);
            match units.entry(route) {
                Entry::Occupied(existing) => {
                    let existing_unit: &ContentUnit = existing.get();
                    return Err(LoadError::DuplicateRoute {
                        route: existing.key().clone(),
                        first: existing_unit.source_path(),
                        second: unit.source_path(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(unit);
                }
            }
        }

        let mut directories = BTreeMap::new();
        let mut meta_sources: BTreeMap<Route, String> = BTreeMap::new();
        for source in &scan.metas {
            let meta = read_directory_meta(source)?;
            let route = directory_route(&source.segments, style);
            let source_path = source
                .segments
                .iter()
                .chain(std::iter::once(&self.config.meta_filename))
                .cloned()
                .collect::<Vec<_>>()
                .join("/");
            if let Some(first) = meta_sources.insert(route.clone(), source_path.clone()) {
                return Err(LoadError::DuplicateRoute {
                    route,
                    first,
                    second: source_path,
                });
            }
            directories.insert(route, meta);
        }

        tracing::info!(
            units = units.len(),
            directories = directories.len(),
            root = %root.display(),
            "Loaded content"
        );

        Ok(ContentSet {
            root: Some(root.to_path_buf()),
            route_style: style,
            units,
            directories,
        })
    }

    fn compile_patterns(&self) -> Result<Vec<Pattern>, LoadError> {
        self.config
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| LoadError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    fn read_unit(&self, source: &SourceRef) -> Result<ContentUnit, LoadError> {
        let text = read_text(&source.path)?;
        let file_name = source.segments.last().map_or("", String::as_str);
        // The scanner only yields files with an extension.
        let language = self
            .config
            .languages
            .detect(file_name)
            .unwrap_or_else(|| "text".to_owned());
        Ok(ContentUnit::new(source.segments.clone(), text, language))
    }
}

/// Read a file as UTF-8 text, stripping a byte order mark.
fn read_text(path: &Path) -> Result<String, LoadError> {
    let mut bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    String::from_utf8(bytes).map_err(|_| LoadError::Decode {
        path: path.to_path_buf(),
    })
}

fn read_directory_meta(source: &SourceRef) -> Result<DirectoryMeta, LoadError> {
    let text = read_text(&source.path)?;
    parse_directory_meta(&text).map_err(|e| LoadError::InvalidMeta {
        path: source.path.clone(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn flat() -> ContentLoader {
        ContentLoader::new(LoaderConfig {
            route_style: RouteStyle::Flat,
            ..LoaderConfig::default()
        })
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b/c.cpp", b"int main(){}");

        let set = ContentLoader::default().load(dir.path()).unwrap();

        assert_eq!(set.len(), 1);
        let route = Route::from_normalized("a/b/c");
        let unit = set.get(&route).unwrap();
        assert_eq!(unit.text(), "int main(){}");
        assert_eq!(unit.language(), "cpp");
        assert_eq!(unit.source_path(), "a/b/c.cpp");
        assert_eq!(set.root(), Some(dir.path()));
    }

    #[test]
    fn test_load_flat_collision_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b.cpp", b"int a;");
        write(dir.path(), "a_b.cpp", b"int b;");

        let err = flat().load(dir.path()).unwrap_err();

        match err {
            LoadError::DuplicateRoute {
                route,
                first,
                second,
            } => {
                assert_eq!(route.as_str(), "a-b");
                assert_eq!(first, "a/b.cpp");
                assert_eq!(second, "a_b.cpp");
            }
            other => panic!("expected DuplicateRoute, got {other:?}"),
        }
    }

    #[test]
    fn test_load_nested_keeps_distinct_routes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b.cpp", b"int a;");
        write(dir.path(), "a_b.cpp", b"int b;");

        let set = ContentLoader::default().load(dir.path()).unwrap();

        let routes: Vec<&str> = set.routes().map(Route::as_str).collect();
        assert_eq!(routes, vec!["a-b", "a/b"]);
    }

    #[test]
    fn test_load_nested_collision_across_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shift_example.hpp", b"");
        write(dir.path(), "shift_example.cpp", b"");

        let err = ContentLoader::default().load(dir.path()).unwrap_err();

        assert!(matches!(err, LoadError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_load_invalid_utf8_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "binary.cpp", &[0xff, 0xfe, 0x00, 0x80]);

        let err = ContentLoader::default().load(dir.path()).unwrap_err();

        match err {
            LoadError::Decode { path } => assert!(path.ends_with("binary.cpp")),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_load_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bom.cpp", b"\xEF\xBB\xBFint x;");

        let set = ContentLoader::default().load(dir.path()).unwrap();

        let unit = set.get(&Route::from_normalized("bom")).unwrap();
        assert_eq!(unit.text(), "int x;");
    }

    #[test]
    fn test_load_missing_root() {
        let err = ContentLoader::default()
            .load(Path::new("/nonexistent/refsite/pages"))
            .unwrap_err();
        assert!(matches!(err, LoadError::SourceNotFound(_)));
    }

    #[test]
    fn test_load_directory_meta() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "xxx/casts/meta.yaml", b"title: Casts\n");
        write(dir.path(), "xxx/casts/static_cast_enum.cpp", b"");

        let set = ContentLoader::default().load(dir.path()).unwrap();

        let meta = set
            .directory_meta(&Route::from_normalized("xxx/casts"))
            .unwrap();
        assert_eq!(meta.title.as_deref(), Some("Casts"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_load_invalid_meta() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "casts/meta.yaml", b"title: [unclosed\n");

        let err = ContentLoader::default().load(dir.path()).unwrap_err();

        assert!(matches!(err, LoadError::InvalidMeta { .. }));
    }

    #[test]
    fn test_load_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(LoaderConfig {
            exclude: vec!["a/[".to_owned()],
            ..LoaderConfig::default()
        });

        let err = loader.load(dir.path()).unwrap_err();

        assert!(matches!(err, LoadError::InvalidPattern { .. }));
    }

    #[test]
    fn test_load_language_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "legacy.h", b"");
        write(dir.path(), "output.ansi", b"");
        let loader = ContentLoader::new(LoaderConfig {
            languages: LanguageMap::new().with_overrides([("h", "cpp")]),
            ..LoaderConfig::default()
        });

        let set = loader.load(dir.path()).unwrap();

        let legacy = set.get(&Route::from_normalized("legacy")).unwrap();
        assert_eq!(legacy.language(), "cpp");
        let ansi = set.get(&Route::from_normalized("output")).unwrap();
        assert_eq!(ansi.language(), "ansi");
    }

    #[test]
    fn test_load_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["z.cpp", "m/a.cpp", "m/b.py", "a/x/y.c"] {
            write(dir.path(), name, name.as_bytes());
        }

        let first: Vec<String> = ContentLoader::default()
            .load(dir.path())
            .unwrap()
            .routes()
            .map(ToString::to_string)
            .collect();
        let second: Vec<String> = ContentLoader::default()
            .load(dir.path())
            .unwrap()
            .routes()
            .map(ToString::to_string)
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, vec!["a/x/y", "m/a", "m/b", "z"]);
    }
}
