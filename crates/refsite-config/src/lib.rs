//! Configuration management for refsite.
//!
//! Parses `refsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//! - `~` at the start of a value expands to the home directory
//!
//! Expanded fields:
//! - `site.title`
//! - `site.base_url`
//! - `content.source_dir`
//! - `content.output_dir`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use refsite_content::dirs_overlap;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override route layout.
    pub route_layout: Option<RouteLayout>,
    /// Override line number rendering.
    pub line_numbers: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "refsite.toml";

/// Extensions skipped by the loader unless `content.ignore_extensions` is set.
///
/// `color` files are token color sidecars for an external highlighter and are
/// never pages of their own.
const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "svg", "webp", "pdf", "zip", "gz", "tar", "o", "obj",
    "a", "so", "dll", "exe", "lib", "bin", "woff", "woff2", "ttf", "pyc", "color",
];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site presentation settings.
    pub site: SiteConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Extension to language tag overrides (e.g. `ino = "cpp"`).
    pub languages: BTreeMap<String, String>,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site presentation settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the sidebar and page titles.
    pub title: String,
    /// URL prefix for absolute links (used when `relative_links` is false).
    pub base_url: String,
    /// Emit links relative to the current page.
    pub relative_links: bool,
    /// Render a line number gutter in code blocks.
    pub line_numbers: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            base_url: "/".to_owned(),
            relative_links: true,
            line_numbers: false,
        }
    }
}

/// How source paths are laid out as routes.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteLayout {
    /// Keep the directory hierarchy (`a/b/c`).
    #[default]
    Nested,
    /// Join all segments into one (`a-b-c`).
    Flat,
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    route_style: Option<RouteLayout>,
    meta_filename: Option<String>,
    exclude: Option<Vec<String>>,
    ignore_extensions: Option<Vec<String>>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory containing the content tree.
    pub source_dir: PathBuf,
    /// Directory the rendered site is written to.
    pub output_dir: PathBuf,
    /// Route layout.
    pub route_layout: RouteLayout,
    /// Name of per-directory metadata files.
    pub meta_filename: String,
    /// Glob patterns (relative to `source_dir`) excluded from loading.
    pub exclude: Vec<String>,
    /// Lowercase file extensions that are never content.
    pub ignore_extensions: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `refsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. Validation runs
    /// on the final values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.content_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(layout) = settings.route_layout {
            self.content_resolved.route_layout = layout;
        }
        if let Some(line_numbers) = settings.line_numbers {
            self.site.line_numbers = line_numbers;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            content: ContentConfigRaw::default(),
            languages: BTreeMap::new(),
            content_resolved: ContentConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_content()?;
        self.validate_languages()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        let base_url = &self.site.base_url;
        if !base_url.starts_with('/')
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "site.base_url must start with /, http:// or https://".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        let meta = &self.content_resolved.meta_filename;
        require_non_empty(meta, "content.meta_filename")?;
        if meta.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "content.meta_filename must be a file name, not a path".to_owned(),
            ));
        }
        let content = &self.content_resolved;
        if dirs_overlap(&content.source_dir, &content.output_dir) {
            return Err(ConfigError::Validation(format!(
                "content.output_dir ({}) must not equal, contain or lie inside \
                 content.source_dir ({})",
                content.output_dir.display(),
                content.source_dir.display()
            )));
        }
        Ok(())
    }

    fn validate_languages(&self) -> Result<(), ConfigError> {
        for (ext, tag) in &self.languages {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "languages: extension {ext:?} must be non-empty and written without a leading dot"
                )));
            }
            require_non_empty(tag, &format!("languages.{ext}"))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;

        if let Some(ref dir) = self.content.source_dir {
            self.content.source_dir = Some(expand::expand_env(dir, "content.source_dir")?);
        }
        if let Some(ref dir) = self.content.output_dir {
            self.content.output_dir = Some(expand::expand_env(dir, "content.output_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let ignore_extensions = match &self.content.ignore_extensions {
            Some(exts) => exts
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            None => DEFAULT_IGNORE_EXTENSIONS
                .iter()
                .map(|&e| e.to_owned())
                .collect(),
        };

        self.content_resolved = ContentConfig {
            source_dir: resolve(self.content.source_dir.as_deref(), "pages"),
            output_dir: resolve(self.content.output_dir.as_deref(), "build"),
            route_layout: self.content.route_style.unwrap_or_default(),
            meta_filename: self
                .content
                .meta_filename
                .clone()
                .unwrap_or_else(|| "meta.yaml".to_owned()),
            exclude: self.content.exclude.clone().unwrap_or_default(),
            ignore_extensions,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.base_url, "/");
        assert!(config.site.relative_links);
        assert!(!config.site.line_numbers);
        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/test/pages")
        );
        assert_eq!(
            config.content_resolved.output_dir,
            PathBuf::from("/test/build")
        );
        assert_eq!(config.content_resolved.route_layout, RouteLayout::Nested);
        assert_eq!(config.content_resolved.meta_filename, "meta.yaml");
        assert!(config.content_resolved.exclude.is_empty());
        assert!(
            config
                .content_resolved
                .ignore_extensions
                .contains(&"png".to_owned())
        );
        assert!(
            config
                .content_resolved
                .ignore_extensions
                .contains(&"color".to_owned())
        );
        assert!(config.languages.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.title, "Documentation");
        assert!(config.site.relative_links);
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
title = "C++ reference"
base_url = "https://example.com/docs/"
relative_links = false
line_numbers = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "C++ reference");
        assert_eq!(config.site.base_url, "https://example.com/docs/");
        assert!(!config.site.relative_links);
        assert!(config.site.line_numbers);
    }

    #[test]
    fn test_parse_languages_table() {
        let toml = r#"
[languages]
ino = "cpp"
tpl = "text"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.languages.get("ino"), Some(&"cpp".to_owned()));
        assert_eq!(config.languages.get("tpl"), Some(&"text".to_owned()));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[content]
source_dir = "website/pages"
output_dir = "out"
route_style = "flat"
meta_filename = "dir.yaml"
exclude = ["**/*.color"]
ignore_extensions = [".PNG", "ansi"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let content = &config.content_resolved;
        assert_eq!(content.source_dir, PathBuf::from("/project/website/pages"));
        assert_eq!(content.output_dir, PathBuf::from("/project/out"));
        assert_eq!(content.route_layout, RouteLayout::Flat);
        assert_eq!(content.meta_filename, "dir.yaml");
        assert_eq!(content.exclude, vec!["**/*.color".to_owned()]);
        assert_eq!(
            content.ignore_extensions,
            vec!["png".to_owned(), "ansi".to_owned()]
        );
    }

    #[test]
    fn test_unknown_route_style_is_parse_error() {
        let toml = r#"
[content]
route_style = "sideways"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.title"));
    }

    #[test]
    fn test_validate_rejects_relative_base_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.base_url = "docs/".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn test_validate_rejects_meta_filename_with_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.meta_filename = "meta/meta.yaml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_same_source_and_output() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.output_dir = config.content_resolved.source_dir.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_validate_rejects_nested_output() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.output_dir = PathBuf::from("/test/pages/site");
        assert!(config.validate().is_err());

        config.content_resolved.output_dir = PathBuf::from("/test");
        assert!(config.validate().is_err());

        config.content_resolved.output_dir = PathBuf::from("/test/pages-site");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dotted_language_extension() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.languages.insert(".ino".to_owned(), "cpp".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings_dirs() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/src")),
            output_dir: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/custom/src")
        );
        assert_eq!(
            config.content_resolved.output_dir,
            PathBuf::from("/custom/out")
        );
        assert_eq!(config.content_resolved.route_layout, RouteLayout::Nested);
    }

    #[test]
    fn test_apply_cli_settings_layout_and_line_numbers() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            route_layout: Some(RouteLayout::Flat),
            line_numbers: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.content_resolved.route_layout, RouteLayout::Flat);
        assert!(config.site.line_numbers);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(
            config.content_resolved.source_dir,
            before.content_resolved.source_dir
        );
        assert_eq!(
            config.content_resolved.output_dir,
            before.content_resolved.output_dir
        );
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/refsite.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[site]\ntitle = \"${REFSITE_TEST_TITLE_UNSET:-Reference}\"\n\n[content]\nsource_dir = \"src\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "Reference");
        assert_eq!(config.content_resolved.source_dir, dir.path().join("src"));
        assert_eq!(config.content_resolved.output_dir, dir.path().join("build"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_from_file_cli_overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[content]\nroute_style = \"flat\"\n").unwrap();

        let settings = CliSettings {
            route_layout: Some(RouteLayout::Nested),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.content_resolved.route_layout, RouteLayout::Nested);
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let pages = dir.path().join("pages");
        std::fs::create_dir(&pages).unwrap();

        let same = CliSettings {
            source_dir: Some(pages.clone()),
            output_dir: Some(pages.clone()),
            ..Default::default()
        };
        let result = Config::load(Some(&path), Some(&same));
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let nested = CliSettings {
            source_dir: Some(pages.clone()),
            output_dir: Some(pages.join("site")),
            ..Default::default()
        };
        let result = Config::load(Some(&path), Some(&nested));
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let sibling = CliSettings {
            source_dir: Some(pages),
            output_dir: Some(dir.path().join("site")),
            ..Default::default()
        };
        assert!(Config::load(Some(&path), Some(&sibling)).is_ok());
    }
}
