//! CLI command implementations.

mod build;
mod check;
mod routes;

use std::path::{Path, PathBuf};

use clap::Args;
use refsite_config::{CliSettings, Config, RouteLayout};
use refsite_content::{ContentLoader, LanguageMap, LoaderConfig, RouteStyle};
use refsite_site::{BuildConfig, RenderWarning, StructureWarning};

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use routes::RoutesArgs;

use crate::error::CliError;
use crate::output::Output;

/// Options shared by every command that reads a content directory.
#[derive(Args, Default)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover refsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Join route segments with `-` instead of keeping the hierarchy.
    #[arg(long)]
    flat: bool,
}

impl ContentArgs {
    /// Load the configuration with CLI overrides applied.
    fn load_config(&self, source_dir: Option<PathBuf>) -> Result<Config, CliError> {
        self.load_config_with(CliSettings {
            source_dir,
            ..CliSettings::default()
        })
    }

    fn load_config_with(&self, mut settings: CliSettings) -> Result<Config, CliError> {
        if self.flat {
            settings.route_layout = Some(RouteLayout::Flat);
        }
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        tracing::debug!(
            config = ?config.config_path,
            source_dir = %config.content_resolved.source_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn route_style(layout: RouteLayout) -> RouteStyle {
    match layout {
        RouteLayout::Nested => RouteStyle::Nested,
        RouteLayout::Flat => RouteStyle::Flat,
    }
}

/// Content loader configured from `[content]` and `[languages]`.
fn content_loader(config: &Config) -> ContentLoader {
    let content = &config.content_resolved;
    ContentLoader::new(LoaderConfig {
        route_style: route_style(content.route_layout),
        meta_filename: content.meta_filename.clone(),
        exclude: content.exclude.clone(),
        ignore_extensions: content.ignore_extensions.clone(),
        languages: LanguageMap::new().with_overrides(config.languages.clone()),
    })
}

/// Site build settings from `[site]`.
fn build_config(config: &Config, clean: bool) -> BuildConfig {
    BuildConfig {
        site_title: config.site.title.clone(),
        base_url: config.site.base_url.clone(),
        relative_links: config.site.relative_links,
        line_numbers: config.site.line_numbers,
        clean,
    }
}

fn print_source(output: &Output, source: &Path) {
    output.info(&format!("Source: {}", source.display()));
}

/// Print every warning. Returns the number printed.
fn print_warnings(
    output: &Output,
    structure: &[StructureWarning],
    render: &[RenderWarning],
) -> usize {
    for warning in structure {
        output.warning(&format!("Warning: {warning}"));
    }
    for warning in render {
        output.warning(&format!(
            "Warning: {}: {}",
            warning.source_path, warning.error
        ));
    }
    structure.len() + render.len()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &Path, toml: &str) -> PathBuf {
        let path = dir.join("refsite.toml");
        fs::write(&path, toml).unwrap();
        path
    }

    #[test]
    fn test_content_loader_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[content]
route_style = "flat"
meta_filename = "index.yaml"
exclude = ["**/*.color"]
ignore_extensions = ["png"]

[languages]
ino = "cpp"
"#,
        );
        let args = ContentArgs {
            config: Some(path),
            flat: false,
        };

        let config = args.load_config(None).unwrap();
        let loader = content_loader(&config);

        let loader_config = loader.config();
        assert_eq!(loader_config.route_style, RouteStyle::Flat);
        assert_eq!(loader_config.meta_filename, "index.yaml");
        assert_eq!(loader_config.exclude, vec!["**/*.color"]);
        assert_eq!(loader_config.ignore_extensions, vec!["png"]);
        assert_eq!(loader_config.languages.tag_for_extension("ino"), "cpp");
        assert_eq!(config.content_resolved.source_dir, dir.path().join("pages"));
    }

    #[test]
    fn test_flat_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[content]\nroute_style = \"nested\"\n");
        let args = ContentArgs {
            config: Some(path),
            flat: true,
        };

        let config = args.load_config(Some(dir.path().join("src"))).unwrap();

        assert_eq!(
            route_style(config.content_resolved.route_layout),
            RouteStyle::Flat
        );
        assert_eq!(config.content_resolved.source_dir, dir.path().join("src"));
    }

    #[test]
    fn test_build_config_from_site() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[site]\ntitle = \"C++ reference\"\nbase_url = \"/ref/\"\nrelative_links = false\n",
        );
        let config = ContentArgs {
            config: Some(path),
            flat: false,
        }
        .load_config(None)
        .unwrap();

        let build = build_config(&config, true);

        assert_eq!(build.site_title, "C++ reference");
        assert_eq!(build.base_url, "/ref/");
        assert!(!build.relative_links);
        assert!(!build.line_numbers);
        assert!(build.clean);
    }

    #[test]
    fn test_missing_config_file() {
        let args = ContentArgs {
            config: Some(PathBuf::from("/nonexistent/refsite.toml")),
            flat: false,
        };

        let err = args.load_config(None).err().unwrap();

        assert!(matches!(err, CliError::Config(_)));
    }
}
