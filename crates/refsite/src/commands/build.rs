//! `refsite build` command implementation.

use std::path::PathBuf;

use clap::Args;
use refsite_config::CliSettings;
use refsite_site::StaticSiteBuilder;

use super::{ContentArgs, build_config, content_loader, print_source, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Content source directory (overrides config).
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    output_dir: Option<PathBuf>,

    /// Remove the output directory before writing.
    #[arg(long)]
    clean: bool,

    /// Render a line number gutter in code blocks.
    #[arg(long)]
    line_numbers: bool,

    #[command(flatten)]
    content: ContentArgs,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.content.load_config_with(CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            line_numbers: self.line_numbers.then_some(true),
            ..CliSettings::default()
        })?;
        let source_dir = &config.content_resolved.source_dir;
        let output_dir = &config.content_resolved.output_dir;

        print_source(&output, source_dir);
        output.info(&format!("Output: {}", output_dir.display()));

        let builder = StaticSiteBuilder::new(
            content_loader(&config),
            build_config(&config, self.clean),
        );
        let report = builder.build(source_dir, output_dir)?;
        tracing::info!(
            pages = report.pages,
            sections = report.sections,
            warnings = report.structure_warnings.len() + report.render_warnings.len(),
            "Build finished"
        );

        print_warnings(&output, &report.structure_warnings, &report.render_warnings);
        output.success(&format!(
            "Built {} pages and {} sections to {}",
            report.pages,
            report.sections,
            output_dir.display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use refsite_content::LoadError;
    use refsite_site::BuildError;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn args(config: PathBuf, source_dir: PathBuf, output_dir: PathBuf, clean: bool) -> BuildArgs {
        BuildArgs {
            source_dir: Some(source_dir),
            output_dir: Some(output_dir),
            clean,
            line_numbers: false,
            content: ContentArgs {
                config: Some(config),
                flat: false,
            },
        }
    }

    #[test]
    fn test_build_writes_site() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("refsite.toml");
        fs::write(&config, "[site]\ntitle = \"Reference\"\n").unwrap();
        write(dir.path(), "pages/a/b.cpp", "int b;");
        let out = dir.path().join("site");

        args(config, dir.path().join("pages"), out.clone(), false)
            .execute()
            .unwrap();

        assert!(out.join("a/b/index.html").exists());
    }

    #[test]
    fn test_duplicate_route_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("refsite.toml");
        fs::write(&config, "[content]\nroute_style = \"flat\"\n").unwrap();
        write(dir.path(), "pages/a/b.cpp", "int a;");
        write(dir.path(), "pages/a_b.cpp", "int b;");
        let out = dir.path().join("site");

        let err = args(config, dir.path().join("pages"), out.clone(), false)
            .execute()
            .unwrap_err();

        assert!(matches!(
            err,
            CliError::Build(BuildError::Load(LoadError::DuplicateRoute { .. }))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_output_equal_to_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("refsite.toml");
        fs::write(&config, "").unwrap();
        write(dir.path(), "pages/keep.cpp", "int keep;");
        let pages = dir.path().join("pages");

        let err = args(config, pages.clone(), pages.clone(), true)
            .execute()
            .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
        assert!(pages.join("keep.cpp").exists());
    }
}
