//! `refsite check` command implementation.

use std::path::PathBuf;

use clap::Args;
use refsite_site::StaticSiteBuilder;

use super::{ContentArgs, build_config, content_loader, print_source, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Content source directory (overrides config).
    source_dir: Option<PathBuf>,

    /// Fail when any warning is reported.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    content: ContentArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.content.load_config(self.source_dir)?;
        let source_dir = &config.content_resolved.source_dir;
        print_source(&output, source_dir);

        let builder =
            StaticSiteBuilder::new(content_loader(&config), build_config(&config, false));
        let set = builder.loader().load(source_dir)?;
        let site = builder.prepare(&set);

        let render_warnings = site.render_warnings();
        let warnings = print_warnings(&output, &site.structure_warnings, &render_warnings);
        if warnings == 0 {
            output.success(&format!("{} units, no problems found", set.len()));
            return Ok(());
        }

        let summary = format!("{} units, {warnings} warnings", set.len());
        if self.strict {
            return Err(CliError::Check(summary));
        }
        output.warning(&summary);
        Ok(())
    }
}
