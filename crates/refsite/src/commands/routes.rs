//! `refsite routes` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{ContentArgs, content_loader};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    /// Content source directory (overrides config).
    source_dir: Option<PathBuf>,

    #[command(flatten)]
    content: ContentArgs,
}

impl RoutesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.content.load_config(self.source_dir)?;
        let set = content_loader(&config).load(&config.content_resolved.source_dir)?;

        for (route, unit) in set.units() {
            output.print(&format!("{route} <- {}", unit.source_path()));
        }
        Ok(())
    }
}
