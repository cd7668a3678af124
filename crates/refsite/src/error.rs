//! CLI error types.

use refsite_config::ConfigError;
use refsite_content::LoadError;
use refsite_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Check(String),
}
