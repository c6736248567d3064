//! CLI error types.

use nav_config::ConfigError;
use nav_emit::EmitError;
use nav_tree::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Emit(#[from] EmitError),

    #[error("{failed} of {total} languages failed")]
    Failed { failed: usize, total: usize },
}
