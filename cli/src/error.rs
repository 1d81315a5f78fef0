//! Unified error handling for the CLI.

use crate::config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] palette_engine::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No palette with id {0}")]
    UnknownPalette(palette_engine::PaletteId),

    #[error("Nothing to undelete")]
    NothingDeleted,
}

/// Result type alias for commands.
pub type CliResult<T> = Result<T, CliError>;
