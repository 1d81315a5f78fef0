//! Error types for the palette engine.

use crate::PaletteId;
use thiserror::Error;

/// All possible errors from the palette engine.
///
/// Most of these never reach a store caller: the keyed list absorbs
/// persistence failures and store intents report a missing palette as `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Persistence errors
    #[error("failed to encode list: {0}")]
    Encode(String),

    #[error("failed to decode list: {0}")]
    Decode(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("io error: {0}")]
    Io(String),

    // Lookup errors
    #[error("palette not found: {0}")]
    PaletteNotFound(PaletteId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
