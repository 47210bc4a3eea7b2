//! Error types for the reading pipeline.

use std::path::PathBuf;

use lr_core::DeckError;

/// Alias for `Result<T, AdapterError>`.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Failure of an external reading or translation provider.
///
/// These are absorbed by [`ReadingAdapter`](crate::ReadingAdapter) and
/// [`Translator`](crate::Translator) and never returned to request callers.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The provider could not be reached or refused the request.
    #[error("provider request failed: {0}")]
    Transport(String),

    /// The provider answered with content that is not a reading.
    #[error("unparseable provider response: {0}")]
    Parse(String),
}

/// Errors reported to the caller of a reading request.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The requested spread type does not exist.
    #[error("unknown spread_type: {0}")]
    UnknownSpread(String),

    /// The draw could not be made.
    #[error(transparent)]
    Draw(DeckError),
}

impl ServiceError {
    /// HTTP-equivalent status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownSpread(_) => 404,
            Self::Draw(DeckError::InsufficientDeck { .. }) => 422,
            Self::Draw(_) => 500,
        }
    }
}

impl From<DeckError> for ServiceError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::UnknownSpread(id) => Self::UnknownSpread(id),
            other => Self::Draw(other),
        }
    }
}

/// Alias for `Result<T, ConfigError>`.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors loading the reader configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ReaderConfig`](crate::ReaderConfig).
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
