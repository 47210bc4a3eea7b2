//! Error types for loading reference data and drawing cards.

use std::path::PathBuf;

/// Alias for `Result<T, DeckError>`.
pub type DeckResult<T> = Result<T, DeckError>;

/// Errors raised by the store and the draw engine.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// A reference data file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A reference data file is not valid JSON for its table.
    #[error("malformed {table} data: {source}")]
    Json {
        /// Which table was being parsed (`cards` or `spreads`).
        table: &'static str,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The reference data parsed but breaks a table invariant.
    #[error("invalid reference data: {0}")]
    Configuration(String),

    /// The requested spread id is not in the spread table.
    #[error("unknown spread: {0}")]
    UnknownSpread(String),

    /// The spread needs more cards than the deck holds.
    #[error("spread needs {requested} cards but the deck holds {available}")]
    InsufficientDeck {
        /// Cards the spread asks for.
        requested: usize,
        /// Cards in the deck.
        available: usize,
    },
}

impl DeckError {
    /// Returns true for errors that make the store unusable at startup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Json { .. } | Self::Configuration(_)
        )
    }
}
