//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when loading settings or parsing colours.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        /// The file we tried to read.
        path: PathBuf,

        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the RON content of the settings file.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A colour string wasn't of the form `#RRGGBB`.
    #[error("invalid colour {0:?}, expected #RRGGBB")]
    InvalidColour(String),
}
