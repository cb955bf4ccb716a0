//! Error types shared by the conversion and playback modules.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type for conversion and playback operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between user input and an audio artifact.
#[derive(Debug, Error)]
pub enum Error {
    /// The numeric text could not be turned into a sequence.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A caller-supplied parameter is out of its allowed domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// File read/write or output directory failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Encoder or decoder library failure, including malformed PCM parameters.
    #[error("codec error: {0}")]
    Codec(String),

    /// The audio output device could not be opened or used.
    #[error("audio device error: {0}")]
    Device(String),
}

/// Problems found while parsing numeric text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("input is empty")]
    Empty,

    #[error("no numbers found in the input")]
    NoNumbers,

    #[error("number out of range 0..255: {value}")]
    OutOfRange { value: String },

    #[error("not an integer: '{token}'")]
    InvalidToken { token: String },

    #[error("unknown #META key '{key}'")]
    UnknownMetaKey { key: String },

    #[error("invalid #META value for '{key}': '{value}'")]
    InvalidMetaValue { key: String, value: String },
}

impl Error {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(action: &str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            context: format!("Failed to {} {}", action, path.display()),
            source,
        }
    }
}
