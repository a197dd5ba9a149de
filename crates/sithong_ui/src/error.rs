//! # UI Error Types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a preference store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("preference store I/O error at {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The store file is not a valid TOML table of strings.
    #[error("corrupt preference store: {0}")]
    Decode(#[from] toml::de::Error),

    /// The preferences could not be serialized.
    #[error("cannot encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),

    /// The backend refuses access (private browsing, quota, sandbox).
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for preference store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A stored theme name that is neither `dark` nor `light`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

/// Errors raised when building a progress sequencer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequencerError {
    /// The counter timer needs a non-zero period.
    #[error("progress interval must be non-zero")]
    ZeroInterval,

    /// Increments must be positive or the counter never completes.
    #[error("invalid progress increment range [{min}, {max})")]
    InvalidIncrement {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
}
