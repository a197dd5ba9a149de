//! # Site Error Types

use std::io;
use std::path::PathBuf;

use sithong_effects::FieldError;
use sithong_ui::SequencerError;
use thiserror::Error;

/// Errors raised while loading or validating a site configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field section describes a field that cannot run.
    #[error("invalid [{section}] settings: {source}")]
    Field {
        /// Section name.
        section: &'static str,
        /// What is wrong with it.
        #[source]
        source: FieldError,
    },

    /// The sequencer section describes a sequence that cannot complete.
    #[error("invalid [sequencer] settings: {0}")]
    Sequencer(#[from] SequencerError),

    /// The frame interval must be positive and finite.
    #[error("invalid frame interval: {0}ms")]
    FrameInterval(f64),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building or booting a site.
#[derive(Error, Debug)]
pub enum SiteError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A particle field could not be initialized.
    #[error("particle field: {0}")]
    Field(#[from] FieldError),

    /// The progress sequencer could not be created.
    #[error("progress sequencer: {0}")]
    Sequencer(#[from] SequencerError),
}

/// Result type for site operations.
pub type SiteResult<T> = Result<T, SiteError>;
