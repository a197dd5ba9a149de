//! # Sithong
//!
//! Site-level composition of the portfolio's animated chrome.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                              Site                              │
//! ├────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────┐  │
//! │  │ preloader field  │  │   hero field     │  │    theme     │  │
//! │  │ (sithong_effects)│  │ (sithong_effects)│  │ (sithong_ui) │  │
//! │  └────────▲─────────┘  └──────────────────┘  └──────────────┘  │
//! │           │ stop() on exit                                     │
//! │  ┌────────┴─────────┐                                          │
//! │  │ ProgressSequencer│                                          │
//! │  │   (sithong_ui)   │                                          │
//! │  └──────────────────┘                                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML site configuration
//! - `site`: The `Site` object and its boot sequence
//! - `error`: Error types

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod site;

// Re-export the building blocks
pub use sithong_effects as effects;
pub use sithong_ui as ui;

pub use config::{FieldOverrides, FrameSettings, SequencerSettings, SiteConfig, ThemeSettings};
pub use error::{ConfigError, ConfigResult, SiteError, SiteResult};
pub use site::{PreloaderRun, Site};
