//! # Sithong UI
//!
//! Site chrome that sits around the particle fields:
//! - The preloader progress sequencer and its completion signal
//! - The dark/light theme preference, persisted across visits
//! - The dark and light palettes
//!
//! ## Preloader Timeline
//!
//! ```text
//!   0ms ── every 60ms: value += rand[2, 10) ──▶ 100% ── 400ms ──▶ on_exit() ── 800ms ──▶ DONE
//! ```
//!
//! ## Modules
//!
//! - `progress`: Loading counter state machine
//! - `theme`: Theme preference, palettes and the controller
//! - `store`: Durable key-value stores
//! - `error`: Error types

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod progress;
pub mod store;
pub mod theme;

pub use error::{SequencerError, StoreError, StoreResult, UnknownTheme};
pub use progress::{
    Completion, Phase, ProgressSequencer, ProgressTick, SequencerConfig, COMPLETE,
};
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use theme::{Palette, ThemeController, ThemePreference, THEME_KEY};
