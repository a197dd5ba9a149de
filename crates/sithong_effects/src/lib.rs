//! # Sithong Effects
//!
//! Ambient particle fields for the site backgrounds:
//! - A fixed pool of drifting points, reset in place when they leave the canvas
//! - Proximity links with linear opacity falloff
//! - Optional pointer repulsion
//! - A per-frame loop with a race-free `stop()`
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   tick()   ┌───────────────┐  clear/disc/line  ┌─────────┐
//! │ ParticleAnimator │ ─────────▶ │ ParticleField │ ────────────────▶ │ Surface │
//! │  (frame loop)    │            │ (pool + rng)  │                   │         │
//! └──────────────────┘            └───────────────┘                   └─────────┘
//! ```
//!
//! Each field is an explicitly constructed value that owns its surface and
//! configuration. Two fields never share state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sithong_effects::{CommandBuffer, Extent, FieldOptions, ParticleAnimator, ParticleField};
//!
//! let field = ParticleField::initialize(
//!     CommandBuffer::new(Extent::ZERO),
//!     Extent::new(1280.0, 720.0),
//!     FieldOptions::hero(),
//! )?;
//! let mut hero = ParticleAnimator::new(field);
//! hero.start();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animator;
pub mod color;
pub mod field;
pub mod particle;
pub mod surface;

pub use animator::{AnimatorStopper, ParticleAnimator, DEFAULT_FRAME_INTERVAL};
pub use color::Color;
pub use field::{
    link_opacity, ColorMode, EntryBias, FieldError, FieldOptions, FieldPalette, FieldResult,
    FieldStats, ParticleField, DAMPING, REPULSION_RADIUS, REPULSION_STRENGTH,
};
pub use particle::{ColorTag, Particle, ParticlePool, ParticleProfile, Placement, Span};
pub use surface::{CommandBuffer, DrawCommand, Extent, Surface, Vec2};
