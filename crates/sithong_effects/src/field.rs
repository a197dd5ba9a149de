//! # Particle Field
//!
//! A pool of drifting points drawn as discs, with a line between every pair
//! closer than the link distance. The line opacity falls off linearly with
//! distance: full `link_alpha` at coincidence, zero at `link_distance`.
//!
//! ```text
//! tick():
//!   extent empty / surface detached? -> no-op
//!   for each particle:
//!     pointer repulsion (optional) -> damping -> integrate -> reset if outside
//!   clear, discs, exact O(N^2) links
//! ```
//!
//! The pairwise pass is exact: link opacity depends on the true distance of
//! each pair.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::particle::{ColorTag, Particle, ParticlePool, ParticleProfile, Placement};
use crate::surface::{Extent, Surface, Vec2};

/// Distance within which the pointer pushes particles away.
pub const REPULSION_RADIUS: f32 = 100.0;

/// Magnitude of the per-frame push away from the pointer.
pub const REPULSION_STRENGTH: f32 = 0.5;

/// Default per-frame velocity damping.
pub const DAMPING: f32 = 0.98;

/// Errors raised when building a field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A field needs at least one particle.
    #[error("particle pool must not be empty")]
    EmptyPool,

    /// Link distance must be a positive finite number.
    #[error("invalid link distance: {0}")]
    InvalidLinkDistance(f32),

    /// Damping must lie in `(0, 1]`.
    #[error("invalid damping factor: {0}")]
    InvalidDamping(f32),

    /// A particle attribute range is empty or not finite.
    #[error("invalid particle range: {0}")]
    InvalidRange(&'static str),
}

/// Result type for field construction.
pub type FieldResult<T> = Result<T, FieldError>;

/// Where particles reappear after leaving the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryBias {
    /// Anywhere on the surface.
    #[default]
    Uniform,
    /// Along the top edge, so the field reads as falling.
    TopEdge,
}

impl EntryBias {
    const fn placement(self) -> Placement {
        match self {
            Self::Uniform => Placement::Anywhere,
            Self::TopEdge => Placement::TopEdge,
        }
    }
}

/// How many accent colors the particles use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    /// Every particle uses the primary accent.
    #[default]
    Single,
    /// Particles pick one of two accents at spawn.
    Dual,
}

/// Accent colors of a field. Links always use the primary accent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPalette {
    /// Primary accent.
    pub primary: Color,
    /// Secondary accent, used in [`ColorMode::Dual`].
    pub secondary: Color,
}

impl FieldPalette {
    /// Cyan and pink neon accents.
    pub const NEON: Self = Self {
        primary: Color::NEON_CYAN,
        secondary: Color::NEON_PINK,
    };

    /// Color for a particle tag.
    #[inline]
    #[must_use]
    pub const fn color(&self, tag: ColorTag) -> Color {
        match tag {
            ColorTag::Primary => self.primary,
            ColorTag::Secondary => self.secondary,
        }
    }
}

impl Default for FieldPalette {
    fn default() -> Self {
        Self::NEON
    }
}

/// Configuration of a particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Number of particles in the pool.
    pub pool_size: usize,
    /// Re-entry policy for particles that left the surface.
    pub entry_bias: EntryBias,
    /// Push particles away from the pointer.
    pub pointer_repulsion: bool,
    /// Maximum distance at which two particles are linked.
    pub link_distance: f32,
    /// Link opacity at zero distance.
    pub link_alpha: f32,
    /// Link stroke width.
    pub link_width: f32,
    /// Single or dual accent.
    pub color_mode: ColorMode,
    /// Accent colors.
    pub palette: FieldPalette,
    /// Velocity multiplier applied every frame.
    pub damping: f32,
    /// Spawn ranges.
    pub profile: ParticleProfile,
    /// RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl FieldOptions {
    /// Preloader background: 160 drifting particles in two accents.
    ///
    /// Damping is off (`1.0`) so the drift never dies out; the hero keeps [`DAMPING`].
    #[must_use]
    pub fn preloader() -> Self {
        Self {
            pool_size: 160,
            entry_bias: EntryBias::Uniform,
            pointer_repulsion: false,
            link_distance: 80.0,
            link_alpha: 0.06,
            link_width: 0.5,
            color_mode: ColorMode::Dual,
            damping: 1.0,
            profile: ParticleProfile::DRIFT,
            ..Self::default()
        }
    }

    /// Hero background: 120 falling particles that dodge the pointer.
    #[must_use]
    pub fn hero() -> Self {
        Self {
            pool_size: 120,
            entry_bias: EntryBias::TopEdge,
            pointer_repulsion: true,
            link_distance: 100.0,
            link_alpha: 0.08,
            link_width: 0.6,
            color_mode: ColorMode::Single,
            damping: DAMPING,
            profile: ParticleProfile::FALL,
            ..Self::default()
        }
    }

    /// Checks the options for values a field cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> FieldResult<()> {
        if self.pool_size == 0 {
            return Err(FieldError::EmptyPool);
        }
        if !(self.link_distance.is_finite() && self.link_distance > 0.0) {
            return Err(FieldError::InvalidLinkDistance(self.link_distance));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(FieldError::InvalidDamping(self.damping));
        }
        if let Some(name) = self.profile.invalid_span() {
            return Err(FieldError::InvalidRange(name));
        }
        Ok(())
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            pool_size: 120,
            entry_bias: EntryBias::Uniform,
            pointer_repulsion: false,
            link_distance: 100.0,
            link_alpha: 0.08,
            link_width: 0.6,
            color_mode: ColorMode::Single,
            palette: FieldPalette::NEON,
            damping: DAMPING,
            profile: ParticleProfile::DRIFT,
            seed: None,
        }
    }
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Frames rendered since initialization.
    pub frames: u64,
    /// Links drawn in the last rendered frame.
    pub links: u32,
    /// Particles reset in the last rendered frame.
    pub resets: u32,
}

/// Opacity of the link between two particles `distance` apart.
///
/// Linear falloff from `base` at zero to exactly zero at `link_distance`.
#[inline]
#[must_use]
pub fn link_opacity(base: f32, distance: f32, link_distance: f32) -> f32 {
    if distance >= link_distance {
        0.0
    } else {
        base * (1.0 - distance / link_distance)
    }
}

/// A particle pool bound to the surface it renders into.
pub struct ParticleField<S> {
    /// Drawing target; its extent bounds the particles.
    surface: S,
    /// Configuration.
    options: FieldOptions,
    /// Fixed particle arena.
    pool: ParticlePool,
    /// Repulsion target; `None` when the pointer is away.
    pointer: Option<Vec2>,
    /// Field-local randomness.
    rng: ChaCha8Rng,
    /// Counters.
    stats: FieldStats,
}

impl<S: Surface> ParticleField<S> {
    /// Sizes `surface` to `extent` and fills the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` do not validate.
    pub fn initialize(mut surface: S, extent: Extent, options: FieldOptions) -> FieldResult<Self> {
        options.validate()?;
        surface.resize(extent);

        let mut rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let pool = ParticlePool::new(
            options.pool_size,
            &mut rng,
            extent,
            &options.profile,
            options.color_mode == ColorMode::Dual,
        );

        tracing::debug!(
            "Particle field initialized: {} particles on {}x{}",
            pool.len(),
            extent.width,
            extent.height
        );

        Ok(Self {
            surface,
            options,
            pool,
            pointer: None,
            rng,
            stats: FieldStats::default(),
        })
    }

    /// Changes the surface extent. The pool is kept; particles now outside
    /// the surface are reset on the next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface.resize(Extent::new(width, height));
        tracing::debug!("Particle field resized to {}x{}", width, height);
    }

    /// Sets the repulsion target, in surface coordinates.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Some(Vec2::new(x, y));
    }

    /// Removes the repulsion target.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Current repulsion target.
    #[must_use]
    pub const fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Advances and renders one frame.
    ///
    /// Returns false, leaving every particle untouched, when the surface is
    /// detached or has an empty extent.
    pub fn tick(&mut self) -> bool {
        let extent = self.surface.extent();
        if !self.surface.is_available() || extent.is_empty() {
            return false;
        }

        self.stats.resets = self.update(extent);
        self.stats.links = self.render(extent);
        self.stats.frames += 1;

        tracing::trace!(
            "Frame {}: {} links, {} resets",
            self.stats.frames,
            self.stats.links,
            self.stats.resets
        );
        true
    }

    /// Moves every particle one step. Returns the number of resets.
    fn update(&mut self, extent: Extent) -> u32 {
        let Self {
            options,
            pool,
            pointer,
            rng,
            ..
        } = self;
        let repel_from = if options.pointer_repulsion { *pointer } else { None };
        let placement = options.entry_bias.placement();
        let dual = options.color_mode == ColorMode::Dual;
        let mut resets = 0;

        for particle in pool.as_mut_slice() {
            if let Some(target) = repel_from {
                let dx = particle.position.x - target.x;
                let dy = particle.position.y - target.y;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance > 0.0 && distance < REPULSION_RADIUS {
                    let scale = REPULSION_STRENGTH / distance;
                    particle.velocity.x += dx * scale;
                    particle.velocity.y += dy * scale;
                }
            }

            particle.velocity.x *= options.damping;
            particle.velocity.y *= options.damping;
            particle.position.x += particle.velocity.x;
            particle.position.y += particle.velocity.y;

            if !extent.contains(particle.position) {
                particle.reset(rng, extent, &options.profile, dual, placement);
                resets += 1;
            }
        }

        resets
    }

    /// Draws discs and links. Returns the number of links drawn.
    fn render(&mut self, extent: Extent) -> u32 {
        let Self {
            surface,
            options,
            pool,
            ..
        } = self;
        let particles = pool.as_slice();
        let link_color = options.palette.primary;
        let mut links = 0;

        surface.clear(extent);

        for particle in particles {
            let color = options.palette.color(particle.color).with_alpha(particle.alpha);
            surface.fill_circle(particle.position, particle.radius, color);
        }

        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let distance = a.position.distance(b.position);
                if distance < options.link_distance {
                    let alpha = link_opacity(options.link_alpha, distance, options.link_distance);
                    surface.stroke_line(
                        a.position,
                        b.position,
                        link_color.with_alpha(alpha),
                        options.link_width,
                    );
                    links += 1;
                }
            }
        }

        links
    }

    /// The particle pool.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    /// Current surface extent.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.surface.extent()
    }

    /// The drawing surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The drawing surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Field configuration.
    #[must_use]
    pub const fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Frame counters.
    #[must_use]
    pub const fn stats(&self) -> FieldStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CommandBuffer;

    fn field(options: FieldOptions, width: f32, height: f32) -> ParticleField<CommandBuffer> {
        ParticleField::initialize(
            CommandBuffer::new(Extent::ZERO),
            Extent::new(width, height),
            FieldOptions {
                seed: Some(42),
                ..options
            },
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_in_bounds() {
        let field = field(FieldOptions::preloader(), 800.0, 600.0);
        let extent = field.extent();
        assert_eq!(field.particles().len(), 160);
        assert!(field.particles().iter().all(|p| extent.contains(p.position)));
    }

    #[test]
    fn test_thousand_ticks_stay_in_bounds() {
        let mut field = field(
            FieldOptions {
                pool_size: 160,
                entry_bias: EntryBias::Uniform,
                ..FieldOptions::preloader()
            },
            800.0,
            600.0,
        );
        let extent = Extent::new(800.0, 600.0);

        for _ in 0..1000 {
            assert!(field.tick());
            assert!(field.particles().iter().all(|p| extent.contains(p.position)));
        }
        assert_eq!(field.stats().frames, 1000);
    }

    #[test]
    fn test_links_match_pairwise_distance() {
        let mut field = field(FieldOptions::preloader(), 300.0, 200.0);
        field.tick();

        let particles = field.particles().to_vec();
        let link_distance = field.options().link_distance;
        let mut expected = 0;
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                if a.position.distance(b.position) < link_distance {
                    expected += 1;
                }
            }
        }

        let lines: Vec<_> = field.surface().lines().collect();
        assert_eq!(lines.len(), expected);
        assert_eq!(field.stats().links as usize, expected);
        for (from, to, color, width) in lines {
            let distance = from.distance(to);
            assert!(distance < link_distance);
            let alpha = link_opacity(0.06, distance, link_distance);
            assert!((color.a - alpha).abs() < 1e-6);
            assert!((width - 0.5).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_link_opacity_falloff() {
        assert!((link_opacity(0.08, 0.0, 100.0) - 0.08).abs() < f32::EPSILON);
        assert!((link_opacity(0.08, 50.0, 100.0) - 0.04).abs() < 1e-6);
        assert!(link_opacity(0.08, 100.0, 100.0).abs() < f32::EPSILON);
        assert!(link_opacity(0.08, 150.0, 100.0).abs() < f32::EPSILON);
        assert!(link_opacity(0.08, 10.0, 100.0) > link_opacity(0.08, 20.0, 100.0));
    }

    #[test]
    fn test_discs_drawn_with_particle_alpha() {
        let mut field = field(FieldOptions::hero(), 400.0, 400.0);
        field.tick();

        let circles: Vec<_> = field.surface().circles().collect();
        assert_eq!(circles.len(), 120);
        for ((center, radius, color), particle) in circles.iter().zip(field.particles()) {
            assert_eq!(*center, particle.position);
            assert!((radius - particle.radius).abs() < f32::EPSILON);
            assert!((color.a - particle.alpha).abs() < f32::EPSILON);
            assert_eq!(color.g, Color::NEON_CYAN.g);
        }
    }

    #[test]
    fn test_zero_extent_is_noop() {
        let mut field = field(FieldOptions::preloader(), 0.0, 0.0);
        let before = field.particles().to_vec();

        assert!(!field.tick());
        assert_eq!(field.surface().frames(), 0);
        assert_eq!(field.particles(), before.as_slice());

        field.resize(200.0, 100.0);
        assert!(field.tick());
        assert_eq!(field.surface().frames(), 1);
    }

    #[test]
    fn test_detached_surface_is_noop() {
        let mut field = field(FieldOptions::preloader(), 200.0, 200.0);
        field.surface_mut().set_available(false);
        assert!(!field.tick());
        assert_eq!(field.stats().frames, 0);
    }

    #[test]
    fn test_shrink_resets_outside_particles() {
        let mut field = field(FieldOptions::preloader(), 800.0, 600.0);
        field.resize(100.0, 100.0);
        field.tick();

        let extent = Extent::new(100.0, 100.0);
        assert_eq!(field.particles().len(), 160);
        assert!(field.particles().iter().all(|p| extent.contains(p.position)));
        assert!(field.stats().resets > 0);
    }

    #[test]
    fn test_pointer_repels_nearby_particle() {
        let mut field = field(
            FieldOptions {
                pool_size: 1,
                damping: 1.0,
                ..FieldOptions::hero()
            },
            100_000.0,
            100_000.0,
        );
        let start = field.particles()[0];
        let velocity_before = start.velocity;

        // Pointer 10px to the left of the particle.
        field.set_pointer(start.position.x - 10.0, start.position.y);
        field.tick();

        let after = field.particles()[0];
        assert!((after.velocity.x - (velocity_before.x + REPULSION_STRENGTH)).abs() < 1e-4);
        assert!((after.velocity.y - velocity_before.y).abs() < 1e-4);
    }

    #[test]
    fn test_cleared_pointer_never_repels() {
        let mut field = field(
            FieldOptions {
                pool_size: 1,
                damping: 1.0,
                ..FieldOptions::hero()
            },
            100_000.0,
            100_000.0,
        );
        let start = field.particles()[0];
        field.set_pointer(start.position.x, start.position.y + 5.0);
        field.clear_pointer();
        field.tick();

        assert_eq!(field.pointer(), None);
        assert_eq!(field.particles()[0].velocity, start.velocity);
    }

    #[test]
    fn test_repulsion_disabled_ignores_pointer() {
        let mut field = field(
            FieldOptions {
                pool_size: 1,
                ..FieldOptions::preloader()
            },
            100_000.0,
            100_000.0,
        );
        let start = field.particles()[0];
        field.set_pointer(start.position.x + 1.0, start.position.y);
        field.tick();
        assert_eq!(field.particles()[0].velocity, start.velocity);
    }

    #[test]
    fn test_damping_slows_particles() {
        let mut field = field(
            FieldOptions {
                pool_size: 1,
                ..FieldOptions::hero()
            },
            100_000.0,
            100_000.0,
        );
        let before = field.particles()[0].velocity;
        field.tick();
        let after = field.particles()[0].velocity;
        assert!((after.x - before.x * DAMPING).abs() < 1e-6);
        assert!((after.y - before.y * DAMPING).abs() < 1e-6);
    }

    #[test]
    fn test_preloader_drift_is_undamped() {
        assert!((FieldOptions::preloader().damping - 1.0).abs() < f32::EPSILON);
        assert!((FieldOptions::hero().damping - DAMPING).abs() < f32::EPSILON);

        let mut field = field(
            FieldOptions {
                pool_size: 1,
                ..FieldOptions::preloader()
            },
            100_000.0,
            100_000.0,
        );
        let before = field.particles()[0].velocity;
        for _ in 0..10 {
            field.tick();
        }
        assert_eq!(field.particles()[0].velocity, before);
    }

    #[test]
    fn test_top_edge_reentry() {
        let mut field = field(FieldOptions::hero(), 300.0, 50.0);
        let extent = field.extent();
        let mut resets = 0;

        for _ in 0..500 {
            field.tick();
            assert!(field.particles().iter().all(|p| extent.contains(p.position)));
            if field.stats().resets > 0 {
                resets += field.stats().resets;
                assert!(field.particles().iter().any(|p| p.position.y.abs() < f32::EPSILON));
            }
        }
        assert!(resets > 0);
    }

    #[test]
    fn test_options_validation() {
        assert_eq!(
            FieldOptions {
                pool_size: 0,
                ..FieldOptions::default()
            }
            .validate(),
            Err(FieldError::EmptyPool)
        );
        assert_eq!(
            FieldOptions {
                link_distance: 0.0,
                ..FieldOptions::default()
            }
            .validate(),
            Err(FieldError::InvalidLinkDistance(0.0))
        );
        assert_eq!(
            FieldOptions {
                damping: 1.5,
                ..FieldOptions::default()
            }
            .validate(),
            Err(FieldError::InvalidDamping(1.5))
        );
        assert!(FieldOptions::preloader().validate().is_ok());
        assert!(FieldOptions::hero().validate().is_ok());
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = field(FieldOptions::preloader(), 640.0, 480.0);
        let b = field(FieldOptions::preloader(), 640.0, 480.0);
        assert_eq!(a.particles(), b.particles());
    }
}
