//! Particles and the fixed particle pool.
//!
//! The pool is allocated once when a field is initialized. Particles that
//! leave the surface are reset in place; nothing is allocated or freed while
//! the field is animating.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::surface::{Extent, Vec2};

/// Half-open sampling range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive lower bound.
    pub min: f32,
    /// Exclusive upper bound.
    pub max: f32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Span centered on zero, `[-half, half)`.
    #[must_use]
    pub const fn symmetric(half: f32) -> Self {
        Self::new(-half, half)
    }

    /// True if `min < max` and both bounds are finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }

    /// Draws a value from the span. A degenerate span yields `min`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.is_valid() {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Attribute ranges a particle is drawn from when it is (re)spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleProfile {
    /// Horizontal velocity per frame.
    pub velocity_x: Span,
    /// Vertical velocity per frame.
    pub velocity_y: Span,
    /// Disc radius.
    pub radius: Span,
    /// Disc opacity.
    pub alpha: Span,
}

impl ParticleProfile {
    /// Slow drift in every direction.
    pub const DRIFT: Self = Self {
        velocity_x: Span::symmetric(0.2),
        velocity_y: Span::symmetric(0.2),
        radius: Span::new(0.3, 1.8),
        alpha: Span::new(0.05, 0.45),
    };

    /// Slow downward fall with a little sideways sway.
    pub const FALL: Self = Self {
        velocity_x: Span::symmetric(0.15),
        velocity_y: Span::new(0.1, 0.5),
        radius: Span::new(0.3, 2.1),
        alpha: Span::new(0.05, 0.4),
    };

    /// Returns the name of the first invalid range, if any.
    #[must_use]
    pub fn invalid_span(&self) -> Option<&'static str> {
        [
            ("velocity_x", self.velocity_x),
            ("velocity_y", self.velocity_y),
            ("radius", self.radius),
            ("alpha", self.alpha),
        ]
        .into_iter()
        .find(|(_, span)| !span.is_valid())
        .map(|(name, _)| name)
    }
}

impl Default for ParticleProfile {
    fn default() -> Self {
        Self::DRIFT
    }
}

/// Which accent a particle is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorTag {
    /// First accent.
    #[default]
    Primary,
    /// Second accent (dual color mode only).
    Secondary,
}

/// Where a (re)spawned particle appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Anywhere on the surface.
    Anywhere,
    /// Somewhere along the top edge.
    TopEdge,
}

/// A single point of the field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    /// Position in surface pixels.
    pub position: Vec2,
    /// Displacement applied every frame.
    pub velocity: Vec2,
    /// Disc radius, fixed at spawn.
    pub radius: f32,
    /// Disc opacity, fixed at spawn.
    pub alpha: f32,
    /// Accent, fixed at spawn.
    pub color: ColorTag,
}

impl Particle {
    /// Re-rolls every attribute in place.
    ///
    /// An empty extent places the particle at the origin, which every valid
    /// extent contains.
    pub fn reset<R: Rng>(
        &mut self,
        rng: &mut R,
        extent: Extent,
        profile: &ParticleProfile,
        dual_color: bool,
        placement: Placement,
    ) {
        let x = Span::new(0.0, extent.width).sample(rng);
        let y = match placement {
            Placement::Anywhere => Span::new(0.0, extent.height).sample(rng),
            Placement::TopEdge => 0.0,
        };

        self.position = Vec2::new(x, y);
        self.velocity = Vec2::new(
            profile.velocity_x.sample(rng),
            profile.velocity_y.sample(rng),
        );
        self.radius = profile.radius.sample(rng);
        self.alpha = profile.alpha.sample(rng);
        self.color = if dual_color && rng.gen_bool(0.5) {
            ColorTag::Secondary
        } else {
            ColorTag::Primary
        };
    }
}

/// Fixed-size particle arena, indexed by position.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    /// The storage array. Never resized after creation.
    particles: Box<[Particle]>,
}

impl ParticlePool {
    /// Allocates `size` particles spread uniformly over `extent`.
    #[must_use]
    pub fn new<R: Rng>(
        size: usize,
        rng: &mut R,
        extent: Extent,
        profile: &ParticleProfile,
        dual_color: bool,
    ) -> Self {
        let mut particles = vec![Particle::default(); size].into_boxed_slice();
        for particle in particles.iter_mut() {
            particle.reset(rng, extent, profile, dual_color, Placement::Anywhere);
        }
        Self { particles }
    }

    /// Number of particles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if the pool holds no particles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All particles.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// All particles, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
