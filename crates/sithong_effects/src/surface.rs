//! Drawing surface contract.
//!
//! A particle field needs very little from its canvas: a pixel extent, a way
//! to clear it, filled circles and stroked lines. Anything that can do those
//! four things (a browser 2D context, a GPU batcher, a test recorder) can host
//! a field.

use crate::color::Color;

/// 2D vector, used for positions and per-frame velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Pixel extent of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Extent {
    /// Zero-sized extent (an unavailable surface).
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new extent.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if nothing can be drawn into this extent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// True if `point` lies within `[0, width) x [0, height)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x < self.width && point.y >= 0.0 && point.y < self.height
    }
}

/// An immediate-mode 2D drawing target.
pub trait Surface {
    /// Current pixel extent.
    fn extent(&self) -> Extent;

    /// Changes the pixel extent.
    fn resize(&mut self, extent: Extent);

    /// False while the backing canvas is detached or not yet created.
    fn is_available(&self) -> bool {
        true
    }

    /// Clears the given region.
    fn clear(&mut self, extent: Extent);

    /// Draws a filled disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Draws a stroked line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
}

/// A recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Region cleared.
    Clear {
        /// Cleared extent.
        extent: Extent,
    },
    /// Filled disc.
    Circle {
        /// Center.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill color (alpha included).
        color: Color,
    },
    /// Stroked line.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke color (alpha included).
        color: Color,
        /// Line width.
        width: f32,
    },
}

/// Headless surface that records the commands of the most recent frame.
///
/// Every `clear` starts a new frame; the command buffer keeps its capacity
/// so steady-state recording does not allocate.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    /// Surface extent.
    extent: Extent,
    /// Commands since the last clear.
    commands: Vec<DrawCommand>,
    /// Number of clears seen.
    frames: u64,
    /// Simulates a detached canvas.
    available: bool,
}

impl CommandBuffer {
    /// Creates a recorder with the given extent.
    #[must_use]
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            commands: Vec::with_capacity(4096),
            frames: 0,
            available: true,
        }
    }

    /// Commands recorded since the last clear.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames started so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Iterates the discs of the current frame.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::Circle { center, radius, color } => Some((center, radius, color)),
            _ => None,
        })
    }

    /// Iterates the lines of the current frame.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Color, f32)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::Line { from, to, color, width } => Some((from, to, color, width)),
            _ => None,
        })
    }

    /// Marks the canvas as attached or detached.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl Surface for CommandBuffer {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn clear(&mut self, extent: Extent) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear { extent });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }
}
