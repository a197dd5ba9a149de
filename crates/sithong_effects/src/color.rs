//! Straight-alpha RGBA colors, as the canvas `rgba()` notation takes them.

/// RGBA color, every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Opacity.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Primary accent, `#00F5D4`.
    pub const NEON_CYAN: Self = Self::hex(0x00F5_D4FF);
    /// Secondary accent, `#F72585`.
    pub const NEON_PINK: Self = Self::hex(0xF725_85FF);

    /// Color from normalized channels.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color from a packed `0xRRGGBBAA` literal.
    #[must_use]
    pub const fn hex(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Same hue at opacity `a`. Particles and links set their own opacity
    /// on top of the palette accent.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(byte: u8) -> f32 {
        f32::from(byte) / 255.0
    }

    #[test]
    fn test_accent_hex() {
        let cyan = Color::NEON_CYAN;
        assert!(cyan.r.abs() < f32::EPSILON);
        assert!((cyan.g - channel(0xF5)).abs() < f32::EPSILON);
        assert!((cyan.b - channel(0xD4)).abs() < f32::EPSILON);
        assert!((cyan.a - 1.0).abs() < f32::EPSILON);

        let pink = Color::NEON_PINK;
        assert!((pink.r - channel(0xF7)).abs() < f32::EPSILON);
        assert!((pink.g - channel(0x25)).abs() < f32::EPSILON);
        assert!((pink.b - channel(0x85)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_with_alpha_keeps_channels() {
        let faded = Color::NEON_PINK.with_alpha(0.06);
        assert_eq!(
            (faded.r, faded.g, faded.b),
            (Color::NEON_PINK.r, Color::NEON_PINK.g, Color::NEON_PINK.b)
        );
        assert!((faded.a - 0.06).abs() < f32::EPSILON);
    }

    #[test]
    fn test_default_is_opaque_white() {
        assert_eq!(Color::default(), Color::hex(0xFFFF_FFFF));
    }
}
