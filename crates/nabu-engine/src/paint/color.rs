/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Markup colors and tint blocks are authored straight; premultiplication,
/// if any, is the host's business.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color   = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color   = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color     = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color   = Color::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color    = Color::rgba(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Color  = Color::rgba(1.0, 0.92, 0.016, 1.0);
    pub const CYAN: Color    = Color::rgba(0.0, 1.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgba(1.0, 0.0, 1.0, 1.0);
    pub const GRAY: Color    = Color::rgba(0.5, 0.5, 0.5, 1.0);
    pub const CLEAR: Color   = Color::rgba(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::CLEAR
    }

    /// Creates a color from straight bytes (`0`–`255`).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Rounds each channel back to a byte, clamping out-of-range values.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, to: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Approximate equality, tolerant to byte round-trips.
    pub fn approx_eq(self, other: Color) -> bool {
        const EPS: f32 = 1.0 / 512.0;
        (self.r - other.r).abs() <= EPS
            && (self.g - other.g).abs() <= EPS
            && (self.b - other.b).abs() <= EPS
            && (self.a - other.a).abs() <= EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let c = Color::from_rgba8(51, 102, 153, 255);
        assert_eq!(c.to_rgba8(), [51, 102, 153, 255]);
        assert!(c.approx_eq(Color::rgb(0.2, 0.4, 0.6)));
    }

    #[test]
    fn lerp_towards_white() {
        let c = Color::BLACK.lerp(Color::WHITE, 0.2);
        assert!(c.approx_eq(Color::rgb(0.2, 0.2, 0.2)));
        assert_eq!(Color::RED.lerp(Color::BLUE, 5.0), Color::BLUE);
    }
}
