/// Drawable size in logical pixels.
///
/// Drives the perspective aspect ratio and the pixel-to-NDC mapping of the
/// text overlay.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, with both sides clamped to at least one pixel.
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_clamps_degenerate_sides() {
        assert_eq!(Viewport::new(0.0, 0.0).aspect(), 1.0);
        assert_eq!(Viewport::new(200.0, 0.5).aspect(), 200.0);
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(Viewport::new(640.0, 480.0).is_valid());
    }
}
