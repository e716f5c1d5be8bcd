/// Framebuffer viewport rectangle in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport covering `width x height` from the origin.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height, or 0 for an empty viewport.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.height <= 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
