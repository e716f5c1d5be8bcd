//! Framebuffer coordinate types.
//!
//! Canonical space for this layer is the backend's: integer pixels, origin at
//! the framebuffer corner the backend uses.

mod viewport;

pub use viewport::Viewport;
