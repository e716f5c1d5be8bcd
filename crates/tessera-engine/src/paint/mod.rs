//! Color values passed to clear operations.

pub mod color;

pub use color::Color;
