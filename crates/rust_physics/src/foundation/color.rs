//! RGBA colors attached to bodies
//!
//! The kernel never interprets colors; they are carried for the renderer.

use serde::{Deserialize, Serialize};

/// A color with red, green, blue and alpha components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque mid gray
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Fully transparent
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color with explicit alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
