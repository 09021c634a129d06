//! Per-vertex attribute channels and vertex colors.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear RGBA color with `f32` components.
///
/// Components are nominally in `[0, 1]` but are stored as given; only the
/// 8-bit conversions clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexColor {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl VertexColor {
    /// Create a color from RGBA components.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::VertexColor;
    ///
    /// let c = VertexColor::new(1.0, 0.5, 0.0, 1.0);
    /// assert_eq!(c.g, 0.5);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[inline]
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from 8-bit RGBA components.
    #[inline]
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Convert to 8-bit RGBA components, clamping each channel to `[0, 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::VertexColor;
    ///
    /// let c = VertexColor::new(2.0, 0.5, -1.0, 1.0);
    /// assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Truncation and sign loss are safe: values are clamped to [0.0, 1.0] before * 255.0
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Fully transparent black.
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for VertexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A per-vertex data channel of a [`BufferMesh`](crate::BufferMesh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexAttribute {
    /// Vertex positions. Always present.
    Position,
    /// Texture coordinates.
    Uv,
    /// Vertex normals.
    Normal,
    /// Tangents with handedness in `w`.
    Tangent,
    /// Vertex colors.
    Color,
}

impl VertexAttribute {
    /// Every attribute channel, positions first.
    pub const ALL: [Self; 5] = [
        Self::Position,
        Self::Uv,
        Self::Normal,
        Self::Tangent,
        Self::Color,
    ];

    /// Lowercase channel name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "positions",
            Self::Uv => "uvs",
            Self::Normal => "normals",
            Self::Tangent => "tangents",
            Self::Color => "colors",
        }
    }
}

impl fmt::Display for VertexAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
