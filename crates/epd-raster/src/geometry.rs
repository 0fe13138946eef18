//! Panel geometry.

use serde::{Deserialize, Serialize};

/// Fixed pixel dimensions of the target panel.
///
/// Supplied once at startup by the board integration; every encoded
/// raster must match it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    pub width: u32,
    pub height: u32,
}

impl DisplayGeometry {
    /// 7.3" six-color panel used by the PhotoPainter class of frames.
    pub const PHOTOPAINTER_7IN3: Self = Self {
        width: 800,
        height: 480,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a raster of the given size already matches the panel.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::PHOTOPAINTER_7IN3
    }
}
