//! Display color palette and nearest-color matching.
//!
//! The panel renders exactly six pigments. The palette stores the measured
//! RGB value of each pigment; quantization snaps every pixel to one of
//! them. Slot order follows the legacy seven-entry color-index scheme of
//! the panel firmware, which keeps an unused slot between red and blue --
//! matching must skip it so its placeholder value is never emitted.

use serde::{Deserialize, Serialize};

/// Number of slots in the legacy color-index layout.
pub const PALETTE_SLOTS: usize = 7;

/// Index of the unused slot kept for legacy color-index compatibility.
pub const RESERVED_SLOT: usize = 4;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance to another color, computed in i32 so the
    /// maximum per-channel delta of 255 cannot overflow.
    #[inline]
    pub fn distance_sq(&self, other: Rgb) -> i32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        dr * dr + dg * dg + db * db
    }
}

/// The six display-usable colors of the panel.
///
/// Defaults are measured values for the 7.3" six-color panel, not the
/// nominal primaries -- e-paper pigments render far from their advertised
/// colors, and matching against measured values is what makes quantization
/// perceptually accurate on the real device.
///
/// Serializes as `{"black":{"r":..,"g":..,"b":..}, "white": ...}`; the
/// reserved slot is a layout detail and never appears in the JSON view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub black: Rgb,
    pub white: Rgb,
    pub yellow: Rgb,
    pub red: Rgb,
    pub blue: Rgb,
    pub green: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            black: Rgb::new(10, 10, 10),
            white: Rgb::new(200, 215, 225),
            yellow: Rgb::new(225, 222, 8),
            red: Rgb::new(149, 36, 23),
            blue: Rgb::new(25, 76, 181),
            green: Rgb::new(51, 117, 93),
        }
    }
}

impl Palette {
    /// The legacy seven-slot layout: `[black, white, yellow, red,
    /// <reserved>, blue, green]`. The reserved slot holds a placeholder
    /// value that matching never considers.
    pub fn slots(&self) -> [Rgb; PALETTE_SLOTS] {
        [
            self.black,
            self.white,
            self.yellow,
            self.red,
            Rgb::new(0, 0, 0),
            self.blue,
            self.green,
        ]
    }

    /// Entry by color name, as used in the JSON view.
    pub fn get(&self, name: &str) -> Option<Rgb> {
        match name {
            "black" => Some(self.black),
            "white" => Some(self.white),
            "yellow" => Some(self.yellow),
            "red" => Some(self.red),
            "blue" => Some(self.blue),
            "green" => Some(self.green),
            _ => None,
        }
    }

    /// Set an entry by color name. Returns false for an unknown name.
    pub fn set(&mut self, name: &str, value: Rgb) -> bool {
        match name {
            "black" => self.black = value,
            "white" => self.white = value,
            "yellow" => self.yellow = value,
            "red" => self.red = value,
            "blue" => self.blue = value,
            "green" => self.green = value,
            _ => return false,
        }
        true
    }

    /// Nearest usable entry to `target` by squared Euclidean distance.
    ///
    /// Iterates slots in index order with a strict `<` comparison, so on a
    /// tie the lower-indexed entry wins. The reserved slot is skipped
    /// unconditionally.
    pub fn nearest(&self, target: Rgb) -> Rgb {
        let mut best = self.white;
        let mut best_dist = i32::MAX;

        for (i, entry) in self.slots().iter().enumerate() {
            if i == RESERVED_SLOT {
                continue;
            }
            let dist = entry.distance_sq(target);
            if dist < best_dist {
                best_dist = dist;
                best = *entry;
            }
        }

        best
    }
}
