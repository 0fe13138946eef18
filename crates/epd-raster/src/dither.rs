//! Palette quantization with Floyd-Steinberg error diffusion.
//!
//! Every pixel is snapped to the nearest usable palette color and the
//! quantization error is spread to unprocessed neighbors:
//!
//! ```text
//!        X   7
//!    3   5   1      (all /16)
//! ```
//!
//! The weights are integer-truncated (`err * w / 16` in i32, truncation
//! toward zero). This is an intentional numeric contract carried over
//! from the panel firmware, not an approximation to be replaced with
//! floating point: the persisted raster must dither identically to what
//! the device produced historically.

use crate::error::RasterError;
use crate::palette::{Palette, Rgb};
use crate::raster::RasterBuffer;

/// Floyd-Steinberg kernel: `(dx, dy, weight)` per neighbor, divisor 16.
const FLOYD_STEINBERG: [(i32, i32, i32); 4] = [
    (1, 0, 7),  // east
    (-1, 1, 3), // southwest
    (0, 1, 5),  // south
    (1, 1, 1),  // southeast
];

const DIVISOR: i32 = 16;

/// Per-pixel signed error, one i32 triple per pixel.
///
/// Scoped to a single quantization pass. Errors accumulate unclamped;
/// only the post-accumulation read is clamped before matching. i32 gives
/// ample headroom: even pathological inputs stay far from overflow since
/// each pixel's outgoing error is bounded by the palette gamut.
struct ErrorAccumulator {
    values: Vec<i32>,
    width: u32,
    height: u32,
}

impl ErrorAccumulator {
    fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let len = width as usize * height as usize * 3;
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|_| RasterError::Allocation {
                what: "error accumulator",
                bytes: len * std::mem::size_of::<i32>(),
            })?;
        values.resize(len, 0);
        Ok(Self {
            values,
            width,
            height,
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    #[inline]
    fn take(&self, x: u32, y: u32) -> [i32; 3] {
        let i = self.index(x, y);
        [self.values[i], self.values[i + 1], self.values[i + 2]]
    }

    /// Add a weighted share of `err` to the neighbor at `(x + dx, y + dy)`,
    /// skipping neighbors outside the image.
    fn diffuse(&mut self, x: u32, y: u32, dx: i32, dy: i32, weight: i32, err: [i32; 3]) {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
            return;
        }
        let i = self.index(nx as u32, ny as u32);
        for c in 0..3 {
            self.values[i + c] += err[c] * weight / DIVISOR;
        }
    }
}

/// Quantize a raster to the palette in place, diffusing error.
///
/// Processes pixels in row-major order. For each pixel the accumulated
/// error is added, clamped to 0..=255, matched against the usable palette
/// entries, and the chosen entry's literal RGB value is written back --
/// the output raster stores colors, not indices, so it must match the
/// palette the device is configured with byte for byte.
///
/// On accumulator allocation failure the raster is left untouched.
pub fn quantize(raster: &mut RasterBuffer, palette: &Palette) -> Result<(), RasterError> {
    let (width, height) = (raster.width(), raster.height());
    let mut errors = ErrorAccumulator::new(width, height)?;

    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = raster.pixel(x, y);
            let acc = errors.take(x, y);

            let old_r = (r as i32 + acc[0]).clamp(0, 255);
            let old_g = (g as i32 + acc[1]).clamp(0, 255);
            let old_b = (b as i32 + acc[2]).clamp(0, 255);

            let chosen = palette.nearest(Rgb::new(old_r as u8, old_g as u8, old_b as u8));
            raster.set_pixel(x, y, [chosen.r, chosen.g, chosen.b]);

            // Error is measured from the clamped value, never the raw sum.
            let err = [
                old_r - chosen.r as i32,
                old_g - chosen.g as i32,
                old_b - chosen.b as i32,
            ];

            for &(dx, dy, weight) in &FLOYD_STEINBERG {
                errors.diffuse(x, y, dx, dy, weight, err);
            }
        }
    }

    Ok(())
}
