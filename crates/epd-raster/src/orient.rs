//! Orientation normalization.
//!
//! The panel is landscape; portrait sources are rotated 90 degrees
//! clockwise so their long axis matches the panel's. Rotation failure is
//! the one soft spot in the pipeline: a frame shown sideways beats no
//! frame at all, so an allocation failure falls back to the original
//! orientation instead of failing the run.

use tracing::warn;

use crate::raster::RasterBuffer;

/// Rotate a portrait raster 90 degrees clockwise; landscape and square
/// inputs pass through unchanged.
///
/// Source pixel `(x, y)` maps to `(height - 1 - y, x)` in a
/// `height x width` output. On allocation failure the input is returned
/// unrotated with a warning.
pub fn normalize_orientation(src: RasterBuffer) -> RasterBuffer {
    let (w, h) = (src.width(), src.height());
    if w >= h {
        return src;
    }

    let mut dst = match RasterBuffer::filled(h, w, 0) {
        Ok(buffer) => buffer,
        Err(e) => {
            warn!(width = w, height = h, error = %e, "rotation buffer unavailable, keeping portrait orientation");
            return src;
        }
    };

    for y in 0..h {
        let dst_x = h - 1 - y;
        for x in 0..w {
            dst.set_pixel(dst_x, x, src.pixel(x, y));
        }
    }

    dst
}
