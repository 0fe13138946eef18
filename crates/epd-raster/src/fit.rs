//! Letterbox fit to panel dimensions.

use crate::error::RasterError;
use crate::geometry::DisplayGeometry;
use crate::raster::RasterBuffer;

/// Scale and center a raster onto a white panel-sized canvas.
///
/// A raster that already matches the panel is returned unchanged,
/// byte-identical. Otherwise the source is scaled by
/// `min(panel_w / src_w, panel_h / src_h)` with nearest-neighbor sampling
/// and centered with integer offsets; the uncovered border stays white.
/// Unlike rotation, a failed allocation here is terminal: there is no
/// usable image at the wrong dimensions.
pub fn fit_to_display(
    src: RasterBuffer,
    geometry: DisplayGeometry,
) -> Result<RasterBuffer, RasterError> {
    if geometry.matches(src.width(), src.height()) {
        return Ok(src);
    }

    let mut dst = RasterBuffer::filled(geometry.width, geometry.height, 255)?;

    let (src_w, src_h) = (src.width(), src.height());
    let scale = f32::min(
        geometry.width as f32 / src_w as f32,
        geometry.height as f32 / src_h as f32,
    );
    let scaled_w = (src_w as f32 * scale) as u32;
    let scaled_h = (src_h as f32 * scale) as u32;
    let offset_x = (geometry.width - scaled_w) / 2;
    let offset_y = (geometry.height - scaled_h) / 2;

    for y in 0..scaled_h {
        let src_y = ((y as f32 / scale) as u32).min(src_h - 1);
        for x in 0..scaled_w {
            let src_x = ((x as f32 / scale) as u32).min(src_w - 1);
            dst.set_pixel(x + offset_x, y + offset_y, src.pixel(src_x, src_y));
        }
    }

    Ok(dst)
}
