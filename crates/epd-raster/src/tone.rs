//! In-place tone adjustment: contrast and brightness.
//!
//! Both stages are stateless per-channel transforms over the whole
//! buffer. They run in a fixed order, contrast first, so the brightness
//! multiplier applies to the contrast-stretched values.

use crate::raster::RasterBuffer;

/// Contrast stretch pivoting on mid-gray.
///
/// `p' = clamp((p - 128) * contrast + 128, 0, 255)`. Channel value 128 is
/// a fixed point for any contrast, which keeps mean luminance roughly
/// where it was.
pub fn apply_contrast(raster: &mut RasterBuffer, contrast: f32) {
    for channel in raster.data_mut() {
        let adjusted = (*channel as f32 - 128.0) * contrast + 128.0;
        *channel = adjusted.clamp(0.0, 255.0) as u8;
    }
}

/// Exposure-style brightness in f-stops.
///
/// `p' = clamp(p * 2^fstop, 0, 255)` with the product truncated to an
/// integer, so `fstop = 0` is an exact identity.
pub fn apply_brightness(raster: &mut RasterBuffer, fstop: f32) {
    let multiplier = 2.0_f32.powf(fstop);
    for channel in raster.data_mut() {
        let brightened = (*channel as f32 * multiplier) as i32;
        *channel = brightened.clamp(0, 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_mid_gray_fixed_point() {
        for contrast in [0.0, 0.5, 1.0, 1.3, 2.0, 10.0] {
            let mut raster = RasterBuffer::filled(2, 2, 128).unwrap();
            apply_contrast(&mut raster, contrast);
            assert!(
                raster.data().iter().all(|&b| b == 128),
                "contrast {contrast} moved the 128 pivot"
            );
        }
    }

    #[test]
    fn test_contrast_unity_is_identity() {
        let data: Vec<u8> = (0..12).map(|i| (i * 20) as u8).collect();
        let mut raster = RasterBuffer::new(2, 2, data.clone()).unwrap();
        apply_contrast(&mut raster, 1.0);
        assert_eq!(raster.data(), data.as_slice());
    }

    #[test]
    fn test_contrast_stretches_and_clamps() {
        let mut raster = RasterBuffer::new(1, 1, vec![28, 128, 228]).unwrap();
        apply_contrast(&mut raster, 2.0);
        // 28 -> -72 clamped to 0, 228 -> 328 clamped to 255.
        assert_eq!(raster.data(), &[0, 128, 255]);
    }

    #[test]
    fn test_brightness_zero_fstop_is_identity() {
        let data: Vec<u8> = (0..=255).cycle().take(27).collect();
        let mut raster = RasterBuffer::new(3, 3, data.clone()).unwrap();
        apply_brightness(&mut raster, 0.0);
        assert_eq!(raster.data(), data.as_slice());
    }

    #[test]
    fn test_brightness_one_fstop_doubles() {
        let mut raster = RasterBuffer::new(1, 1, vec![10, 100, 200]).unwrap();
        apply_brightness(&mut raster, 1.0);
        assert_eq!(raster.data(), &[20, 200, 255]);
    }

    #[test]
    fn test_brightness_negative_fstop_halves() {
        let mut raster = RasterBuffer::new(1, 1, vec![10, 101, 255]).unwrap();
        apply_brightness(&mut raster, -1.0);
        // Truncation, not rounding: 101 * 0.5 = 50.5 -> 50, 255 * 0.5 -> 127.
        assert_eq!(raster.data(), &[5, 50, 127]);
    }
}
