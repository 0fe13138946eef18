//! Conversion service: source photo to panel-ready BMP.
//!
//! Ties the collaborators together: read and decode the source, build a
//! per-run pipeline configuration from the persisted palette and display
//! tuning, run the transform stages, and persist the BMP artifact with a
//! temp-then-rename write so a failed run leaves any previously written
//! artifact untouched.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use epd_raster::{DisplayGeometry, Pipeline, PipelineConfig};
use tracing::{error, info};

use crate::decode;
use crate::error::AppError;
use crate::services::store::ConfigStore;

/// Drives one conversion at a time.
///
/// The panel can only be refreshed by one writer, so concurrent
/// conversions make no sense at the device level; the internal mutex
/// turns an overlapping request into [`AppError::Busy`] instead of
/// queueing it.
pub struct Converter<S: ConfigStore> {
    store: S,
    geometry: DisplayGeometry,
    run_guard: Mutex<()>,
}

impl<S: ConfigStore> Converter<S> {
    pub fn new(store: S, geometry: DisplayGeometry) -> Self {
        Self {
            store,
            geometry,
            run_guard: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build the per-run pipeline from persisted configuration, with
    /// optional overrides for this run only.
    fn pipeline(&self, contrast: Option<f32>, fstop: Option<f32>) -> Result<Pipeline, AppError> {
        let palette = self.store.load_palette()?;
        let tuning = self.store.load_tuning()?;
        let mut config = PipelineConfig::new(self.geometry, palette, tuning);
        if let Some(c) = contrast {
            config = config.contrast(c);
        }
        if let Some(f) = fstop {
            config = config.brightness_fstop(f);
        }
        Ok(Pipeline::new(config))
    }

    /// Convert a source photo file into a panel BMP at `output`.
    ///
    /// Returns the number of bytes written.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        contrast: Option<f32>,
        fstop: Option<f32>,
    ) -> Result<usize, AppError> {
        let _guard = self.run_guard.try_lock().map_err(|_| AppError::Busy)?;

        info!(input = %input.display(), output = %output.display(), "converting");

        let bytes = fs::read(input)?;
        let raster = decode::decode_image(&bytes)?;
        let pipeline = self.pipeline(contrast, fstop)?;

        let quantized = pipeline.process(raster)?;
        let bmp = pipeline.encode(&quantized)?;

        let tmp = output.with_extension("bmp.tmp");
        if let Err(e) = fs::write(&tmp, &bmp).and_then(|()| fs::rename(&tmp, output)) {
            error!(output = %output.display(), error = %e, "failed to persist artifact");
            let _ = fs::remove_file(&tmp);
            return Err(AppError::Io(e));
        }

        info!(bytes = bmp.len(), output = %output.display(), "artifact written");
        Ok(bmp.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::JsonFileStore;
    use epd_raster::Palette;

    fn png_fixture(width: u32, height: u32, fill: u8) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            let data = vec![fill; (width * height * 3) as usize];
            writer.write_image_data(&data).unwrap();
        }
        bytes
    }

    #[test]
    fn test_convert_writes_panel_bmp() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        let output = dir.path().join("frame.bmp");
        fs::write(&input, png_fixture(8, 4, 128)).unwrap();

        let converter = Converter::new(
            JsonFileStore::new(dir.path().join("config")),
            DisplayGeometry::new(8, 4),
        );
        let written = converter
            .convert_file(&input, &output, Some(1.0), Some(0.0))
            .unwrap();

        let bmp = fs::read(&output).unwrap();
        assert_eq!(bmp.len(), written);
        assert_eq!(&bmp[0..2], b"BM");
        assert_eq!(
            u32::from_le_bytes(bmp[18..22].try_into().unwrap()),
            8,
            "declared width"
        );
    }

    #[test]
    fn test_failed_decode_leaves_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        let output = dir.path().join("frame.bmp");
        fs::write(&output, b"previous artifact").unwrap();
        fs::write(&input, b"not an image at all").unwrap();

        let converter = Converter::new(
            JsonFileStore::new(dir.path().join("config")),
            DisplayGeometry::new(8, 4),
        );
        let err = converter
            .convert_file(&input, &output, None, None)
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat));
        assert_eq!(fs::read(&output).unwrap(), b"previous artifact");
    }

    #[test]
    fn test_stored_palette_drives_quantization() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        let output = dir.path().join("frame.bmp");
        fs::write(&input, png_fixture(4, 2, 250)).unwrap();

        let store = JsonFileStore::new(dir.path().join("config"));
        let mut palette = Palette::default();
        palette.white = epd_raster::Rgb::new(240, 240, 240);
        store.save_palette(&palette).unwrap();

        let converter = Converter::new(store, DisplayGeometry::new(4, 2));
        converter
            .convert_file(&input, &output, Some(1.0), Some(0.0))
            .unwrap();

        // First pixel of the pixel array (bottom row) is the custom white
        // in BGR order.
        let bmp = fs::read(&output).unwrap();
        assert_eq!(&bmp[54..57], &[240, 240, 240]);
    }
}
