//! Stage sequencing.
//!
//! [`Pipeline`] drives the fixed stage order over a decoded raster:
//! orientation, display fit, contrast, brightness, quantization, and
//! finally BMP encoding. Everything a stage needs arrives in the
//! [`PipelineConfig`] built once per run -- no stage reads shared mutable
//! state, so each is a pure function of its inputs.

use std::io::Write;

use tracing::info;

use crate::bmp;
use crate::dither;
use crate::error::RasterError;
use crate::fit;
use crate::geometry::DisplayGeometry;
use crate::orient;
use crate::palette::Palette;
use crate::raster::RasterBuffer;
use crate::settings::DisplayTuning;
use crate::tone;

/// Everything one pipeline run needs, assembled from the persisted
/// palette, display tuning, and panel geometry.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub geometry: DisplayGeometry,
    pub palette: Palette,
    pub contrast: f32,
    pub brightness_fstop: f32,
}

impl PipelineConfig {
    pub fn new(geometry: DisplayGeometry, palette: Palette, tuning: DisplayTuning) -> Self {
        Self {
            geometry,
            palette,
            contrast: tuning.contrast,
            brightness_fstop: tuning.brightness_fstop,
        }
    }

    /// Override the contrast multiplier for this run.
    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    /// Override the brightness f-stop for this run.
    pub fn brightness_fstop(mut self, fstop: f32) -> Self {
        self.brightness_fstop = fstop;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(
            DisplayGeometry::default(),
            Palette::default(),
            DisplayTuning::default(),
        )
    }
}

/// The image-transform pipeline.
///
/// Single-threaded and synchronous: each stage runs to completion before
/// the next begins, and a run cannot be aborted once started. The caller
/// is responsible for serializing runs -- only one may execute at a time
/// per device.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Transform a decoded raster into a quantized, panel-sized raster.
    ///
    /// A failed run consumes the input but produces nothing; no partial
    /// result escapes.
    pub fn process(&self, raster: RasterBuffer) -> Result<RasterBuffer, RasterError> {
        info!(
            width = raster.width(),
            height = raster.height(),
            "processing raster"
        );

        let raster = orient::normalize_orientation(raster);
        let mut raster = fit::fit_to_display(raster, self.config.geometry)?;

        tone::apply_contrast(&mut raster, self.config.contrast);
        tone::apply_brightness(&mut raster, self.config.brightness_fstop);

        dither::quantize(&mut raster, &self.config.palette)?;

        info!(
            width = raster.width(),
            height = raster.height(),
            "raster quantized"
        );
        Ok(raster)
    }

    /// Encode a processed raster as BMP into the writer.
    pub fn encode_to<W: Write>(
        &self,
        raster: &RasterBuffer,
        out: &mut W,
    ) -> Result<(), RasterError> {
        bmp::encode_to(raster, self.config.geometry, out)
    }

    /// Encode a processed raster to in-memory BMP bytes.
    pub fn encode(&self, raster: &RasterBuffer) -> Result<Vec<u8>, RasterError> {
        bmp::encode(raster, self.config.geometry)
    }
}
