//! epd-raster: raster preparation for six-color e-paper panels.
//!
//! This crate turns an arbitrary decoded RGB888 raster into the exact
//! artifact a reflective six-color panel can render: landscape
//! orientation, panel dimensions, palette-only colors, persisted as a
//! 24-bit BMP the display driver streams to hardware unchanged.
//!
//! # Pipeline
//!
//! ```text
//! decoded RGB888
//!     |
//!     v
//! normalize_orientation     portrait -> 90 degrees clockwise
//!     |
//!     v
//! fit_to_display            letterbox to panel geometry (no-op on match)
//!     |
//!     v
//! apply_contrast            (p - 128) * c + 128, clamped
//!     |
//!     v
//! apply_brightness          p * 2^fstop, clamped
//!     |
//!     v
//! quantize                  nearest palette color + Floyd-Steinberg
//!     |
//!     v
//! BMP bytes                 54-byte header, bottom-up BGR rows
//! ```
//!
//! # Quick start
//!
//! ```
//! use epd_raster::{
//!     DisplayGeometry, DisplayTuning, Palette, Pipeline, PipelineConfig, RasterBuffer,
//! };
//!
//! let config = PipelineConfig::new(
//!     DisplayGeometry::new(8, 4),
//!     Palette::default(),
//!     DisplayTuning::default(),
//! );
//! let pipeline = Pipeline::new(config);
//!
//! let source = RasterBuffer::filled(8, 4, 128).unwrap();
//! let quantized = pipeline.process(source).unwrap();
//! let bmp = pipeline.encode(&quantized).unwrap();
//! assert_eq!(&bmp[0..2], b"BM");
//! ```
//!
//! # Numeric contracts
//!
//! Error diffusion uses integer-truncating weights (`err * 7 / 16` in
//! i32) and measures error from the clamped pre-quantization value.
//! Both are load-bearing for reproducible panel output. See [`dither`]
//! for details.
//!
//! # Failure model
//!
//! Allocation failure is a checked error at every stage, never a crash.
//! Orientation degrades gracefully (keeps the portrait raster and warns);
//! fit, quantization, and encoding treat it as terminal for the run. A
//! failed run never leaves a partial artifact that parses as valid.

pub mod bmp;
pub mod dither;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod orient;
pub mod palette;
pub mod pipeline;
pub mod raster;
pub mod settings;
pub mod tone;


pub use bmp::BmpHeader;
pub use error::RasterError;
pub use geometry::DisplayGeometry;
pub use palette::{Palette, Rgb, RESERVED_SLOT};
pub use pipeline::{Pipeline, PipelineConfig};
pub use raster::RasterBuffer;
pub use settings::{
    ColorMethod, DisplayTuning, ProcessingMode, ProcessingSettings, ToneMode,
};
