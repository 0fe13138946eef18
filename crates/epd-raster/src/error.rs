//! Error types for the raster pipeline.

use thiserror::Error;

/// Errors surfaced by the raster pipeline stages.
///
/// The taxonomy distinguishes invalid input, resource exhaustion, and I/O
/// failure so callers can report the specific failure rather than a
/// generic one. Nothing here is retried internally.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("buffer of {len} bytes does not hold a {width}x{height} RGB raster")]
    SizeMismatch {
        len: usize,
        width: u32,
        height: u32,
    },

    #[error("raster has zero width or height")]
    EmptyRaster,

    #[error("raster is {width}x{height} but the panel is {panel_width}x{panel_height}")]
    GeometryMismatch {
        width: u32,
        height: u32,
        panel_width: u32,
        panel_height: u32,
    },

    #[error("failed to allocate {bytes} bytes for {what}")]
    Allocation { what: &'static str, bytes: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
