use epd_raster::RasterError;
use thiserror::Error;

/// Application-level errors for the inkframe front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unsupported image format (expected PNG or JPEG)")]
    UnsupportedFormat,

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("JPEG decode error: {0}")]
    JpegDecode(String),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] RasterError),

    #[error("configuration store error: {0}")]
    Store(String),

    #[error("unknown palette color: {0}")]
    UnknownColor(String),

    #[error("a conversion is already running")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Store(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let error = AppError::UnsupportedFormat;
        assert_eq!(
            error.to_string(),
            "unsupported image format (expected PNG or JPEG)"
        );
    }

    #[test]
    fn test_busy_message() {
        assert_eq!(AppError::Busy.to_string(), "a conversion is already running");
    }

    #[test]
    fn test_pipeline_error_wraps() {
        let error = AppError::from(RasterError::EmptyRaster);
        assert_eq!(
            error.to_string(),
            "pipeline error: raster has zero width or height"
        );
    }
}
