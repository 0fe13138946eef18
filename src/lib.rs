//! Inkframe - photo preparation for six-color e-paper photo frames.
//!
//! Front end around the `epd-raster` pipeline: decodes JPEG/PNG sources,
//! manages the persisted palette and processing settings, and writes the
//! panel-ready BMP artifact.
//! This library exposes modules for integration testing.

pub mod decode;
pub mod error;
pub mod services;

pub use error::AppError;
