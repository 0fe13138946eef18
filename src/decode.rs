//! Decode bridge: compressed image bytes to an RGB888 raster.
//!
//! The pipeline itself never sees compressed bitstreams; this module is
//! the collaborator that turns PNG or JPEG bytes into the row-major
//! RGB888 buffer the pipeline contract requires. Format is sniffed from
//! the file magic, never from the extension.

use epd_raster::RasterBuffer;
use tracing::info;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

use crate::error::AppError;

const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// Decode PNG or JPEG bytes into an RGB888 raster.
pub fn decode_image(bytes: &[u8]) -> Result<RasterBuffer, AppError> {
    if bytes.starts_with(&PNG_MAGIC) {
        decode_png(bytes)
    } else if bytes.starts_with(&JPEG_MAGIC) {
        decode_jpeg(bytes)
    } else {
        Err(AppError::UnsupportedFormat)
    }
}

fn decode_png(bytes: &[u8]) -> Result<RasterBuffer, AppError> {
    let mut decoder = png::Decoder::new(bytes);
    // Expand indexed images and strip 16-bit depth so the output is
    // always one of the 8-bit color types handled below.
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder
        .read_info()
        .map_err(|e| AppError::PngDecode(e.to_string()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| AppError::PngDecode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    info!(
        width = frame.width,
        height = frame.height,
        color_type = ?frame.color_type,
        "decoded PNG"
    );

    let rgb = match frame.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        png::ColorType::Indexed => {
            // normalize_to_color8 expands indexed PNGs before we see them.
            return Err(AppError::PngDecode("unexpanded indexed PNG".into()));
        }
    };

    RasterBuffer::new(frame.width, frame.height, rgb).map_err(AppError::Pipeline)
}

fn decode_jpeg(bytes: &[u8]) -> Result<RasterBuffer, AppError> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(options, bytes);

    let pixels = decoder
        .decode()
        .map_err(|e| AppError::JpegDecode(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| AppError::JpegDecode("missing image info after decode".into()))?;

    info!(
        width = info.width,
        height = info.height,
        "decoded JPEG"
    );

    RasterBuffer::new(u32::from(info.width), u32::from(info.height), pixels)
        .map_err(AppError::Pipeline)
}
