//! BMP raster encoding.
//!
//! The persisted artifact is a classic 24-bit uncompressed BMP: 14-byte
//! file header, 40-byte BITMAPINFOHEADER, then bottom-up BGR rows padded
//! to 4-byte boundaries. The panel driver re-reads this file and expects
//! pixel data at byte offset 54 with the declared panel dimensions, so
//! the layout is bit-exact by contract.

use std::io::Write;

use crate::error::RasterError;
use crate::geometry::DisplayGeometry;
use crate::raster::RasterBuffer;

/// Byte offset of the pixel array: 14-byte file header + 40-byte info header.
pub const PIXEL_DATA_OFFSET: u32 = 54;

/// Size of the BITMAPINFOHEADER variant used.
const INFO_HEADER_SIZE: u32 = 40;

/// 72 DPI expressed in pixels per meter.
const RESOLUTION_PPM: i32 = 2835;

/// The two fixed-layout BMP headers, serialized field by field.
///
/// Every field is written explicitly little-endian; there is no manual
/// byte-offset arithmetic to get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub width: u32,
    pub height: u32,
}

impl BmpHeader {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes per pixel row, padded up to a 4-byte boundary.
    pub fn row_size(&self) -> u32 {
        (self.width * 3).div_ceil(4) * 4
    }

    /// Size of the pixel array in bytes.
    pub fn image_size(&self) -> u32 {
        self.row_size() * self.height
    }

    /// Total file size: headers plus pixel array.
    pub fn file_size(&self) -> u32 {
        PIXEL_DATA_OFFSET + self.image_size()
    }

    /// Serialize both headers (54 bytes) to the writer.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        // File header.
        out.write_all(b"BM")?;
        out.write_all(&self.file_size().to_le_bytes())?;
        out.write_all(&0u16.to_le_bytes())?; // reserved1
        out.write_all(&0u16.to_le_bytes())?; // reserved2
        out.write_all(&PIXEL_DATA_OFFSET.to_le_bytes())?;

        // BITMAPINFOHEADER.
        out.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
        out.write_all(&(self.width as i32).to_le_bytes())?;
        out.write_all(&(self.height as i32).to_le_bytes())?;
        out.write_all(&1u16.to_le_bytes())?; // planes
        out.write_all(&24u16.to_le_bytes())?; // bits per pixel
        out.write_all(&0u32.to_le_bytes())?; // compression: BI_RGB
        out.write_all(&self.image_size().to_le_bytes())?;
        out.write_all(&RESOLUTION_PPM.to_le_bytes())?;
        out.write_all(&RESOLUTION_PPM.to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?; // palette colors: none
        out.write_all(&0u32.to_le_bytes())?; // important colors: all
        Ok(())
    }
}

/// Encode a quantized raster as BMP bytes into the writer.
///
/// The raster must match the panel geometry exactly; anything else is a
/// [`RasterError::GeometryMismatch`]. Rows are emitted bottom-up (source
/// row `height - 1 - y` becomes file row `y`), channels reordered RGB to
/// BGR, padding zero-filled. A short or failed write surfaces as
/// [`RasterError::Io`] and the artifact must be treated as corrupt.
pub fn encode_to<W: Write>(
    raster: &RasterBuffer,
    geometry: DisplayGeometry,
    out: &mut W,
) -> Result<(), RasterError> {
    if !geometry.matches(raster.width(), raster.height()) {
        return Err(RasterError::GeometryMismatch {
            width: raster.width(),
            height: raster.height(),
            panel_width: geometry.width,
            panel_height: geometry.height,
        });
    }

    let header = BmpHeader::new(raster.width(), raster.height());
    header.write_to(out)?;

    let mut row = vec![0u8; header.row_size() as usize];
    for y in (0..raster.height()).rev() {
        row.fill(0);
        for x in 0..raster.width() {
            let [r, g, b] = raster.pixel(x, y);
            let i = x as usize * 3;
            row[i] = b;
            row[i + 1] = g;
            row[i + 2] = r;
        }
        out.write_all(&row)?;
    }

    Ok(())
}

/// Encode a quantized raster to an in-memory BMP.
pub fn encode(raster: &RasterBuffer, geometry: DisplayGeometry) -> Result<Vec<u8>, RasterError> {
    let header = BmpHeader::new(raster.width(), raster.height());
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(header.file_size() as usize)
        .map_err(|_| RasterError::Allocation {
            what: "BMP output buffer",
            bytes: header.file_size() as usize,
        })?;
    encode_to(raster, geometry, &mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_panel_header_arithmetic() {
        let header = BmpHeader::new(800, 480);
        assert_eq!(header.row_size(), 2400);
        assert_eq!(header.image_size(), 1_152_000);
        assert_eq!(header.file_size(), 1_152_054);
    }

    #[test]
    fn test_panel_header_bytes() {
        let raster = RasterBuffer::filled(800, 480, 128).unwrap();
        let bytes = encode(&raster, DisplayGeometry::new(800, 480)).unwrap();

        assert_eq!(bytes.len(), 1_152_054);
        assert_eq!(bytes[0], b'B');
        assert_eq!(bytes[1], b'M');
        assert_eq!(u32_at(&bytes, 2), 1_152_054); // file size
        assert_eq!(u32_at(&bytes, 10), 54); // pixel data offset
        assert_eq!(u32_at(&bytes, 14), 40); // info header size
        assert_eq!(u32_at(&bytes, 18), 800); // width
        assert_eq!(u32_at(&bytes, 22), 480); // height
        assert_eq!(u16_at(&bytes, 26), 1); // planes
        assert_eq!(u16_at(&bytes, 28), 24); // bits per pixel
        assert_eq!(u32_at(&bytes, 30), 0); // compression
        assert_eq!(u32_at(&bytes, 34), 1_152_000); // image size
        assert_eq!(u32_at(&bytes, 38) as i32, 2835); // x resolution
        assert_eq!(u32_at(&bytes, 42) as i32, 2835); // y resolution
    }

    #[test]
    fn test_rows_bottom_up_and_bgr() {
        // 2x2: top row red then green, bottom row blue then white.
        let mut raster = RasterBuffer::filled(2, 2, 0).unwrap();
        raster.set_pixel(0, 0, [255, 0, 0]);
        raster.set_pixel(1, 0, [0, 255, 0]);
        raster.set_pixel(0, 1, [0, 0, 255]);
        raster.set_pixel(1, 1, [255, 255, 255]);

        let bytes = encode(&raster, DisplayGeometry::new(2, 2)).unwrap();
        // row_size = 8 (6 data + 2 padding). First file row is the bottom
        // source row: blue (BGR 255,0,0), white.
        let rows = &bytes[54..];
        assert_eq!(&rows[0..6], &[255, 0, 0, 255, 255, 255]);
        assert_eq!(&rows[6..8], &[0, 0]); // padding
        assert_eq!(&rows[8..14], &[0, 0, 255, 0, 255, 0]); // red, green in BGR
        assert_eq!(&rows[14..16], &[0, 0]);
    }

    #[test]
    fn test_row_padding_alignment() {
        assert_eq!(BmpHeader::new(1, 1).row_size(), 4);
        assert_eq!(BmpHeader::new(2, 1).row_size(), 8);
        assert_eq!(BmpHeader::new(3, 1).row_size(), 12);
        assert_eq!(BmpHeader::new(4, 1).row_size(), 12);
        assert_eq!(BmpHeader::new(5, 1).row_size(), 16);
    }

    #[test]
    fn test_rejects_non_panel_raster() {
        let raster = RasterBuffer::filled(4, 4, 0).unwrap();
        let err = encode(&raster, DisplayGeometry::new(800, 480)).unwrap_err();
        assert!(matches!(err, RasterError::GeometryMismatch { .. }));
    }
}
