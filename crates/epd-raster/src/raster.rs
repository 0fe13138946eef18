//! Owned RGB888 raster buffer.
//!
//! [`RasterBuffer`] is the unit of exchange between pipeline stages:
//! a contiguous row-major sequence of interleaved 8-bit RGB triples with
//! explicit dimensions. The length invariant (`len == width * height * 3`)
//! is enforced at construction, so every stage can index without
//! re-validating.

use crate::error::RasterError;

/// An owned, contiguous RGB888 raster, row-major, origin top-left.
///
/// Stages either consume and return a buffer (ownership transfer: rotation,
/// display fit) or mutate it in place and return nothing (tone adjustment,
/// quantization). A stage never aliases its input with a freshly allocated
/// output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap an existing RGB888 buffer.
    ///
    /// Fails with [`RasterError::EmptyRaster`] on a zero dimension and
    /// [`RasterError::SizeMismatch`] when the buffer length does not match
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyRaster);
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(RasterError::SizeMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Allocate a raster filled with a single channel value.
    ///
    /// Panel-resolution buffers are large relative to default heap budgets
    /// on the target class of device, so the allocation is checked and
    /// reported as [`RasterError::Allocation`] instead of aborting.
    pub fn filled(width: u32, height: u32, fill: u8) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyRaster);
        }
        let bytes = width as usize * height as usize * 3;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| RasterError::Allocation {
                what: "raster buffer",
                bytes,
            })?;
        data.resize(bytes, fill);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Byte index of the first channel of pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.index(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }
}
