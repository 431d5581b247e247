//! The converted RGB raster.
//!
//! [`RgbRaster`] holds three interleaved 8-bit channels per pixel. The
//! pipeline allocates one raster per run and overwrites it for every frame.
//! Rows are tightly packed unless a raster is built with an explicit stride;
//! consumers always go through [`rows`](RgbRaster::rows), which honours the
//! stride and never yields padding.

use crate::utilities::copy_rows;

/// Bytes per RGB24 pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// An RGB24 image buffer with an explicit row stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl RgbRaster {
    /// Allocate a zeroed, tightly packed raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_stride(width, height, width as usize * BYTES_PER_PIXEL)
    }

    /// Allocate a zeroed raster whose rows are `stride` bytes apart.
    ///
    /// A stride shorter than one row of pixels is raised to the row length.
    pub fn with_stride(width: u32, height: u32, stride: usize) -> Self {
        let stride = stride.max(width as usize * BYTES_PER_PIXEL);
        Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    /// Wrap existing pixel data.
    ///
    /// Returns `None` if `data` is too short to hold `height` rows of
    /// `stride` bytes (the last row only needs its pixels, not its padding)
    /// or if `stride` is shorter than a row.
    pub fn from_raw(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Option<Self> {
        let row_len = width as usize * BYTES_PER_PIXEL;
        if stride < row_len {
            return None;
        }
        let required = match height as usize {
            0 => 0,
            rows => stride * (rows - 1) + row_len,
        };
        if data.len() < required {
            return None;
        }
        Some(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Length of one row of pixels in bytes, excluding padding.
    pub fn row_len(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Size of the pixel payload without padding (`width * height * 3`).
    pub fn packed_len(&self) -> usize {
        self.row_len() * self.height as usize
    }

    /// The raw buffer, padding included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate over the rows top to bottom, each `width * 3` bytes long.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let row_len = self.row_len();
        (0..self.height as usize).map(move |row| {
            let start = row * self.stride;
            &self.data[start..start + row_len]
        })
    }

    /// The RGB triplet at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }

    /// Paint every pixel with `rgb`. Padding bytes are left untouched.
    pub fn fill(&mut self, rgb: [u8; 3]) {
        let row_len = self.row_len();
        for row in 0..self.height as usize {
            let start = row * self.stride;
            for pixel in self.data[start..start + row_len].chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&rgb);
            }
        }
    }

    /// Overwrite the pixels from a strided RGB24 plane of the same size.
    ///
    /// # Panics
    ///
    /// Panics if `plane` is shorter than `height` rows of `plane_stride`
    /// bytes.
    pub fn copy_from_plane(&mut self, plane: &[u8], plane_stride: usize) {
        copy_rows(
            plane,
            plane_stride,
            &mut self.data,
            self.stride,
            self.row_len(),
            self.height as usize,
        );
    }

    /// Copy the pixels into a tightly packed buffer.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.packed_len());
        for row in self.rows() {
            buffer.extend_from_slice(row);
        }
        buffer
    }
}
