//! Internal utility functions.
//!
//! Strided pixel copies backing [`RgbRaster`](crate::RgbRaster).

/// Copy `height` rows of `row_len` bytes between two strided buffers.
///
/// FFmpeg planes frequently carry per-row padding (stride > width × bytes
/// per pixel). Padding bytes in `source` are skipped and padding bytes in
/// `destination` are left untouched.
pub fn copy_rows(
    source: &[u8],
    source_stride: usize,
    destination: &mut [u8],
    destination_stride: usize,
    row_len: usize,
    height: usize,
) {
    if source_stride == row_len && destination_stride == row_len {
        // No padding on either side: copy the whole plane at once.
        let total = row_len * height;
        destination[..total].copy_from_slice(&source[..total]);
        return;
    }

    for row in 0..height {
        let source_start = row * source_stride;
        let destination_start = row * destination_stride;
        destination[destination_start..destination_start + row_len]
            .copy_from_slice(&source[source_start..source_start + row_len]);
    }
}
