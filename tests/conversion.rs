//! Pixel conversion integration tests.
//!
//! Frames are built in memory, so these exercise swscale directly without
//! any container or decoder.

use ffmpeg_next::{format::Pixel, frame::Video as VideoFrame};
use framegrab::{ExtractError, FrameConverter, PixelConverter, RgbRaster};

/// A BGR24 frame whose every pixel is `bgr`. Row padding is left as garbage.
fn solid_bgr_frame(width: u32, height: u32, bgr: [u8; 3]) -> VideoFrame {
    let mut frame = VideoFrame::new(Pixel::BGR24, width, height);
    let stride = frame.stride(0);
    let data = frame.data_mut(0);
    data.fill(0xAB);
    for row in 0..height as usize {
        let start = row * stride;
        for pixel in data[start..start + width as usize * 3].chunks_exact_mut(3) {
            pixel.copy_from_slice(&bgr);
        }
    }
    frame
}

fn solid_yuv_frame(width: u32, height: u32, y: u8, u: u8, v: u8) -> VideoFrame {
    let mut frame = VideoFrame::new(Pixel::YUV420P, width, height);
    frame.data_mut(0).fill(y);
    frame.data_mut(1).fill(u);
    frame.data_mut(2).fill(v);
    frame
}

#[test]
fn bgr_to_rgb_is_exact() {
    framegrab::ffmpeg::init().expect("Failed to initialise FFmpeg");

    // Odd width so the source rows carry padding.
    let frame = solid_bgr_frame(5, 4, [30, 20, 10]);
    assert!(frame.stride(0) >= 15);

    let mut converter =
        PixelConverter::configure(5, 4, Pixel::BGR24).expect("Failed to configure converter");
    let mut raster = RgbRaster::new(5, 4);
    converter.convert(&frame, &mut raster).expect("Failed to convert");

    for y in 0..4 {
        for x in 0..5 {
            assert_eq!(raster.pixel(x, y), Some([10, 20, 30]), "pixel ({x}, {y})");
        }
    }
    assert_eq!(raster.packed_len(), 5 * 4 * 3);
}

#[test]
fn conversion_is_deterministic() {
    framegrab::ffmpeg::init().expect("Failed to initialise FFmpeg");

    let frame = solid_yuv_frame(32, 16, 120, 90, 200);
    let mut converter =
        PixelConverter::configure(32, 16, Pixel::YUV420P).expect("Failed to configure converter");

    let mut first = RgbRaster::new(32, 16);
    converter.convert(&frame, &mut first).expect("Failed to convert");
    let mut second = RgbRaster::new(32, 16);
    second.fill([1, 2, 3]);
    converter.convert(&frame, &mut second).expect("Failed to convert");

    assert_eq!(first.to_packed(), second.to_packed());
}

#[test]
fn neutral_chroma_converts_to_grey() {
    framegrab::ffmpeg::init().expect("Failed to initialise FFmpeg");

    let frame = solid_yuv_frame(16, 16, 128, 128, 128);
    let mut converter =
        PixelConverter::configure(16, 16, Pixel::YUV420P).expect("Failed to configure converter");
    let mut raster = RgbRaster::new(16, 16);
    converter.convert(&frame, &mut raster).expect("Failed to convert");

    for row in raster.rows() {
        for pixel in row.chunks_exact(3) {
            let spread = pixel.iter().max().unwrap() - pixel.iter().min().unwrap();
            assert!(spread <= 2, "Expected a grey pixel, got {pixel:?}");
        }
    }
}

#[test]
fn unknown_source_format_is_rejected() {
    framegrab::ffmpeg::init().expect("Failed to initialise FFmpeg");

    let error = PixelConverter::configure(16, 16, Pixel::None).unwrap_err();
    assert!(matches!(error, ExtractError::UnsupportedConversion { .. }));
    assert!(!error.is_recoverable());
}

#[test]
fn zero_sized_frames_are_rejected() {
    framegrab::ffmpeg::init().expect("Failed to initialise FFmpeg");

    let error = PixelConverter::configure(0, 16, Pixel::YUV420P).unwrap_err();
    assert!(matches!(error, ExtractError::UnsupportedConversion { .. }));
}

#[test]
fn mismatched_raster_is_a_recoverable_error() {
    framegrab::ffmpeg::init().expect("Failed to initialise FFmpeg");

    let frame = solid_bgr_frame(8, 8, [0, 0, 0]);
    let mut converter =
        PixelConverter::configure(8, 8, Pixel::BGR24).expect("Failed to configure converter");
    let mut raster = RgbRaster::new(4, 4);

    let error = converter.convert(&frame, &mut raster).unwrap_err();
    assert!(matches!(error, ExtractError::Conversion(_)));
    assert!(error.is_recoverable());
}

#[test]
fn closed_converter_refuses_frames() {
    framegrab::ffmpeg::init().expect("Failed to initialise FFmpeg");

    let frame = solid_bgr_frame(8, 8, [0, 0, 0]);
    let mut converter =
        PixelConverter::configure(8, 8, Pixel::BGR24).expect("Failed to configure converter");
    converter.close();
    converter.close();

    let mut raster = RgbRaster::new(8, 8);
    assert!(converter.convert(&frame, &mut raster).is_err());
}
