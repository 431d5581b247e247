//! Pixel format conversion to RGB24.
//!
//! [`PixelConverter`] wraps an FFmpeg software scaler configured once per run
//! for a fixed source size and format. Output keeps the source resolution;
//! only the pixel layout changes. Source formats that swscale cannot read
//! are rejected at configuration time rather than failing frame by frame.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use ffmpeg_next::{
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use ffmpeg_sys_next::{sws_isSupportedInput, sws_isSupportedOutput};

use crate::{error::ExtractError, raster::RgbRaster};

/// Converts decoded frames of type `F` into an [`RgbRaster`].
pub trait FrameConverter<F> {
    /// Overwrite `raster` with the RGB24 rendering of `frame`.
    ///
    /// The same source bytes always produce the same destination bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Conversion`] if `frame` does not have the
    /// shape the converter was configured for.
    fn convert(&mut self, frame: &F, raster: &mut RgbRaster) -> Result<(), ExtractError>;

    /// Release conversion state. Calling it again is a no-op.
    fn close(&mut self);
}

/// FFmpeg-backed converter from a native pixel format to RGB24.
///
/// # Example
///
/// ```no_run
/// use ffmpeg_next::{format::Pixel, frame::Video as VideoFrame};
/// use framegrab::{FrameConverter, PixelConverter, RgbRaster};
///
/// framegrab::ffmpeg::init()?;
/// let mut converter = PixelConverter::configure(64, 48, Pixel::YUV420P)?;
/// let mut raster = RgbRaster::new(64, 48);
/// let frame = VideoFrame::new(Pixel::YUV420P, 64, 48);
/// converter.convert(&frame, &mut raster)?;
/// # Ok::<(), framegrab::ExtractError>(())
/// ```
pub struct PixelConverter {
    /// Scaler context. `None` once closed.
    scaler: Option<ScalingContext>,
    /// RGB24 frame the scaler writes into, allocated once.
    scaled: VideoFrame,
    width: u32,
    height: u32,
    source_format: Pixel,
}

impl Debug for PixelConverter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PixelConverter")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("source_format", &self.source_format)
            .field("open", &self.scaler.is_some())
            .finish_non_exhaustive()
    }
}

impl PixelConverter {
    /// Configure a bilinear converter from `source_format` at
    /// `width`×`height` to RGB24 at the same size.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnsupportedConversion`] if either dimension is
    /// zero, if swscale cannot read `source_format`, or if the scaler context
    /// cannot be created.
    pub fn configure(width: u32, height: u32, source_format: Pixel) -> Result<Self, ExtractError> {
        let unsupported = |reason: String| ExtractError::UnsupportedConversion {
            format: format!("{source_format:?}"),
            reason,
        };

        if width == 0 || height == 0 {
            return Err(unsupported(format!("invalid frame size {width}x{height}")));
        }
        if !is_supported_input(source_format) {
            return Err(unsupported("swscale cannot read this format".to_string()));
        }
        if !is_supported_output(Pixel::RGB24) {
            return Err(unsupported("swscale cannot write RGB24".to_string()));
        }

        let scaler = ScalingContext::get(
            source_format,
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| unsupported(error.to_string()))?;

        log::debug!("Configured converter {width}x{height} {source_format:?} -> RGB24");

        Ok(Self {
            scaler: Some(scaler),
            scaled: VideoFrame::new(Pixel::RGB24, width, height),
            width,
            height,
            source_format,
        })
    }

    /// Source pixel format this converter was configured for.
    pub fn source_format(&self) -> Pixel {
        self.source_format
    }
}

impl FrameConverter<VideoFrame> for PixelConverter {
    fn convert(&mut self, frame: &VideoFrame, raster: &mut RgbRaster) -> Result<(), ExtractError> {
        let scaler = self
            .scaler
            .as_mut()
            .ok_or_else(|| ExtractError::Conversion("converter is closed".to_string()))?;

        if raster.width() != self.width || raster.height() != self.height {
            return Err(ExtractError::Conversion(format!(
                "raster is {}x{}, converter expects {}x{}",
                raster.width(),
                raster.height(),
                self.width,
                self.height,
            )));
        }

        scaler
            .run(frame, &mut self.scaled)
            .map_err(|error| ExtractError::Conversion(error.to_string()))?;

        raster.copy_from_plane(self.scaled.data(0), self.scaled.stride(0));
        Ok(())
    }

    fn close(&mut self) {
        if self.scaler.take().is_some() {
            log::debug!(
                "Released converter {}x{} {:?}",
                self.width,
                self.height,
                self.source_format,
            );
        }
    }
}

fn is_supported_input(format: Pixel) -> bool {
    if format == Pixel::None {
        return false;
    }
    // SAFETY: a pure lookup on the pixel format descriptor table.
    unsafe { sws_isSupportedInput(format.into()) > 0 }
}

fn is_supported_output(format: Pixel) -> bool {
    // SAFETY: a pure lookup on the pixel format descriptor table.
    unsafe { sws_isSupportedOutput(format.into()) > 0 }
}
