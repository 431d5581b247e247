//! Error types for the `framegrab` crate.
//!
//! This module defines [`ExtractError`], the unified error type returned by
//! every fallible operation in the crate. Variants are split into two groups:
//! failures that abort a run (the input cannot be opened, there is no video
//! stream, the decoder or converter cannot be set up) and per-packet or
//! per-frame failures that the pipeline reports and steps over. Use
//! [`ExtractError::is_recoverable`] to tell them apart.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framegrab` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The media source could not be opened or its format was not recognised.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::MediaContainer::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container opened but its stream table could not be derived.
    #[error("Failed to probe streams of {path}: {reason}")]
    StreamProbe {
        /// Path of the container being probed.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The container has no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// No decoder is available for the video stream's codec.
    #[error("Unsupported codec {codec} on stream {stream_index}")]
    UnsupportedCodec {
        /// Index of the stream in the container's stream table.
        stream_index: usize,
        /// Codec name as reported by the container.
        codec: String,
    },

    /// A decoder exists for the codec but could not be opened.
    #[error("Failed to open decoder for stream {stream_index}: {reason}")]
    DecoderOpen {
        /// Index of the stream in the container's stream table.
        stream_index: usize,
        /// Underlying reason the decoder failed to open.
        reason: String,
    },

    /// The source pixel format cannot be converted to RGB24.
    #[error("Unsupported pixel conversion from {format}: {reason}")]
    UnsupportedConversion {
        /// Source pixel format name.
        format: String,
        /// Why the conversion was rejected.
        reason: String,
    },

    /// Reading the next packet from the container failed. The pipeline
    /// stops reading and drains the decoder as if input had ended.
    #[error("Failed to read packet: {0}")]
    Read(String),

    /// A single packet could not be decoded.
    #[error("Failed to decode video packet: {0}")]
    Decode(String),

    /// A decoded frame could not be converted to RGB24.
    #[error("Failed to convert video frame: {0}")]
    Conversion(String),

    /// An output file could not be written.
    #[error("Failed to write frame to {path}: {source}")]
    Write {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: IoError,
    },

    /// An error from the `image` crate while encoding a non-PPM output.
    #[error("Image encoding error: {0}")]
    Image(#[from] ImageError),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred outside of frame writing.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl ExtractError {
    /// Returns `true` for failures that only affect one packet or one frame.
    ///
    /// The pipeline logs these and continues with the next packet. A
    /// [`Read`](ExtractError::Read) failure ends input instead; every other
    /// variant aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExtractError::Decode(_)
                | ExtractError::Conversion(_)
                | ExtractError::Write { .. }
                | ExtractError::Image(_)
        )
    }
}

impl From<FfmpegError> for ExtractError {
    fn from(error: FfmpegError) -> Self {
        ExtractError::Ffmpeg(error.to_string())
    }
}
