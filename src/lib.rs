//! # framegrab
//!
//! Grab the first frames of a video and write them out as bitmaps.
//!
//! `framegrab` opens a media container, picks the first video stream in the
//! container's stream table, decodes its packets, converts every decoded
//! frame to RGB24 and writes the first few (five by default) as binary PPM
//! files named `frame1.ppm`, `frame2.ppm`, ... Decoding and conversion are
//! powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framegrab::ExtractionOptions;
//!
//! let report = framegrab::extract_frames("input.mp4", &ExtractionOptions::new())?;
//! println!("wrote {} frame(s)", report.frames_saved);
//! # Ok::<(), framegrab::ExtractError>(())
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Type | Trait |
//! |-------|------|-------|
//! | Container reader | [`MediaContainer`] | [`Demuxer`] |
//! | Stream decoder | [`StreamDecoder`] | [`FrameDecoder`] |
//! | Pixel converter | [`PixelConverter`] | [`FrameConverter`] |
//! | Frame sink | [`PpmSink`], [`ImageSink`] | [`FrameSink`] |
//! | Driver | [`Pipeline`] | [`MediaBackend`] |
//!
//! The driver only talks to the traits, so each stage can be replaced, for
//! example by test doubles.
//!
//! ## Error handling
//!
//! Failing to open the input, to find a video stream or to set up the
//! decoder or converter aborts the run with an [`ExtractError`]. A corrupt
//! packet, a frame that cannot be converted or a file that cannot be written
//! is logged and skipped; see [`ExtractionReport`] for the counts.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod config;
pub mod container;
pub mod converter;
pub mod decoder;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod pipeline;
pub mod raster;
pub mod sink;
pub mod stream;
mod utilities;

pub use config::{DEFAULT_FRAME_CAP, ExtractionOptions, OutputFormat};
pub use container::{Demuxer, MediaContainer, StreamPacket};
pub use converter::{FrameConverter, PixelConverter};
pub use decoder::{DecodeStatus, FrameDecoder, StreamDecoder};
pub use error::ExtractError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use metadata::ContainerMetadata;
pub use pipeline::{
    ExtractionReport, FfmpegBackend, MediaBackend, Pipeline, PipelineState, extract_frames,
};
pub use raster::RgbRaster;
pub use sink::{FrameSink, ImageSink, PpmSink, frame_file_name, write_ppm};
pub use stream::{MediaType, StreamDescriptor, select_first_video_stream};
