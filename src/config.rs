//! Extraction configuration.
//!
//! [`ExtractionOptions`] is a builder that carries the frame cap, output
//! location and output format through [`extract_frames`](crate::extract_frames)
//! and the [`Pipeline`](crate::Pipeline).
//!
//! # Example
//!
//! ```no_run
//! use framegrab::{ExtractionOptions, OutputFormat};
//!
//! let options = ExtractionOptions::new()
//!     .with_output_directory("frames")
//!     .with_frame_cap(10)
//!     .with_output_format(OutputFormat::Png);
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};

use image::ImageFormat;

use crate::sink::{FrameSink, ImageSink, PpmSink};

/// Number of frames saved when no cap is configured.
pub const DEFAULT_FRAME_CAP: u32 = 5;

/// File format for saved frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Binary PPM (`P6`). This is the default.
    #[default]
    Ppm,
    /// PNG via the `image` crate.
    Png,
    /// JPEG via the `image` crate.
    Jpeg,
    /// BMP via the `image` crate.
    Bmp,
    /// TIFF via the `image` crate.
    Tiff,
}

impl OutputFormat {
    /// File extension used for saved frames, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Ppm => "ppm",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// Map to the `image` crate's format, or `None` for PPM, which is
    /// written directly.
    pub(crate) fn to_image_format(self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Ppm => None,
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
            OutputFormat::Bmp => Some(ImageFormat::Bmp),
            OutputFormat::Tiff => Some(ImageFormat::Tiff),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ppm" => Ok(OutputFormat::Ppm),
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "bmp" => Ok(OutputFormat::Bmp),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

/// Settings for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Maximum number of frames written. Packets are still drained after
    /// the cap is reached.
    pub(crate) frame_cap: u32,
    /// Directory the frame files are written to.
    pub(crate) output_directory: PathBuf,
    /// File format of the frame files.
    pub(crate) output_format: OutputFormat,
    /// Whether to print FFmpeg's container summary to stderr after opening.
    pub(crate) dump_format: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionOptions {
    /// Create options with default settings.
    ///
    /// Defaults: cap of [`DEFAULT_FRAME_CAP`], current directory, PPM output,
    /// no container dump.
    pub fn new() -> Self {
        Self {
            frame_cap: DEFAULT_FRAME_CAP,
            output_directory: PathBuf::from("."),
            output_format: OutputFormat::Ppm,
            dump_format: false,
        }
    }

    /// Set the maximum number of frames to save. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_frame_cap(mut self, cap: u32) -> Self {
        self.frame_cap = cap.max(1);
        self
    }

    /// Set the directory frame files are written to.
    #[must_use]
    pub fn with_output_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.output_directory = directory.as_ref().to_path_buf();
        self
    }

    /// Set the file format of saved frames.
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Print FFmpeg's human-readable container summary to stderr once the
    /// input is opened.
    #[must_use]
    pub fn with_format_dump(mut self, dump: bool) -> Self {
        self.dump_format = dump;
        self
    }

    /// The configured frame cap.
    pub fn frame_cap(&self) -> u32 {
        self.frame_cap
    }

    /// The configured output directory.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// The configured output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Build the sink matching the output directory and format.
    pub fn sink(&self) -> Box<dyn FrameSink> {
        match self.output_format.to_image_format() {
            None => Box::new(PpmSink::new(&self.output_directory)),
            Some(format) => Box::new(ImageSink::new(
                &self.output_directory,
                format,
                self.output_format.extension(),
            )),
        }
    }
}
