//! Writing converted frames to disk.
//!
//! Each saved frame becomes one file named `frame<N>.<ext>`, where `N` is the
//! 1-based save sequence number. The name depends only on `N`; keeping `N`
//! unique is the caller's job.
//!
//! [`PpmSink`] writes binary PPM byte for byte:
//!
//! ```text
//! P6\n<width> <height>\n255\n<width * height * 3 bytes of RGB>
//! ```
//!
//! [`ImageSink`] hands the pixels to the `image` crate for other formats.

use std::{
    fs::File,
    io::{BufWriter, Result as IoResult, Write},
    path::{Path, PathBuf},
};

use image::{ImageFormat, RgbImage};

use crate::{error::ExtractError, raster::RgbRaster};

/// Destination for converted frames.
pub trait FrameSink {
    /// Persist `raster` as frame number `sequence` (1-based).
    ///
    /// Returns the path that was written.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Write`] (or [`ExtractError::Image`] for
    /// encoded formats) if the destination cannot be created or written.
    fn save(&mut self, raster: &RgbRaster, sequence: u32) -> Result<PathBuf, ExtractError>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn save(&mut self, raster: &RgbRaster, sequence: u32) -> Result<PathBuf, ExtractError> {
        (**self).save(raster, sequence)
    }
}

/// File name for frame `sequence` with the given extension.
pub fn frame_file_name(sequence: u32, extension: &str) -> String {
    format!("frame{sequence}.{extension}")
}

/// Serialize `raster` as a binary PPM (`P6`) image.
///
/// Rows are written top to bottom without padding, whatever the raster's
/// stride.
///
/// # Errors
///
/// Propagates any error from `writer`.
pub fn write_ppm<W: Write>(writer: &mut W, raster: &RgbRaster) -> IoResult<()> {
    write!(writer, "P6\n{} {}\n255\n", raster.width(), raster.height())?;
    for row in raster.rows() {
        writer.write_all(row)?;
    }
    Ok(())
}

/// Writes `frame<N>.ppm` files into a directory.
#[derive(Debug, Clone)]
pub struct PpmSink {
    directory: PathBuf,
}

impl PpmSink {
    /// Write frames into `directory`. The directory is not created.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Path of the file frame `sequence` is written to.
    pub fn path_for(&self, sequence: u32) -> PathBuf {
        self.directory.join(frame_file_name(sequence, "ppm"))
    }
}

impl FrameSink for PpmSink {
    fn save(&mut self, raster: &RgbRaster, sequence: u32) -> Result<PathBuf, ExtractError> {
        let path = self.path_for(sequence);

        let write = || -> IoResult<()> {
            let mut writer = BufWriter::new(File::create(&path)?);
            write_ppm(&mut writer, raster)?;
            writer.flush()
        };

        match write() {
            Ok(()) => Ok(path),
            Err(source) => Err(ExtractError::Write { path, source }),
        }
    }
}

/// Writes `frame<N>.<ext>` files encoded by the `image` crate.
#[derive(Debug, Clone)]
pub struct ImageSink {
    directory: PathBuf,
    format: ImageFormat,
    extension: &'static str,
}

impl ImageSink {
    /// Write frames into `directory` as `format`, named with `extension`.
    pub fn new<P: AsRef<Path>>(directory: P, format: ImageFormat, extension: &'static str) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            format,
            extension,
        }
    }

    /// Path of the file frame `sequence` is written to.
    pub fn path_for(&self, sequence: u32) -> PathBuf {
        self.directory
            .join(frame_file_name(sequence, self.extension))
    }
}

impl FrameSink for ImageSink {
    fn save(&mut self, raster: &RgbRaster, sequence: u32) -> Result<PathBuf, ExtractError> {
        let path = self.path_for(sequence);
        let image =
            RgbImage::from_raw(raster.width(), raster.height(), raster.to_packed()).ok_or_else(
                || ExtractError::Conversion("raster does not match its dimensions".to_string()),
            )?;
        image.save_with_format(&path, self.format)?;
        Ok(path)
    }
}
