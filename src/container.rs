//! Container reading.
//!
//! [`MediaContainer`] owns an FFmpeg demuxer context. Opening it parses the
//! header and probes the stream table; afterwards packets are read in file
//! order across all streams and the caller filters them by stream index.
//!
//! The [`Demuxer`] trait is the seam the
//! [`Pipeline`](crate::Pipeline) drives, so the pipeline can run against
//! containers that are not backed by FFmpeg.

use std::{
    collections::HashMap,
    ffi::CString,
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    ptr,
    time::Duration,
};

use ffmpeg_next::{Error as FfmpegError, Packet, format::context::Input, media::Type};
use ffmpeg_sys_next::{avformat_close_input, avformat_find_stream_info, avformat_open_input};

use crate::{
    error::ExtractError,
    metadata::ContainerMetadata,
    stream::{MediaType, StreamDescriptor},
};

/// A compressed data unit tagged with the stream it belongs to.
pub trait StreamPacket {
    /// Index of the stream in the container's stream table.
    fn stream_index(&self) -> usize;
}

impl StreamPacket for Packet {
    fn stream_index(&self) -> usize {
        self.stream()
    }
}

/// A source of packets with a fixed stream table.
pub trait Demuxer {
    /// Packet type produced by [`read_packet`](Demuxer::read_packet).
    type Packet: StreamPacket;

    /// The stream table, in container order. Never changes after open.
    fn streams(&self) -> &[StreamDescriptor];

    /// Read the next packet of any stream.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_packet(&mut self) -> Result<Option<Self::Packet>, ExtractError>;

    /// Write a human-readable summary of the container to stderr.
    fn dump(&self) {}

    /// Release the underlying source. Calling it again is a no-op.
    fn close(&mut self);
}

/// An opened media container backed by FFmpeg.
///
/// # Example
///
/// ```no_run
/// use framegrab::{Demuxer, MediaContainer, StreamPacket};
///
/// let mut container = MediaContainer::open("input.mp4")?;
/// let video = framegrab::select_first_video_stream(container.streams())?;
/// let mut video_packets = 0;
/// while let Some(packet) = container.read_packet()? {
///     if packet.stream_index() == video {
///         video_packets += 1;
///     }
/// }
/// println!("{video_packets} video packets");
/// # Ok::<(), framegrab::ExtractError>(())
/// ```
pub struct MediaContainer {
    /// The demuxer context. `None` once closed.
    input: Option<Input>,
    /// Metadata and stream table captured at open time.
    metadata: ContainerMetadata,
    /// Path the container was opened from (kept for diagnostics).
    path: PathBuf,
}

impl Debug for MediaContainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaContainer")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("open", &self.input.is_some())
            .finish_non_exhaustive()
    }
}

impl MediaContainer {
    /// Open a media container and probe its stream table.
    ///
    /// Initialises FFmpeg on first use.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::FileOpen`] if the source cannot be read or its
    ///   format is not recognised.
    /// - [`ExtractError::StreamProbe`] if stream information cannot be
    ///   derived.
    ///
    /// A container whose stream table is empty opens successfully; stream
    /// selection then reports [`ExtractError::NoVideoStream`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening media file: {}", path.display());

        crate::ffmpeg::init().map_err(|error| ExtractError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = open_and_probe(&path)?;

        let streams = describe_streams(&input);

        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let tags = {
            let mut map = HashMap::new();
            for (key, value) in input.metadata().iter() {
                map.insert(key.to_string(), value.to_string());
            }
            if map.is_empty() { None } else { Some(map) }
        };

        let metadata = ContainerMetadata {
            format: input.format().name().to_string(),
            duration,
            tags,
            streams,
        };

        log::info!(
            "Opened media file: {} (format={}, duration={:.2}s, streams={}, video_streams={})",
            path.display(),
            metadata.format,
            metadata.duration.as_secs_f64(),
            metadata.streams.len(),
            metadata.video_stream_count(),
        );

        Ok(Self {
            input: Some(input),
            metadata,
            path,
        })
    }

    /// Open a container, capture its metadata and close it again.
    ///
    /// # Errors
    ///
    /// Same as [`open`](MediaContainer::open).
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<ContainerMetadata, ExtractError> {
        let mut container = Self::open(path)?;
        let metadata = container.metadata.clone();
        container.close();
        Ok(metadata)
    }

    /// Metadata captured when the container was opened.
    pub fn metadata(&self) -> &ContainerMetadata {
        &self.metadata
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` until [`close`](Demuxer::close) has been called.
    pub fn is_open(&self) -> bool {
        self.input.is_some()
    }

    /// Borrow the demuxer context, failing once the container is closed.
    pub(crate) fn input(&self) -> Result<&Input, ExtractError> {
        self.input
            .as_ref()
            .ok_or_else(|| ExtractError::Read("container is closed".to_string()))
    }
}

impl Demuxer for MediaContainer {
    type Packet = Packet;

    fn streams(&self) -> &[StreamDescriptor] {
        &self.metadata.streams
    }

    fn read_packet(&mut self) -> Result<Option<Packet>, ExtractError> {
        let input = self
            .input
            .as_mut()
            .ok_or_else(|| ExtractError::Read("container is closed".to_string()))?;

        let mut packet = Packet::empty();
        match packet.read(input) {
            Ok(()) => Ok(Some(packet)),
            Err(FfmpegError::Eof) => Ok(None),
            Err(error) => Err(ExtractError::Read(error.to_string())),
        }
    }

    fn dump(&self) {
        if let Some(input) = &self.input {
            ffmpeg_next::format::context::input::dump(input, 0, self.path.to_str());
        }
    }

    fn close(&mut self) {
        if self.input.take().is_some() {
            log::debug!("Closed media file: {}", self.path.display());
        }
    }
}

/// Open `path` and probe its streams as two distinct steps so that an
/// unreadable source and an unprobeable one report different errors.
fn open_and_probe(path: &Path) -> Result<Input, ExtractError> {
    let open_error = |reason: String| ExtractError::FileOpen {
        path: path.to_path_buf(),
        reason,
    };

    let location = path
        .to_str()
        .ok_or_else(|| open_error("path is not valid UTF-8".to_string()))?;
    let location =
        CString::new(location).map_err(|_| open_error("path contains a NUL byte".to_string()))?;

    let mut context = ptr::null_mut();

    // SAFETY: `context` starts null so FFmpeg allocates it; on failure FFmpeg
    // frees it and leaves it null. After a successful open the context is
    // either closed here on probe failure or handed to `Input`, which closes
    // it on drop.
    unsafe {
        let status = avformat_open_input(
            &mut context,
            location.as_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
        );
        if status < 0 {
            return Err(open_error(FfmpegError::from(status).to_string()));
        }

        let status = avformat_find_stream_info(context, ptr::null_mut());
        if status < 0 {
            avformat_close_input(&mut context);
            return Err(ExtractError::StreamProbe {
                path: path.to_path_buf(),
                reason: FfmpegError::from(status).to_string(),
            });
        }

        Ok(Input::wrap(context))
    }
}

/// Copy the stream table out of the demuxer context.
fn describe_streams(input: &Input) -> Vec<StreamDescriptor> {
    input
        .streams()
        .map(|stream| {
            let parameters = stream.parameters();
            let medium = parameters.medium();

            // SAFETY: the codec parameters belong to the stream and stay valid
            // while `input` is borrowed; only plain integer fields are read.
            let (width, height) = if medium == Type::Video {
                let raw = unsafe { &*parameters.as_ptr() };
                (raw.width.max(0) as u32, raw.height.max(0) as u32)
            } else {
                (0, 0)
            };

            StreamDescriptor {
                index: stream.index(),
                media_type: MediaType::from(medium),
                codec: parameters.id().name().to_string(),
                width,
                height,
            }
        })
        .collect()
}
