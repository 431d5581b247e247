//! Stream table types and video stream selection.
//!
//! A container's stream table is read once when it is opened and never
//! changes afterwards. [`select_first_video_stream`] picks the stream the
//! pipeline decodes: the first video entry in table order. FFmpeg's own
//! "best stream" heuristic is not used, so the choice never
//! depends on bitrate or resolution.

use std::fmt::{Display, Formatter, Result as FmtResult};

use ffmpeg_next::media::Type;

use crate::error::ExtractError;

/// Media type of a stream in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Video frames.
    Video,
    /// Audio samples.
    Audio,
    /// Subtitle events.
    Subtitle,
    /// Opaque data (timecodes, metadata tracks).
    Data,
    /// Attached files such as fonts or cover art.
    Attachment,
    /// Anything FFmpeg could not classify.
    Unknown,
}

impl From<Type> for MediaType {
    fn from(medium: Type) -> Self {
        match medium {
            Type::Video => MediaType::Video,
            Type::Audio => MediaType::Audio,
            Type::Subtitle => MediaType::Subtitle,
            Type::Data => MediaType::Data,
            Type::Attachment => MediaType::Attachment,
            Type::Unknown => MediaType::Unknown,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Subtitle => "subtitle",
            MediaType::Data => "data",
            MediaType::Attachment => "attachment",
            MediaType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One entry of a container's stream table.
///
/// Descriptors are owned copies; they stay valid after the container that
/// produced them is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Position of the stream in the container's table. Packets carry this
    /// index.
    pub index: usize,
    /// What kind of data the stream carries.
    pub media_type: MediaType,
    /// Codec name (e.g. `"h264"`, `"rawvideo"`, `"pcm_s16le"`).
    pub codec: String,
    /// Coded width in pixels. Zero for non-video streams.
    pub width: u32,
    /// Coded height in pixels. Zero for non-video streams.
    pub height: u32,
}

impl StreamDescriptor {
    /// Returns `true` if this stream carries video.
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }
}

/// Return the index of the first video stream in table order.
///
/// # Errors
///
/// Returns [`ExtractError::NoVideoStream`] if no descriptor is a video
/// stream.
pub fn select_first_video_stream(streams: &[StreamDescriptor]) -> Result<usize, ExtractError> {
    let selected = streams
        .iter()
        .find(|stream| stream.is_video())
        .ok_or(ExtractError::NoVideoStream)?;

    log::debug!(
        "Selected video stream {} ({}, {}x{})",
        selected.index,
        selected.codec,
        selected.width,
        selected.height,
    );

    Ok(selected.index)
}
