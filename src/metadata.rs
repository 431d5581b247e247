//! Container metadata types.
//!
//! [`ContainerMetadata`] is captured once when a
//! [`MediaContainer`](crate::MediaContainer) is opened and cached for its
//! lifetime. It feeds the diagnostic output of the `framegrab` binary and the
//! log lines written at open time.

use std::collections::HashMap;
use std::time::Duration;

use crate::stream::StreamDescriptor;

/// Format-level information about an opened container.
///
/// # Example
///
/// ```no_run
/// use framegrab::MediaContainer;
///
/// let container = MediaContainer::open("input.mp4")?;
/// let metadata = container.metadata();
/// println!("{} ({:?}), {} streams", metadata.format, metadata.duration, metadata.streams.len());
/// # Ok::<(), framegrab::ExtractError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct ContainerMetadata {
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`, `"yuv4mpegpipe"`).
    pub format: String,
    /// Total duration, or [`Duration::ZERO`] if the container does not say.
    pub duration: Duration,
    /// Container-level tags (title, encoder, ...), if any.
    pub tags: Option<HashMap<String, String>>,
    /// The stream table in container order.
    pub streams: Vec<StreamDescriptor>,
}

impl ContainerMetadata {
    /// The first video stream in table order, if any.
    pub fn first_video_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|stream| stream.is_video())
    }

    /// Number of video streams in the table.
    pub fn video_stream_count(&self) -> usize {
        self.streams.iter().filter(|stream| stream.is_video()).count()
    }
}
