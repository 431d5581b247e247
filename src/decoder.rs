//! Video stream decoding.
//!
//! A decoder is bound to one stream and turns that stream's packets into
//! frames in the stream's native pixel format. The packet-to-frame mapping is
//! not one-to-one: a packet may complete no frame, exactly one, or (with
//! FFmpeg's send/receive API) leave further frames buffered. [`FrameDecoder`]
//! models this as a push of one packet via [`feed`](FrameDecoder::feed)
//! followed by pulls via [`next_frame`](FrameDecoder::next_frame) until
//! [`DecodeStatus::NotReady`].
//!
//! A ready frame borrows the decoder, so it cannot outlive the next decode
//! call.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use ffmpeg_next::{
    Error as FfmpegError, Packet, codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder, format::Pixel, frame::Video as VideoFrame,
    util::error::EAGAIN,
};

use crate::{container::MediaContainer, error::ExtractError};

/// Outcome of a single decode step.
#[derive(Debug)]
pub enum DecodeStatus<'a, F> {
    /// A complete frame is available until the next decode call.
    FrameReady(&'a F),
    /// The decoder needs more input before it can emit a frame.
    NotReady,
}

/// Decode state bound to a single stream.
pub trait FrameDecoder {
    /// Packet type accepted by [`feed`](FrameDecoder::feed).
    type Packet;
    /// Frame type emitted in [`DecodeStatus::FrameReady`].
    type Frame;

    /// Width and height of the frames this decoder emits.
    fn dimensions(&self) -> (u32, u32);

    /// Submit one packet and try to obtain a frame.
    ///
    /// The packet must belong to the stream the decoder was opened for.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Decode`] if the packet is rejected. The
    /// decoder stays usable; callers move on to the next packet.
    fn feed(
        &mut self,
        packet: &Self::Packet,
    ) -> Result<DecodeStatus<'_, Self::Frame>, ExtractError>;

    /// Pull another frame completed by earlier input, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Decode`] if decoding buffered data fails.
    fn next_frame(&mut self) -> Result<DecodeStatus<'_, Self::Frame>, ExtractError>;

    /// Signal end of input so that frames held back for reordering are
    /// released through [`next_frame`](FrameDecoder::next_frame).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Decode`] if the decoder refuses the flush.
    fn finish(&mut self) -> Result<(), ExtractError>;

    /// Release decode state. Calling it again is a no-op.
    fn close(&mut self);
}

/// FFmpeg-backed decoder for one video stream.
pub struct StreamDecoder {
    /// Opened decoder. `None` once closed.
    decoder: Option<VideoDecoder>,
    /// Frame buffer reused for every decoded picture.
    frame: VideoFrame,
    stream_index: usize,
    width: u32,
    height: u32,
    format: Pixel,
}

impl Debug for StreamDecoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StreamDecoder")
            .field("stream_index", &self.stream_index)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("open", &self.decoder.is_some())
            .finish_non_exhaustive()
    }
}

impl StreamDecoder {
    /// Open a decoder for stream `stream_index` of `container`.
    ///
    /// The stream's codec parameters are copied into a fresh codec context;
    /// the decoder never aliases state owned by the container.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::NoVideoStream`] if the index is not in the table.
    /// - [`ExtractError::UnsupportedCodec`] if FFmpeg has no decoder for the
    ///   stream's codec.
    /// - [`ExtractError::DecoderOpen`] if the decoder fails to open.
    pub fn open(container: &MediaContainer, stream_index: usize) -> Result<Self, ExtractError> {
        let stream = container
            .input()?
            .stream(stream_index)
            .ok_or(ExtractError::NoVideoStream)?;

        let parameters = stream.parameters();
        let codec_id = parameters.id();
        let codec = ffmpeg_next::decoder::find(codec_id).ok_or_else(|| {
            ExtractError::UnsupportedCodec {
                stream_index,
                codec: codec_id.name().to_string(),
            }
        })?;
        let codec_name = codec.name().to_string();

        let open_error = |error: FfmpegError| ExtractError::DecoderOpen {
            stream_index,
            reason: error.to_string(),
        };

        let context = CodecContext::from_parameters(parameters).map_err(open_error)?;
        let decoder = context
            .decoder()
            .open_as(codec)
            .and_then(|opened| opened.video())
            .map_err(open_error)?;

        let width = decoder.width();
        let height = decoder.height();
        let format = decoder.format();

        log::debug!(
            "Opened {codec_name} decoder for stream {stream_index}: {width}x{height} {format:?}"
        );

        Ok(Self {
            decoder: Some(decoder),
            frame: VideoFrame::empty(),
            stream_index,
            width,
            height,
            format,
        })
    }

    /// Native pixel format of decoded frames.
    pub fn format(&self) -> Pixel {
        self.format
    }

    /// Index of the stream this decoder is bound to.
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    fn closed_error() -> ExtractError {
        ExtractError::Decode("decoder is closed".to_string())
    }
}

impl FrameDecoder for StreamDecoder {
    type Packet = Packet;
    type Frame = VideoFrame;

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn feed(&mut self, packet: &Packet) -> Result<DecodeStatus<'_, VideoFrame>, ExtractError> {
        let decoder = self.decoder.as_mut().ok_or_else(Self::closed_error)?;
        decoder
            .send_packet(packet)
            .map_err(|error| ExtractError::Decode(error.to_string()))?;
        self.next_frame()
    }

    fn next_frame(&mut self) -> Result<DecodeStatus<'_, VideoFrame>, ExtractError> {
        let decoder = self.decoder.as_mut().ok_or_else(Self::closed_error)?;
        match decoder.receive_frame(&mut self.frame) {
            Ok(()) => Ok(DecodeStatus::FrameReady(&self.frame)),
            Err(FfmpegError::Other { errno }) if errno == EAGAIN => Ok(DecodeStatus::NotReady),
            Err(FfmpegError::Eof) => Ok(DecodeStatus::NotReady),
            Err(error) => Err(ExtractError::Decode(error.to_string())),
        }
    }

    fn finish(&mut self) -> Result<(), ExtractError> {
        let decoder = self.decoder.as_mut().ok_or_else(Self::closed_error)?;
        decoder
            .send_eof()
            .map_err(|error| ExtractError::Decode(error.to_string()))
    }

    fn close(&mut self) {
        if self.decoder.take().is_some() {
            log::debug!("Closed decoder for stream {}", self.stream_index);
        }
    }
}
