//! The read → decode → convert → write loop.
//!
//! [`Pipeline`] drives one extraction run through the states of
//! [`PipelineState`]. Resources are acquired in the order container,
//! decoder, converter, raster and released in exactly the reverse order on
//! every path: explicitly when the run reaches [`PipelineState::Closed`], by
//! scope exit when it aborts.
//!
//! The pipeline is generic over a [`MediaBackend`], the factory for the
//! container, decoder and converter. [`FfmpegBackend`] is the production
//! backend.
//!
//! # Example
//!
//! ```no_run
//! use framegrab::{ExtractionOptions, FfmpegBackend, Pipeline, PpmSink};
//!
//! let mut pipeline = Pipeline::new(FfmpegBackend, PpmSink::new("frames"), ExtractionOptions::new());
//! let report = pipeline.run("input.mp4")?;
//! println!("saved {} of {} decoded frames", report.frames_saved, report.frames_decoded);
//! # Ok::<(), framegrab::ExtractError>(())
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use crate::{
    config::ExtractionOptions,
    container::{Demuxer, MediaContainer, StreamPacket},
    converter::{FrameConverter, PixelConverter},
    decoder::{DecodeStatus, FrameDecoder, StreamDecoder},
    error::ExtractError,
    raster::RgbRaster,
    sink::FrameSink,
    stream::select_first_video_stream,
};

/// Factory for the resources a [`Pipeline`] acquires.
pub trait MediaBackend {
    /// Container type.
    type Container: Demuxer;
    /// Decoder type, fed with the container's packets.
    type Decoder: FrameDecoder<Packet = <Self::Container as Demuxer>::Packet>;
    /// Converter type, fed with the decoder's frames.
    type Converter: FrameConverter<<Self::Decoder as FrameDecoder>::Frame>;

    /// Open and probe the container at `source`.
    fn open_container(&mut self, source: &Path) -> Result<Self::Container, ExtractError>;

    /// Open a decoder bound to stream `stream_index` of `container`.
    fn open_decoder(
        &mut self,
        container: &Self::Container,
        stream_index: usize,
    ) -> Result<Self::Decoder, ExtractError>;

    /// Configure a converter for the frames `decoder` emits.
    fn configure_converter(
        &mut self,
        decoder: &Self::Decoder,
    ) -> Result<Self::Converter, ExtractError>;
}

/// The FFmpeg-backed [`MediaBackend`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegBackend;

impl MediaBackend for FfmpegBackend {
    type Container = MediaContainer;
    type Decoder = StreamDecoder;
    type Converter = PixelConverter;

    fn open_container(&mut self, source: &Path) -> Result<MediaContainer, ExtractError> {
        MediaContainer::open(source)
    }

    fn open_decoder(
        &mut self,
        container: &MediaContainer,
        stream_index: usize,
    ) -> Result<StreamDecoder, ExtractError> {
        StreamDecoder::open(container, stream_index)
    }

    fn configure_converter(&mut self, decoder: &StreamDecoder) -> Result<PixelConverter, ExtractError> {
        let (width, height) = decoder.dimensions();
        PixelConverter::configure(width, height, decoder.format())
    }
}

/// Lifecycle of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Nothing acquired yet.
    Init,
    /// The container is open and its stream table is known.
    StreamsProbed,
    /// A decoder is bound to the selected video stream.
    DecoderOpen,
    /// Packets are being read, decoded, converted and saved.
    Running,
    /// Input is exhausted; buffered frames are flushed and resources released.
    Draining,
    /// The run finished and everything was released.
    Closed,
    /// The run stopped on an unrecoverable error.
    Aborted,
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            PipelineState::Init => "init",
            PipelineState::StreamsProbed => "streams probed",
            PipelineState::DecoderOpen => "decoder open",
            PipelineState::Running => "running",
            PipelineState::Draining => "draining",
            PipelineState::Closed => "closed",
            PipelineState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ExtractionReport {
    /// Index of the decoded video stream.
    pub video_stream_index: usize,
    /// Width of the saved frames.
    pub width: u32,
    /// Height of the saved frames.
    pub height: u32,
    /// Packets read from the container, all streams.
    pub packets_read: u64,
    /// Packets discarded because they belong to another stream.
    pub packets_skipped: u64,
    /// Frames produced by the decoder.
    pub frames_decoded: u64,
    /// Frames written successfully.
    pub frames_saved: u32,
    /// Packets or flushes the decoder rejected.
    pub decode_errors: u32,
    /// Frames the converter rejected.
    pub conversion_errors: u32,
    /// Saves that failed. Their sequence numbers are not reused.
    pub write_errors: u32,
    /// Whether reading stopped on a read error rather than end of input.
    pub read_error: bool,
    /// Files written, in sequence order.
    pub saved_paths: Vec<PathBuf>,
}

/// One extraction run over a [`MediaBackend`] and a [`FrameSink`].
#[derive(Debug)]
pub struct Pipeline<B, S> {
    backend: B,
    sink: S,
    options: ExtractionOptions,
    state: PipelineState,
    /// Save attempts so far; the next file gets `save_attempts + 1`.
    save_attempts: u32,
}

impl<B: MediaBackend, S: FrameSink> Pipeline<B, S> {
    /// Create a pipeline in [`PipelineState::Init`].
    pub fn new(backend: B, sink: S, options: ExtractionOptions) -> Self {
        Self {
            backend,
            sink,
            options,
            state: PipelineState::Init,
            save_attempts: 0,
        }
    }

    /// Current state. After [`run`](Pipeline::run) this is either
    /// [`PipelineState::Closed`] or [`PipelineState::Aborted`].
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The backend, e.g. to inspect a test double after a run.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The sink, e.g. to inspect a test double after a run.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Extract up to the frame cap from `source`.
    ///
    /// Per-packet decode errors, per-frame conversion errors and failed
    /// saves are logged, counted in the report and skipped.
    ///
    /// # Errors
    ///
    /// Returns the error of the step that aborted the run: opening or
    /// probing the container, finding a video stream, opening the decoder or
    /// configuring the converter.
    pub fn run<P: AsRef<Path>>(&mut self, source: P) -> Result<ExtractionReport, ExtractError> {
        self.state = PipelineState::Init;
        self.save_attempts = 0;

        match self.execute(source.as_ref()) {
            Ok(report) => {
                log::info!(
                    "Extraction finished: {} frame(s) saved, {} decoded, {} packet(s) read, {} decode error(s), {} write error(s)",
                    report.frames_saved,
                    report.frames_decoded,
                    report.packets_read,
                    report.decode_errors,
                    report.write_errors,
                );
                Ok(report)
            }
            Err(error) => {
                log::error!("Extraction aborted while {}: {error}", self.state);
                self.state = PipelineState::Aborted;
                Err(error)
            }
        }
    }

    fn execute(&mut self, source: &Path) -> Result<ExtractionReport, ExtractError> {
        let mut container = self.backend.open_container(source)?;
        self.state = PipelineState::StreamsProbed;

        if self.options.dump_format {
            container.dump();
        }

        let video_stream_index = select_first_video_stream(container.streams())?;

        let mut decoder = self.backend.open_decoder(&container, video_stream_index)?;
        self.state = PipelineState::DecoderOpen;

        let mut converter = self.backend.configure_converter(&decoder)?;
        let (width, height) = decoder.dimensions();
        let mut raster = RgbRaster::new(width, height);

        let mut report = ExtractionReport {
            video_stream_index,
            width,
            height,
            ..ExtractionReport::default()
        };

        self.state = PipelineState::Running;
        log::debug!(
            "Extracting up to {} frame(s) of {width}x{height} from stream {video_stream_index}",
            self.options.frame_cap,
        );

        loop {
            let packet = match container.read_packet() {
                Ok(Some(packet)) => packet,
                Ok(None) => break,
                Err(error) => {
                    log::warn!("Stopping read after packet {}: {error}", report.packets_read);
                    report.read_error = true;
                    break;
                }
            };
            report.packets_read += 1;

            if packet.stream_index() != video_stream_index {
                report.packets_skipped += 1;
                continue;
            }

            self.decode_step(
                &mut decoder,
                Some(&packet),
                &mut converter,
                &mut raster,
                &mut report,
            );
        }

        self.state = PipelineState::Draining;
        match decoder.finish() {
            Ok(()) => self.decode_step(&mut decoder, None, &mut converter, &mut raster, &mut report),
            Err(error) => {
                log::warn!("Failed to flush decoder: {error}");
                report.decode_errors += 1;
            }
        }

        drop(raster);
        converter.close();
        drop(converter);
        decoder.close();
        drop(decoder);
        container.close();
        drop(container);

        self.state = PipelineState::Closed;
        Ok(report)
    }

    /// Feed `packet` (or nothing, to pull flushed frames) and handle every
    /// frame the decoder has ready.
    fn decode_step(
        &mut self,
        decoder: &mut B::Decoder,
        packet: Option<&<B::Container as Demuxer>::Packet>,
        converter: &mut B::Converter,
        raster: &mut RgbRaster,
        report: &mut ExtractionReport,
    ) {
        let mut pending = packet;
        loop {
            let status = match pending.take() {
                Some(packet) => decoder.feed(packet),
                None => decoder.next_frame(),
            };

            match status {
                Ok(DecodeStatus::FrameReady(frame)) => {
                    self.handle_frame(frame, converter, raster, report);
                }
                Ok(DecodeStatus::NotReady) => break,
                Err(error) => {
                    log::warn!("Skipping packet: {error}");
                    report.decode_errors += 1;
                    break;
                }
            }
        }
    }

    fn handle_frame(
        &mut self,
        frame: &<B::Decoder as FrameDecoder>::Frame,
        converter: &mut B::Converter,
        raster: &mut RgbRaster,
        report: &mut ExtractionReport,
    ) {
        report.frames_decoded += 1;

        if let Err(error) = converter.convert(frame, raster) {
            log::warn!("Skipping frame {}: {error}", report.frames_decoded);
            report.conversion_errors += 1;
            return;
        }

        if self.save_attempts >= self.options.frame_cap {
            return;
        }
        self.save_attempts += 1;
        let sequence = self.save_attempts;

        match self.sink.save(raster, sequence) {
            Ok(path) => {
                log::info!("Saved frame {sequence} to {}", path.display());
                report.frames_saved += 1;
                report.saved_paths.push(path);
            }
            Err(error) => {
                log::warn!("Failed to save frame {sequence}: {error}");
                report.write_errors += 1;
            }
        }
    }
}

/// Extract frames from `source` with FFmpeg and the sink described by
/// `options`.
///
/// # Errors
///
/// See [`Pipeline::run`].
///
/// # Example
///
/// ```no_run
/// use framegrab::ExtractionOptions;
///
/// let report = framegrab::extract_frames("input.mp4", &ExtractionOptions::new())?;
/// for path in &report.saved_paths {
///     println!("{}", path.display());
/// }
/// # Ok::<(), framegrab::ExtractError>(())
/// ```
pub fn extract_frames<P: AsRef<Path>>(
    source: P,
    options: &ExtractionOptions,
) -> Result<ExtractionReport, ExtractError> {
    let mut pipeline = Pipeline::new(FfmpegBackend, options.sink(), options.clone());
    pipeline.run(source)
}
