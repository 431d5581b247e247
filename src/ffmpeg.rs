//! FFmpeg process-wide setup.
//!
//! [`init`] registers FFmpeg's formats and codecs once per process.
//! [`set_ffmpeg_log_level`] controls what FFmpeg itself writes to stderr,
//! such as the complaints of a decoder fed a corrupt packet. That channel is
//! separate from the `log` facade the rest of the crate uses, which the
//! `framegrab` binary routes through `env_logger`.
//!
//! ```no_run
//! use framegrab::FfmpegLogLevel;
//!
//! framegrab::set_ffmpeg_log_level(FfmpegLogLevel::Fatal);
//! ```

use std::sync::OnceLock;

use ffmpeg_next::util::log::Level;

use crate::error::ExtractError;

static INIT_RESULT: OnceLock<Result<(), String>> = OnceLock::new();

/// Register FFmpeg's formats and codecs.
///
/// Runs `ffmpeg_next::init` at most once per process; later calls return the
/// cached outcome. No teardown is needed.
///
/// # Errors
///
/// Returns [`ExtractError::Ffmpeg`] if the one-time initialisation failed.
pub fn init() -> Result<(), ExtractError> {
    INIT_RESULT
        .get_or_init(|| {
            log::debug!("Initialising FFmpeg");
            ffmpeg_next::init().map_err(|error| error.to_string())
        })
        .clone()
        .map_err(ExtractError::Ffmpeg)
}

/// How much FFmpeg itself prints to stderr, quietest first.
///
/// Each level admits its own messages and every more severe one, so
/// `Warning` (FFmpeg's default) also shows errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Nothing.
    Quiet,
    /// Conditions after which FFmpeg aborts the process.
    Panic,
    /// Failures that leave a codec or format context unusable.
    Fatal,
    /// Failures FFmpeg recovered from, such as a corrupt packet.
    Error,
    /// Suspicious input. This is where FFmpeg starts out.
    Warning,
    /// Stream and codec summaries.
    Info,
    Verbose,
    Debug,
    Trace,
}

/// Every level with its FFmpeg counterpart and command-line name.
const LEVELS: [(FfmpegLogLevel, Level, &str); 9] = [
    (FfmpegLogLevel::Quiet, Level::Quiet, "quiet"),
    (FfmpegLogLevel::Panic, Level::Panic, "panic"),
    (FfmpegLogLevel::Fatal, Level::Fatal, "fatal"),
    (FfmpegLogLevel::Error, Level::Error, "error"),
    (FfmpegLogLevel::Warning, Level::Warning, "warning"),
    (FfmpegLogLevel::Info, Level::Info, "info"),
    (FfmpegLogLevel::Verbose, Level::Verbose, "verbose"),
    (FfmpegLogLevel::Debug, Level::Debug, "debug"),
    (FfmpegLogLevel::Trace, Level::Trace, "trace"),
];

impl FfmpegLogLevel {
    /// Parse a level name as accepted by `--log-level`.
    ///
    /// Case-insensitive; `warn` is accepted for `warning`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let name = if name == "warn" { "warning" } else { name.as_str() };
        LEVELS
            .iter()
            .find(|(_, _, candidate)| *candidate == name)
            .map(|(level, _, _)| *level)
    }

    /// The name `from_name` accepts for this level.
    pub fn name(self) -> &'static str {
        LEVELS
            .iter()
            .find(|(level, _, _)| *level == self)
            .map_or("warning", |(_, _, name)| name)
    }

    fn to_ffmpeg_level(self) -> Level {
        LEVELS
            .iter()
            .find(|(level, _, _)| *level == self)
            .map_or(Level::Warning, |(_, native, _)| *native)
    }

    fn from_ffmpeg_level(native: Level) -> Option<Self> {
        LEVELS
            .iter()
            .find(|(_, candidate, _)| *candidate == native)
            .map(|(level, _, _)| *level)
    }
}

/// Change what FFmpeg prints to stderr from now on.
///
/// Leaves the `log` facade alone. FFmpeg is initialised first if needed.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    if let Err(error) = init() {
        log::warn!("Setting FFmpeg log level before a failed initialisation: {error}");
    }
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

/// The level FFmpeg currently logs at, or `None` if FFmpeg reports a value
/// outside the named levels.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .and_then(FfmpegLogLevel::from_ffmpeg_level)
}
