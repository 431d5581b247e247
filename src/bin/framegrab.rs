use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use colored::Colorize;
use framegrab::{
    DEFAULT_FRAME_CAP, ExtractionOptions, FfmpegLogLevel, MediaContainer, OutputFormat,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framegrab input.mp4\n  framegrab input.mkv --out frames --max-frames 10\n  framegrab input.mp4 --format png --json\n  RUST_LOG=debug framegrab input.mp4 --log-level quiet";

#[derive(Debug, Parser)]
#[command(
    name = "framegrab",
    version,
    about = "Save the first frames of a video stream as PPM images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input media path.
    input: PathBuf,

    /// Directory frame files are written to (created if missing).
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Maximum number of frames to save.
    #[arg(long, default_value_t = DEFAULT_FRAME_CAP, value_parser = clap::value_parser!(u32).range(1..))]
    max_frames: u32,

    /// Output image format (ppm, png, jpg, bmp, tiff).
    #[arg(long, default_value = "ppm")]
    format: String,

    /// Show debug logging output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Print container metadata as JSON on stdout instead of FFmpeg's summary.
    #[arg(long)]
    json: bool,

    /// Do not print FFmpeg's container summary on stderr.
    #[arg(long)]
    no_dump: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn print_metadata_json(input: &Path) -> Result<(), Box<dyn Error>> {
    let metadata = MediaContainer::probe(input)?;
    let payload = json!({
        "format": metadata.format,
        "duration_seconds": metadata.duration.as_secs_f64(),
        "tags": metadata.tags,
        "streams": metadata.streams.iter().map(|stream| json!({
            "index": stream.index,
            "type": stream.media_type.to_string(),
            "codec": stream.codec,
            "width": stream.width,
            "height": stream.height,
        })).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(level) = &cli.log_level {
        let parsed =
            FfmpegLogLevel::from_name(level).ok_or(format!("unsupported --log-level: {level}"))?;
        framegrab::set_ffmpeg_log_level(parsed);
    }

    let format: OutputFormat = cli.format.parse()?;

    if cli.json {
        print_metadata_json(&cli.input)?;
    }

    fs::create_dir_all(&cli.out)?;

    let options = ExtractionOptions::new()
        .with_output_directory(&cli.out)
        .with_frame_cap(cli.max_frames)
        .with_output_format(format)
        .with_format_dump(!cli.no_dump && !cli.json);

    let report = framegrab::extract_frames(&cli.input, &options)?;

    if report.decode_errors > 0 || report.write_errors > 0 {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!(
                "{} packet(s) failed to decode, {} frame(s) failed to save",
                report.decode_errors, report.write_errors
            )
            .yellow()
        );
    }

    if !cli.json {
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "Saved {} frame(s) to {}",
                report.frames_saved,
                cli.out.display()
            )
            .green()
        );
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
