use std::io;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use migratrack::{
    constants::{
        DEFAULT_FADE_WINDOW_DAYS, DEFAULT_FRAMES_PER_SECOND, DEFAULT_RESOLUTION_DPI,
        DEFAULT_SYNTHETIC_YEAR,
    },
    frames::{flatten_tracks, projector::FrameState, write_points_csv},
    migratrack::Migratrack,
    migratrack_errors::MigratrackError,
    params::AnimationParams,
    render::{
        ffmpeg_sink::{FfmpegSink, DEFAULT_FFMPEG, DEFAULT_FFPLAY},
        png_sink::PngSequence,
        FrameSink,
    },
    tracks::{display::TrackSetDisplayExt, normalizer::normalize_to_year},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated map of tagged-animal tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the animation to a video, a PNG sequence or a preview window
    Render(RenderArgs),
    /// Print the reconstructed tracks and their statistics
    Tracks(TracksArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Occurrence table (occurrenceID, species, longitude, latitude, date)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: Utf8PathBuf,

    /// Field delimiter of the input table
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Calendar year every track is folded onto
    #[arg(long, default_value_t = DEFAULT_SYNTHETIC_YEAR)]
    synthetic_year: i32,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Video file to write; without it (and without --frames-dir) the animation is previewed
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<Utf8PathBuf>,

    /// Directory receiving one PNG per frame
    #[arg(long, value_hint = ValueHint::DirPath)]
    frames_dir: Option<Utf8PathBuf>,

    /// Days over which a point fades out
    #[arg(long, default_value_t = DEFAULT_FADE_WINDOW_DAYS)]
    fade_window_days: u32,

    /// Frames (days) per second
    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_SECOND)]
    fps: u32,

    /// Raster resolution in dots per inch
    #[arg(long, default_value_t = DEFAULT_RESOLUTION_DPI)]
    dpi: u32,

    /// Encoder used for --output
    #[arg(long, default_value = DEFAULT_FFMPEG)]
    ffmpeg: String,

    /// Player used for the preview
    #[arg(long, default_value = DEFAULT_FFPLAY)]
    ffplay: String,
}

#[derive(Args, Debug)]
struct TracksArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print at most this many tracks
    #[arg(long)]
    limit: Option<usize>,

    /// Also write the normalized points to this CSV file
    #[arg(long, value_hint = ValueHint::FilePath)]
    points_csv: Option<Utf8PathBuf>,
}

fn delimiter_byte(c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter {c:?} is not a single ASCII character"))
}

fn handle_render(args: RenderArgs) -> Result<()> {
    let params = AnimationParams::builder()
        .synthetic_year(args.input.synthetic_year)
        .fade_window_days(args.fade_window_days)
        .frames_per_second(args.fps)
        .resolution_dpi(args.dpi)
        .build()?;
    info!("{params}");

    let delimiter = delimiter_byte(args.input.delimiter)?;
    let app = Migratrack::new(params.clone()).with_delimiter(delimiter);
    let animation = app
        .prepare(&args.input.input)
        .with_context(|| format!("preparing {}", args.input.input))?;

    let mut sinks: Vec<Box<dyn FrameSink>> = Vec::new();
    if let Some(dir) = &args.frames_dir {
        sinks.push(Box::new(PngSequence::create(dir, animation.canvas())?));
    }
    if let Some(output) = &args.output {
        sinks.push(Box::new(FfmpegSink::export(
            &args.ffmpeg,
            output,
            animation.canvas(),
            params.frames_per_second,
        )?));
    }
    if sinks.is_empty() {
        sinks.push(Box::new(FfmpegSink::preview(
            &args.ffplay,
            animation.canvas(),
            params.frames_per_second,
        )?));
    }

    let mut sink = FanOut(sinks);
    let frames = animation.render_to(&mut sink)?;
    if frames == 0 {
        warn!("no frame rendered");
    }
    Ok(())
}

/// Sends every frame to several sinks.
struct FanOut(Vec<Box<dyn FrameSink>>);

impl FrameSink for FanOut {
    fn consume(&mut self, frame: &FrameState) -> Result<(), MigratrackError> {
        self.0.iter_mut().try_for_each(|sink| sink.consume(frame))
    }

    /// Every sink is finished, the first error is reported.
    fn finish(&mut self) -> Result<(), MigratrackError> {
        self.0
            .iter_mut()
            .map(|sink| sink.finish())
            .fold(Ok(()), |first, next| first.and(next))
    }
}

fn handle_tracks(args: TracksArgs) -> Result<()> {
    let params = AnimationParams::builder()
        .synthetic_year(args.input.synthetic_year)
        .build()?;
    let delimiter = delimiter_byte(args.input.delimiter)?;
    let app = Migratrack::new(params).with_delimiter(delimiter);

    let tracks = app
        .load_tracks(&args.input.input)
        .with_context(|| format!("reading {}", args.input.input))?;
    let table = match args.limit {
        Some(n) => tracks.table().limit(n),
        None => tracks.table(),
    };
    println!("{table:#}");

    if let Some(path) = &args.points_csv {
        let normalized = normalize_to_year(&tracks, app.params().synthetic_year)?;
        write_points_csv(&flatten_tracks(&normalized), path)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::Tracks(args) => handle_tracks(args),
    }
}
