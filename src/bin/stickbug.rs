use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use stickbug::{
    AssetPaths, FfmpegSink, FfmpegSinkOpts, FrameIndex, HoughDetector, PipelineCache,
    PipelineConfig, RankMode, Resolution, Rgb8, Segment, StaticAssets,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stickbug", version, about = "Get stick bugged")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the ranked, centered segments as JSON.
    Segments(SegmentsArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// JSON configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output video resolution.
    #[arg(long, num_args = 2, value_names = ["W", "H"])]
    resolution: Option<Vec<u32>>,

    /// Background color while the image is shown.
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], allow_negative_numbers = true)]
    img_bg_color: Option<Vec<i64>>,

    /// Line color.
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], allow_negative_numbers = true)]
    line_color: Option<Vec<i64>>,

    /// Background color behind the lines.
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], allow_negative_numbers = true)]
    line_bg_color: Option<Vec<i64>>,

    /// Scale the line detector runs at.
    #[arg(long)]
    scale: Option<f64>,

    /// Rank detected segments by width instead of length.
    #[arg(long)]
    sort_by_width: bool,

    /// JSON file with canvas-space segments replacing the detected ones.
    #[arg(long)]
    segments: Option<PathBuf>,

    /// Rasterise morph frames in parallel.
    #[arg(long)]
    parallel: bool,
}

#[derive(Args, Debug)]
struct AssetArgs {
    /// Clip appended after the morph.
    #[arg(long)]
    closing_clip: Option<PathBuf>,

    /// Audio started with the closing clip (defaults to the clip's own soundtrack).
    #[arg(long)]
    closing_audio: Option<PathBuf>,

    /// Audio cue; repeat once per segment, then once more for the transition.
    #[arg(long = "cue")]
    cues: Vec<PathBuf>,

    /// Audio spanning the morph.
    #[arg(long)]
    transform_audio: Option<PathBuf>,

    /// Audio playing from the first frame.
    #[arg(long)]
    ambient_audio: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input image.
    input: PathBuf,

    /// Output MP4 path.
    output: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(flatten)]
    assets: AssetArgs,

    /// Fail instead of overwriting an existing output.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct SegmentsArgs {
    /// Input image.
    input: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input image.
    input: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(flatten)]
    assets: AssetArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Segments(args) => cmd_segments(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = build_config(&args.pipeline)?;
    install_assets(&args.assets, &config)?;
    let mut pipeline = build_pipeline(&args.input, &args.pipeline, config)?;

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: args.output.clone(),
        overwrite: !args.no_overwrite,
    });
    pipeline.write_video(&mut sink)?;

    eprintln!("wrote {}", args.output.display());
    Ok(())
}

fn cmd_segments(args: SegmentsArgs) -> anyhow::Result<()> {
    let config = build_config(&args.pipeline)?;
    let mut pipeline = build_pipeline(&args.input, &args.pipeline, config)?;
    let json = serde_json::to_string_pretty(pipeline.segments()?)?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = build_config(&args.pipeline)?;
    install_assets(&args.assets, &config)?;
    let mut pipeline = build_pipeline(&args.input, &args.pipeline, config)?;

    let clip = &pipeline.video()?.clip;
    let frame = clip.frame(FrameIndex(args.index)).with_context(|| {
        format!(
            "frame {} is out of range (clip has {} frames)",
            args.index,
            clip.len_frames()
        )
    })?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .to_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// Defaults, then the config file, then explicit flags.
fn build_config(args: &PipelineArgs) -> anyhow::Result<PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(wh) = &args.resolution {
        let [w, h] = <[u32; 2]>::try_from(wh.as_slice()).context("resolution takes W H")?;
        cfg.resolution = Resolution::new(w, h)?;
    }
    if let Some(c) = &args.img_bg_color {
        cfg.image_bg_color = color(c)?;
    }
    if let Some(c) = &args.line_color {
        cfg.line_color = color(c)?;
    }
    if let Some(c) = &args.line_bg_color {
        cfg.line_bg_color = color(c)?;
    }
    if let Some(scale) = args.scale {
        cfg.detector_scale = scale;
    }
    if args.sort_by_width {
        cfg.rank_mode = RankMode::ByWidth;
    }
    if args.parallel {
        cfg.parallel = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn color(channels: &[i64]) -> anyhow::Result<Rgb8> {
    let rgb = <[i64; 3]>::try_from(channels).context("colors take R G B")?;
    Ok(Rgb8::from_channels(rgb)?)
}

fn install_assets(args: &AssetArgs, config: &PipelineConfig) -> anyhow::Result<()> {
    let k = config.segment_count();
    if args.cues.len() > k + 1 {
        tracing::warn!(
            given = args.cues.len(),
            used = k + 1,
            "ignoring extra audio cues"
        );
    }
    let paths = AssetPaths {
        closing_clip: args.closing_clip.clone(),
        closing_audio: args.closing_audio.clone(),
        reveal_cues: args.cues.iter().take(k).cloned().collect(),
        transition_cue: args.cues.get(k).cloned(),
        transform_cue: args.transform_audio.clone(),
        ambient: args.ambient_audio.clone(),
    };
    let assets = StaticAssets::load(&paths, config.fps)?;
    stickbug::assets::install(assets)?;
    Ok(())
}

fn build_pipeline(
    input: &Path,
    args: &PipelineArgs,
    config: PipelineConfig,
) -> anyhow::Result<PipelineCache> {
    let image = image::open(input)
        .with_context(|| format!("open image '{}'", input.display()))?
        .to_rgba8();
    let mut pipeline =
        PipelineCache::new(config, Arc::new(HoughDetector::default()))?.with_image(image)?;

    if let Some(path) = &args.segments {
        let bytes =
            std::fs::read(path).with_context(|| format!("read segments '{}'", path.display()))?;
        let segments: Vec<Segment> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse segments '{}'", path.display()))?;
        pipeline.set_segments(segments)?;
    }
    Ok(pipeline)
}
