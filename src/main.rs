//! Av1an scene lists from Dolby Vision scene cuts.
//!
//! Reads the scene cuts stored in a Dolby Vision RPU (extracting the RPU
//! from the video first if asked to) and writes an Av1an scenes file.
//! Long scenes are split at near-regular intervals.

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use dovi_scenes::{
    build_scene_document,
    options::{default_rpu_path, parse_max_scene_len, scenes_output_path},
    source::{DoviScenes, FixedFrameCount, FrameCountMethod, SceneFile},
    tools, CutSource, FrameCounter, SceneOptions,
};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dovi-scenes")]
#[command(about = "Av1an scene lists from Dolby Vision scene cuts")]
#[command(version)]
#[command(group(ArgGroup::new("source").required(true).args(["video", "rpu"])))]
struct Args {
    /// Dolby Vision video file (the RPU is read from <VIDEO>.rpu)
    #[arg(short, long)]
    video: Option<PathBuf>,

    /// Dolby Vision RPU file
    #[arg(short, long)]
    rpu: Option<PathBuf>,

    /// Extract the RPU from the video first
    #[arg(long, requires = "video")]
    extract_rpu: bool,

    /// Plot the dynamic tone mapping metadata to <RPU>.png
    #[arg(long)]
    plot: bool,

    /// Export all metadata to <RPU>.json
    #[arg(long)]
    export_all: bool,

    /// Existing scene cut list (one frame number per line) to use instead of
    /// exporting it from the RPU
    #[arg(short, long)]
    scenes: Option<PathBuf>,

    /// Total number of frames in the video
    #[arg(long)]
    total_frames: Option<usize>,

    /// How to count frames when --total-frames is not given
    #[arg(long, value_enum, default_value_t)]
    frame_count: FrameCountMethod,

    /// Maximum scene length in frames (0 or empty: no limit)
    #[arg(short, long, value_parser = parse_max_scene_len, default_value = "0")]
    max_scene_length: usize,

    /// Maximum scene length in seconds
    #[arg(long, requires_all = ["fps_num", "fps_den"])]
    max_scene_secs: Option<u32>,

    /// FPS numerator
    #[arg(long, requires = "fps_den")]
    fps_num: Option<u32>,

    /// FPS denominator
    #[arg(long, requires = "fps_num")]
    fps_den: Option<u32>,

    /// Output scenes file (default: <RPU>-av1an-scenes[-max<N>].json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show progress output
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn init_logging(progress: bool) {
    let default_level = if progress {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.progress);

    let opts = SceneOptions {
        max_scene_len: args.max_scene_length,
        max_scene_secs: args.max_scene_secs,
        fps: args.fps_num.zip(args.fps_den),
    };
    let max_scene_len = opts.effective_max_scene_len()?;

    let rpu = match (&args.rpu, &args.video) {
        (Some(rpu), _) => rpu.clone(),
        (None, Some(video)) => default_rpu_path(video),
        (None, None) => bail!("either --video or --rpu is required"),
    };

    if let Some(video) = &args.video {
        if args.extract_rpu {
            let compat = tools::extract_rpu(video, &rpu)
                .with_context(|| format!("Failed to extract RPU from {:?}", video))?;
            info!("RPU written to {:?} (compatible copy {:?})", rpu, compat);
        } else {
            info!("skipping RPU extraction, using {:?}", rpu);
        }
    }

    if args.plot {
        let png = tools::plot_rpu(&rpu).context("Failed to plot tone mapping metadata")?;
        info!("plot written to {:?}", png);
    }

    if args.export_all {
        let json = tools::export_all(&rpu).context("Failed to export RPU metadata")?;
        info!("metadata exported to {:?}", json);
    }

    let counter: Box<dyn FrameCounter> = match args.total_frames {
        Some(frames) => Box::new(FixedFrameCount(frames)),
        None => args.frame_count.counter(&rpu, args.video.as_deref())?,
    };
    let cuts: Box<dyn CutSource> = match &args.scenes {
        Some(path) => Box::new(SceneFile(path.clone())),
        None => Box::new(DoviScenes(rpu.clone())),
    };

    if max_scene_len > 0 {
        info!("building scene list (max {} frames/scene)", max_scene_len);
    } else {
        info!("building scene list (no scene length limit)");
    }
    let doc = build_scene_document(cuts.as_ref(), counter.as_ref(), max_scene_len)
        .context("Failed to build scene list")?;

    let output = args
        .output
        .unwrap_or_else(|| scenes_output_path(&rpu, max_scene_len));
    doc.write_json(&output)
        .with_context(|| format!("Failed to write scenes file {:?}", output))?;

    info!(
        "wrote {} scenes ({} frames) to {:?}",
        doc.scenes.len(),
        doc.frames,
        output
    );

    Ok(())
}
