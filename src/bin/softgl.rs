use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "softgl", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a scene script and write every presented frame as a PNG.
    Render(RenderArgs),
    /// Play a scene script and print per-frame stats with frame digests.
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Redraw the whole framebuffer every frame.
    #[arg(long, default_value_t = false)]
    full_redraw: bool,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Redraw the whole framebuffer every frame.
    #[arg(long, default_value_t = false)]
    full_redraw: bool,
}

#[derive(serde::Serialize)]
struct FrameReport<'a> {
    #[serde(flatten)]
    stats: &'a softgl::PresentStats,
    sha256: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn load_runner(in_path: &Path, full_redraw: bool) -> anyhow::Result<softgl::scene::SceneRunner> {
    let mut script = softgl::scene::SceneScript::from_path(in_path)
        .with_context(|| format!("load scene '{}'", in_path.display()))?;
    if full_redraw {
        script.set_dirty_rects(false);
    }
    let runner = softgl::scene::SceneRunner::new(script)
        .with_context(|| format!("prepare scene '{}'", in_path.display()))?;
    Ok(runner)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut runner = load_runner(&args.in_path, args.full_redraw)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let out_dir = args.out_dir.clone();
    let stats = runner.run(|stats, ctx| {
        let frame = ctx.frame_rgba();
        let out = out_dir.join(format!("frame_{:04}.png", stats.frame));
        image::save_buffer_with_format(
            &out,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out.display()))?;
        Ok(())
    })?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    eprintln!("wrote {} frames to {}", stats.len(), args.out_dir.display());
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let mut runner = load_runner(&args.in_path, args.full_redraw)?;
    let mut digests = Vec::new();
    let stats = runner.run(|_, ctx| {
        digests.push(hex(&Sha256::digest(&ctx.frame_rgba().data)));
        Ok(())
    })?;

    for (stats, sha256) in stats.iter().zip(digests) {
        let line = serde_json::to_string(&FrameReport { stats, sha256 })?;
        println!("{line}");
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
