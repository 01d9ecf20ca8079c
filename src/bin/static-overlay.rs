use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use static_overlay::{
    DeviceProfile, DisplaySize, FrameRGBA, ManualScheduler, OverlayConfig, OverlayStack,
    SimulatedViewport,
};

const BACKDROP_RGBA: [u8; 4] = [18, 20, 28, 255];

#[derive(Parser, Debug)]
#[command(name = "static-overlay", version)]
struct Cli {
    /// Log layer lifecycle and frame decisions.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the overlay up to a timestamp and write the composed frame as a PNG.
    Frame(FrameArgs),
    /// Write one PNG per drawn frame over a time span.
    Sequence(SequenceArgs),
}

#[derive(Args, Debug)]
struct HostArgs {
    /// Overlay config JSON; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width, logical px.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height, logical px.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Device pixel ratio reported by the simulated host.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// User-agent string used for mobile detection.
    #[arg(long)]
    user_agent: Option<String>,

    /// Rate at which the simulated display fires frame callbacks.
    #[arg(long, default_value_t = 60.0)]
    refresh_hz: f64,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    host: HostArgs,

    /// Timestamp of the frame to capture, ms.
    #[arg(long)]
    time_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    host: HostArgs,

    /// Length of the run, ms.
    #[arg(long)]
    duration_ms: f64,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

/// Headless host: a simulated viewport and display clock driving one overlay stack.
struct Session {
    viewport: SimulatedViewport,
    scheduler: ManualScheduler,
    stack: OverlayStack,
    size: DisplaySize,
    interval_ms: f64,
}

impl Session {
    fn open(args: &HostArgs) -> anyhow::Result<Self> {
        anyhow::ensure!(
            args.refresh_hz.is_finite() && args.refresh_hz > 0.0,
            "--refresh-hz must be finite and > 0"
        );
        let config = match &args.config {
            Some(path) => OverlayConfig::from_path(path)?,
            None => OverlayConfig::default(),
        };
        let device = match &args.user_agent {
            Some(ua) => DeviceProfile::from_user_agent(ua, args.pixel_ratio),
            None => DeviceProfile {
                pixel_ratio: args.pixel_ratio,
                mobile: false,
            },
        };

        let size = DisplaySize::new(args.width, args.height).sanitized();
        let mut viewport = SimulatedViewport::new(size, device);
        let mut scheduler = ManualScheduler::new();
        let stack = OverlayStack::mount(&config, &mut viewport, &mut scheduler)
            .context("mount overlay layers")?;

        Ok(Self {
            viewport,
            scheduler,
            stack,
            size,
            interval_ms: 1000.0 / args.refresh_hz,
        })
    }

    /// Fire every pending callback at `t_ms`; returns how many layers drew.
    fn tick(&mut self, t_ms: f64) -> usize {
        let due = self.scheduler.take_due();
        self.stack.tick(&due, t_ms, &mut self.scheduler)
    }

    /// Timestamps of display callbacks in `(0, end_ms]`.
    fn clock(&self, end_ms: f64) -> impl Iterator<Item = f64> + use<> {
        let interval = self.interval_ms;
        (1u64..)
            .map(move |k| k as f64 * interval)
            .take_while(move |&t| t <= end_ms)
    }

    fn compose(&self) -> anyhow::Result<FrameRGBA> {
        let mut frame = FrameRGBA::solid(self.size, 1.0, BACKDROP_RGBA);
        self.stack.compose(self.size, &mut frame, None)?;
        Ok(frame)
    }

    fn close(self) {
        let Self {
            mut viewport,
            mut scheduler,
            stack,
            ..
        } = self;
        stack.unmount(&mut viewport, &mut scheduler);
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.time_ms.is_finite() && args.time_ms >= 0.0,
        "--time-ms must be finite and >= 0"
    );
    let mut session = Session::open(&args.host)?;
    for t in session.clock(args.time_ms) {
        session.tick(t);
    }

    let frame = session.compose()?;
    write_png(&frame, &args.out)?;
    session.close();

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.duration_ms.is_finite() && args.duration_ms >= 0.0,
        "--duration-ms must be finite and >= 0"
    );
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut session = Session::open(&args.host)?;
    let mut written = 0usize;
    for t in session.clock(args.duration_ms) {
        if session.tick(t) == 0 {
            continue;
        }
        let frame = session.compose()?;
        let path = args.out_dir.join(format!("frame_{written:05}.png"));
        write_png(&frame, &path)?;
        written += 1;
    }
    session.close();

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn write_png(frame: &FrameRGBA, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .to_rgba_image()?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))
}
