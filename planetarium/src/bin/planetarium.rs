//! Headless planetarium host.
//!
//! Drives the render loop at a fixed simulated frame rate, cycling through a
//! schedule of views, and writes rasterized frames as PNG files.

use anyhow::{Context, Result};
use clap::Parser;
use planetarium::frame_writer::FrameWriterHandle;
use planetarium::shared_args::{SessionArgs, ViewSchedule};
use planetarium::{Engine, FrameInput, RasterSurface, SessionConfig};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(
    name = "planetarium",
    about = "Render a synthetic star catalog through the sky, galaxy and HR views",
    long_about = "Generates a star catalog, animates it through a schedule of views \
at a fixed simulated frame rate and writes PNG frames. Settings come from an optional \
JSON session config; command line flags override it."
)]
struct Args {
    /// JSON session config to start from
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    session: SessionArgs,

    /// Number of frames to render
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Views to cycle through, e.g. "sky,classification,galaxy,hr,census"
    #[arg(long, default_value_t = ViewSchedule::default())]
    mode_schedule: ViewSchedule,

    /// Frames to hold each view of the schedule
    #[arg(long, default_value_t = 120)]
    frames_per_mode: u64,

    /// Write every Nth frame as PNG (0 disables output)
    #[arg(long, default_value_t = 10)]
    save_every: u64,

    /// Directory for PNG frames
    #[arg(long, default_value = "planetarium_frames")]
    output_dir: PathBuf,

    /// PNG encoder threads
    #[arg(long, default_value_t = 2)]
    workers: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    args.session.apply(&mut config);
    config.initial_view = args.mode_schedule.view_at(0, args.frames_per_mode);
    config.validate()?;

    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be positive"
    );
    let frame_interval = Duration::from_secs_f64(1.0 / args.fps);

    let surface = RasterSurface::new(config.viewport)?;
    let (mut engine, inputs, reports) = Engine::from_config(&config, surface)?;

    let writer = if args.save_every > 0 {
        std::fs::create_dir_all(&args.output_dir).with_context(|| {
            format!("Failed to create {}", args.output_dir.display())
        })?;
        Some(FrameWriterHandle::new(args.workers, 16)?)
    } else {
        None
    };

    println!(
        "Rendering {} frames of {} stars at {} ({})",
        args.frames, config.star_count, config.viewport, args.mode_schedule
    );

    let base_input: FrameInput = config.frame_input();
    let mut current_view = config.initial_view;
    let started = Instant::now();

    for frame in 0..args.frames {
        let view = args.mode_schedule.view_at(frame, args.frames_per_mode);
        if view != current_view {
            log::info!("Frame {}: switching to {}", frame, view);
            inputs.send(FrameInput { view, ..base_input });
            current_view = view;
        }

        let now = frame_interval.mul_f64(frame as f64);
        if engine.tick_at(now).is_none() {
            break;
        }

        if let (Some(writer), Some(surface)) = (&writer, engine.surface()) {
            if frame % args.save_every == 0 {
                let path = args.output_dir.join(format!("frame_{frame:05}.png"));
                if let Err(e) = writer.write_frame(surface.to_rgba_image(), path) {
                    log::warn!("Frame {} not saved: {}", frame, e);
                }
            }
        }

        for report in reports.try_iter() {
            log::debug!(
                "frame={} view={} visible={} lst={:.2} transitioning={}",
                report.frame_index,
                report.view,
                report.visible_count,
                report.local_sidereal_time,
                report.transitioning
            );
        }
    }

    let elapsed = started.elapsed();
    let rendered = engine.render_loop().frame_count();
    let lst = engine.render_loop().local_sidereal_time();
    engine.shutdown();

    println!(
        "Rendered {} frames in {:.2?} ({:.1} fps), final LST {:.2}°",
        rendered,
        elapsed,
        rendered as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        lst
    );

    if let Some(writer) = writer {
        let written = writer.wait_for_completion();
        println!("Wrote {} frames to {}", written, args.output_dir.display());
    }

    Ok(())
}
