//! Explicit finite-difference heat diffusion on a 2D grid, rendered as a
//! false-color RGBA buffer that can be perturbed by injecting heat.

mod clock;
mod config;
mod error;
mod input;
mod renderer;
mod session;
mod snapshot;
mod solver;
mod state;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use clap::Parser;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use clock::{Cadence, FpsCounter};
use config::{Config, ConfigError};
use error::SimError;
use input::PointerTracker;
use session::SimulationSession;
use snapshot::SnapshotError;
use solver::{PixelScale, SolverParams};

/// Gamma change per Up/Down key press.
const GAMMA_STEP: f64 = 0.005;

#[derive(Parser, Debug)]
#[command(version, about = "Interactive 2D heat diffusion")]
struct Args {
    /// YAML configuration file
    #[arg(long, default_value = config::DEFAULT_PATH)]
    config: PathBuf,

    /// diffusion rate (overrides physics.gamma)
    #[arg(long)]
    gamma: Option<f64>,

    /// pixels per grid cell: 1, 2, 4 or 8 (overrides display.scale)
    #[arg(long, value_parser = parse_scale)]
    scale: Option<PixelScale>,

    /// run without a window and write the last frame as PNG
    #[arg(long)]
    headless: bool,

    /// ticks to simulate in headless mode
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// PNG output path for headless mode
    #[arg(long, default_value = "thermarium.png")]
    out: PathBuf,
}

fn parse_scale(s: &str) -> Result<PixelScale, String> {
    let m: usize = s
        .trim_start_matches(['x', 'X'])
        .parse()
        .map_err(|_| format!("not a scale: {s}"))?;
    PixelScale::from_multiplier(m).ok_or_else(|| format!("scale must be 1, 2, 4 or 8, got {m}"))
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("window: {0}")]
    Window(#[from] minifb::Error),
    #[error("signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Apply command-line overrides on top of the file configuration.
fn apply_overrides(cfg: &mut Config, args: &Args) {
    if let Some(gamma) = args.gamma {
        cfg.physics.gamma = gamma;
    }
    if let Some(scale) = args.scale {
        cfg.display.scale = scale;
    }
}

/// Convert RGBA bytes to minifb's 0RGB words.
fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (dst, px) in out.iter_mut().zip(rgba.chunks_exact(4)) {
        *dst = (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32;
    }
}

fn format_status(active: &SolverParams, pending: &SolverParams, fps: u32) -> String {
    let mut s = format!(
        "thermarium | gamma={:.3} scale={} mult={:.1} init={} {} | {fps} fps",
        active.gamma,
        active.scale.label(),
        active.heat_multiplier,
        active.init.label(),
        active.scheme.label(),
    );
    if pending != active {
        s.push_str(&format!(
            " | next: gamma={:.3} scale={} init={} (r=reset)",
            pending.gamma,
            pending.scale.label(),
            pending.init.label(),
        ));
    }
    s
}

/// Pointer position in the one-based pixel convention the mapper expects.
/// minifb reports zero-based window pixels and `None` outside the window.
fn pointer_position(window: &Window) -> Option<(f64, f64)> {
    window
        .get_mouse_pos(MouseMode::Discard)
        .map(|(x, y)| (x as f64 + 1.0, y as f64 + 1.0))
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let mut cfg = config::load(&args.config);
    apply_overrides(&mut cfg, &args);

    let result = cfg.validate().map_err(AppError::from).and_then(|()| {
        if args.headless {
            run_headless(&cfg, args.frames, &args.out)
        } else {
            run_gui(&cfg)
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Window frame cap: fast enough for both cadences to be polled at their
/// own rate.
fn loop_fps(cfg: &Config) -> usize {
    cfg.display.target_fps.max(cfg.display.inject_hz) as usize
}

fn run_gui(cfg: &Config) -> Result<(), AppError> {
    let (mut width, mut height) = (cfg.display.width, cfg.display.height);
    let mut pending = cfg.solver_params();
    let mut session = SimulationSession::new(width, height, pending.clone())?;

    let mut window = Window::new(
        "thermarium",
        width,
        height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(loop_fps(cfg));

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    let start = Instant::now();
    let mut animation = Cadence::from_hz(cfg.display.target_fps, start);
    let mut injection = Cadence::from_hz(cfg.display.inject_hz, start);
    info!(
        frame_ms = animation.interval().as_secs_f64() * 1e3,
        inject_ms = injection.interval().as_secs_f64() * 1e3,
        "window open"
    );
    let mut fps = FpsCounter::new(start);
    let mut display_fps = 0;
    let mut pointer = PointerTracker::new();
    let mut framebuf = vec![0u32; width * height];
    let mut title = String::new();
    let mut rejected_size = None;

    while window.is_open() && running.load(Ordering::SeqCst) {
        // --- Keyboard ---
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            pending.scale = pending.scale.next();
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            pending.gamma += GAMMA_STEP;
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            pending.gamma = (pending.gamma - GAMMA_STEP).max(0.0);
        }
        if window.is_key_pressed(Key::I, KeyRepeat::No) {
            pending.init = pending.init.toggle();
        }
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            session.reset(pending.clone())?;
        }

        // --- Window size ---
        let size = window.get_size();
        if size != (width, height) && size.0 > 0 && size.1 > 0 && rejected_size != Some(size) {
            match session.resize(size.0, size.1) {
                Ok(()) => {
                    (width, height) = size;
                    framebuf = vec![0u32; width * height];
                    rejected_size = None;
                }
                Err(e) => {
                    warn!(width = size.0, height = size.1, error = %e, "resize rejected");
                    rejected_size = Some(size);
                }
            }
        }

        // --- Pointer ---
        pointer.sample(pointer_position(&window), window.get_mouse_down(MouseButton::Left));

        let now = Instant::now();
        let injections = injection.due(now);
        if let Some((x, y)) = pointer.injection_point() {
            for _ in 0..injections {
                session.inject_at(x, y);
            }
        }
        if animation.poll(now) {
            session.tick()?;
        }

        rgba_to_argb(session.target().pixels(), &mut framebuf);
        window.update_with_buffer(&framebuf, width, height)?;

        if let Some(f) = fps.frame(now) {
            display_fps = f;
            debug!(fps = f, steps = session.steps(), "frame rate");
        }
        let status = format_status(session.params(), &pending, display_fps);
        if status != title {
            window.set_title(&status);
            title = status;
        }
    }

    info!(steps = session.steps(), "shutting down");
    Ok(())
}

fn run_headless(cfg: &Config, frames: u64, out: &Path) -> Result<(), AppError> {
    let mut session = SimulationSession::new(cfg.display.width, cfg.display.height, cfg.solver_params())?;
    for _ in 0..frames {
        session.tick()?;
    }
    snapshot::save_png(session.target(), out)?;
    info!(
        path = %out.display(),
        steps = session.steps(),
        heat = session.grid().total_heat(),
        "snapshot written"
    );
    Ok(())
}
