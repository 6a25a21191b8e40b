//! Particle Field - Headless Demo
//!
//! Runs a particle field scene without a window. The pointer is scripted to
//! sweep a circle through the swarm; per-frame stats are logged through
//! `tracing`.
//!
//! Run with: `cargo run --bin particle-field -- --preset soft --frames 600`
//!
//! Log level follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use particle_field_engine::{FieldConfig, FieldController};

/// Named scene presets.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// 200 white spheres under a strong, heavily damped pull
    Dense,
    /// 100 bouncy coloured spheres under a weak pull
    Soft,
}

/// Headless particle field runner
#[derive(Parser)]
#[command(name = "particle-field")]
#[command(about = "Simulate a particle field with a scripted pointer", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON scene config; overrides --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene preset used when no config file is given
    #[arg(long, value_enum, default_value = "dense")]
    preset: Preset,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Placement seed
    #[arg(long)]
    seed: Option<u64>,

    /// Radius of the pointer's circular sweep, in device coordinates
    #[arg(long, default_value_t = 0.3)]
    sweep: f32,

    /// Log stats every N frames
    #[arg(long, default_value_t = 60)]
    log_every: u64,

    /// Write the resolved config here before running
    #[arg(long)]
    save_config: Option<PathBuf>,
}

// ============================================================================
// SCRIPTED POINTER
// ============================================================================

/// Pointer position on a circle, one revolution every four seconds.
fn scripted_pointer(elapsed: f64, radius: f32) -> Vec2 {
    let angle = (elapsed * std::f64::consts::TAU / 4.0) as f32;
    Vec2::new(angle.cos(), angle.sin()) * radius
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FieldConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match cli.preset {
            Preset::Dense => FieldConfig::dense_swarm(),
            Preset::Soft => FieldConfig::large_soft(),
        },
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(path) = &cli.save_config {
        config
            .save(path)
            .with_context(|| format!("saving config {}", path.display()))?;
        info!(path = %path.display(), "config written");
    }

    let mut controller = FieldController::new(&config).context("building scene")?;
    info!(
        particles = controller.field().len(),
        seed = ?controller.seed(),
        frames = cli.frames,
        "running"
    );

    let log_every = cli.log_every.max(1);
    let mut elapsed = 0.0;
    for _ in 0..cli.frames {
        controller.set_pointer_ndc(scripted_pointer(elapsed, cli.sweep));
        let stats = controller
            .frame(None)
            .with_context(|| format!("frame {}", controller.frame_count() + 1))?;
        elapsed = stats.elapsed;

        // Click once per revolution to show accent cycling
        if stats.frame % 240 == 0 {
            controller.click();
        }

        if stats.frame % log_every == 0 {
            info!(
                frame = stats.frame,
                elapsed = stats.elapsed,
                energy = stats.kinetic_energy,
                max_distance = stats.max_distance,
                probe = ?stats.probe_position,
                accent = controller.accent(),
                "stats"
            );
        }
        if stats.max_distance > 50.0 {
            warn!(max_distance = stats.max_distance, "particles escaping the field");
        }
    }

    let frame = controller.snapshot();
    info!(
        frame = frame.frame,
        instances = frame.instances().len(),
        "final snapshot"
    );
    Ok(())
}
