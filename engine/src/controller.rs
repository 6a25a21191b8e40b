//! Field Controller
//!
//! Owns one complete scene and runs the per-frame ordering:
//!
//! 1. Consume pointer clicks (each one cycles the accent colour)
//! 2. Project the pointer onto the plane and hand the target to the probe
//! 3. Recompute every particle's central force
//! 4. Step the world once
//! 5. Read back transforms
//!
//! The host calls [`FieldController::frame`] once per display refresh and
//! draws the [`RenderFrame`] from [`FieldController::snapshot`].

use std::time::{SystemTime, UNIX_EPOCH};

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::camera::PointerProjector;
use crate::config::FieldConfig;
use crate::error::FieldResult;
use crate::field::{ACCENT_COLORS, ParticleField, PointerProbe};
use crate::input::{MouseButton, PointerState};
use crate::physics::SimulationWorld;
use crate::render::RenderFrame;

/// Diagnostics for one completed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frames completed, this one included
    pub frame: u64,
    /// Simulated seconds since creation
    pub elapsed: f64,
    pub kinetic_energy: f32,
    /// Farthest particle from the field center
    pub max_distance: f32,
    pub probe_position: Vec3,
    /// Target the probe was sent to this frame
    pub probe_target: Vec3,
}

/// A running particle field scene.
#[derive(Debug)]
pub struct FieldController {
    config: FieldConfig,
    world: SimulationWorld,
    field: ParticleField,
    probe: PointerProbe,
    projector: PointerProjector,
    pointer: PointerState,
    accent: usize,
    frame: u64,
    seed: Option<u64>,
}

impl FieldController {
    /// Build the scene described by `config`.
    ///
    /// Placement uses `config.seed`, or a seed taken from the system clock
    /// when it is unset. The seed actually used is available from
    /// [`seed`](Self::seed).
    pub fn new(config: &FieldConfig) -> FieldResult<Self> {
        let seed = config.seed.unwrap_or_else(time_seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut controller = Self::with_rng(config, &mut rng)?;
        controller.seed = Some(seed);
        info!(seed, "field controller ready");
        Ok(controller)
    }

    /// Build the scene drawing placement from a caller-supplied RNG.
    pub fn with_rng<R: Rng>(config: &FieldConfig, rng: &mut R) -> FieldResult<Self> {
        config.validate()?;

        let mut world = SimulationWorld::new(config.world);
        let field = ParticleField::initialize(
            &mut world,
            config.particle_count,
            &config.placement,
            config.preset,
            rng,
        )?;
        let projector = PointerProjector::new(config.camera, config.plane_z);
        let probe = PointerProbe::new(&mut world, &config.probe, projector.last_target())?;

        Ok(Self {
            config: *config,
            world,
            field,
            probe,
            projector,
            pointer: PointerState::new(),
            accent: 0,
            frame: 0,
            seed: config.seed,
        })
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Set the pointer from pixel coordinates in a `width` x `height` viewport.
    pub fn set_pointer_pixels(&mut self, x: f64, y: f64, width: u32, height: u32) {
        self.pointer.set_position_pixels(x, y, width, height);
    }

    /// Set the pointer directly in normalized device coordinates.
    pub fn set_pointer_ndc(&mut self, ndc: Vec2) {
        self.pointer.set_ndc(ndc);
    }

    /// Forward a button event; a left press counts as a click.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        self.pointer.set_button(button, pressed);
    }

    /// Register a full left click (press and release).
    pub fn click(&mut self) {
        self.pointer.set_button(MouseButton::Left, true);
        self.pointer.set_button(MouseButton::Left, false);
    }

    /// Resize the viewport; only the camera aspect changes.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.projector.set_viewport(width, height);
    }

    /// Advance the accent colour and return the new index.
    pub fn cycle_accent(&mut self) -> usize {
        self.accent = (self.accent + 1) % ACCENT_COLORS.len();
        debug!(accent = self.accent, "accent cycled");
        self.accent
    }

    // ========================================================================
    // FRAME
    // ========================================================================

    /// Run one frame.
    ///
    /// # Arguments
    /// * `delta_time` - Step length in seconds; the world's timestep when `None`
    ///
    /// # Errors
    /// Fails only if the physics backend rejects the step. The scene is left
    /// as the backend left it; the caller decides whether to stop.
    pub fn frame(&mut self, delta_time: Option<f32>) -> FieldResult<FrameStats> {
        for _ in 0..self.pointer.take_clicks() {
            self.cycle_accent();
        }

        let target = self.projector.project(self.pointer.ndc);
        self.probe.update(&mut self.world, target)?;
        self.field.update(&mut self.world)?;

        self.world.step(delta_time)?;

        self.field.sync(&self.world)?;
        self.probe.sync(&self.world)?;
        self.frame += 1;

        let stats = FrameStats {
            frame: self.frame,
            elapsed: self.world.elapsed(),
            kinetic_energy: self.world.kinetic_energy(),
            max_distance: self.field.max_distance(),
            probe_position: self.probe.position(),
            probe_target: target,
        };
        trace!(?stats, "frame complete");
        Ok(stats)
    }

    /// Copy of the current scene for drawing.
    pub fn snapshot(&self) -> RenderFrame {
        RenderFrame::capture(self.frame, self.accent, &self.field, &self.probe)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Config the scene was built from.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Physics world.
    pub fn world(&self) -> &SimulationWorld {
        &self.world
    }

    /// Dynamic particles.
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Pointer-driven kinematic probe.
    pub fn probe(&self) -> &PointerProbe {
        &self.probe
    }

    /// Pointer-to-plane projector.
    pub fn projector(&self) -> &PointerProjector {
        &self.projector
    }

    /// Current pointer state.
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Active accent colour index.
    pub fn accent(&self) -> usize {
        self.accent
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Placement seed, when known.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Nanoseconds since the Unix epoch, folded to 64 bits.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
