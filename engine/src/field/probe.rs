//! Pointer probe
//!
//! A single position-based kinematic sphere that follows the projected
//! pointer. It never receives forces; particles bounce off it as off an
//! immovable obstacle, with the probe's restitution taking part in the
//! combine rule.
//!
//! Tracking policy: a new target is reached exactly at the end of the next
//! step. During that step the backend treats the probe as moving with
//! velocity `(target - position) / dt`, so a fast sweep transfers momentum
//! to the particles it hits instead of teleporting through them.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, FieldResult};
use crate::physics::{
    BodyHandle, ColliderDesc, CombineRule, PhysicsResult, RigidBodyDesc, SimulationWorld,
};

/// Probe sizing and material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Visual radius (meters)
    pub radius: f32,
    /// Collider radius = `radius * collider_scale`
    pub collider_scale: f32,
    pub density: f32,
    pub restitution: f32,
    pub restitution_combine_rule: CombineRule,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::dense_swarm()
    }
}

impl ProbeConfig {
    /// Small glowing probe with a much larger force ball around it.
    pub fn dense_swarm() -> Self {
        Self {
            radius: 0.1,
            collider_scale: 5.0,
            density: 1.0,
            restitution: 0.0,
            restitution_combine_rule: CombineRule::Max,
        }
    }

    /// Large heavy pusher used with the soft preset.
    pub fn large_soft() -> Self {
        Self {
            radius: 0.3,
            collider_scale: 1.5,
            density: 10.0,
            restitution: 0.5,
            restitution_combine_rule: CombineRule::Max,
        }
    }

    /// Radius of the collision sphere.
    pub fn collider_radius(&self) -> f32 {
        self.radius * self.collider_scale
    }

    /// Reject non-positive sizes and out-of-range restitution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::invalid(format!(
                "probe radius must be > 0, got {}",
                self.radius
            )));
        }
        if !(self.collider_scale.is_finite() && self.collider_scale > 0.0) {
            return Err(ConfigError::invalid(format!(
                "probe collider scale must be > 0, got {}",
                self.collider_scale
            )));
        }
        if !(self.density.is_finite() && self.density >= 0.0) {
            return Err(ConfigError::invalid(format!(
                "probe density must be >= 0, got {}",
                self.density
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::invalid(format!(
                "probe restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        Ok(())
    }
}

/// The pointer-driven kinematic body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerProbe {
    handle: BodyHandle,
    radius: f32,
    collider_radius: f32,
    /// Position read back after the last step
    position: Vec3,
    /// Last requested target
    target: Vec3,
}

impl PointerProbe {
    /// Create the probe body at `start`.
    pub fn new(
        world: &mut SimulationWorld,
        config: &ProbeConfig,
        start: Vec3,
    ) -> FieldResult<Self> {
        config.validate()?;

        let handle = world.create_rigid_body(
            RigidBodyDesc::kinematic_position_based().with_translation(start),
        )?;
        let collider_radius = config.collider_radius();
        world.create_collider(
            handle,
            ColliderDesc::ball(collider_radius)
                .with_density(config.density)
                .with_restitution(config.restitution)
                .with_restitution_combine_rule(config.restitution_combine_rule),
        )?;

        debug!(%handle, collider_radius, "pointer probe created");
        Ok(Self {
            handle,
            radius: config.radius,
            collider_radius,
            position: start,
            target: start,
        })
    }

    /// Request that the probe reach `target` by the end of the next step.
    pub fn update(&mut self, world: &mut SimulationWorld, target: Vec3) -> PhysicsResult<()> {
        world.set_next_kinematic_translation(self.handle, target)?;
        self.target = target;
        Ok(())
    }

    /// Refresh the cached position from the world. Call after `step`.
    pub fn sync(&mut self, world: &SimulationWorld) -> PhysicsResult<()> {
        self.position = world.query_translation(self.handle)?;
        Ok(())
    }

    /// Body handle of the probe in the world.
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Position as of the last [`sync`](Self::sync).
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Target passed to the last [`update`](Self::update).
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Visual radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Radius of the collision sphere.
    pub fn collider_radius(&self) -> f32 {
        self.collider_radius
    }
}
