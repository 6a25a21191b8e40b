//! Particle field
//!
//! The population of dynamic spheres. Each particle is a plain record
//! (body handle plus a cached transform); the world keeps the canonical
//! state and the field only borrows it to create, push and read bodies.
//!
//! # Frame contract
//!
//! [`ParticleField::update`] must run once per frame, for every particle,
//! before [`SimulationWorld::step`]. Each particle's force is reset and
//! re-derived from its current position, so forces never pile up across
//! frames and calling `update` twice without a step changes nothing.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, FieldResult};
use crate::physics::{
    BodyHandle, ColliderDesc, CombineRule, PhysicsResult, RigidBodyDesc, SimulationWorld,
};

use super::force_field::ForceField;
use super::preset::{MATERIAL_PALETTE, MaterialClass, MaterialPolicy, ParticlePreset};

/// Box particles are spawned in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Half size of the box along each axis (meters)
    pub half_extents: Vec3,
    /// Center of the box
    pub offset: Vec3,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec3::splat(1.5),
            offset: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}

impl PlacementConfig {
    /// Reject boxes that are negative, non-finite or too wide to sample.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.half_extents.is_finite() && self.half_extents.min_element() >= 0.0) {
            return Err(ConfigError::invalid(format!(
                "placement half extents must be >= 0, got {}",
                self.half_extents
            )));
        }
        // Each axis samples a span of 2h, scaled up slightly by the sampler
        if !(self.half_extents * 4.0).is_finite() {
            return Err(ConfigError::invalid(format!(
                "placement half extents {} are too large to sample",
                self.half_extents
            )));
        }
        if !(self.offset.is_finite() && (self.offset.abs() + self.half_extents).is_finite()) {
            return Err(ConfigError::invalid("placement box must lie within finite space"));
        }
        Ok(())
    }

    /// Uniform random point inside the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let h = self.half_extents;
        self.offset
            + Vec3::new(
                rng.gen_range(-h.x..=h.x),
                rng.gen_range(-h.y..=h.y),
                rng.gen_range(-h.z..=h.z),
            )
    }
}

/// One simulated sphere as seen by the field and the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub handle: BodyHandle,
    /// Collider radius; also the render scale
    pub radius: f32,
    pub material: MaterialClass,
    /// Position read back after the last step
    pub position: Vec3,
    /// Orientation read back after the last step
    pub rotation: Quat,
}

/// Reset a particle's force and apply the field's pull for the coming step.
///
/// Returns the force that was applied.
pub fn apply_field_force(
    world: &mut SimulationWorld,
    particle: &Particle,
    field: &ForceField,
) -> PhysicsResult<Vec3> {
    world.reset_forces(particle.handle)?;
    let position = world.query_translation(particle.handle)?;
    let force = field.compute(position);
    world.add_force(particle.handle, force)?;
    Ok(force)
}

/// Fixed-size set of dynamic spheres pulled toward the field center.
#[derive(Debug, Clone)]
pub struct ParticleField {
    preset: ParticlePreset,
    force_field: ForceField,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Create `count` particles at random positions inside `placement`.
    ///
    /// Radii are drawn uniformly from the preset's range and density follows
    /// from radius through the preset's relation. The population size is
    /// fixed from here on.
    ///
    /// # Errors
    /// A malformed preset or placement is rejected before any body is created.
    pub fn initialize<R: Rng>(
        world: &mut SimulationWorld,
        count: usize,
        placement: &PlacementConfig,
        preset: ParticlePreset,
        rng: &mut R,
    ) -> FieldResult<Self> {
        preset.validate()?;
        placement.validate()?;

        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let position = placement.sample(rng);
            let radius = rng.gen_range(preset.radius_min..=preset.radius_max);
            let material = match preset.materials {
                MaterialPolicy::Palette => {
                    MaterialClass(rng.gen_range(0..MATERIAL_PALETTE.len()) as u8)
                }
                MaterialPolicy::Uniform(class) => class,
            };

            let handle = world.create_rigid_body(
                RigidBodyDesc::dynamic()
                    .with_translation(position)
                    .with_linear_damping(preset.linear_damping)
                    .with_angular_damping(preset.angular_damping),
            )?;
            world.create_collider(
                handle,
                ColliderDesc::ball(radius)
                    .with_density(preset.density.density(radius))
                    .with_restitution(preset.restitution)
                    .with_restitution_combine_rule(preset.restitution_combine_rule)
                    .with_friction(preset.friction)
                    .with_friction_combine_rule(CombineRule::Average),
            )?;

            debug!(%handle, radius, ?position, "particle created");
            particles.push(Particle {
                handle,
                radius,
                material,
                position,
                rotation: Quat::IDENTITY,
            });
        }

        info!(
            count,
            force_strength = preset.force_strength,
            "particle field initialized"
        );
        Ok(Self {
            preset,
            force_field: preset.force_field(),
            particles,
        })
    }

    /// Re-derive every particle's force from its current position.
    pub fn update(&self, world: &mut SimulationWorld) -> PhysicsResult<()> {
        for particle in &self.particles {
            apply_field_force(world, particle, &self.force_field)?;
        }
        Ok(())
    }

    /// Refresh cached transforms from the world. Call after `step`.
    pub fn sync(&mut self, world: &SimulationWorld) -> PhysicsResult<()> {
        for particle in self.particles.iter_mut() {
            let body = world.body(particle.handle)?;
            particle.position = body.translation();
            particle.rotation = body.rotation();
        }
        Ok(())
    }

    /// Particles in creation order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Preset the field was built from.
    pub fn preset(&self) -> &ParticlePreset {
        &self.preset
    }

    /// Central pull applied on every update.
    pub fn force_field(&self) -> &ForceField {
        &self.force_field
    }

    /// Largest distance of any particle from the field center (cached positions).
    pub fn max_distance(&self) -> f32 {
        self.particles
            .iter()
            .map(|p| p.position.distance(self.force_field.center))
            .fold(0.0, f32::max)
    }
}
