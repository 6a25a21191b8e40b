//! Simulation world
//!
//! Owns every rigid body and collider and is the single source of truth for
//! their position and orientation. Nothing outside this type mutates body
//! state: particles and the probe hold [`BodyHandle`]s and go through the
//! world for every read and write.
//!
//! # Step pipeline
//!
//! 1. Kinematic bodies derive velocity from their pending target
//! 2. Dynamic bodies integrate user forces (semi-implicit Euler) and damping
//! 3. Narrow phase on current positions
//! 4. Sequential impulse velocity solve
//! 5. Position/orientation integration; kinematic bodies land on their target
//! 6. Positional correction of remaining overlap
//! 7. Divergence check
//!
//! There is no gravity unless configured: all directed motion comes from
//! explicit per-body forces or kinematic target setting.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::body::{Collider, ColliderDesc, RigidBody, RigidBodyDesc};
use super::contact::{correct_positions, find_contacts, solve_velocities};
use super::error::{PhysicsError, PhysicsResult};
use super::types::{BodyHandle, ColliderHandle};

/// Global parameters of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Uniform acceleration applied to dynamic bodies (m/s²)
    pub gravity: Vec3,
    /// Step length used when `step` is called without an explicit delta (seconds)
    pub timestep: f32,
    /// Velocity solver passes per step
    pub solver_iterations: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::ZERO,
            timestep: 1.0 / 60.0,
            solver_iterations: 4,
        }
    }
}

/// The physics backend instance.
#[derive(Debug, Default)]
pub struct SimulationWorld {
    config: WorldConfig,
    bodies: Vec<RigidBody>,
    colliders: Vec<Collider>,
    step_count: u64,
    elapsed: f64,
}

impl SimulationWorld {
    /// Create an empty world.
    pub fn new(config: WorldConfig) -> Self {
        debug!(
            timestep = config.timestep,
            iterations = config.solver_iterations,
            "simulation world created"
        );
        Self {
            config,
            ..Default::default()
        }
    }

    /// Settings the world was created with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ========================================================================
    // CREATION
    // ========================================================================

    /// Insert a rigid body and return its handle.
    ///
    /// # Errors
    /// [`PhysicsError::InvalidBodyDesc`] for non-finite placement or negative damping.
    pub fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> PhysicsResult<BodyHandle> {
        desc.validate()?;
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(RigidBody::from_desc(handle, &desc));
        Ok(handle)
    }

    /// Attach a sphere collider to an existing body.
    ///
    /// The body's mass and inertia are recomputed from the collider's density.
    ///
    /// # Errors
    /// [`PhysicsError::UnknownBody`] or [`PhysicsError::InvalidColliderDesc`].
    pub fn create_collider(
        &mut self,
        parent: BodyHandle,
        desc: ColliderDesc,
    ) -> PhysicsResult<ColliderHandle> {
        desc.validate()?;
        let handle = ColliderHandle(self.colliders.len() as u32);
        let collider = Collider::from_desc(handle, parent, &desc);
        self.body_mut(parent)?.attach_collider(&collider);
        self.colliders.push(collider);
        Ok(handle)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Look up a body.
    pub fn body(&self, handle: BodyHandle) -> PhysicsResult<&RigidBody> {
        self.bodies
            .get(handle.index())
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> PhysicsResult<&mut RigidBody> {
        self.bodies
            .get_mut(handle.index())
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Look up a collider.
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle.index())
    }

    /// Current canonical position of a body.
    pub fn query_translation(&self, handle: BodyHandle) -> PhysicsResult<Vec3> {
        self.body(handle).map(RigidBody::translation)
    }

    /// Current canonical orientation of a body.
    pub fn query_rotation(&self, handle: BodyHandle) -> PhysicsResult<Quat> {
        self.body(handle).map(RigidBody::rotation)
    }

    /// All bodies in creation order.
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.iter()
    }

    /// All colliders in creation order.
    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }

    /// Number of bodies in the world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of completed steps.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Total simulated time (seconds).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Sum of kinetic energy over all dynamic bodies.
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(RigidBody::kinetic_energy).sum()
    }

    // ========================================================================
    // FORCES AND TARGETS
    // ========================================================================

    /// Zero the user force on a body.
    pub fn reset_forces(&mut self, handle: BodyHandle) -> PhysicsResult<()> {
        self.body_mut(handle)?.force = Vec3::ZERO;
        Ok(())
    }

    /// Add to the user force on a body.
    ///
    /// The force stays applied on every following step until
    /// [`reset_forces`](Self::reset_forces) is called. Kinematic bodies ignore it.
    pub fn add_force(&mut self, handle: BodyHandle, force: Vec3) -> PhysicsResult<()> {
        let body = self.body_mut(handle)?;
        if body.kind.is_dynamic() {
            body.force += force;
        }
        Ok(())
    }

    /// Set the translation a kinematic body reaches at the end of the next step.
    ///
    /// Has no effect on dynamic bodies.
    pub fn set_next_kinematic_translation(
        &mut self,
        handle: BodyHandle,
        translation: Vec3,
    ) -> PhysicsResult<()> {
        let body = self.body_mut(handle)?;
        if body.kind.is_kinematic() {
            body.next_translation = Some(translation);
        }
        Ok(())
    }

    /// Overwrite a dynamic body's linear velocity.
    pub fn set_linvel(&mut self, handle: BodyHandle, linvel: Vec3) -> PhysicsResult<()> {
        let body = self.body_mut(handle)?;
        if body.kind.is_dynamic() {
            body.linvel = linvel;
        }
        Ok(())
    }

    // ========================================================================
    // STEP
    // ========================================================================

    /// Advance the simulation by one step.
    ///
    /// # Arguments
    /// * `delta_time` - Step length in seconds; the configured timestep when `None`
    ///
    /// # Errors
    /// [`PhysicsError::InvalidTimestep`] for a non-positive delta, and
    /// [`PhysicsError::Diverged`] when any body ends the step with non-finite state.
    pub fn step(&mut self, delta_time: Option<f32>) -> PhysicsResult<()> {
        let dt = delta_time.unwrap_or(self.config.timestep);
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        let gravity = self.config.gravity;

        for body in self.bodies.iter_mut() {
            if body.kind.is_kinematic() {
                body.linvel = match body.next_translation {
                    Some(target) => (target - body.translation) / dt,
                    None => Vec3::ZERO,
                };
                continue;
            }
            if body.inv_mass > 0.0 {
                body.linvel += (gravity + body.force * body.inv_mass) * dt;
            }
            body.linvel *= 1.0 / (1.0 + dt * body.linear_damping);
            body.angvel *= 1.0 / (1.0 + dt * body.angular_damping);
        }

        let contacts = find_contacts(&self.bodies, &self.colliders);
        solve_velocities(&mut self.bodies, &contacts, self.config.solver_iterations);

        for body in self.bodies.iter_mut() {
            if body.kind.is_kinematic() {
                if let Some(target) = body.next_translation.take() {
                    body.translation = target;
                }
                continue;
            }
            body.translation += body.linvel * dt;
            if body.angvel != Vec3::ZERO {
                let spin = Quat::from_scaled_axis(body.angvel * dt);
                body.rotation = (spin * body.rotation).normalize();
            }
        }

        let overlaps = find_contacts(&self.bodies, &self.colliders);
        correct_positions(&mut self.bodies, &overlaps);

        if let Some(body) = self.bodies.iter().find(|b| !b.is_finite()) {
            warn!(body = %body.handle, "non-finite body state after step");
            return Err(PhysicsError::Diverged {
                reason: format!(
                    "{} has translation {} and velocity {}",
                    body.handle, body.translation, body.linvel
                ),
            });
        }

        self.step_count += 1;
        self.elapsed += dt as f64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::CombineRule;

    fn ball(world: &mut SimulationWorld, at: Vec3, radius: f32) -> BodyHandle {
        let handle = world
            .create_rigid_body(RigidBodyDesc::dynamic().with_translation(at))
            .unwrap();
        world.create_collider(handle, ColliderDesc::ball(radius)).unwrap();
        handle
    }

    #[test]
    fn test_world_config_default_has_no_gravity() {
        let config = WorldConfig::default();
        assert_eq!(config.gravity, Vec3::ZERO);
        assert!((config.timestep - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_create_and_query() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let h = ball(&mut world, Vec3::new(1.0, 2.0, 3.0), 0.2);

        assert_eq!(world.body_count(), 1);
        assert_eq!(world.query_translation(h).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.query_rotation(h).unwrap(), Quat::IDENTITY);
    }

    #[test]
    fn test_unknown_handle_is_error() {
        let world = SimulationWorld::new(WorldConfig::default());
        assert_eq!(
            world.query_translation(BodyHandle(7)),
            Err(PhysicsError::UnknownBody(BodyHandle(7)))
        );
    }

    #[test]
    fn test_collider_on_unknown_body_is_error() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let result = world.create_collider(BodyHandle(0), ColliderDesc::ball(0.1));
        assert!(matches!(result, Err(PhysicsError::UnknownBody(_))));
        assert_eq!(world.colliders().count(), 0);
    }

    #[test]
    fn test_body_at_rest_stays_at_rest() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let h = ball(&mut world, Vec3::new(0.0, 5.0, 0.0), 0.2);

        for _ in 0..60 {
            world.step(None).unwrap();
        }
        assert_eq!(world.query_translation(h).unwrap(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(world.step_count(), 60);
        assert!((world.elapsed() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_force_persists_until_reset() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let h = ball(&mut world, Vec3::ZERO, 0.2);
        world.add_force(h, Vec3::new(1.0, 0.0, 0.0)).unwrap();

        world.step(None).unwrap();
        let v1 = world.body(h).unwrap().linvel().x;
        world.step(None).unwrap();
        let v2 = world.body(h).unwrap().linvel().x;
        assert!(v2 > v1);

        world.reset_forces(h).unwrap();
        assert_eq!(world.body(h).unwrap().user_force(), Vec3::ZERO);
        world.step(None).unwrap();
        let v3 = world.body(h).unwrap().linvel().x;
        assert!((v3 - v2).abs() < 1e-6);
    }

    #[test]
    fn test_linear_damping_slows_body() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let h = world
            .create_rigid_body(RigidBodyDesc::dynamic().with_linear_damping(2.0))
            .unwrap();
        world.create_collider(h, ColliderDesc::ball(0.2)).unwrap();
        world.set_linvel(h, Vec3::new(3.0, 0.0, 0.0)).unwrap();

        world.step(None).unwrap();
        let speed = world.body(h).unwrap().linvel().length();
        assert!(speed < 3.0);
        assert!(speed > 2.8);
    }

    #[test]
    fn test_kinematic_reaches_target_in_one_step() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let probe = world
            .create_rigid_body(RigidBodyDesc::kinematic_position_based())
            .unwrap();
        world
            .create_collider(probe, ColliderDesc::ball(0.3).with_density(10.0))
            .unwrap();

        world.add_force(probe, Vec3::new(100.0, 0.0, 0.0)).unwrap();
        world
            .set_next_kinematic_translation(probe, Vec3::new(1.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(world.query_translation(probe).unwrap(), Vec3::ZERO);

        world.step(None).unwrap();
        assert_eq!(world.query_translation(probe).unwrap(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(world.body(probe).unwrap().user_force(), Vec3::ZERO);

        // No new target: stays put
        world.step(None).unwrap();
        assert_eq!(world.query_translation(probe).unwrap(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(world.body(probe).unwrap().linvel(), Vec3::ZERO);
    }

    #[test]
    fn test_invalid_timestep() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        assert_eq!(world.step(Some(0.0)), Err(PhysicsError::InvalidTimestep(0.0)));
        assert!(world.step(Some(f32::NAN)).is_err());
        assert_eq!(world.step_count(), 0);
    }

    #[test]
    fn test_overlapping_bodies_separate() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let a = ball(&mut world, Vec3::ZERO, 0.5);
        let b = ball(&mut world, Vec3::new(0.5, 0.0, 0.0), 0.5);

        for _ in 0..30 {
            world.step(None).unwrap();
        }
        let pa = world.query_translation(a).unwrap();
        let pb = world.query_translation(b).unwrap();
        assert!(pa.distance(pb) > 0.9);
    }

    #[test]
    fn test_restitution_max_rule_in_world() {
        let mut world = SimulationWorld::new(WorldConfig::default());
        let desc = |r: f32| {
            ColliderDesc::ball(0.5)
                .with_restitution(r)
                .with_friction(0.0)
                .with_restitution_combine_rule(CombineRule::Max)
        };
        let a = world
            .create_rigid_body(RigidBodyDesc::dynamic().with_translation(Vec3::new(-0.6, 0.0, 0.0)))
            .unwrap();
        world.create_collider(a, desc(0.2)).unwrap();
        let b = world
            .create_rigid_body(RigidBodyDesc::dynamic().with_translation(Vec3::new(0.6, 0.0, 0.0)))
            .unwrap();
        world.create_collider(b, desc(0.8)).unwrap();
        world.set_linvel(a, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        world.set_linvel(b, Vec3::new(-1.0, 0.0, 0.0)).unwrap();

        for _ in 0..30 {
            world.step(None).unwrap();
        }

        let va = world.body(a).unwrap().linvel();
        let vb = world.body(b).unwrap().linvel();
        let separation = vb.x - va.x;
        assert!((separation - 1.6).abs() < 0.05, "separation {separation}");
    }
}
