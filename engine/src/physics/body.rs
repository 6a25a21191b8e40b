//! Rigid bodies and sphere colliders
//!
//! Plain data records describing one simulated object. Bodies are created
//! from a [`RigidBodyDesc`] and gain mass from the [`ColliderDesc`]s attached
//! to them; both descriptions are validated up front so the world never has
//! to deal with negative radii or NaN damping mid-step.
//!
//! # Example
//!
//! ```ignore
//! use particle_field_engine::physics::{RigidBodyDesc, ColliderDesc, CombineRule};
//! use glam::Vec3;
//!
//! let body = RigidBodyDesc::dynamic()
//!     .with_translation(Vec3::new(0.0, 2.0, 0.0))
//!     .with_linear_damping(1.0)
//!     .with_angular_damping(0.6);
//! let ball = ColliderDesc::ball(0.17)
//!     .with_density(0.595)
//!     .with_restitution(0.8)
//!     .with_restitution_combine_rule(CombineRule::Max);
//! ```

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::error::{PhysicsError, PhysicsResult};
use super::types::{BodyHandle, BodyKind, ColliderHandle};

// ============================================================================
// COMBINE RULES
// ============================================================================

/// How two colliders' coefficients (restitution, friction) are merged.
///
/// Variants are ordered by precedence: when the two colliders in a contact
/// ask for different rules, the later one in this list wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum CombineRule {
    /// Arithmetic mean of both coefficients.
    #[default]
    Average,
    /// Smaller coefficient.
    Min,
    /// Product of both coefficients.
    Multiply,
    /// Larger coefficient; the bouncier body dominates.
    Max,
}

impl CombineRule {
    /// Apply this rule to a pair of coefficients.
    #[inline]
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            CombineRule::Average => (a + b) * 0.5,
            CombineRule::Min => a.min(b),
            CombineRule::Multiply => a * b,
            CombineRule::Max => a.max(b),
        }
    }

    /// Pick the effective rule for a contact between two colliders.
    #[inline]
    pub fn resolve(a: CombineRule, b: CombineRule) -> CombineRule {
        a.max(b)
    }
}

// ============================================================================
// DESCRIPTIONS
// ============================================================================

/// Creation parameters for a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyDesc {
    pub kind: BodyKind,
    /// Initial world-space translation
    pub translation: Vec3,
    /// Initial orientation
    pub rotation: Quat,
    /// Linear velocity decay rate (1/s). Ignored for kinematic bodies.
    pub linear_damping: f32,
    /// Angular velocity decay rate (1/s). Ignored for kinematic bodies.
    pub angular_damping: f32,
}

impl RigidBodyDesc {
    /// Description of a dynamic body at the origin with no damping.
    pub fn dynamic() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Description of a position-based kinematic body at the origin.
    pub fn kinematic_position_based() -> Self {
        Self {
            kind: BodyKind::KinematicPositionBased,
            ..Self::dynamic()
        }
    }

    /// Initial position.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Initial orientation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Linear velocity decay per second.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Angular velocity decay per second.
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    /// Reject non-finite placement and negative or non-finite damping.
    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.translation.is_finite() {
            return Err(invalid_body(format!(
                "translation must be finite, got {}",
                self.translation
            )));
        }
        if !self.rotation.is_finite() || !self.rotation.is_normalized() {
            return Err(invalid_body("rotation must be a finite unit quaternion".into()));
        }
        if !(self.linear_damping.is_finite() && self.linear_damping >= 0.0) {
            return Err(invalid_body(format!(
                "linear damping must be >= 0, got {}",
                self.linear_damping
            )));
        }
        if !(self.angular_damping.is_finite() && self.angular_damping >= 0.0) {
            return Err(invalid_body(format!(
                "angular damping must be >= 0, got {}",
                self.angular_damping
            )));
        }
        Ok(())
    }
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self::dynamic()
    }
}

/// Creation parameters for a sphere collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDesc {
    /// Sphere radius (meters)
    pub radius: f32,
    /// Mass per unit volume; the parent body's mass is derived from it
    pub density: f32,
    /// Bounciness in [0, 1]
    pub restitution: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    pub restitution_combine_rule: CombineRule,
    pub friction_combine_rule: CombineRule,
}

impl ColliderDesc {
    /// Sphere collider with unit density, no restitution and the default friction.
    ///
    /// Restitution combines with `Max` so the bouncier collider decides.
    pub fn ball(radius: f32) -> Self {
        Self {
            radius,
            density: 1.0,
            restitution: 0.0,
            friction: 0.5,
            restitution_combine_rule: CombineRule::Max,
            friction_combine_rule: CombineRule::Average,
        }
    }

    /// Mass per unit volume.
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Bounciness in [0, 1].
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Coulomb friction coefficient.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// How this collider's restitution combines with another's.
    pub fn with_restitution_combine_rule(mut self, rule: CombineRule) -> Self {
        self.restitution_combine_rule = rule;
        self
    }

    /// How this collider's friction combines with another's.
    pub fn with_friction_combine_rule(mut self, rule: CombineRule) -> Self {
        self.friction_combine_rule = rule;
        self
    }

    /// Mass of a solid sphere with this radius and density.
    pub fn mass(&self) -> f32 {
        self.density * sphere_volume(self.radius)
    }

    /// Reject non-positive radii, negative density and out-of-range coefficients.
    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(invalid_collider(format!(
                "radius must be > 0, got {}",
                self.radius
            )));
        }
        if !(self.density.is_finite() && self.density >= 0.0) {
            return Err(invalid_collider(format!(
                "density must be >= 0, got {}",
                self.density
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(invalid_collider(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(invalid_collider(format!(
                "friction must be >= 0, got {}",
                self.friction
            )));
        }
        Ok(())
    }
}

fn invalid_body(reason: String) -> PhysicsError {
    PhysicsError::InvalidBodyDesc { reason }
}

fn invalid_collider(reason: String) -> PhysicsError {
    PhysicsError::InvalidColliderDesc { reason }
}

/// Volume of a sphere: 4/3 * PI * r^3
#[inline]
pub fn sphere_volume(radius: f32) -> f32 {
    4.0 / 3.0 * std::f32::consts::PI * radius * radius * radius
}

// ============================================================================
// RECORDS
// ============================================================================

/// Sphere collider attached to a body. Immutable after creation.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub(crate) handle: ColliderHandle,
    pub(crate) parent: BodyHandle,
    pub(crate) radius: f32,
    pub(crate) density: f32,
    pub(crate) restitution: f32,
    pub(crate) friction: f32,
    pub(crate) restitution_combine_rule: CombineRule,
    pub(crate) friction_combine_rule: CombineRule,
}

impl Collider {
    pub(crate) fn from_desc(
        handle: ColliderHandle,
        parent: BodyHandle,
        desc: &ColliderDesc,
    ) -> Self {
        Self {
            handle,
            parent,
            radius: desc.radius,
            density: desc.density,
            restitution: desc.restitution,
            friction: desc.friction,
            restitution_combine_rule: desc.restitution_combine_rule,
            friction_combine_rule: desc.friction_combine_rule,
        }
    }

    /// Handle of this collider.
    pub fn handle(&self) -> ColliderHandle {
        self.handle
    }

    /// Body the collider is attached to.
    pub fn parent(&self) -> BodyHandle {
        self.parent
    }

    /// Sphere radius (meters).
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass per unit volume.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Bounciness in [0, 1].
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Coulomb friction coefficient.
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Restitution combine rule.
    pub fn restitution_combine_rule(&self) -> CombineRule {
        self.restitution_combine_rule
    }

    /// Friction combine rule.
    pub fn friction_combine_rule(&self) -> CombineRule {
        self.friction_combine_rule
    }
}

/// Canonical state of one simulated body.
///
/// Owned by the world; everything outside the physics module sees it through
/// shared references or copies.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub(crate) handle: BodyHandle,
    pub(crate) kind: BodyKind,
    pub(crate) translation: Vec3,
    pub(crate) rotation: Quat,
    pub(crate) linvel: Vec3,
    pub(crate) angvel: Vec3,
    /// User force, persists across steps until reset
    pub(crate) force: Vec3,
    /// Target consumed by the next step (kinematic only)
    pub(crate) next_translation: Option<Vec3>,
    pub(crate) linear_damping: f32,
    pub(crate) angular_damping: f32,
    pub(crate) mass: f32,
    pub(crate) inv_mass: f32,
    /// Scalar inverse inertia; every shape is a sphere, so the tensor is isotropic
    pub(crate) inv_inertia: f32,
    inertia: f32,
    pub(crate) colliders: Vec<ColliderHandle>,
}

impl RigidBody {
    pub(crate) fn from_desc(handle: BodyHandle, desc: &RigidBodyDesc) -> Self {
        let (linear_damping, angular_damping) = match desc.kind {
            BodyKind::Dynamic => (desc.linear_damping, desc.angular_damping),
            BodyKind::KinematicPositionBased => (0.0, 0.0),
        };
        Self {
            handle,
            kind: desc.kind,
            translation: desc.translation,
            rotation: desc.rotation,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            force: Vec3::ZERO,
            next_translation: None,
            linear_damping,
            angular_damping,
            mass: 0.0,
            inv_mass: 0.0,
            inv_inertia: 0.0,
            inertia: 0.0,
            colliders: Vec::new(),
        }
    }

    /// Fold a newly attached sphere collider into the mass properties.
    ///
    /// Kinematic bodies keep zero inverse mass whatever their density.
    pub(crate) fn attach_collider(&mut self, collider: &Collider) {
        self.colliders.push(collider.handle);

        let mass = collider.density * sphere_volume(collider.radius);
        self.mass += mass;
        self.inertia += 0.4 * mass * collider.radius * collider.radius;

        if self.kind.is_dynamic() {
            self.inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
            self.inv_inertia = if self.inertia > 0.0 { 1.0 / self.inertia } else { 0.0 };
        }
    }

    /// Handle of this body.
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Dynamic or kinematic.
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Position as of the last step.
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Orientation as of the last step.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Linear velocity (m/s).
    pub fn linvel(&self) -> Vec3 {
        self.linvel
    }

    /// Angular velocity (rad/s, scaled axis).
    pub fn angvel(&self) -> Vec3 {
        self.angvel
    }

    /// Force currently applied by user code (not contact impulses).
    pub fn user_force(&self) -> Vec3 {
        self.force
    }

    /// Pending kinematic target, consumed by the next step.
    pub fn next_translation(&self) -> Option<Vec3> {
        self.next_translation
    }

    /// Linear damping coefficient.
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Angular damping coefficient.
    pub fn angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Total mass of the attached colliders (kg).
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass; zero for kinematic bodies.
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Colliders attached to this body.
    pub fn colliders(&self) -> &[ColliderHandle] {
        &self.colliders
    }

    /// Kinetic energy, translational plus rotational.
    pub fn kinetic_energy(&self) -> f32 {
        if self.kind.is_kinematic() {
            return 0.0;
        }
        0.5 * self.mass * self.linvel.length_squared()
            + 0.5 * self.inertia * self.angvel.length_squared()
    }

    /// Whether every state component is finite.
    pub(crate) fn is_finite(&self) -> bool {
        self.translation.is_finite()
            && self.rotation.is_finite()
            && self.linvel.is_finite()
            && self.angvel.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_rule_values() {
        assert_eq!(CombineRule::Average.combine(0.2, 0.8), 0.5);
        assert_eq!(CombineRule::Min.combine(0.2, 0.8), 0.2);
        assert!((CombineRule::Multiply.combine(0.2, 0.8) - 0.16).abs() < 1e-6);
        assert_eq!(CombineRule::Max.combine(0.2, 0.8), 0.8);
    }

    #[test]
    fn test_combine_rule_precedence() {
        assert_eq!(
            CombineRule::resolve(CombineRule::Average, CombineRule::Max),
            CombineRule::Max
        );
        assert_eq!(
            CombineRule::resolve(CombineRule::Multiply, CombineRule::Min),
            CombineRule::Multiply
        );
        assert_eq!(
            CombineRule::resolve(CombineRule::Average, CombineRule::Average),
            CombineRule::Average
        );
    }

    #[test]
    fn test_body_desc_rejects_negative_damping() {
        let desc = RigidBodyDesc::dynamic().with_linear_damping(-1.0);
        assert!(matches!(
            desc.validate(),
            Err(PhysicsError::InvalidBodyDesc { .. })
        ));

        let desc = RigidBodyDesc::dynamic().with_angular_damping(f32::NAN);
        assert!(desc.validate().is_err());
    }

    #[test]
    fn test_body_desc_rejects_nan_translation() {
        let desc = RigidBodyDesc::dynamic().with_translation(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(desc.validate().is_err());
    }

    #[test]
    fn test_collider_desc_validation() {
        assert!(ColliderDesc::ball(0.5).validate().is_ok());
        assert!(ColliderDesc::ball(-0.5).validate().is_err());
        assert!(ColliderDesc::ball(0.0).validate().is_err());
        assert!(ColliderDesc::ball(0.5).with_density(-1.0).validate().is_err());
        assert!(ColliderDesc::ball(0.5).with_restitution(1.5).validate().is_err());
        assert!(ColliderDesc::ball(0.5).with_friction(-0.1).validate().is_err());
    }

    #[test]
    fn test_sphere_mass() {
        let desc = ColliderDesc::ball(1.0).with_density(3.0);
        let expected = 3.0 * 4.0 / 3.0 * std::f32::consts::PI;
        assert!((desc.mass() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_kinematic_body_has_no_inverse_mass() {
        let desc = RigidBodyDesc::kinematic_position_based().with_linear_damping(5.0);
        let mut body = RigidBody::from_desc(BodyHandle(0), &desc);
        let collider = Collider::from_desc(
            ColliderHandle(0),
            BodyHandle(0),
            &ColliderDesc::ball(0.45).with_density(10.0),
        );
        body.attach_collider(&collider);

        assert!(body.mass() > 0.0);
        assert_eq!(body.inv_mass(), 0.0);
        assert_eq!(body.linear_damping(), 0.0);
    }

    #[test]
    fn test_dynamic_body_mass_from_collider() {
        let mut body = RigidBody::from_desc(BodyHandle(0), &RigidBodyDesc::dynamic());
        let desc = ColliderDesc::ball(0.5).with_density(2.0);
        let collider = Collider::from_desc(ColliderHandle(0), BodyHandle(0), &desc);
        body.attach_collider(&collider);

        assert!((body.mass() - desc.mass()).abs() < 1e-6);
        assert!((body.inv_mass() - 1.0 / desc.mass()).abs() < 1e-4);
    }
}
