//! Sphere contacts and impulse resolution
//!
//! Narrow phase and velocity solver for the sphere-only world. Every pair of
//! colliders on different bodies is tested (the field is small, a few dozen
//! bodies at most), overlapping pairs become [`Contact`]s, and a sequential
//! impulse solver resolves them.
//!
//! # Response model
//!
//! - Normal impulses are accumulated and clamped to stay non-negative.
//! - Restitution targets a separating speed of `e * approach_speed`, where `e`
//!   comes from the colliders' combined restitution. Slow approaches below
//!   [`RESTITUTION_VELOCITY_THRESHOLD`] are treated as resting contact.
//! - Friction is isotropic Coulomb friction limited by `mu * normal_impulse`.
//!   The tangential impulse acts at the sphere surface, which is what spins
//!   the balls.
//! - Bodies with zero inverse mass (kinematic, or massless) act as immovable
//!   obstacles but still contribute their velocity.
//!
//! Penetration left after integration is removed by [`correct_positions`].

use glam::Vec3;

use super::body::{Collider, CombineRule, RigidBody};

/// Approach speeds below this are resolved without bounce (m/s).
pub const RESTITUTION_VELOCITY_THRESHOLD: f32 = 0.1;

/// Penetration tolerated without positional correction (meters).
pub const PENETRATION_SLOP: f32 = 0.005;

/// Fraction of the remaining penetration removed per step.
pub const POSITION_CORRECTION_FACTOR: f32 = 0.4;

/// An overlapping pair of sphere colliders.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Index of the first body in the world's body table
    pub body_a: usize,
    /// Index of the second body
    pub body_b: usize,
    /// Unit normal pointing from A to B
    pub normal: Vec3,
    /// Overlap depth (meters, positive when penetrating)
    pub depth: f32,
    pub radius_a: f32,
    pub radius_b: f32,
    /// Combined restitution for this pair
    pub restitution: f32,
    /// Combined friction for this pair
    pub friction: f32,
}

/// Find every overlapping collider pair.
///
/// Pairs on the same body and pairs where neither body can move are skipped.
pub fn find_contacts(bodies: &[RigidBody], colliders: &[Collider]) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for (i, ca) in colliders.iter().enumerate() {
        for cb in &colliders[i + 1..] {
            let a = ca.parent.index();
            let b = cb.parent.index();
            if a == b {
                continue;
            }
            let (body_a, body_b) = (&bodies[a], &bodies[b]);
            if body_a.inv_mass == 0.0 && body_b.inv_mass == 0.0 {
                continue;
            }

            let contact = sphere_sphere(a, body_a.translation, ca, b, body_b.translation, cb);
            if let Some(contact) = contact {
                contacts.push(contact);
            }
        }
    }

    contacts
}

fn sphere_sphere(
    a: usize,
    pos_a: Vec3,
    ca: &Collider,
    b: usize,
    pos_b: Vec3,
    cb: &Collider,
) -> Option<Contact> {
    let delta = pos_b - pos_a;
    let radii = ca.radius + cb.radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= radii * radii {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Coincident centers: any direction separates them
    let normal = if dist > 1e-6 { delta / dist } else { Vec3::Y };

    let restitution_rule =
        CombineRule::resolve(ca.restitution_combine_rule, cb.restitution_combine_rule);
    let friction_rule = CombineRule::resolve(ca.friction_combine_rule, cb.friction_combine_rule);

    Some(Contact {
        body_a: a,
        body_b: b,
        normal,
        depth: radii - dist,
        radius_a: ca.radius,
        radius_b: cb.radius,
        restitution: restitution_rule.combine(ca.restitution, cb.restitution),
        friction: friction_rule.combine(ca.friction, cb.friction),
    })
}

/// Per-contact solver state.
struct ContactConstraint {
    contact: Contact,
    /// Contact point offsets from each body's center
    r_a: Vec3,
    r_b: Vec3,
    normal_mass: f32,
    tangent_mass: f32,
    target_normal_velocity: f32,
    normal_impulse: f32,
    tangent_impulse: Vec3,
}

/// Relative velocity of B with respect to A at the contact point.
#[inline]
fn relative_velocity(bodies: &[RigidBody], c: &ContactConstraint) -> Vec3 {
    let a = &bodies[c.contact.body_a];
    let b = &bodies[c.contact.body_b];
    (b.linvel + b.angvel.cross(c.r_b)) - (a.linvel + a.angvel.cross(c.r_a))
}

/// Apply `impulse` to B and `-impulse` to A at the contact point.
#[inline]
fn apply_impulse(bodies: &mut [RigidBody], c: &ContactConstraint, impulse: Vec3) {
    let a = &mut bodies[c.contact.body_a];
    a.linvel -= impulse * a.inv_mass;
    a.angvel -= c.r_a.cross(impulse) * a.inv_inertia;

    let b = &mut bodies[c.contact.body_b];
    b.linvel += impulse * b.inv_mass;
    b.angvel += c.r_b.cross(impulse) * b.inv_inertia;
}

/// Resolve contact velocities with sequential impulses.
///
/// # Arguments
/// * `bodies` - Body table; velocities are updated in place
/// * `contacts` - Contacts found at the start of the step
/// * `iterations` - Solver passes over all contacts (at least one is run)
pub fn solve_velocities(bodies: &mut [RigidBody], contacts: &[Contact], iterations: u32) {
    if contacts.is_empty() {
        return;
    }

    let mut constraints: Vec<ContactConstraint> = contacts
        .iter()
        .filter_map(|contact| {
            let a = &bodies[contact.body_a];
            let b = &bodies[contact.body_b];

            let inv_mass_sum = a.inv_mass + b.inv_mass;
            if inv_mass_sum <= 0.0 {
                return None;
            }

            let r_a = contact.normal * contact.radius_a;
            let r_b = -contact.normal * contact.radius_b;
            // r is parallel to the normal, so rotation only enters the tangent mass
            let tangent_k = inv_mass_sum
                + a.inv_inertia * contact.radius_a * contact.radius_a
                + b.inv_inertia * contact.radius_b * contact.radius_b;

            let mut constraint = ContactConstraint {
                contact: *contact,
                r_a,
                r_b,
                normal_mass: 1.0 / inv_mass_sum,
                tangent_mass: 1.0 / tangent_k,
                target_normal_velocity: 0.0,
                normal_impulse: 0.0,
                tangent_impulse: Vec3::ZERO,
            };

            let approach = relative_velocity(bodies, &constraint).dot(contact.normal);
            if approach < -RESTITUTION_VELOCITY_THRESHOLD {
                constraint.target_normal_velocity = -contact.restitution * approach;
            }
            Some(constraint)
        })
        .collect();

    for _ in 0..iterations.max(1) {
        for c in constraints.iter_mut() {
            let normal = c.contact.normal;

            // Normal
            let vn = relative_velocity(bodies, c).dot(normal);
            let lambda = (c.target_normal_velocity - vn) * c.normal_mass;
            let accumulated = (c.normal_impulse + lambda).max(0.0);
            let applied = accumulated - c.normal_impulse;
            c.normal_impulse = accumulated;
            if applied != 0.0 {
                apply_impulse(bodies, c, normal * applied);
            }

            // Friction
            if c.contact.friction <= 0.0 {
                continue;
            }
            let vrel = relative_velocity(bodies, c);
            let vt = vrel - normal * vrel.dot(normal);
            let max_friction = c.contact.friction * c.normal_impulse;
            let mut accumulated_t = c.tangent_impulse - vt * c.tangent_mass;
            let len = accumulated_t.length();
            if len > max_friction {
                accumulated_t *= if len > 0.0 { max_friction / len } else { 0.0 };
            }
            let applied_t = accumulated_t - c.tangent_impulse;
            c.tangent_impulse = accumulated_t;
            if applied_t != Vec3::ZERO {
                apply_impulse(bodies, c, applied_t);
            }
        }
    }
}

/// Push overlapping bodies apart along the contact normal.
///
/// Only bodies with non-zero inverse mass move; a kinematic probe shoves
/// particles out of its way without being displaced itself.
pub fn correct_positions(bodies: &mut [RigidBody], contacts: &[Contact]) {
    for contact in contacts {
        let inv_a = bodies[contact.body_a].inv_mass;
        let inv_b = bodies[contact.body_b].inv_mass;
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            continue;
        }

        let excess = contact.depth - PENETRATION_SLOP;
        if excess <= 0.0 {
            continue;
        }

        let correction = contact.normal * (excess * POSITION_CORRECTION_FACTOR / inv_sum);
        bodies[contact.body_a].translation -= correction * inv_a;
        bodies[contact.body_b].translation += correction * inv_b;
    }
}
