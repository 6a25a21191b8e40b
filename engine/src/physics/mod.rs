//! Physics module
//!
//! Rigid-body backend for the particle field. Built from scratch without an
//! external physics library: sphere colliders only, semi-implicit Euler
//! integration, sequential impulses for contacts.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Forces in N
//! - Density in kg/m³
//!
//! # Submodules
//!
//! - [`types`] - glam re-exports, body/collider handles, body kinds
//! - [`body`] - Body and collider descriptions and records, combine rules
//! - [`contact`] - Sphere narrow phase and impulse solver
//! - [`world`] - [`SimulationWorld`], the owner of all body state
//! - [`error`] - [`PhysicsError`]

pub mod body;
pub mod contact;
pub mod error;
pub mod types;
pub mod world;

pub use body::{Collider, ColliderDesc, CombineRule, RigidBody, RigidBodyDesc, sphere_volume};
pub use contact::Contact;
pub use error::{PhysicsError, PhysicsResult};
pub use types::{BodyHandle, BodyKind, ColliderHandle, Quat, Vec3};
pub use world::{SimulationWorld, WorldConfig};
