//! Physics type definitions
//!
//! Core mathematical types re-exported from glam, plus the opaque handles
//! and body classification shared by the rest of the physics module.

use serde::{Deserialize, Serialize};

pub use glam::{Quat, Vec3};

/// Opaque handle to a rigid body owned by a [`SimulationWorld`](super::SimulationWorld).
///
/// Handles are only minted by the world and stay valid for its whole
/// lifetime (bodies are never removed individually).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    /// Raw index into the world's body table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Handle to a collider attached to a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) u32);

impl ColliderHandle {
    /// Raw index into the world's collider table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Moved by accumulated forces and collision impulses.
    #[default]
    Dynamic,
    /// Moved only by setting a next target translation; infinite mass in contacts.
    KinematicPositionBased,
}

impl BodyKind {
    #[inline]
    pub fn is_dynamic(self) -> bool {
        matches!(self, BodyKind::Dynamic)
    }

    #[inline]
    pub fn is_kinematic(self) -> bool {
        matches!(self, BodyKind::KinematicPositionBased)
    }
}
