//! Error types for the physics backend.

use thiserror::Error;

use super::types::BodyHandle;

/// Errors raised by [`SimulationWorld`](super::SimulationWorld).
///
/// Every variant indicates a programming or configuration defect; the frame
/// loop is expected to abort rather than recover.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    /// Rigid body description rejected at creation.
    #[error("invalid rigid body description: {reason}")]
    InvalidBodyDesc {
        /// What was wrong with the description.
        reason: String,
    },

    /// Collider description rejected at creation.
    #[error("invalid collider description: {reason}")]
    InvalidColliderDesc {
        /// What was wrong with the description.
        reason: String,
    },

    /// Handle not minted by this world.
    #[error("unknown body handle: {0}")]
    UnknownBody(BodyHandle),

    /// Timestep must be positive and finite.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f32),

    /// Non-finite state detected after a step.
    #[error("simulation diverged: {reason}")]
    Diverged {
        /// Which body went non-finite and how.
        reason: String,
    },
}

/// Result alias for physics operations.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
