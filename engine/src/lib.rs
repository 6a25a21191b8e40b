//! Particle Field Engine
//!
//! A real-time particle field: a fixed population of spheres is pulled
//! toward a central point while a pointer-driven probe pushes them around.
//! Physics is built from scratch (no external physics library), and the
//! crate renders nothing itself: a host window feeds pointer input and draws
//! the per-frame snapshots.
//!
//! # Modules
//!
//! - [`physics`] - Rigid-body world with sphere colliders and a contact solver
//! - [`field`] - Force field, particle population and pointer probe
//! - [`camera`] - Camera model and pointer-to-plane projection
//! - [`input`] - Platform-agnostic pointer state
//! - [`render`] - Render snapshots and GPU instance packing
//! - [`config`] - Serializable scene configuration with presets
//! - [`controller`] - Per-frame orchestration of all of the above
//!
//! # Example
//!
//! ```ignore
//! use particle_field_engine::{FieldConfig, FieldController};
//!
//! let mut controller = FieldController::new(&FieldConfig::dense_swarm())?;
//!
//! // Host window events
//! controller.set_viewport(1920, 1080);
//! controller.set_pointer_pixels(960.0, 540.0, 1920, 1080);
//!
//! // Once per display refresh
//! let stats = controller.frame(None)?;
//! let frame = controller.snapshot();
//! upload_instances(&frame.instances());
//! ```

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod field;
pub mod input;
pub mod physics;
pub mod render;

// Re-export the main entry points at crate level for convenience
pub use config::FieldConfig;
pub use controller::{FieldController, FrameStats};
pub use error::{ConfigError, FieldError, FieldResult};
pub use field::{ForceField, ParticleField, ParticlePreset, PointerProbe};
pub use physics::{BodyHandle, PhysicsError, SimulationWorld};
pub use render::{BodySnapshot, RenderFrame, RenderInstance};
