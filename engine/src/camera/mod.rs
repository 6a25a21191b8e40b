//! Camera Module
//!
//! Camera model and pointer-to-world projection.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod model;
pub mod projector;

pub use model::{CameraModel, Projection, Ray};
pub use projector::{PARALLEL_EPSILON, PointerProjector, project_to_plane};
