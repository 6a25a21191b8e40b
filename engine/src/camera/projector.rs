//! Pointer projection
//!
//! Casts a ray from the camera through the pointer's device coordinate and
//! intersects it with a plane of constant Z. The result is the world target
//! the pointer probe chases.
//!
//! Ray: `P(t) = origin + t * direction`. Plane: `z = plane_z`.
//! Solve `t = (plane_z - origin.z) / direction.z`.
//!
//! A ray parallel to the plane has no intersection. Rather than fail the
//! frame, the projector keeps returning the last target it produced.
//! Intersections behind the camera are accepted as-is, like device
//! coordinates outside [-1, 1]: tracking is never clamped.

use glam::{Vec2, Vec3};
use tracing::debug;

use super::model::{CameraModel, Ray};

/// `|direction.z|` below this counts as parallel to the plane.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Intersect `ray` with the plane `z = plane_z`.
///
/// # Returns
/// * `Some(point)` - The intersection point
/// * `None` - The ray is parallel to the plane or the result is not finite
pub fn project_to_plane(ray: &Ray, plane_z: f32) -> Option<Vec3> {
    if ray.direction.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (plane_z - ray.origin.z) / ray.direction.z;
    let hit = ray.at(t);
    hit.is_finite().then_some(hit)
}

/// Stateful device-coordinate to world-target converter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerProjector {
    camera: CameraModel,
    plane_z: f32,
    last_target: Vec3,
}

impl PointerProjector {
    /// Projector onto `z = plane_z`. The held target starts at `(0, 0, plane_z)`.
    pub fn new(camera: CameraModel, plane_z: f32) -> Self {
        Self {
            camera,
            plane_z,
            last_target: Vec3::new(0.0, 0.0, plane_z),
        }
    }

    /// World target for a normalized device coordinate.
    ///
    /// Never fails: degenerate rays return the previous target unchanged.
    pub fn project(&mut self, ndc: Vec2) -> Vec3 {
        let ray = self.camera.ray(ndc);
        match project_to_plane(&ray, self.plane_z) {
            Some(target) => {
                self.last_target = target;
                target
            }
            None => {
                debug!(?ndc, "pointer ray misses projection plane, holding target");
                self.last_target
            }
        }
    }

    /// Camera used for projection.
    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    /// Replace the camera; the held target is kept.
    pub fn set_camera(&mut self, camera: CameraModel) {
        self.camera = camera;
    }

    /// Follow a viewport resize through the camera aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Z of the projection plane.
    pub fn plane_z(&self) -> f32 {
        self.plane_z
    }

    /// Most recent successful projection.
    pub fn last_target(&self) -> Vec3 {
        self.last_target
    }
}
