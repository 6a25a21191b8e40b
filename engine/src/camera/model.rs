//! Camera model
//!
//! Position, orientation and projection of the viewer, reduced to what the
//! pointer projection needs: turning a normalized device coordinate into a
//! world-space ray.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Projection of a [`CameraModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Pinhole camera
    Perspective {
        /// Vertical field of view in degrees
        fov_y_degrees: f32,
        near: f32,
        far: f32,
    },
    /// Parallel rays along the view direction
    Orthographic {
        /// Half the visible height in world units
        half_height: f32,
        near: f32,
        far: f32,
    },
}

/// A world-space ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Viewer position and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraModel {
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// World up hint
    pub up: Vec3,
    pub projection: Projection,
    /// Viewport width / height
    pub aspect_ratio: f32,
}

impl Default for CameraModel {
    /// Narrow telephoto view down -Z from 30 units out.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 30.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fov_y_degrees: 17.5,
                near: 10.0,
                far: 40.0,
            },
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

impl CameraModel {
    /// Perspective camera looking from `position` at `target`.
    pub fn perspective(
        position: Vec3,
        target: Vec3,
        fov_y_degrees: f32,
        aspect_ratio: f32,
    ) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fov_y_degrees,
                near: 0.1,
                far: 1000.0,
            },
            aspect_ratio,
        }
    }

    /// Orthographic camera looking from `position` at `target`.
    pub fn orthographic(position: Vec3, target: Vec3, half_height: f32, aspect_ratio: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            projection: Projection::Orthographic {
                half_height,
                near: 0.1,
                far: 1000.0,
            },
            aspect_ratio,
        }
    }

    /// Update the aspect ratio from viewport pixel dimensions.
    ///
    /// A zero-sized viewport (minimized window) leaves the aspect unchanged.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Right and up vectors of the view.
    ///
    /// Falls back to world X as right when looking along the up hint.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(self.up);
        let right = if right.length_squared() < 1e-8 {
            Vec3::X
        } else {
            right.normalize()
        };
        let up = right.cross(forward);
        (right, up)
    }

    /// Ray through a normalized device coordinate.
    ///
    /// `ndc` is in [-1, 1] on both axes with the origin at the viewport center
    /// and +Y up. Values outside that range extrapolate past the viewport edge.
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let forward = self.forward();
        let (right, up) = self.basis();

        match self.projection {
            Projection::Perspective { fov_y_degrees, .. } => {
                let half_fov = (fov_y_degrees.to_radians() * 0.5).tan();
                let direction = (forward
                    + right * ndc.x * half_fov * self.aspect_ratio
                    + up * ndc.y * half_fov)
                    .normalize_or_zero();
                Ray {
                    origin: self.position,
                    direction,
                }
            }
            Projection::Orthographic { half_height, near, .. } => {
                let origin = self.position
                    + forward * near
                    + right * ndc.x * half_height * self.aspect_ratio
                    + up * ndc.y * half_height;
                Ray {
                    origin,
                    direction: forward,
                }
            }
        }
    }
}
