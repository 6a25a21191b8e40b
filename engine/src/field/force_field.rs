//! Central force field
//!
//! Constant-magnitude pull toward a fixed center. Magnitude does not depend
//! on distance; only the direction changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stateless attractor. The same position always yields the same force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceField {
    /// Force magnitude (N)
    pub strength: f32,
    /// Point every body is pulled toward
    pub center: Vec3,
}

impl Default for ForceField {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl ForceField {
    /// Field of the given strength centered on the world origin.
    pub const fn new(strength: f32) -> Self {
        Self {
            strength,
            center: Vec3::ZERO,
        }
    }

    /// Force on a body at `position`: `-strength * normalize(position - center)`.
    ///
    /// A body sitting exactly on the center gets no force.
    #[inline]
    pub fn compute(&self, position: Vec3) -> Vec3 {
        -(position - self.center).normalize_or_zero() * self.strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_points_toward_center() {
        let field = ForceField::new(2.0);
        let force = field.compute(Vec3::new(3.0, 0.0, 0.0));
        assert!((force - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-6);

        let force = field.compute(Vec3::new(-1.0, -1.0, 0.0));
        assert!(force.x > 0.0 && force.y > 0.0);
        assert!((force.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_magnitude_independent_of_distance() {
        let field = ForceField::new(0.1);
        let near = field.compute(Vec3::new(0.01, 0.0, 0.0));
        let far = field.compute(Vec3::new(100.0, 0.0, 0.0));
        assert!((near.length() - far.length()).abs() < 1e-6);
    }

    #[test]
    fn test_zero_force_at_center() {
        let field = ForceField::new(1.0);
        let force = field.compute(Vec3::ZERO);
        assert_eq!(force, Vec3::ZERO);
        assert!(force.is_finite());
    }

    #[test]
    fn test_offset_center() {
        let field = ForceField {
            strength: 1.0,
            center: Vec3::new(0.0, 2.0, 0.0),
        };
        assert_eq!(field.compute(Vec3::new(0.0, 2.0, 0.0)), Vec3::ZERO);
        assert!(field.compute(Vec3::new(0.0, 5.0, 0.0)).y < 0.0);
    }

    #[test]
    fn test_compute_is_pure() {
        let field = ForceField::new(0.5);
        let p = Vec3::new(1.5, -0.25, 3.0);
        assert_eq!(field.compute(p), field.compute(p));
    }
}
