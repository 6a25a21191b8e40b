//! Particle presets and material classes
//!
//! A preset bundles every tunable constant of one particle population:
//! radius range, radius-to-density relation, damping, restitution and the
//! strength of the central pull. Two presets ship with the engine:
//!
//! | Preset          | Radius      | Density     | Lin/Ang damping | Restitution | Pull |
//! |-----------------|-------------|-------------|-----------------|-------------|------|
//! | `dense_swarm`   | 0.10 – 0.35 | 1.0 × r     | 10.0 / 1.0      | 0.0         | 1.0  |
//! | `large_soft`    | 0.17        | 3.5 × r     | 1.0 / 0.6       | 0.8         | 0.1  |
//!
//! The dense swarm has the larger pull and the higher damping, so it packs
//! tight around the center. The soft preset pulls weakly and damps little.
//! The values are visually tuned, not derived from a physical model.
//!
//! Material classes index into [`MATERIAL_PALETTE`]. The renderer resolves a
//! class to a colour through [`MaterialSpec::color`], with the accent tone
//! picked by the current accent index.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::physics::CombineRule;

use super::force_field::ForceField;

// ============================================================================
// MATERIALS
// ============================================================================

/// Index into [`MATERIAL_PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MaterialClass(pub u8);

impl MaterialClass {
    /// Material this class resolves to.
    pub fn spec(self) -> &'static MaterialSpec {
        &MATERIAL_PALETTE[self.0 as usize % MATERIAL_PALETTE.len()]
    }
}

/// Base colour family of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Dark,
    White,
    /// Follows the active accent colour
    Accent,
}

/// Surface description the renderer turns into a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSpec {
    pub tone: Tone,
    pub roughness: f32,
    pub metalness: f32,
    /// 1.0 is opaque
    pub opacity: f32,
}

impl MaterialSpec {
    const fn new(tone: Tone, roughness: f32, metalness: f32, opacity: f32) -> Self {
        Self {
            tone,
            roughness,
            metalness,
            opacity,
        }
    }

    /// Packed RGBA colour (0xRRGGBBAA) for the given accent index.
    pub fn color(&self, accent: usize) -> u32 {
        let rgb = match self.tone {
            Tone::Dark => DARK_RGB,
            Tone::White => WHITE_RGB,
            Tone::Accent => ACCENT_COLORS[accent % ACCENT_COLORS.len()],
        };
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u32;
        (rgb << 8) | alpha
    }

    /// True when the renderer must blend this material.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Accent colours (0xRRGGBB), cycled by the controller.
pub const ACCENT_COLORS: [u32; 4] = [0xff4060, 0xffcc00, 0x20ffa0, 0x4060ff];

const DARK_RGB: u32 = 0x444444;
const WHITE_RGB: u32 = 0xffffff;

/// Class every `dense_swarm` particle uses.
pub const WHITE_MATERIAL: MaterialClass = MaterialClass(3);

/// Weighted palette: repeated entries make a tone more likely when picked uniformly.
pub const MATERIAL_PALETTE: [MaterialSpec; 18] = [
    MaterialSpec::new(Tone::Dark, 0.1, 0.5, 1.0),
    MaterialSpec::new(Tone::Dark, 0.1, 0.5, 1.0),
    MaterialSpec::new(Tone::Dark, 0.1, 0.5, 1.0),
    MaterialSpec::new(Tone::White, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::White, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::White, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::Accent, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::Accent, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::Accent, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::Dark, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::Dark, 0.3, 0.1, 1.0),
    MaterialSpec::new(Tone::Dark, 0.3, 0.1, 1.0),
    MaterialSpec::new(Tone::White, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::White, 0.2, 0.1, 1.0),
    MaterialSpec::new(Tone::White, 0.1, 0.1, 1.0),
    MaterialSpec::new(Tone::Accent, 0.1, 0.1, 0.5),
    MaterialSpec::new(Tone::Accent, 0.3, 0.1, 1.0),
    MaterialSpec::new(Tone::Accent, 0.1, 0.1, 1.0),
];

/// How particles are assigned a material class at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialPolicy {
    /// Uniform pick from the whole palette
    Palette,
    /// Every particle gets the same class
    Uniform(MaterialClass),
}

// ============================================================================
// PRESETS
// ============================================================================

/// How collider density follows from radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DensityRelation {
    /// Same density whatever the radius
    Constant(f32),
    /// `density = per_radius * radius`
    Linear { per_radius: f32 },
}

impl DensityRelation {
    /// Density of a collider with the given radius.
    pub fn density(&self, radius: f32) -> f32 {
        match *self {
            DensityRelation::Constant(density) => density,
            DensityRelation::Linear { per_radius } => per_radius * radius,
        }
    }
}

/// Tunable constants for one particle population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlePreset {
    /// Smallest radius handed out (meters)
    pub radius_min: f32,
    /// Largest radius handed out; equal to `radius_min` for a fixed size
    pub radius_max: f32,
    pub density: DensityRelation,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    pub restitution_combine_rule: CombineRule,
    pub friction: f32,
    /// Magnitude of the central pull (N)
    pub force_strength: f32,
    pub materials: MaterialPolicy,
}

impl Default for ParticlePreset {
    fn default() -> Self {
        Self::dense_swarm()
    }
}

impl ParticlePreset {
    /// Light balls packed tight by a strong pull and heavy damping.
    pub fn dense_swarm() -> Self {
        Self {
            radius_min: 0.1,
            radius_max: 0.35,
            density: DensityRelation::Linear { per_radius: 1.0 },
            linear_damping: 10.0,
            angular_damping: 1.0,
            restitution: 0.0,
            restitution_combine_rule: CombineRule::Max,
            friction: 0.5,
            force_strength: 1.0,
            materials: MaterialPolicy::Uniform(WHITE_MATERIAL),
        }
    }

    /// Heavier, bouncy balls under a weak pull with little damping.
    pub fn large_soft() -> Self {
        Self {
            radius_min: 0.17,
            radius_max: 0.17,
            density: DensityRelation::Linear { per_radius: 3.5 },
            linear_damping: 1.0,
            angular_damping: 0.6,
            restitution: 0.8,
            restitution_combine_rule: CombineRule::Max,
            friction: 0.5,
            force_strength: 0.1,
            materials: MaterialPolicy::Palette,
        }
    }

    /// Force field matching this preset's pull.
    pub fn force_field(&self) -> ForceField {
        ForceField::new(self.force_strength)
    }

    /// Reject presets that would create malformed bodies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius_min.is_finite() && self.radius_min > 0.0) {
            return Err(ConfigError::invalid(format!(
                "radius_min must be > 0, got {}",
                self.radius_min
            )));
        }
        if !(self.radius_max.is_finite() && self.radius_max >= self.radius_min) {
            return Err(ConfigError::invalid(format!(
                "radius_max must be >= radius_min ({}), got {}",
                self.radius_min, self.radius_max
            )));
        }
        // The sampler scales the span by slightly more than one
        if !((self.radius_max - self.radius_min) * 2.0).is_finite() {
            return Err(ConfigError::invalid(format!(
                "radius range {}..={} is too wide to sample",
                self.radius_min, self.radius_max
            )));
        }
        let density_ok = match self.density {
            DensityRelation::Constant(d) => d.is_finite() && d >= 0.0,
            DensityRelation::Linear { per_radius } => per_radius.is_finite() && per_radius >= 0.0,
        };
        if !density_ok {
            return Err(ConfigError::invalid(format!(
                "density relation must be non-negative, got {:?}",
                self.density
            )));
        }
        for (name, value) in [
            ("linear_damping", self.linear_damping),
            ("angular_damping", self.angular_damping),
            ("friction", self.friction),
            ("force_strength", self.force_strength),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(format!("{name} must be >= 0, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::invalid(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        if let MaterialPolicy::Uniform(class) = self.materials {
            if class.0 as usize >= MATERIAL_PALETTE.len() {
                return Err(ConfigError::invalid(format!(
                    "material class {} outside palette of {}",
                    class.0,
                    MATERIAL_PALETTE.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ParticlePreset::dense_swarm().validate().is_ok());
        assert!(ParticlePreset::large_soft().validate().is_ok());
    }

    #[test]
    fn test_dense_swarm_pulls_harder_and_damps_more() {
        let dense = ParticlePreset::dense_swarm();
        let soft = ParticlePreset::large_soft();
        assert!(dense.force_strength > soft.force_strength);
        assert!(dense.linear_damping > soft.linear_damping);
        assert!(dense.angular_damping > soft.angular_damping);
        assert_eq!(soft.restitution_combine_rule, CombineRule::Max);
    }

    #[test]
    fn test_density_relation() {
        let linear = DensityRelation::Linear { per_radius: 3.5 };
        assert!((linear.density(0.17) - 0.595).abs() < 1e-6);
        assert_eq!(DensityRelation::Constant(2.0).density(10.0), 2.0);
    }

    #[test]
    fn test_invalid_presets_rejected() {
        let mut preset = ParticlePreset::dense_swarm();
        preset.radius_min = -0.1;
        assert!(preset.validate().is_err());

        let mut preset = ParticlePreset::large_soft();
        preset.radius_max = 0.05;
        assert!(preset.validate().is_err());

        let mut preset = ParticlePreset::dense_swarm();
        preset.density = DensityRelation::Constant(-1.0);
        assert!(preset.validate().is_err());

        let mut preset = ParticlePreset::dense_swarm();
        preset.linear_damping = f32::NAN;
        assert!(preset.validate().is_err());

        let mut preset = ParticlePreset::dense_swarm();
        preset.materials = MaterialPolicy::Uniform(MaterialClass(200));
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_unsampleable_radius_range_rejected() {
        let mut preset = ParticlePreset::dense_swarm();
        preset.radius_max = f32::MAX;
        assert!(matches!(preset.validate(), Err(ConfigError::Invalid { .. })));

        preset.radius_max = 1.0e3;
        assert!(preset.validate().is_ok());
    }

    #[test]
    fn test_material_color_packing() {
        let white = MaterialClass(3).spec();
        assert_eq!(white.color(0), 0xffffffff);

        let dark = MaterialClass(0).spec();
        assert_eq!(dark.color(2), 0x444444ff);

        let accent = MaterialClass(6).spec();
        assert_eq!(accent.color(0), 0xff4060ff);
        assert_eq!(accent.color(1), 0xffcc00ff);
        assert_eq!(accent.color(5), 0xffcc00ff);
    }

    #[test]
    fn test_translucent_accent() {
        let spec = MaterialClass(15).spec();
        assert!(spec.is_transparent());
        assert_eq!(spec.color(3) & 0xff, 128);
    }
}
