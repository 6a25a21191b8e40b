//! Field Configuration
//!
//! Everything needed to build a running field, in one serializable struct.
//! Missing JSON keys fall back to the `dense_swarm` defaults, so a config
//! file only has to name what it changes.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::camera::{CameraModel, Projection};
use crate::error::ConfigError;
use crate::field::{ParticlePreset, PlacementConfig, ProbeConfig};
use crate::physics::WorldConfig;

/// Full description of a particle field scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of dynamic spheres
    pub particle_count: usize,
    /// Spawn box
    pub placement: PlacementConfig,
    pub preset: ParticlePreset,
    pub probe: ProbeConfig,
    /// Z of the plane pointer rays are intersected with
    pub plane_z: f32,
    pub camera: CameraModel,
    pub world: WorldConfig,
    /// RNG seed for placement; a time-based seed is drawn when absent
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::dense_swarm()
    }
}

impl FieldConfig {
    /// 200 white spheres held tight by a strong, heavily damped pull.
    pub fn dense_swarm() -> Self {
        Self {
            particle_count: 200,
            placement: PlacementConfig {
                half_extents: Vec3::splat(3.0),
                offset: Vec3::new(0.0, 3.0, 0.0),
            },
            preset: ParticlePreset::dense_swarm(),
            probe: ProbeConfig::dense_swarm(),
            plane_z: 0.0,
            camera: CameraModel::default(),
            world: WorldConfig::default(),
            seed: None,
        }
    }

    /// 100 bouncy, multi-coloured spheres under a weak pull.
    pub fn large_soft() -> Self {
        Self {
            particle_count: 100,
            placement: PlacementConfig::default(),
            preset: ParticlePreset::large_soft(),
            probe: ProbeConfig::large_soft(),
            ..Self::dense_swarm()
        }
    }

    /// Fix the placement seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the particle count.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Check every section before any body is created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.placement.validate()?;
        self.preset.validate()?;
        self.probe.validate()?;

        if !self.plane_z.is_finite() {
            return Err(ConfigError::invalid("projection plane z must be finite"));
        }
        if !(self.world.timestep.is_finite() && self.world.timestep > 0.0) {
            return Err(ConfigError::invalid(format!(
                "world timestep must be > 0, got {}",
                self.world.timestep
            )));
        }
        if self.world.solver_iterations == 0 {
            return Err(ConfigError::invalid("world solver iterations must be >= 1"));
        }
        if !self.world.gravity.is_finite() {
            return Err(ConfigError::invalid("world gravity must be finite"));
        }
        validate_camera(&self.camera)
    }

    // ========================================================================
    // JSON I/O
    // ========================================================================

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), particles = config.particle_count, "field config loaded");
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn validate_camera(camera: &CameraModel) -> Result<(), ConfigError> {
    if !(camera.position.is_finite() && camera.target.is_finite() && camera.up.is_finite()) {
        return Err(ConfigError::invalid("camera vectors must be finite"));
    }
    if camera.position == camera.target {
        return Err(ConfigError::invalid("camera position and target coincide"));
    }
    if !(camera.aspect_ratio.is_finite() && camera.aspect_ratio > 0.0) {
        return Err(ConfigError::invalid(format!(
            "camera aspect ratio must be > 0, got {}",
            camera.aspect_ratio
        )));
    }
    match camera.projection {
        Projection::Perspective { fov_y_degrees, .. } => {
            if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
                return Err(ConfigError::invalid(format!(
                    "camera field of view must be within (0, 180), got {fov_y_degrees}"
                )));
            }
        }
        Projection::Orthographic { half_height, .. } => {
            if !(half_height.is_finite() && half_height > 0.0) {
                return Err(ConfigError::invalid(format!(
                    "orthographic half height must be > 0, got {half_height}"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(FieldConfig::dense_swarm().validate().is_ok());
        assert!(FieldConfig::large_soft().validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FieldConfig::large_soft().with_seed(42);
        let json = config.to_json_string().unwrap();
        let parsed = FieldConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FieldConfig::from_json_str(r#"{ "particle_count": 12, "seed": 7 }"#).unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.preset, ParticlePreset::dense_swarm());

        let config =
            FieldConfig::from_json_str(r#"{ "preset": { "restitution": 0.2 } }"#).unwrap();
        assert!((config.preset.restitution - 0.2).abs() < 1e-6);
        assert_eq!(config.preset.radius_min, ParticlePreset::dense_swarm().radius_min);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = FieldConfig::default();
        config.preset.restitution = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = FieldConfig::default();
        config.world.timestep = 0.0;
        assert!(config.validate().is_err());

        let mut config = FieldConfig::default();
        config.camera.target = config.camera.position;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsampleable_ranges_rejected() {
        let mut config = FieldConfig::dense_swarm().with_seed(1);
        config.placement.half_extents = Vec3::splat(2.0e38);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = FieldConfig::large_soft();
        config.preset.radius_max = f32::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let json = r#"{ "placement": { "half_extents": [2.0e38, 1.0, 1.0] } }"#;
        assert!(FieldConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_presets_follow_pull_and_damping() {
        let dense = FieldConfig::dense_swarm();
        let soft = FieldConfig::large_soft();
        assert!(dense.preset.force_strength > soft.preset.force_strength);
        assert!(dense.preset.linear_damping > soft.preset.linear_damping);
        assert!(dense.particle_count > soft.particle_count);
    }

    #[test]
    fn test_malformed_json() {
        let result = FieldConfig::from_json_str("{ particle_count: ");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("field_config_{}.json", std::process::id()));
        let config = FieldConfig::dense_swarm().with_particle_count(33);
        config.save(&path).unwrap();
        let loaded = FieldConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FieldConfig::load("/nonexistent/dir/field.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
