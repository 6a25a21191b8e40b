//! Field Module
//!
//! Everything that lives in the simulation world: the central attractor,
//! the particle population and the pointer probe.
//!
//! - [`force_field`] - Constant-magnitude pull toward the center
//! - [`preset`] - Tunable particle presets and material classes
//! - [`particle_field`] - The dynamic sphere population
//! - [`probe`] - The kinematic pointer probe

pub mod force_field;
pub mod particle_field;
pub mod preset;
pub mod probe;

pub use force_field::ForceField;
pub use particle_field::{Particle, ParticleField, PlacementConfig, apply_field_force};
pub use preset::{
    ACCENT_COLORS, DensityRelation, MATERIAL_PALETTE, MaterialClass, MaterialPolicy, MaterialSpec,
    ParticlePreset, Tone, WHITE_MATERIAL,
};
pub use probe::{PointerProbe, ProbeConfig};
