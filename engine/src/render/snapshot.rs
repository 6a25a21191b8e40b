//! Render Snapshots
//!
//! Per-frame copies of everything a renderer needs to draw the field: one
//! [`BodySnapshot`] per sphere, plus a GPU-ready [`RenderInstance`] packing.
//! Snapshots are plain values; they never borrow the simulation world, so a
//! render thread can hold one while the next step runs.

use glam::{Quat, Vec3};

use crate::field::{MaterialClass, ParticleField, PointerProbe, WHITE_MATERIAL};
use crate::physics::BodyHandle;

/// What a snapshot entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Particle,
    Probe,
}

/// Pose and appearance of one sphere at the end of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub handle: BodyHandle,
    pub position: Vec3,
    pub orientation: Quat,
    /// Render radius (collider radius for particles, visual radius for the probe)
    pub radius: f32,
    pub material: MaterialClass,
    /// Packed RGBA (0xRRGGBBAA) resolved against the active accent
    pub color: u32,
    pub kind: SnapshotKind,
}

impl BodySnapshot {
    /// GPU instance for this body.
    pub fn to_instance(&self) -> RenderInstance {
        let mut flags = 0;
        if self.kind == SnapshotKind::Probe {
            flags |= RenderInstance::FLAG_PROBE;
        }
        if self.material.spec().is_transparent() {
            flags |= RenderInstance::FLAG_TRANSPARENT;
        }
        RenderInstance {
            position: self.position.to_array(),
            radius: self.radius,
            rotation: self.orientation.to_array(),
            material: self.material.0 as u32,
            color: self.color,
            flags,
            _pad: 0,
        }
    }
}

/// GPU instance data for one sphere.
///
/// Layout (48 bytes total, 16-byte aligned for GPU compatibility):
/// - position: vec3<f32> (12 bytes)
/// - radius:   f32 (4 bytes)
/// - rotation: vec4<f32> (16 bytes) - Quaternion (x, y, z, w)
/// - material: u32 (4 bytes) - Palette index
/// - color:    u32 (4 bytes) - Packed 0xRRGGBBAA
/// - flags:    u32 (4 bytes)
/// - _pad:     u32 (4 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub rotation: [f32; 4],
    pub material: u32,
    pub color: u32,
    pub flags: u32,
    pub _pad: u32,
}

static_assertions::assert_eq_size!(RenderInstance, [u8; 48]);

impl RenderInstance {
    /// Instance is the pointer probe
    pub const FLAG_PROBE: u32 = 1 << 0;
    /// Material opacity below 1
    pub const FLAG_TRANSPARENT: u32 = 1 << 1;
}

/// Everything drawn for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    /// Frame counter at capture time
    pub frame: u64,
    /// Active accent index
    pub accent: usize,
    pub bodies: Vec<BodySnapshot>,
    pub probe: Option<BodySnapshot>,
}

impl RenderFrame {
    /// Capture the synced state of a field and its probe.
    ///
    /// Positions come from the cached values written by the last `sync`, so
    /// capture after the step and sync of the same frame.
    pub fn capture(frame: u64, accent: usize, field: &ParticleField, probe: &PointerProbe) -> Self {
        let bodies = field
            .particles()
            .iter()
            .map(|p| BodySnapshot {
                handle: p.handle,
                position: p.position,
                orientation: p.rotation,
                radius: p.radius,
                material: p.material,
                color: p.material.spec().color(accent),
                kind: SnapshotKind::Particle,
            })
            .collect();

        let probe = BodySnapshot {
            handle: probe.handle(),
            position: probe.position(),
            orientation: Quat::IDENTITY,
            radius: probe.radius(),
            material: WHITE_MATERIAL,
            color: WHITE_MATERIAL.spec().color(accent),
            kind: SnapshotKind::Probe,
        };

        Self {
            frame,
            accent,
            bodies,
            probe: Some(probe),
        }
    }

    /// Packed instances, particles first and the probe last.
    pub fn instances(&self) -> Vec<RenderInstance> {
        self.bodies
            .iter()
            .chain(self.probe.iter())
            .map(BodySnapshot::to_instance)
            .collect()
    }

    /// Instance data as raw bytes for a vertex buffer upload.
    pub fn instance_bytes(instances: &[RenderInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }
}
