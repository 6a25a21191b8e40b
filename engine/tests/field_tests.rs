//! Field Tests - Attraction, Probe Tracking and Projection
//!
//! End-to-end behaviour of the particle field, the pointer probe and the
//! pointer projector wired together the way a host would wire them.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use particle_field_engine::camera::{CameraModel, PointerProjector};
use particle_field_engine::field::{
    ForceField, ParticleField, ParticlePreset, PlacementConfig, PointerProbe, ProbeConfig,
    apply_field_force,
};
use particle_field_engine::physics::{SimulationWorld, WorldConfig};

fn spawn(
    world: &mut SimulationWorld,
    count: usize,
    placement: PlacementConfig,
    preset: ParticlePreset,
    seed: u64,
) -> ParticleField {
    let mut rng = StdRng::seed_from_u64(seed);
    ParticleField::initialize(world, count, &placement, preset, &mut rng).unwrap()
}

// ============================================================================
// Attraction Tests
// ============================================================================

#[test]
fn test_lone_particle_accelerates_toward_center() {
    let mut world = SimulationWorld::new(WorldConfig::default());
    let placement = PlacementConfig {
        half_extents: Vec3::ZERO,
        offset: Vec3::new(4.0, 0.0, 0.0),
    };
    let mut field = spawn(&mut world, 1, placement, ParticlePreset::dense_swarm(), 1);

    field.update(&mut world).unwrap();
    world.step(None).unwrap();
    field.sync(&world).unwrap();

    let particle = field.particles()[0];
    let body = world.body(particle.handle).unwrap();
    assert!(body.linvel().x < 0.0);
    assert!(body.linvel().y.abs() < 1e-6);
    assert!(particle.position.x < 4.0);
}

#[test]
fn test_force_is_recomputed_not_accumulated() {
    let mut world = SimulationWorld::new(WorldConfig::default());
    let field = spawn(
        &mut world,
        4,
        PlacementConfig::default(),
        ParticlePreset::dense_swarm(),
        2,
    );

    for _ in 0..3 {
        field.update(&mut world).unwrap();
    }

    for particle in field.particles() {
        let position = world.query_translation(particle.handle).unwrap();
        let expected = field.force_field().compute(position);
        let applied = world.body(particle.handle).unwrap().user_force();
        assert!((applied - expected).length() < 1e-6);
        assert!((applied.length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_particle_at_center_gets_no_force() {
    let mut world = SimulationWorld::new(WorldConfig::default());
    let placement = PlacementConfig {
        half_extents: Vec3::ZERO,
        offset: Vec3::ZERO,
    };
    let field = spawn(&mut world, 1, placement, ParticlePreset::dense_swarm(), 3);

    let particle = field.particles()[0];
    let force = apply_field_force(&mut world, &particle, &ForceField::new(5.0)).unwrap();
    assert_eq!(force, Vec3::ZERO);
    world.step(None).unwrap();
    assert_eq!(world.query_translation(particle.handle).unwrap(), Vec3::ZERO);
}

#[test]
fn test_swarm_stays_bounded() {
    let mut world = SimulationWorld::new(WorldConfig::default());
    let placement = PlacementConfig {
        half_extents: Vec3::splat(3.0),
        offset: Vec3::new(0.0, 0.0, 2.0),
    };
    let mut field = spawn(&mut world, 10, placement, ParticlePreset::dense_swarm(), 4);

    for _ in 0..100 {
        field.update(&mut world).unwrap();
        world.step(None).unwrap();
    }
    field.sync(&world).unwrap();

    for particle in field.particles() {
        assert!(particle.position.is_finite());
        assert!(particle.rotation.is_finite());
        assert!(particle.position.length() < 10.0, "escaped: {}", particle.position);
    }
    assert_eq!(field.len(), 10);
}

// ============================================================================
// Probe Tests
// ============================================================================

#[test]
fn test_probe_reaches_target_after_one_step() {
    let mut world = SimulationWorld::new(WorldConfig::default());
    let mut probe = PointerProbe::new(&mut world, &ProbeConfig::default(), Vec3::ZERO).unwrap();

    let target = Vec3::new(5.0, 5.0, 0.0);
    probe.update(&mut world, target).unwrap();
    world.step(None).unwrap();
    probe.sync(&world).unwrap();

    assert!((probe.position() - target).length() < 1e-5);
}

#[test]
fn test_probe_sweep_scatters_particles() {
    let mut world = SimulationWorld::new(WorldConfig::default());
    let placement = PlacementConfig {
        half_extents: Vec3::splat(0.5),
        offset: Vec3::ZERO,
    };
    let mut field = spawn(&mut world, 20, placement, ParticlePreset::large_soft(), 5);
    let start = Vec3::new(-4.0, 0.0, 0.0);
    let mut probe = PointerProbe::new(&mut world, &ProbeConfig::large_soft(), start).unwrap();

    // Drive the probe straight through the cluster
    for i in 0..40 {
        let target = Vec3::new(-4.0 + 0.2 * i as f32, 0.0, 0.0);
        probe.update(&mut world, target).unwrap();
        field.update(&mut world).unwrap();
        world.step(None).unwrap();
    }
    field.sync(&world).unwrap();
    probe.sync(&world).unwrap();

    assert!(world.kinetic_energy() > 0.0);
    let max_x = field
        .particles()
        .iter()
        .map(|p| p.position.x)
        .fold(f32::MIN, f32::max);
    assert!(max_x > 1.0, "no particle pushed along the sweep: max x {max_x}");
}

// ============================================================================
// Projection Tests
// ============================================================================

#[test]
fn test_projected_point_lies_on_pointer_ray() {
    let camera = CameraModel::perspective(Vec3::new(2.0, 3.0, 20.0), Vec3::ZERO, 30.0, 1.5);
    let mut projector = PointerProjector::new(camera, 0.0);

    for ndc in [Vec2::new(0.3, -0.2), Vec2::new(-0.9, 0.9), Vec2::ZERO] {
        let point = projector.project(ndc);
        let ray = camera.ray(ndc);
        assert!(point.z.abs() < 1e-4);
        let to_point = (point - ray.origin).normalize();
        assert!((to_point - ray.direction).length() < 1e-4);
    }
}

#[test]
fn test_projector_drives_probe() {
    let mut world = SimulationWorld::new(WorldConfig::default());
    let mut projector = PointerProjector::new(CameraModel::default(), 0.0);
    let mut probe =
        PointerProbe::new(&mut world, &ProbeConfig::large_soft(), projector.last_target()).unwrap();

    let target = projector.project(Vec2::new(-0.5, 0.5));
    probe.update(&mut world, target).unwrap();
    world.step(None).unwrap();
    probe.sync(&world).unwrap();

    assert!(probe.position().x < 0.0);
    assert!(probe.position().y > 0.0);
    assert_eq!(probe.position(), target);
}

#[test]
fn test_orthographic_projection() {
    let camera = CameraModel::orthographic(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 4.0, 1.0);
    let mut projector = PointerProjector::new(camera, 0.0);

    let point = projector.project(Vec2::new(0.5, -0.5));
    assert!((point - Vec3::new(2.0, -2.0, 0.0)).length() < 1e-4);
}
