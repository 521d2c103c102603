//! Integration tests for the assembled scene.
//!
//! These exercise the end-to-end scenarios the visualization depends on:
//! the placement math seen through field construction, the shooting-star
//! lifecycle, both sequencers, and parse/validation of every composed WGSL
//! program.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::f32::consts::TAU;

use stardrift::field::{FieldKind, StarField};
use stardrift::placement::{disk_placement, spherical_scatter, DiskProfile};
use stardrift::scene::{SceneConfig, GALAXY_TIME_DIVISOR, UNIVERSE_TIME_DIVISOR};
use stardrift::sequence::{ColorCycle, ExpansionTween, SceneParams, COLOR_PAIRS};
use stardrift::shader;
use stardrift::starfall::{self, StarfallField, LIFE_SPAN};

// ============================================================================
// Placement scenarios
// ============================================================================

#[test]
fn test_zero_axial_seed_collapses_to_origin() {
    // st = qt = mt = 0: spin, branches and randomness cannot move the point.
    for branches in 1..6 {
        let profile = DiskProfile::new(1.618, TAU, branches, 0.9);
        let p = disk_placement(0.0, Vec3::new(0.9, 0.1, 0.5), &profile);
        assert_eq!(p, Vec3::ZERO);
    }
}

#[test]
fn test_rim_seed_lands_on_positive_x_axis() {
    let profile = DiskProfile::new(2.5, 0.0, 1, 0.0);
    let p = disk_placement(1.0, Vec3::new(0.99, 0.3, 0.7), &profile);
    assert_eq!(p, Vec3::new(2.5, 0.0, 0.0));
}

#[test]
fn test_scatter_is_always_unit_length() {
    let mut rng = SmallRng::seed_from_u64(99);
    use rand::Rng;
    for _ in 0..2000 {
        let seed = Vec3::new(rng.gen(), rng.gen(), rng.gen());
        assert!((spherical_scatter(seed).length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_placement_is_deterministic_across_fields() {
    // Two fields built from the same records must agree forever.
    let mut rng = SmallRng::seed_from_u64(42);
    let field = StarField::galaxy(256, &mut rng);
    let profile = DiskProfile::new(1.618, TAU, 2, 0.5);
    for star in field.instances() {
        let seed = Vec3::from_array(star.seed);
        let a = disk_placement(star.position[0], seed, &profile);
        let b = disk_placement(star.position[0], seed, &profile);
        assert_eq!(a, b);
    }
}

// ============================================================================
// Shooting-star lifecycle scenarios
// ============================================================================

#[test]
fn test_streak_mid_life() {
    // start_phase 0 queried at half the window: progress and fade peak.
    assert_eq!(starfall::progress(1.5, 0.0), 0.5);
    assert!((starfall::fade(0.5) - 1.0).abs() < 1e-6);
}

#[test]
fn test_streak_lifecycle_repeats() {
    let mut rng = SmallRng::seed_from_u64(1);
    let field = StarfallField::generate(50, &mut rng);
    for star in field.instances() {
        let p0 = starfall::progress(0.25, star.start_phase);
        let p1 = starfall::progress(0.25 + LIFE_SPAN, star.start_phase);
        assert!((p0 - p1).abs() < 1e-4);
    }
}

#[test]
fn test_streak_teleports_home_on_wrap() {
    let start = Vec3::new(0.0, 0.0, 2.0);
    let vel = Vec3::Z;
    let far = starfall::position_at(start, vel, LIFE_SPAN - 0.01, 0.0);
    assert!(far.z > 25.0);
    let wrapped = starfall::position_at(start, vel, LIFE_SPAN, 0.0);
    assert!((wrapped - start).length() < 1e-3);
}

// ============================================================================
// Sequencer scenarios
// ============================================================================

#[test]
fn test_expansion_endpoints() {
    let tween = ExpansionTween::new();
    assert_eq!(tween.sample(0.0), SceneParams::COLLAPSED);

    let end = tween.sample(ExpansionTween::DURATION);
    assert_eq!(end.radius, 1.618);
    assert_eq!(end.spin, TAU);
    assert_eq!(end.randomness, 0.5);
    assert_eq!(end.rotation, 2.0 * TAU);
}

#[test]
fn test_color_cycle_full_loop() {
    let cycle = ColorCycle::new();
    // Indices over one full loop: 0 through 5, then back to 0.
    let indices: Vec<usize> = (0..7)
        .map(|k| cycle.index(k as f32 * ColorCycle::PERIOD + 0.1))
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 0]);
    assert_eq!(COLOR_PAIRS.len(), 6);
}

#[test]
fn test_scene_advances_through_the_opening() {
    let mut scene = SceneConfig::new()
        .with_galaxy_particles(128)
        .with_universe_particles(64)
        .with_shooting_stars(16)
        .with_sprite_paths(Vec::new())
        .build()
        .expect("valid config");

    // Mid-expansion: radius strictly between collapsed and settled, sprite
    // layer already revealed (2 s delay), shared clock divided per field.
    let frame = scene.advance(2.5);
    assert!(frame.params.radius > 0.0 && frame.params.radius < 1.618);
    assert!(frame.sprites_visible);
    assert_eq!(frame.galaxy_time, 2.5 / GALAXY_TIME_DIVISOR);
    assert_eq!(frame.universe_time, 2.5 / UNIVERSE_TIME_DIVISOR);
    assert_eq!(frame.starfall_time, 2.5);

    let settled = scene.advance(10.0);
    assert_eq!(settled.params, SceneParams::SETTLED);
}

#[test]
fn test_field_kinds_and_counts() {
    let scene = SceneConfig::new()
        .with_sprite_paths(Vec::new())
        .build()
        .expect("valid config");
    assert_eq!(scene.galaxy().kind(), FieldKind::Disk);
    assert_eq!(scene.galaxy().len(), 16384);
    assert_eq!(scene.universe().kind(), FieldKind::Sphere);
    assert_eq!(scene.universe().len(), 8192);
    assert_eq!(scene.starfall().kind(), FieldKind::ShootingStar);
    assert_eq!(scene.starfall().len(), 200);
}

// ============================================================================
// WGSL program validation
// ============================================================================

fn validate_wgsl(label: &str, src: &str) {
    let module = naga::front::wgsl::parse_str(src)
        .unwrap_or_else(|e| panic!("{} failed to parse: {}", label, e));
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("{} failed validation: {:?}", label, e));
}

#[test]
fn test_galaxy_program_is_valid() {
    validate_wgsl("galaxy", &shader::compose(shader::GALAXY_WGSL));
}

#[test]
fn test_universe_program_is_valid() {
    validate_wgsl("universe", &shader::compose(shader::UNIVERSE_WGSL));
}

#[test]
fn test_starfall_program_is_valid() {
    validate_wgsl("starfall", &shader::compose(shader::STARFALL_WGSL));
}

#[test]
fn test_sprite_program_is_valid() {
    validate_wgsl("sprite", shader::SPRITE_WGSL);
}
