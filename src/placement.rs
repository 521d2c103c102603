//! Distribution math for particle placement.
//!
//! Pure functions mapping uniform random seeds to positions on a spiral-galaxy
//! disk or a unit sphere. The same formulas run in the WGSL vertex stages
//! (see [`crate::shader`]); keeping both sides byte-for-byte identical is what
//! makes a stored seed reproduce the same spatial offset every frame.
//!
//! # Example
//!
//! ```ignore
//! use stardrift::placement::{disk_placement, DiskProfile};
//! use glam::Vec3;
//!
//! let profile = DiskProfile::new(1.618, std::f32::consts::TAU, 2, 0.5);
//! let p = disk_placement(0.7, Vec3::new(0.3, 0.9, 0.1), &profile);
//! ```

use glam::Vec3;
use std::f32::consts::TAU;

/// Shared parameters of the disk distribution.
///
/// One profile applies uniformly to every particle in a field at a given
/// time; the animation sequencer is the only writer of the live values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskProfile {
    /// Outer radius of the disk.
    pub radius: f32,
    /// Total spiral twist applied across the disk, in radians.
    pub spin: f32,
    /// Number of spiral arms. Must be at least 1.
    pub branches: u32,
    /// Strength of the isotropic scatter applied to each particle.
    pub randomness: f32,
}

impl DiskProfile {
    /// Create a disk profile.
    ///
    /// # Panics
    ///
    /// Panics if `branches` is zero; a zero branch count is a programming
    /// error and would propagate NaNs through the angle math.
    pub fn new(radius: f32, spin: f32, branches: u32, randomness: f32) -> Self {
        assert!(branches >= 1, "disk profile requires at least one branch");
        Self {
            radius,
            spin,
            branches,
            randomness,
        }
    }
}

/// Deterministic pseudo-random scalar in `[0, 1)` from a 2D seed.
///
/// The classic fractional-sine hash, matching the WGSL `hash2d` exactly so
/// CPU-side placement (sprites, tests) agrees with the GPU programs.
#[inline]
pub fn hash2d(x: f32, y: f32) -> f32 {
    let d = x * 12.9898 + y * 78.233;
    fract(d.sin() * 43758.5453123)
}

/// Map two independent uniform randoms to a point on the unit sphere.
///
/// Standard inverse-CDF sampler: `theta = u*2π`, `phi = acos(2v - 1)`.
/// Every isotropic scatter in the scene goes through this function.
#[inline]
pub fn unit_sphere_dir(u: f32, v: f32) -> Vec3 {
    let theta = u * TAU;
    let phi = (2.0 * v - 1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}

/// Derive a unit scatter direction from a stored per-particle seed.
///
/// Hashes two seed pairs into the uniforms consumed by [`unit_sphere_dir`],
/// mirroring the WGSL `scatter` function.
#[inline]
pub fn spherical_scatter(seed: Vec3) -> Vec3 {
    let u = hash2d(seed.x, seed.y);
    let v = hash2d(seed.y, seed.z);
    unit_sphere_dir(u, v)
}

/// Place a particle on the spiral disk.
///
/// `axial` is the particle's stored disk-radius parameter in `[0, 1)`; `seed`
/// supplies branch selection (`seed.x`) and scatter direction/magnitude.
/// Deterministic: identical inputs always yield identical output.
///
/// Four stages, reproduced exactly for visual parity:
/// 1. radial weights `st = sqrt(a)`, `qt = a²`, `mt = mix(st, qt, a)`
/// 2. spiral angle `qt * spin * (2 - sqrt(1 - qt))` plus a per-branch offset
/// 3. isotropic scatter scaled by `hash * randomness * mt`
/// 4. vertical compression `y *= 0.5 + qt * 0.5`
pub fn disk_placement(axial: f32, seed: Vec3, profile: &DiskProfile) -> Vec3 {
    assert!(
        profile.branches >= 1,
        "disk profile requires at least one branch"
    );

    let st = axial.sqrt();
    let qt = axial * axial;
    let mt = mix(st, qt, axial);

    let angle = qt * profile.spin * (2.0 - (1.0 - qt).sqrt());
    let branches = profile.branches as f32;
    let branch_offset = TAU / branches * (seed.x * branches).floor();

    let mut p = Vec3::new(
        axial * (angle + branch_offset).cos() * profile.radius,
        0.0,
        axial * (angle + branch_offset).sin() * profile.radius,
    );

    p += spherical_scatter(seed) * hash2d(seed.z, seed.x) * profile.randomness * mt;
    p.y *= 0.5 + qt * 0.5;
    p
}

/// Uniform point on a sphere shell with radius in `[inner, outer)`.
///
/// The radius is interpolated linearly between the shell bounds (not
/// volume-uniform); used for shooting-star start positions.
pub fn sphere_shell_point(u: f32, v: f32, radius_t: f32, inner: f32, outer: f32) -> Vec3 {
    let r = inner + radius_t * (outer - inner);
    unit_sphere_dir(u, v) * r
}

/// GLSL-style fract: always in `[0, 1)`, also for negative inputs.
#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_hash2d_in_unit_range() {
        for i in 0..1000 {
            let x = i as f32 * 0.137;
            let y = i as f32 * 0.731;
            let h = hash2d(x, y);
            assert!((0.0..1.0).contains(&h), "hash2d({x}, {y}) = {h}");
        }
    }

    #[test]
    fn test_unit_sphere_dir_magnitude() {
        for i in 0..100 {
            for j in 0..100 {
                let u = i as f32 / 100.0;
                let v = j as f32 / 100.0;
                let d = unit_sphere_dir(u, v);
                assert!((d.length() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_spherical_scatter_magnitude() {
        for i in 0..500 {
            let seed = Vec3::new(
                hash2d(i as f32, 0.1),
                hash2d(i as f32, 0.2),
                hash2d(i as f32, 0.3),
            );
            let s = spherical_scatter(seed);
            assert!((s.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_disk_placement_no_randomness_axial_distance() {
        let profile = DiskProfile::new(2.0, 3.0, 4, 0.0);
        for i in 0..100 {
            let a = i as f32 / 100.0;
            let p = disk_placement(a, Vec3::new(0.9, 0.4, 0.2), &profile);
            let axial_dist = (p.x * p.x + p.z * p.z).sqrt();
            assert!(
                (axial_dist - a * profile.radius).abs() < EPS,
                "axial seed {a}: expected {} got {axial_dist}",
                a * profile.radius
            );
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn test_disk_placement_deterministic() {
        let profile = DiskProfile::new(1.618, TAU, 2, 0.5);
        let seed = Vec3::new(0.11, 0.55, 0.99);
        let first = disk_placement(0.37, seed, &profile);
        for _ in 0..10 {
            let again = disk_placement(0.37, seed, &profile);
            assert_eq!(first, again, "placement must be bit-identical");
        }
    }

    #[test]
    fn test_disk_placement_zero_seed_is_origin() {
        // st = qt = mt = 0, so spin/branch/randomness cannot move the point.
        let profile = DiskProfile::new(1.618, TAU, 5, 0.9);
        let p = disk_placement(0.0, Vec3::new(0.7, 0.2, 0.4), &profile);
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn test_disk_placement_rim_single_branch() {
        // seed 1.0, spin 0, one branch, no randomness: exactly (radius, 0, 0).
        let profile = DiskProfile::new(1.618, 0.0, 1, 0.0);
        let p = disk_placement(1.0, Vec3::new(0.3, 0.6, 0.9), &profile);
        assert_eq!(p, Vec3::new(1.618, 0.0, 0.0));
    }

    #[test]
    fn test_branch_offsets_quantized() {
        // With no spin and no scatter, every particle lands on one of
        // `branches` rays.
        let profile = DiskProfile::new(1.0, 0.0, 3, 0.0);
        for i in 0..300 {
            let seed = Vec3::new(i as f32 / 300.0, 0.0, 0.0);
            let p = disk_placement(0.5, seed, &profile);
            let angle = p.z.atan2(p.x).rem_euclid(TAU);
            let branch = angle / (TAU / 3.0);
            let nearest = branch.round();
            assert!(
                (branch - nearest).abs() < 1e-3 || (branch - 3.0).abs() < 1e-3,
                "angle {angle} not on a branch ray"
            );
        }
    }

    #[test]
    #[should_panic(expected = "at least one branch")]
    fn test_zero_branches_panics() {
        DiskProfile::new(1.0, 0.0, 0, 0.0);
    }

    #[test]
    fn test_sphere_shell_radius_range() {
        for i in 0..100 {
            let t = i as f32 / 100.0;
            let p = sphere_shell_point(0.3, 0.8, t, 0.5, 6.0);
            let r = p.length();
            assert!(r >= 0.5 - EPS && r < 6.0 + EPS);
        }
    }

    #[test]
    fn test_fract_negative() {
        assert!((fract(-0.25) - 0.75).abs() < EPS);
        assert!((fract(1.25) - 0.25).abs() < EPS);
    }
}
