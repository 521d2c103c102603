//! Shooting-star field and lifecycle.
//!
//! Two hundred streak particles on a repeating three-second life window.
//! Each star travels outward linearly from its shell start position, then
//! teleports back when its progress wraps (intentional product behavior: the
//! wrap is what produces the repeating comet streak). Stars are recycled, not
//! deallocated; a finished lifecycle restarts from a new point in the same
//! repeating window.
//!
//! The lifecycle formulas here are mirrored verbatim in the WGSL program
//! (see [`crate::shader::STARFALL_WGSL`]); they govern both visible motion
//! and fade, so both sides must agree exactly.

use crate::field::FieldKind;
use crate::placement::sphere_shell_point;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

/// Default number of shooting stars.
pub const SHOOTING_STARS: u32 = 200;

/// Length of one life window, in seconds (shared across the field).
pub const LIFE_SPAN: f32 = 3.0;

/// Outward travel speed, in world units per second.
pub const SPEED: f32 = 10.0;

/// Inner radius of the spawn shell.
pub const SHELL_INNER: f32 = 0.5;

/// Outer radius of the spawn shell.
pub const SHELL_OUTER: f32 = 6.0;

/// Fixed opacity ceiling applied on top of the lifecycle fade.
pub const MAX_OPACITY: f32 = 0.9;

/// Per-star attribute record, uploaded once as instance data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StreakInstance {
    /// Start position on the spawn shell.
    pub position: [f32; 3],
    /// Visual size factor in `[2.0, 5.0)`.
    pub size: f32,
    /// Unit travel direction.
    pub velocity: [f32; 3],
    /// Offset into the repeating life window, in `[0, LIFE_SPAN)`.
    pub start_phase: f32,
    /// Cool pastel RGB color.
    pub color: [f32; 3],
    pub _pad: f32,
}

/// The shooting-star field.
#[derive(Debug, Clone)]
pub struct StarfallField {
    instances: Vec<StreakInstance>,
}

impl StarfallField {
    /// Build the field, rolling every star's start state.
    pub fn generate<R: Rng>(count: u32, rng: &mut R) -> Self {
        let instances = (0..count).map(|_| roll_star(rng)).collect();
        Self { instances }
    }

    /// Distribution kind of this field.
    #[inline]
    pub fn kind(&self) -> FieldKind {
        FieldKind::ShootingStar
    }

    /// Number of stars in the field.
    #[inline]
    pub fn len(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Whether the field holds no stars.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The attribute records.
    #[inline]
    pub fn instances(&self) -> &[StreakInstance] {
        &self.instances
    }

    /// Raw bytes for GPU upload.
    #[inline]
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

fn roll_star<R: Rng>(rng: &mut R) -> StreakInstance {
    let start = sphere_shell_point(
        rng.gen(),
        rng.gen(),
        rng.gen(),
        SHELL_INNER,
        SHELL_OUTER,
    );

    // Mostly outward, with bounded per-axis jitter, re-normalized.
    let mut velocity = start.normalize() * (1.0 + rng.gen::<f32>() * 0.5);
    velocity.x += (rng.gen::<f32>() - 0.5) * 0.5;
    velocity.y += (rng.gen::<f32>() - 0.5) * 0.5;
    velocity.z += (rng.gen::<f32>() - 0.5) * 0.5;
    let velocity = velocity.normalize();

    let color = hsl_to_rgb(
        rng.gen::<f32>() * 0.2 + 0.6,
        rng.gen::<f32>() * 0.5 + 0.5,
        rng.gen::<f32>() * 0.3 + 0.7,
    );

    StreakInstance {
        position: start.to_array(),
        size: rng.gen::<f32>() * 3.0 + 2.0,
        velocity: velocity.to_array(),
        start_phase: rng.gen::<f32>() * LIFE_SPAN,
        color: color.to_array(),
        _pad: 0.0,
    }
}

/// Seconds a star has lived within its current window.
#[inline]
pub fn time_in_life(elapsed: f32, start_phase: f32) -> f32 {
    (elapsed + start_phase) % LIFE_SPAN
}

/// Normalized position in the life window, in `[0, 1)`.
#[inline]
pub fn progress(elapsed: f32, start_phase: f32) -> f32 {
    time_in_life(elapsed, start_phase) / LIFE_SPAN
}

/// Displayed position at `elapsed`: linear outward travel, teleporting back
/// to the start when the window wraps.
pub fn position_at(start: Vec3, velocity: Vec3, elapsed: f32, start_phase: f32) -> Vec3 {
    start + velocity * SPEED * time_in_life(elapsed, start_phase)
}

/// Size multiplier over the life window; peaks mid-life.
#[inline]
pub fn size_pulse(progress: f32) -> f32 {
    1.0 + (progress * PI).sin() * 1.5
}

/// Opacity fade over the life window; zero at both ends, one at midpoint.
///
/// The renderer multiplies this by [`MAX_OPACITY`] and the alpha-mask sample.
#[inline]
pub fn fade(progress: f32) -> f32 {
    let s = (progress * PI).sin();
    s * s
}

/// Convert an HSL color to RGB.
///
/// Hue wraps; saturation and lightness are expected in `[0, 1]`.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    if s == 0.0 {
        return Vec3::splat(l);
    }
    let h = h.rem_euclid(1.0);
    let hi = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let lo = 2.0 * l - hi;
    Vec3::new(
        hue_channel(lo, hi, h + 1.0 / 3.0),
        hue_channel(lo, hi, h),
        hue_channel(lo, hi, h - 1.0 / 3.0),
    )
}

fn hue_channel(lo: f32, hi: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        lo + (hi - lo) * 6.0 * t
    } else if t < 0.5 {
        hi
    } else if t < 2.0 / 3.0 {
        lo + (hi - lo) * 6.0 * (2.0 / 3.0 - t)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_field_shape() {
        let mut rng = SmallRng::seed_from_u64(11);
        let field = StarfallField::generate(SHOOTING_STARS, &mut rng);
        assert_eq!(field.len(), 200);
        assert_eq!(field.kind(), FieldKind::ShootingStar);
        assert_eq!(std::mem::size_of::<StreakInstance>(), 48);
    }

    #[test]
    fn test_velocity_unit_length() {
        let mut rng = SmallRng::seed_from_u64(11);
        let field = StarfallField::generate(200, &mut rng);
        for star in field.instances() {
            let v = Vec3::from_array(star.velocity);
            assert!((v.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_start_state_ranges() {
        let mut rng = SmallRng::seed_from_u64(11);
        let field = StarfallField::generate(200, &mut rng);
        for star in field.instances() {
            let r = Vec3::from_array(star.position).length();
            assert!(r >= SHELL_INNER - EPS && r < SHELL_OUTER + EPS);
            assert!((0.0..LIFE_SPAN).contains(&star.start_phase));
            assert!((2.0..5.0).contains(&star.size));
        }
    }

    #[test]
    fn test_colors_are_pastel() {
        // Lightness of at least 0.7 keeps every channel well off black.
        let mut rng = SmallRng::seed_from_u64(11);
        let field = StarfallField::generate(200, &mut rng);
        for star in field.instances() {
            for c in star.color {
                assert!(c > 0.3 && c <= 1.0, "channel {c} out of pastel range");
            }
        }
    }

    #[test]
    fn test_progress_periodic() {
        for i in 0..30 {
            let t = i as f32 * 0.37;
            let a = progress(t, 1.2);
            let b = progress(t + LIFE_SPAN, 1.2);
            assert!((a - b).abs() < 1e-4, "progress({t}) not periodic");
        }
    }

    #[test]
    fn test_fade_endpoints_and_midpoint() {
        assert!(fade(0.0).abs() < EPS);
        assert!((fade(0.5) - 1.0).abs() < EPS);
        assert!(fade(1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mid_life_scenario() {
        // start_phase 0, elapsed 1.5 of a 3.0 s window: exactly mid-life.
        assert_eq!(progress(1.5, 0.0), 0.5);
        assert!((fade(progress(1.5, 0.0)) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_position_travels_then_wraps() {
        let start = Vec3::new(1.0, 0.0, 0.0);
        let vel = Vec3::new(0.0, 1.0, 0.0);
        let p1 = position_at(start, vel, 1.0, 0.0);
        assert!((p1.y - SPEED).abs() < EPS);
        // Just past the wrap the star is back near its start.
        let p2 = position_at(start, vel, LIFE_SPAN + 0.001, 0.0);
        assert!(p2.distance(start) < 0.1);
    }

    #[test]
    fn test_size_pulse_peaks_mid_life() {
        assert!((size_pulse(0.0) - 1.0).abs() < EPS);
        assert!((size_pulse(0.5) - 2.5).abs() < EPS);
        assert!(size_pulse(0.25) < size_pulse(0.5));
    }

    #[test]
    fn test_hsl_primaries() {
        assert!((hsl_to_rgb(0.0, 1.0, 0.5) - Vec3::new(1.0, 0.0, 0.0)).length() < EPS);
        assert!((hsl_to_rgb(1.0 / 3.0, 1.0, 0.5) - Vec3::new(0.0, 1.0, 0.0)).length() < EPS);
        assert!((hsl_to_rgb(0.5, 0.0, 0.25) - Vec3::splat(0.25)).length() < EPS);
    }
}
