//! Animation sequencing.
//!
//! Two independent sequencers drive the scene:
//!
//! - [`ExpansionTween`]: a one-shot 5-second cubic ease-in-out interpolation
//!   taking the galaxy from its collapsed state to its settled state. It
//!   terminates; after the duration it keeps returning the end set.
//! - [`ColorCycle`]: a looping cross-fade through six inner/outer color
//!   pairs, advancing every two seconds and fading over one second with a
//!   quadratic ease. Runs for the life of the program.
//!
//! Both are pure functions of elapsed time, so they carry no per-frame
//! mutable state and cannot fail.

use glam::Vec3;
use std::f32::consts::TAU;

/// The global animation parameter set.
///
/// Initialized collapsed, animated once to the settled state, then held.
/// `rotation` drives the scene-graph rotation of the disk (and sprite group)
/// directly and the sphere field at a third of the rate; after the tween it
/// holds its final value while the shaders keep rotating particles from the
/// frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    /// Disk radius.
    pub radius: f32,
    /// Spiral twist in radians.
    pub spin: f32,
    /// Scatter strength.
    pub randomness: f32,
    /// Scene-graph rotation angle in radians.
    pub rotation: f32,
}

impl SceneParams {
    /// Program-start state: everything collapsed at the origin.
    pub const COLLAPSED: Self = Self {
        radius: 0.0,
        spin: 0.0,
        randomness: 0.0,
        rotation: 0.0,
    };

    /// Settled state reached at the end of the expansion.
    pub const SETTLED: Self = Self {
        radius: 1.618,
        spin: TAU,
        randomness: 0.5,
        rotation: 2.0 * TAU,
    };

    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            radius: a.radius + (b.radius - a.radius) * t,
            spin: a.spin + (b.spin - a.spin) * t,
            randomness: a.randomness + (b.randomness - a.randomness) * t,
            rotation: a.rotation + (b.rotation - a.rotation) * t,
        }
    }
}

/// Cubic ease-in-ease-out curve on `[0, 1]`.
pub fn cubic_in_out(t: f32) -> f32 {
    let k = t * 2.0;
    if k < 1.0 {
        0.5 * k * k * k
    } else {
        let k = k - 2.0;
        0.5 * (k * k * k + 2.0)
    }
}

/// Quadratic ease-in-ease-out curve on `[0, 1]`.
pub fn quadratic_in_out(t: f32) -> f32 {
    let k = t * 2.0;
    if k < 1.0 {
        0.5 * k * k
    } else {
        let k = k - 1.0;
        -0.5 * (k * (k - 2.0) - 1.0)
    }
}

/// One-shot expansion of the galaxy over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionTween {
    from: SceneParams,
    to: SceneParams,
    duration: f32,
}

impl ExpansionTween {
    /// Duration of the expansion, in seconds.
    pub const DURATION: f32 = 5.0;

    /// The standard collapsed-to-settled expansion.
    pub fn new() -> Self {
        Self {
            from: SceneParams::COLLAPSED,
            to: SceneParams::SETTLED,
            duration: Self::DURATION,
        }
    }

    /// Sample the parameter set at `elapsed` seconds after start.
    ///
    /// Clamped at both ends: `elapsed <= 0` returns the start set unchanged
    /// and `elapsed >= duration` returns exactly the end set.
    pub fn sample(&self, elapsed: f32) -> SceneParams {
        if elapsed <= 0.0 {
            return self.from;
        }
        if elapsed >= self.duration {
            return self.to;
        }
        SceneParams::lerp(&self.from, &self.to, cubic_in_out(elapsed / self.duration))
    }

    /// Whether the tween has emitted its final value.
    #[inline]
    pub fn finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration
    }
}

impl Default for ExpansionTween {
    fn default() -> Self {
        Self::new()
    }
}

/// An inner/outer color pair for the galaxy gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    /// Color at the galactic core.
    pub inner: Vec3,
    /// Color at the rim.
    pub outer: Vec3,
}

const fn pair(inner: Vec3, outer: Vec3) -> ColorPair {
    ColorPair { inner, outer }
}

/// The fixed cyclic palette the galaxy gradient steps through.
pub const COLOR_PAIRS: [ColorPair; 6] = [
    // #f40 / #a7f
    pair(
        Vec3::new(1.0, 4.0 / 15.0, 0.0),
        Vec3::new(10.0 / 15.0, 7.0 / 15.0, 1.0),
    ),
    // #40f / #f7a
    pair(
        Vec3::new(4.0 / 15.0, 0.0, 1.0),
        Vec3::new(1.0, 7.0 / 15.0, 10.0 / 15.0),
    ),
    // #0f4 / #7fa
    pair(
        Vec3::new(0.0, 1.0, 4.0 / 15.0),
        Vec3::new(7.0 / 15.0, 1.0, 10.0 / 15.0),
    ),
    // #ff0 / #f0a
    pair(
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 10.0 / 15.0),
    ),
    // #f00 / #00f
    pair(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    // #0ff / #f0f
    pair(Vec3::new(0.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 1.0)),
];

/// Looping cross-fade through [`COLOR_PAIRS`].
#[derive(Debug, Clone, Copy)]
pub struct ColorCycle {
    period: f32,
    fade: f32,
}

impl ColorCycle {
    /// Seconds between advances to the next pair.
    pub const PERIOD: f32 = 2.0;

    /// Seconds the cross-fade takes after each advance.
    pub const FADE: f32 = 1.0;

    /// The standard two-second cycle with a one-second fade.
    pub fn new() -> Self {
        Self {
            period: Self::PERIOD,
            fade: Self::FADE,
        }
    }

    /// Index of the active (target) pair at `elapsed` seconds.
    ///
    /// Starts at 0, advances every period, wraps after the last pair.
    pub fn index(&self, elapsed: f32) -> usize {
        let advances = (elapsed.max(0.0) / self.period) as usize;
        advances % COLOR_PAIRS.len()
    }

    /// The displayed pair at `elapsed` seconds: the active pair, cross-faded
    /// from its predecessor with a quadratic ease during the fade window.
    pub fn sample(&self, elapsed: f32) -> ColorPair {
        let elapsed = elapsed.max(0.0);
        let advances = (elapsed / self.period) as usize;
        let to = COLOR_PAIRS[advances % COLOR_PAIRS.len()];
        if advances == 0 {
            return to;
        }
        let from = COLOR_PAIRS[(advances - 1) % COLOR_PAIRS.len()];
        let into_window = elapsed - advances as f32 * self.period;
        let t = quadratic_in_out((into_window / self.fade).clamp(0.0, 1.0));
        ColorPair {
            inner: from.inner.lerp(to.inner, t),
            outer: from.outer.lerp(to.outer, t),
        }
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(cubic_in_out(0.0), 0.0);
        assert_eq!(cubic_in_out(1.0), 1.0);
        assert!((cubic_in_out(0.5) - 0.5).abs() < EPS);
        assert_eq!(quadratic_in_out(0.0), 0.0);
        assert_eq!(quadratic_in_out(1.0), 1.0);
        assert!((quadratic_in_out(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_tween_start_is_collapsed() {
        let tween = ExpansionTween::new();
        assert_eq!(tween.sample(0.0), SceneParams::COLLAPSED);
    }

    #[test]
    fn test_tween_end_is_settled_exactly() {
        let tween = ExpansionTween::new();
        let end = tween.sample(ExpansionTween::DURATION);
        assert_eq!(end, SceneParams::SETTLED);
        assert_eq!(end.radius, 1.618);
        assert_eq!(end.spin, TAU);
        assert_eq!(end.randomness, 0.5);
        assert_eq!(end.rotation, 2.0 * TAU);
        // Still settled well past the duration; the tween terminates.
        assert_eq!(tween.sample(1000.0), SceneParams::SETTLED);
        assert!(tween.finished(ExpansionTween::DURATION));
    }

    #[test]
    fn test_tween_is_monotonic() {
        let tween = ExpansionTween::new();
        let mut last = -1.0;
        for i in 0..=50 {
            let p = tween.sample(i as f32 * 0.1);
            assert!(p.radius >= last);
            last = p.radius;
        }
    }

    #[test]
    fn test_color_cycle_visits_all_pairs() {
        let cycle = ColorCycle::new();
        let mut seen = [false; 6];
        for i in 0..12 {
            seen[cycle.index(i as f32)] = true;
        }
        assert!(seen.iter().all(|&s| s), "every pair must be visited");
    }

    #[test]
    fn test_color_cycle_wraps_after_sixth_advance() {
        let cycle = ColorCycle::new();
        assert_eq!(cycle.index(0.0), 0);
        assert_eq!(cycle.index(2.5), 1);
        assert_eq!(cycle.index(11.0), 5);
        // Sixth advance lands back on the first pair.
        assert_eq!(cycle.index(12.5), 0);
    }

    #[test]
    fn test_color_cycle_settles_on_target_after_fade() {
        let cycle = ColorCycle::new();
        // One second into the second window the fade is complete.
        let settled = cycle.sample(3.0);
        assert!((settled.inner - COLOR_PAIRS[1].inner).length() < EPS);
        assert!((settled.outer - COLOR_PAIRS[1].outer).length() < EPS);
    }

    #[test]
    fn test_color_cycle_blends_during_fade() {
        let cycle = ColorCycle::new();
        let mid = cycle.sample(2.5);
        let a = COLOR_PAIRS[0].inner;
        let b = COLOR_PAIRS[1].inner;
        // Strictly between the two endpoints.
        assert!((mid.inner - a).length() > EPS);
        assert!((mid.inner - b).length() > EPS);
    }

    #[test]
    fn test_color_cycle_initial_pair_holds_before_first_advance() {
        let cycle = ColorCycle::new();
        let p = cycle.sample(1.9);
        assert!((p.inner - COLOR_PAIRS[0].inner).length() < EPS);
    }
}
