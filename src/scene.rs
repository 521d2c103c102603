//! Scene assembly and per-frame driving.
//!
//! [`SceneConfig`] validates and builds the whole particle scene;
//! [`Scene`] owns every piece of mutable animation state and is the single
//! writer of the live parameter set. The render host calls
//! [`Scene::advance`] exactly once per frame with the elapsed time and
//! receives a [`FrameState`] holding everything the uniform blocks need:
//! time is sampled once and divided per field (2, 3, 1) so all fields
//! animate from one consistent clock.
//!
//! # Example
//!
//! ```ignore
//! use stardrift::scene::SceneConfig;
//!
//! let mut scene = SceneConfig::new().with_branches(2).build()?;
//! // per frame:
//! let frame = scene.advance(elapsed);
//! ```

use crate::error::ConfigError;
use crate::field::{SharedParams, StarField, GALAXY_PARTICLES, UNIVERSE_PARTICLES};
use crate::placement::DiskProfile;
use crate::sequence::{ColorCycle, ColorPair, ExpansionTween, SceneParams};
use crate::sprite::{default_sprite_paths, SpriteLayer};
use crate::starfall::{StarfallField, SHOOTING_STARS};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Shader-time divisor of the galaxy field.
pub const GALAXY_TIME_DIVISOR: f32 = 2.0;

/// Shader-time divisor of the universe field.
pub const UNIVERSE_TIME_DIVISOR: f32 = 3.0;

/// The universe rotates this much slower than the disk (parallax).
pub const UNIVERSE_ROTATION_RATIO: f32 = 3.0;

/// Default number of spiral arms.
pub const DEFAULT_BRANCHES: u32 = 2;

/// Builder for a [`Scene`].
///
/// Validates its inputs at [`SceneConfig::build`] and fails fast with a
/// descriptive error instead of letting bad values reach the distribution
/// math.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    branches: u32,
    galaxy_particles: u32,
    universe_particles: u32,
    shooting_stars: u32,
    sprite_paths: Vec<String>,
}

impl SceneConfig {
    /// Create a configuration with the standard counts and assets.
    pub fn new() -> Self {
        Self {
            branches: DEFAULT_BRANCHES,
            galaxy_particles: GALAXY_PARTICLES,
            universe_particles: UNIVERSE_PARTICLES,
            shooting_stars: SHOOTING_STARS,
            sprite_paths: default_sprite_paths(),
        }
    }

    /// Set the number of spiral arms.
    pub fn with_branches(mut self, branches: u32) -> Self {
        self.branches = branches;
        self
    }

    /// Set the galaxy disk particle count.
    pub fn with_galaxy_particles(mut self, count: u32) -> Self {
        self.galaxy_particles = count;
        self
    }

    /// Set the background universe particle count.
    pub fn with_universe_particles(mut self, count: u32) -> Self {
        self.universe_particles = count;
        self
    }

    /// Set the shooting-star count.
    pub fn with_shooting_stars(mut self, count: u32) -> Self {
        self.shooting_stars = count;
        self
    }

    /// Replace the sprite overlay asset list.
    pub fn with_sprite_paths(mut self, paths: Vec<String>) -> Self {
        self.sprite_paths = paths;
        self
    }

    /// Validate the configuration and build the scene.
    pub fn build(self) -> Result<Scene, ConfigError> {
        if self.branches == 0 {
            return Err(ConfigError::NoBranches);
        }
        if self.galaxy_particles == 0 {
            return Err(ConfigError::EmptyField("galaxy"));
        }
        if self.universe_particles == 0 {
            return Err(ConfigError::EmptyField("universe"));
        }
        if self.shooting_stars == 0 {
            return Err(ConfigError::EmptyField("starfall"));
        }

        let mut rng = SmallRng::from_entropy();

        let settled = SceneParams::SETTLED;
        let settled_profile = DiskProfile::new(
            settled.radius,
            settled.spin,
            self.branches,
            settled.randomness,
        );

        Ok(Scene {
            galaxy: StarField::galaxy(self.galaxy_particles, &mut rng),
            universe: StarField::universe(self.universe_particles, &mut rng),
            starfall: StarfallField::generate(self.shooting_stars, &mut rng),
            sprites: SpriteLayer::generate(&self.sprite_paths, &settled_profile, &mut rng),
            tween: ExpansionTween::new(),
            colors: ColorCycle::new(),
            params: SceneParams::COLLAPSED,
            shared: SharedParams::collapsed(1.0),
            branches: self.branches,
        })
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the uniform blocks need for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameState {
    /// Live animation parameter set.
    pub params: SceneParams,
    /// Parameters shared by the galaxy and universe programs.
    pub shared: SharedParams,
    /// Displayed color pair.
    pub colors: ColorPair,
    /// Shader time of the galaxy program.
    pub galaxy_time: f32,
    /// Shader time of the universe program.
    pub universe_time: f32,
    /// Shader time of the shooting-star program.
    pub starfall_time: f32,
    /// Scene-graph Y rotation of the disk field and sprite group.
    pub galaxy_rotation: f32,
    /// Scene-graph Y rotation of the universe field.
    pub universe_rotation: f32,
    /// Whether the sprite overlay is shown this frame.
    pub sprites_visible: bool,
}

/// The assembled scene.
///
/// Owns the fields, the sprite layer, both sequencers and the live parameter
/// set. All mutation happens inside [`Scene::advance`], once per frame.
pub struct Scene {
    galaxy: StarField,
    universe: StarField,
    starfall: StarfallField,
    sprites: SpriteLayer,
    tween: ExpansionTween,
    colors: ColorCycle,
    params: SceneParams,
    shared: SharedParams,
    branches: u32,
}

impl Scene {
    /// Advance the animation state to `elapsed` seconds and produce the
    /// frame's uniform values.
    pub fn advance(&mut self, elapsed: f32) -> FrameState {
        self.params = self.tween.sample(elapsed);
        self.shared.radius = self.params.radius;

        FrameState {
            params: self.params,
            shared: self.shared,
            colors: self.colors.sample(elapsed),
            galaxy_time: elapsed / GALAXY_TIME_DIVISOR,
            universe_time: elapsed / UNIVERSE_TIME_DIVISOR,
            starfall_time: elapsed,
            galaxy_rotation: self.params.rotation,
            universe_rotation: self.params.rotation / UNIVERSE_ROTATION_RATIO,
            sprites_visible: self.sprites.visible(elapsed),
        }
    }

    /// Set the pixel-size scale (the window's scale factor, capped by the
    /// render host).
    pub fn set_size_scale(&mut self, scale: f32) {
        self.shared.size_scale = scale;
    }

    /// The galaxy disk field.
    #[inline]
    pub fn galaxy(&self) -> &StarField {
        &self.galaxy
    }

    /// The background universe field.
    #[inline]
    pub fn universe(&self) -> &StarField {
        &self.universe
    }

    /// The shooting-star field.
    #[inline]
    pub fn starfall(&self) -> &StarfallField {
        &self.starfall
    }

    /// The sprite overlay.
    #[inline]
    pub fn sprites(&self) -> &SpriteLayer {
        &self.sprites
    }

    /// Number of spiral arms.
    #[inline]
    pub fn branches(&self) -> u32 {
        self.branches
    }

    /// The live animation parameter set.
    #[inline]
    pub fn params(&self) -> SceneParams {
        self.params
    }
}
