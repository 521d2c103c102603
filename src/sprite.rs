//! Decorative sprite overlay.
//!
//! Thirty textured billboards scattered through the disk. Each sprite is
//! placed once at construction with the same disk-placement formula the
//! galaxy shader uses, evaluated at the settled disk parameters, and the
//! whole layer is revealed two seconds after program start so it appears
//! inside the opening expansion, never before it.
//!
//! Texture loading is the only fallible step: a failed load is logged with
//! its identifier and leaves that sprite untextured (skipped at draw), never
//! aborting construction.

use crate::placement::{disk_placement, DiskProfile};
use crate::texture::TextureConfig;
use glam::Vec3;
use rand::Rng;

/// Number of sprite instances in the overlay.
pub const SPRITE_COUNT: usize = 30;

/// Seconds after program start before the overlay becomes visible.
pub const REVEAL_DELAY: f32 = 2.0;

/// World-space size of each sprite.
pub const SPRITE_SCALE: f32 = 0.2;

/// A single placed sprite.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Fixed world position, rolled at construction.
    pub position: Vec3,
    /// World-space size.
    pub scale: f32,
    /// Decoded image, or `None` if the asset failed to load.
    pub texture: Option<TextureConfig>,
}

/// The sprite overlay layer.
#[derive(Debug, Clone)]
pub struct SpriteLayer {
    sprites: Vec<Sprite>,
}

impl SpriteLayer {
    /// Place one sprite per path on the settled disk.
    ///
    /// `profile` should be the settled disk parameters so the sprites land
    /// where the fully expanded galaxy will be. Each sprite gets its own
    /// distance from center in `[0.2, 0.9)`.
    pub fn generate<R: Rng>(paths: &[String], profile: &DiskProfile, rng: &mut R) -> Self {
        let sprites = paths
            .iter()
            .map(|path| {
                let dist = rng.gen::<f32>() * 0.7 + 0.2;
                let seed = Vec3::new(rng.gen(), rng.gen(), rng.gen());
                let texture = match TextureConfig::from_file(path) {
                    Ok(tex) => Some(tex),
                    Err(e) => {
                        log::warn!("could not load sprite texture '{}': {}", path, e);
                        None
                    }
                };
                Sprite {
                    position: disk_placement(dist, seed, profile),
                    scale: SPRITE_SCALE,
                    texture,
                }
            })
            .collect();
        Self { sprites }
    }

    /// Whether the layer is shown at `elapsed` seconds after start.
    #[inline]
    pub fn visible(&self, elapsed: f32) -> bool {
        elapsed >= REVEAL_DELAY
    }

    /// The placed sprites.
    #[inline]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Number of sprites (textured or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether the layer holds no sprites.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// The default overlay asset list: ten images, each used three times.
pub fn default_sprite_paths() -> Vec<String> {
    (0..SPRITE_COUNT)
        .map(|i| format!("assets/sprites/{}.png", i % 10 + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::f32::consts::TAU;

    fn settled_profile() -> DiskProfile {
        DiskProfile::new(1.618, TAU, 2, 0.5)
    }

    #[test]
    fn test_default_paths() {
        let paths = default_sprite_paths();
        assert_eq!(paths.len(), SPRITE_COUNT);
        assert_eq!(paths[0], "assets/sprites/1.png");
        assert_eq!(paths[9], "assets/sprites/10.png");
        assert_eq!(paths[10], "assets/sprites/1.png");
    }

    #[test]
    fn test_layer_survives_missing_assets() {
        let mut rng = SmallRng::seed_from_u64(3);
        let paths = vec!["no/such/file.png".to_string(); 4];
        let layer = SpriteLayer::generate(&paths, &settled_profile(), &mut rng);
        assert_eq!(layer.len(), 4);
        assert!(layer.sprites().iter().all(|s| s.texture.is_none()));
    }

    #[test]
    fn test_sprites_inside_disk() {
        let mut rng = SmallRng::seed_from_u64(3);
        let layer = SpriteLayer::generate(&default_sprite_paths(), &settled_profile(), &mut rng);
        for sprite in layer.sprites() {
            // Base placement tops out at 0.9 * radius, plus bounded scatter.
            assert!(sprite.position.length() < 0.9 * 1.618 + 0.5 + 1e-4);
            assert_eq!(sprite.scale, SPRITE_SCALE);
        }
    }

    #[test]
    fn test_reveal_delay() {
        let mut rng = SmallRng::seed_from_u64(3);
        let layer = SpriteLayer::generate(&[], &settled_profile(), &mut rng);
        assert!(!layer.visible(0.0));
        assert!(!layer.visible(1.99));
        assert!(layer.visible(REVEAL_DELAY));
        assert!(layer.visible(10.0));
    }
}
