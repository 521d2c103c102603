//! Particle field construction.
//!
//! A field is a fixed-size collection of per-particle attribute records plus
//! a distribution kind. Records are populated with their random seeds once at
//! construction and never mutated afterward; the GPU programs re-derive every
//! frame's placement deterministically from the stored seeds, never from
//! frame time.
//!
//! # Fields
//!
//! | Field | Particles | Distribution |
//! |-------|-----------|--------------|
//! | galaxy | 16384 | spiral disk |
//! | universe | 8192 | compressed sphere |
//! | starfall | 200 | sphere shell (see [`crate::starfall`]) |

use bytemuck::{Pod, Zeroable};
use rand::Rng;

/// Default particle count of the galaxy disk field (128^2).
pub const GALAXY_PARTICLES: u32 = 16384;

/// Default particle count of the background universe field.
pub const UNIVERSE_PARTICLES: u32 = 8192;

/// Distribution kind of a particle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Spiral galaxy disk.
    Disk,
    /// Background universe sphere.
    Sphere,
    /// Transient shooting-star streaks.
    ShootingStar,
}

/// Per-particle attribute record, uploaded once as instance data.
///
/// `position[0]` of a disk particle stores the axial seed (the particle's
/// disk-radius parameter in `[0, 1)`, reused every frame, never recomputed);
/// `seed` holds three independent uniforms consumed by branch selection and
/// scatter. Sphere particles derive placement fully from `seed` and keep
/// `position` zeroed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    /// Position seed (disk: axial seed in x).
    pub position: [f32; 3],
    /// Visual size factor in `[0.5, 2.5)`.
    pub size: f32,
    /// Three independent uniform randoms in `[0, 1)`.
    pub seed: [f32; 3],
    pub _pad: f32,
}

/// A fixed-size particle field.
///
/// Sizes are fixed at construction; no additions or removals during a run.
#[derive(Debug, Clone)]
pub struct StarField {
    kind: FieldKind,
    instances: Vec<StarInstance>,
}

impl StarField {
    /// Build the spiral galaxy disk field.
    pub fn galaxy<R: Rng>(count: u32, rng: &mut R) -> Self {
        let instances = (0..count)
            .map(|_| StarInstance {
                position: [rng.gen::<f32>(), 0.0, 0.0],
                size: rng.gen::<f32>() * 2.0 + 0.5,
                seed: [rng.gen(), rng.gen(), rng.gen()],
                _pad: 0.0,
            })
            .collect();
        Self {
            kind: FieldKind::Disk,
            instances,
        }
    }

    /// Build the background universe sphere field.
    pub fn universe<R: Rng>(count: u32, rng: &mut R) -> Self {
        let instances = (0..count)
            .map(|_| StarInstance {
                position: [0.0; 3],
                size: rng.gen::<f32>() * 2.0 + 0.5,
                seed: [rng.gen(), rng.gen(), rng.gen()],
                _pad: 0.0,
            })
            .collect();
        Self {
            kind: FieldKind::Sphere,
            instances,
        }
    }

    /// Distribution kind of this field.
    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Number of particles in this field.
    #[inline]
    pub fn len(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Whether the field holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The attribute records.
    #[inline]
    pub fn instances(&self) -> &[StarInstance] {
        &self.instances
    }

    /// Raw bytes for GPU upload.
    #[inline]
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Parameters shared between the galaxy and universe programs.
///
/// An explicit struct with a single writer (the scene), copied into both
/// uniform blocks every frame so one update affects both consumers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedParams {
    /// Pixel-size scale applied to every point sprite.
    pub size_scale: f32,
    /// Live disk radius, also scaling the universe sphere.
    pub radius: f32,
}

impl SharedParams {
    /// Shared parameters at program start (collapsed state).
    pub fn collapsed(size_scale: f32) -> Self {
        Self {
            size_scale,
            radius: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_galaxy_field_shape() {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = StarField::galaxy(GALAXY_PARTICLES, &mut rng);
        assert_eq!(field.kind(), FieldKind::Disk);
        assert_eq!(field.len(), 16384);
    }

    #[test]
    fn test_galaxy_attribute_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = StarField::galaxy(1024, &mut rng);
        for star in field.instances() {
            assert!((0.0..1.0).contains(&star.position[0]));
            assert_eq!(star.position[1], 0.0);
            assert_eq!(star.position[2], 0.0);
            assert!((0.5..2.5).contains(&star.size));
            for s in star.seed {
                assert!((0.0..1.0).contains(&s));
            }
        }
    }

    #[test]
    fn test_universe_field_shape() {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = StarField::universe(UNIVERSE_PARTICLES, &mut rng);
        assert_eq!(field.kind(), FieldKind::Sphere);
        assert_eq!(field.len(), 8192);
        for star in field.instances() {
            assert_eq!(star.position, [0.0; 3]);
        }
    }

    #[test]
    fn test_instance_stride() {
        // The render pipelines assume a 32-byte instance stride.
        assert_eq!(std::mem::size_of::<StarInstance>(), 32);
    }

    #[test]
    fn test_seeds_are_independent() {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = StarField::galaxy(64, &mut rng);
        let first = field.instances()[0];
        assert!(field.instances()[1..].iter().any(|s| s.seed != first.seed));
    }

    #[test]
    fn test_instance_bytes_length() {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = StarField::universe(10, &mut rng);
        assert_eq!(field.instance_bytes().len(), 10 * 32);
    }
}
