//! Texture data for the particle masks and sprite overlay.
//!
//! Textures are plain CPU-side RGBA buffers handed to the GPU layer for
//! upload. The radial alpha mask every particle program samples is generated
//! procedurally here; sprite images are decoded from disk, and a failed load
//! degrades that one sprite (logged, left untextured) rather than aborting
//! scene construction.

use crate::error::TextureError;
use std::path::Path;

/// Side length of the procedural alpha mask, in pixels.
pub const ALPHA_MAP_SIZE: u32 = 32;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering.
    Nearest,
}

/// Address mode for texture wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to edge color (default).
    #[default]
    ClampToEdge,
    /// Repeat/tile the texture.
    Repeat,
}

/// Configuration for a single texture.
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Filter mode for magnification/minification.
    pub filter: FilterMode,
    /// Address mode for UV coordinates outside 0-1.
    pub address_mode: AddressMode,
}

impl TextureConfig {
    /// Create a texture configuration from raw RGBA data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    /// Load a texture from an image file (PNG or JPEG).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let tex = TextureConfig::from_file("assets/sprites/1.png")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        })
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the address mode for UV wrapping.
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }
}

/// Generate the radial alpha mask sampled by every particle program.
///
/// A 32x32 sprite: a soft radial core (opaque to t=0.1, fading out by t=0.6)
/// composited over a four-pointed cross of 2-px streak bars shaded by a
/// radial gradient. The shaders read the green channel and discard fragments
/// below 0.1.
pub fn alpha_map() -> TextureConfig {
    let size = ALPHA_MAP_SIZE;
    let half = size as f32 / 2.0;
    let mut data = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 + 0.5 - half;
            let fy = y as f32 + 0.5 - half;
            let t = ((fx * fx + fy * fy).sqrt() / half).min(1.0);

            // Streak bars: the two center columns and two center rows,
            // shaded bright at the center and black at the rim.
            let on_bar = (x == size / 2 - 1 || x == size / 2)
                || (y == size / 2 - 1 || y == size / 2);
            let bar = if on_bar { 1.0 - t } else { 0.0 };

            // Soft core: opaque below t=0.1, gone above t=0.6.
            let s = ((t - 0.1) / 0.5).clamp(0.0, 1.0);
            let core_value = 1.0 - s;
            let core_alpha = 1.0 - s;

            // Source-over composite of the core onto the bars.
            let v = core_value * core_alpha + bar * (1.0 - core_alpha);
            let byte = (v.clamp(0.0, 1.0) * 255.0).round() as u8;

            data.extend_from_slice(&[byte, byte, byte, 255]);
        }
    }

    TextureConfig::from_rgba(data, size, size)
}
