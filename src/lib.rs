//! # Stardrift
//!
//! An animated spiral-galaxy particle scene rendered on the GPU: a 16k-star
//! spiral disk inside an 8k-star universe sphere, with a looping shooting-star
//! layer and a decorative sprite overlay. The whole artifact is a declarative
//! scene assembly; per-particle seeds are rolled once at startup and the GPU
//! programs re-derive every frame's placement deterministically from them.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stardrift::app::App;
//! use stardrift::scene::SceneConfig;
//! use winit::event_loop::{ControlFlow, EventLoop};
//!
//! let scene = SceneConfig::new().with_branches(2).build()?;
//! let event_loop = EventLoop::new()?;
//! event_loop.set_control_flow(ControlFlow::Poll);
//! event_loop.run_app(&mut App::new(scene))?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! A field is a fixed-size collection of particles sharing a distribution
//! kind ([`field::FieldKind`]) and rendering parameters. Field sizes are
//! fixed at construction; shooting stars are recycled through a repeating
//! life window rather than respawned.
//!
//! ### Seeds
//!
//! Each particle stores an immutable random triple. The placement math in
//! [`placement`] and its WGSL mirror in [`shader`] derive identical
//! deterministic offsets from the same seed, so nothing per-particle is
//! recomputed or uploaded after startup.
//!
//! ### Sequencers
//!
//! [`sequence::ExpansionTween`] expands the galaxy once over five seconds;
//! [`sequence::ColorCycle`] cross-fades the core/rim palette forever. Both
//! are pure functions of elapsed time.

pub mod app;
pub mod error;
pub mod field;
pub mod gpu;
pub mod placement;
pub mod scene;
pub mod sequence;
pub mod shader;
pub mod sprite;
pub mod starfall;
pub mod texture;
pub mod time;

pub use glam::{Vec2, Vec3, Vec4};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use stardrift::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ConfigError, GpuError, RunError, TextureError};
    pub use crate::field::{FieldKind, SharedParams, StarField};
    pub use crate::placement::{disk_placement, spherical_scatter, DiskProfile};
    pub use crate::scene::{FrameState, Scene, SceneConfig};
    pub use crate::sequence::{ColorCycle, ColorPair, ExpansionTween, SceneParams};
    pub use crate::sprite::SpriteLayer;
    pub use crate::starfall::StarfallField;
    pub use crate::texture::TextureConfig;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3, Vec4};
}
