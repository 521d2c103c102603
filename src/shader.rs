//! WGSL programs for the particle fields and sprite overlay.
//!
//! The vertex stages re-derive every particle's placement from its stored
//! seed each frame; the math here mirrors [`crate::placement`] and
//! [`crate::starfall`] exactly. Two utility functions (`hash2d`, `scatter`)
//! are shared by all particle programs: they live in [`SHARED_WGSL`], defined
//! once and prepended by [`compose`] into every program variant.
//!
//! Particles render as camera-facing instanced quads (six vertices per
//! instance). The pixel size `point_px` divided by the viewport resolution
//! and scaled by clip-space w reproduces point-sprite sizing
//! (`gl_PointSize / -z_view`).
//!
//! Attribute and uniform layouts are a fixed contract with the field
//! builders; the Pod structs below must match the WGSL blocks field for
//! field.

use bytemuck::{Pod, Zeroable};

/// Utility functions shared by every particle program.
pub const SHARED_WGSL: &str = r#"
const PI: f32 = 3.14159265359;
const TAU: f32 = 6.28318530718;

// Deterministic pseudo-random scalar in [0, 1) from a 2D seed.
fn hash2d(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(12.9898, 78.233))) * 43758.5453123);
}

// Unit sphere direction derived from a stored seed (inverse-CDF sampler).
fn scatter(seed: vec3<f32>) -> vec3<f32> {
    let u = hash2d(seed.xy);
    let v = hash2d(seed.yz);
    let theta = u * TAU;
    let phi = acos(2.0 * v - 1.0);
    return vec3<f32>(sin(phi) * cos(theta), sin(phi) * sin(theta), cos(phi));
}

// Quad corner for one of six vertices of an instanced billboard.
fn quad_corner(vertex_index: u32) -> vec2<f32> {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    return corners[vertex_index];
}
"#;

/// Spiral galaxy disk program.
pub const GALAXY_WGSL: &str = r#"
struct Uniforms {
    proj: mat4x4<f32>,
    model_view: mat4x4<f32>,
    color_inner: vec4<f32>,
    color_outer: vec4<f32>,
    resolution: vec2<f32>,
    time: f32,
    size_scale: f32,
    radius: f32,
    spin: f32,
    randomness: f32,
    branches: f32,
}

@group(0) @binding(0)
var<uniform> u: Uniforms;

@group(1) @binding(0)
var alpha_map: texture_2d<f32>;
@group(1) @binding(1)
var alpha_map_sampler: sampler;

struct VertexInput {
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) seed: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) dist: f32,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let corner = quad_corner(in.vertex_index);

    // Radial weights of the stored axial seed.
    let axial = in.position.x;
    let st = sqrt(axial);
    let qt = axial * axial;
    let mt = mix(st, qt, axial);

    // Spiral angle (farther wider) plus the branch offset.
    let angle = qt * u.spin * (2.0 - sqrt(1.0 - qt));
    let branch_offset = (TAU / u.branches) * floor(in.seed.x * u.branches);
    var p = vec3<f32>(
        axial * cos(angle + branch_offset) * u.radius,
        0.0,
        axial * sin(angle + branch_offset) * u.radius,
    );

    // Scatter, then flatten toward the plane near the center.
    p += scatter(in.seed) * hash2d(in.seed.zx) * u.randomness * mt;
    p.y *= 0.5 + qt * 0.5;

    // Rotate about Y, center faster.
    let ca = cos(-u.time * (2.0 - st) * 0.5);
    let sa = sin(-u.time * (2.0 - st) * 0.5);
    p = vec3<f32>(p.x * ca - p.z * sa, p.y, p.x * sa + p.z * ca);

    let view_pos = u.model_view * vec4<f32>(p, 1.0);
    var clip = u.proj * view_pos;
    let point_px = (10.0 * in.size * u.size_scale) / -view_pos.z;
    clip += vec4<f32>(corner * point_px / u.resolution * clip.w, 0.0, 0.0);

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = corner * 0.5 + 0.5;
    out.dist = mt;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = vec2<f32>(in.uv.x, 1.0 - in.uv.y);
    let a = textureSample(alpha_map, alpha_map_sampler, uv).g;
    if a < 0.1 {
        discard;
    }

    var color = mix(u.color_inner.rgb, u.color_outer.rgb, in.dist);

    // Sparkle cross on the brightest sprite texels.
    let c = step(0.99, (sin(in.uv.x * PI) + sin(in.uv.y * PI)) * 0.5);
    color = max(color, vec3<f32>(c));

    return vec4<f32>(color, a);
}
"#;

/// Background universe sphere program.
pub const UNIVERSE_WGSL: &str = r#"
struct Uniforms {
    proj: mat4x4<f32>,
    model_view: mat4x4<f32>,
    resolution: vec2<f32>,
    time: f32,
    size_scale: f32,
    radius: f32,
}

@group(0) @binding(0)
var<uniform> u: Uniforms;

@group(1) @binding(0)
var alpha_map: texture_2d<f32>;
@group(1) @binding(1)
var alpha_map_sampler: sampler;

// Universe size factor and ellipsoid scale.
const R: f32 = 3.0;
const S: vec3<f32> = vec3<f32>(2.1, 1.3, 2.1);

struct VertexInput {
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) seed: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let corner = quad_corner(in.vertex_index);

    var p = scatter(in.seed) * R * S;

    // Sweep to center: the 8th power biases mass toward the core.
    var q = hash2d(in.seed.zx);
    q = q * q;
    q = q * q;
    q = q * q;
    p *= q;

    // Sweep degenerate points out to the shell.
    var l = length(p) / (S.x * R);
    if l < 0.001 {
        p = p / l;
    }

    // Rotate about Y, center faster.
    var ql = 1.0 - l;
    ql = ql * ql;
    ql = ql * ql;
    ql = ql * ql;
    let ca = cos(-u.time * ql);
    let sa = sin(-u.time * ql);
    p = vec3<f32>(p.x * ca - p.z * sa, p.y, p.x * sa + p.z * ca);

    let view_pos = u.model_view * vec4<f32>(p * u.radius, 1.0);
    var clip = u.proj * view_pos;

    // Scale up core stars.
    let core = (2.0 - l) * (2.0 - l);
    let point_px = (R * in.size * u.size_scale * core) / -view_pos.z;
    clip += vec4<f32>(corner * point_px / u.resolution * clip.w, 0.0, 0.0);

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = corner * 0.5 + 0.5;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = vec2<f32>(in.uv.x, 1.0 - in.uv.y);
    let a = textureSample(alpha_map, alpha_map_sampler, uv).g;
    if a < 0.1 {
        discard;
    }
    return vec4<f32>(vec3<f32>(1.0), a);
}
"#;

/// Shooting-star streak program.
pub const STARFALL_WGSL: &str = r#"
struct Uniforms {
    proj: mat4x4<f32>,
    model_view: mat4x4<f32>,
    resolution: vec2<f32>,
    time: f32,
    size_scale: f32,
    speed: f32,
    life_span: f32,
}

@group(0) @binding(0)
var<uniform> u: Uniforms;

@group(1) @binding(0)
var alpha_map: texture_2d<f32>;
@group(1) @binding(1)
var alpha_map_sampler: sampler;

struct VertexInput {
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) velocity: vec3<f32>,
    @location(3) start_phase: f32,
    @location(4) color: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) progress: f32,
    @location(2) color: vec3<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let corner = quad_corner(in.vertex_index);

    // Repeating life window: travel outward, teleport back on wrap.
    let time_in_life = (u.time + in.start_phase) % u.life_span;
    let progress = time_in_life / u.life_span;
    let p = in.position + in.velocity * u.speed * time_in_life;

    let view_pos = u.model_view * vec4<f32>(p, 1.0);
    var clip = u.proj * view_pos;

    // Pulse: largest at mid-life.
    let pulsed = in.size * (1.0 + sin(progress * PI) * 1.5);
    let point_px = (pulsed * u.size_scale) / -view_pos.z;
    clip += vec4<f32>(corner * point_px / u.resolution * clip.w, 0.0, 0.0);

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = corner * 0.5 + 0.5;
    out.progress = progress;
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = vec2<f32>(in.uv.x, 1.0 - in.uv.y);
    let a = textureSample(alpha_map, alpha_map_sampler, uv).g;
    if a < 0.1 {
        discard;
    }

    // Fade in and out of the life window, peaking at the midpoint.
    let fade = pow(sin(in.progress * PI), 2.0);
    return vec4<f32>(in.color, a * fade * 0.9);
}
"#;

/// Decorative sprite billboard program (standalone; no shared utils).
pub const SPRITE_WGSL: &str = r#"
struct Uniforms {
    proj: mat4x4<f32>,
    model_view: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> u: Uniforms;

@group(1) @binding(0)
var sprite_tex: texture_2d<f32>;
@group(1) @binding(1)
var sprite_sampler: sampler;

struct VertexInput {
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) scale: f32,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = corners[in.vertex_index];

    // World-scaled billboard: offset in view space so it faces the camera.
    var view_pos = u.model_view * vec4<f32>(in.position, 1.0);
    view_pos += vec4<f32>(corner * in.scale * 0.5, 0.0, 0.0);

    var out: VertexOutput;
    out.clip_position = u.proj * view_pos;
    out.uv = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(sprite_tex, sprite_sampler, in.uv);
}
"#;

/// Prepend the shared utility module to a particle program.
///
/// One definition of `hash2d`/`scatter`, linked into every program variant.
pub fn compose(body: &str) -> String {
    format!("{}\n{}", SHARED_WGSL, body)
}

/// Uniform block of the galaxy program. Matches `Uniforms` in
/// [`GALAXY_WGSL`] field for field.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GalaxyUniforms {
    pub proj: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub color_inner: [f32; 4],
    pub color_outer: [f32; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub size_scale: f32,
    pub radius: f32,
    pub spin: f32,
    pub randomness: f32,
    pub branches: f32,
}

/// Uniform block of the universe program.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct UniverseUniforms {
    pub proj: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub size_scale: f32,
    pub radius: f32,
    pub _pad: [f32; 3],
}

/// Uniform block of the shooting-star program.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct StarfallUniforms {
    pub proj: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub size_scale: f32,
    pub speed: f32,
    pub life_span: f32,
    pub _pad: [f32; 2],
}

/// Uniform block of the sprite program.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpriteUniforms {
    pub proj: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_injects_shared_utils_once() {
        let src = compose(GALAXY_WGSL);
        assert_eq!(src.matches("fn hash2d").count(), 1);
        assert_eq!(src.matches("fn scatter").count(), 1);
        assert!(src.contains("fn vs_main"));
        assert!(src.contains("fn fs_main"));
    }

    #[test]
    fn test_uniform_block_sizes() {
        // WGSL std140-style layout: every block a multiple of 16 bytes.
        assert_eq!(std::mem::size_of::<GalaxyUniforms>(), 192);
        assert_eq!(std::mem::size_of::<UniverseUniforms>(), 160);
        assert_eq!(std::mem::size_of::<StarfallUniforms>(), 160);
        assert_eq!(std::mem::size_of::<SpriteUniforms>(), 128);
    }
}
