//! GPU state and per-frame rendering.
//!
//! The render host: owns the surface, device, pipelines and buffers, and
//! draws the whole scene once per redraw. Per frame it samples the clock
//! once, advances the scene, rewrites the four uniform blocks and issues one
//! render pass: galaxy, universe, shooting stars, then any visible sprites.
//!
//! All particle state lives in instance buffers uploaded once at startup;
//! nothing per-particle is touched again after construction.

mod camera;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::scene::{FrameState, Scene};
use crate::shader::{
    compose, GalaxyUniforms, SpriteUniforms, StarfallUniforms, UniverseUniforms, GALAXY_WGSL,
    SPRITE_WGSL, STARFALL_WGSL, UNIVERSE_WGSL,
};
use crate::starfall::{LIFE_SPAN, SPEED};
use crate::texture::{self, AddressMode, FilterMode, TextureConfig};
use crate::time::Time;

pub use camera::Camera;

/// Additive blending for every layer.
const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

const STAR_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x3,
    },
];

const STREAK_ATTRIBUTES: [wgpu::VertexAttribute; 5] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: 28,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        offset: 32,
        shader_location: 4,
        format: wgpu::VertexFormat::Float32x3,
    },
];

const SPRITE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32,
    },
];

/// Per-sprite instance data.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SpriteInstance {
    position: [f32; 3],
    scale: f32,
}

/// One particle field on the GPU: pipeline, instances, uniform block.
struct FieldRenderer {
    pipeline: wgpu::RenderPipeline,
    instances: wgpu::Buffer,
    count: u32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    galaxy: FieldRenderer,
    universe: FieldRenderer,
    starfall: FieldRenderer,
    sprite_pipeline: wgpu::RenderPipeline,
    sprite_instances: wgpu::Buffer,
    sprite_uniforms: wgpu::Buffer,
    sprite_bind_group: wgpu::BindGroup,
    sprite_textures: Vec<Option<wgpu::BindGroup>>,
    alpha_map_bind_group: wgpu::BindGroup,
    pub camera: Camera,
    time: Time,
    scene: Scene,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, mut scene: Scene) -> Result<Self, GpuError> {
        let size = window.inner_size();
        scene.set_size_scale((window.scale_factor() as f32).min(2.0));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let alpha_map_bind_group = create_texture_bind_group(
            &device,
            &queue,
            &texture_layout,
            &texture::alpha_map(),
            "Alpha Map",
        );

        // One pipeline per field; all share the same bind group layouts.
        let star_layout = wgpu::VertexBufferLayout {
            array_stride: 32,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &STAR_ATTRIBUTES,
        };
        let streak_layout = wgpu::VertexBufferLayout {
            array_stride: 48,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &STREAK_ATTRIBUTES,
        };
        let sprite_layout = wgpu::VertexBufferLayout {
            array_stride: 16,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &SPRITE_ATTRIBUTES,
        };

        let galaxy_pipeline = create_pipeline(
            &device,
            "Galaxy Pipeline",
            &compose(GALAXY_WGSL),
            &uniform_layout,
            &texture_layout,
            star_layout.clone(),
            config.format,
        );
        let universe_pipeline = create_pipeline(
            &device,
            "Universe Pipeline",
            &compose(UNIVERSE_WGSL),
            &uniform_layout,
            &texture_layout,
            star_layout,
            config.format,
        );
        let starfall_pipeline = create_pipeline(
            &device,
            "Starfall Pipeline",
            &compose(STARFALL_WGSL),
            &uniform_layout,
            &texture_layout,
            streak_layout,
            config.format,
        );
        let sprite_pipeline = create_pipeline(
            &device,
            "Sprite Pipeline",
            SPRITE_WGSL,
            &uniform_layout,
            &texture_layout,
            sprite_layout,
            config.format,
        );

        let galaxy = FieldRenderer::new(
            &device,
            &uniform_layout,
            galaxy_pipeline,
            scene.galaxy().instance_bytes(),
            scene.galaxy().len(),
            std::mem::size_of::<GalaxyUniforms>(),
            "Galaxy",
        );
        let universe = FieldRenderer::new(
            &device,
            &uniform_layout,
            universe_pipeline,
            scene.universe().instance_bytes(),
            scene.universe().len(),
            std::mem::size_of::<UniverseUniforms>(),
            "Universe",
        );
        let starfall = FieldRenderer::new(
            &device,
            &uniform_layout,
            starfall_pipeline,
            scene.starfall().instance_bytes(),
            scene.starfall().len(),
            std::mem::size_of::<StarfallUniforms>(),
            "Starfall",
        );

        // Sprite overlay: shared uniform block, one texture bind group per
        // successfully loaded image. Untextured sprites are skipped at draw.
        let sprite_data: Vec<SpriteInstance> = scene
            .sprites()
            .sprites()
            .iter()
            .map(|s| SpriteInstance {
                position: s.position.to_array(),
                scale: s.scale,
            })
            .collect();
        let sprite_instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Instance Buffer"),
            contents: bytemuck::cast_slice(&sprite_data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sprite_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Uniform Buffer"),
            contents: bytemuck::bytes_of(&SpriteUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sprite_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: sprite_uniforms.as_entire_binding(),
            }],
        });
        let sprite_textures = scene
            .sprites()
            .sprites()
            .iter()
            .map(|s| {
                s.texture.as_ref().map(|tex| {
                    create_texture_bind_group(&device, &queue, &texture_layout, tex, "Sprite")
                })
            })
            .collect();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            galaxy,
            universe,
            starfall,
            sprite_pipeline,
            sprite_instances,
            sprite_uniforms,
            sprite_bind_group,
            sprite_textures,
            alpha_map_bind_group,
            camera: Camera::new(),
            time: Time::new(),
            scene,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn update_uniforms(&mut self) -> FrameState {
        let (elapsed, _delta) = self.time.update();
        let frame = self.scene.advance(elapsed);

        let aspect = self.config.width as f32 / self.config.height as f32;
        let proj = self.camera.projection_matrix(aspect).to_cols_array_2d();
        let view = self.camera.view_matrix();
        let resolution = [self.config.width as f32, self.config.height as f32];

        let galaxy_mv = (view * Mat4::from_rotation_y(frame.galaxy_rotation)).to_cols_array_2d();
        let universe_mv =
            (view * Mat4::from_rotation_y(frame.universe_rotation)).to_cols_array_2d();

        let galaxy_uniforms = GalaxyUniforms {
            proj,
            model_view: galaxy_mv,
            color_inner: frame.colors.inner.extend(1.0).to_array(),
            color_outer: frame.colors.outer.extend(1.0).to_array(),
            resolution,
            time: frame.galaxy_time,
            size_scale: frame.shared.size_scale,
            radius: frame.shared.radius,
            spin: frame.params.spin,
            randomness: frame.params.randomness,
            branches: self.scene.branches() as f32,
        };
        self.queue
            .write_buffer(&self.galaxy.uniforms, 0, bytemuck::bytes_of(&galaxy_uniforms));

        let universe_uniforms = UniverseUniforms {
            proj,
            model_view: universe_mv,
            resolution,
            time: frame.universe_time,
            size_scale: frame.shared.size_scale,
            radius: frame.shared.radius,
            _pad: [0.0; 3],
        };
        self.queue.write_buffer(
            &self.universe.uniforms,
            0,
            bytemuck::bytes_of(&universe_uniforms),
        );

        let starfall_uniforms = StarfallUniforms {
            proj,
            model_view: view.to_cols_array_2d(),
            resolution,
            time: frame.starfall_time,
            size_scale: frame.shared.size_scale,
            speed: SPEED,
            life_span: LIFE_SPAN,
            _pad: [0.0; 2],
        };
        self.queue.write_buffer(
            &self.starfall.uniforms,
            0,
            bytemuck::bytes_of(&starfall_uniforms),
        );

        // Sprites share the galaxy group's rotation.
        let sprite_uniforms = SpriteUniforms {
            proj,
            model_view: galaxy_mv,
        };
        self.queue
            .write_buffer(&self.sprite_uniforms, 0, bytemuck::bytes_of(&sprite_uniforms));

        frame
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.update_uniforms();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for field in [&self.galaxy, &self.universe, &self.starfall] {
                render_pass.set_pipeline(&field.pipeline);
                render_pass.set_bind_group(0, &field.bind_group, &[]);
                render_pass.set_bind_group(1, &self.alpha_map_bind_group, &[]);
                render_pass.set_vertex_buffer(0, field.instances.slice(..));
                render_pass.draw(0..6, 0..field.count);
            }

            if frame.sprites_visible {
                render_pass.set_pipeline(&self.sprite_pipeline);
                render_pass.set_bind_group(0, &self.sprite_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.sprite_instances.slice(..));
                for (i, texture) in self.sprite_textures.iter().enumerate() {
                    if let Some(texture) = texture {
                        render_pass.set_bind_group(1, texture, &[]);
                        render_pass.draw(0..6, i as u32..i as u32 + 1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl FieldRenderer {
    fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        pipeline: wgpu::RenderPipeline,
        instance_bytes: &[u8],
        count: u32,
        uniform_size: usize,
        label: &str,
    ) -> Self {
        let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            contents: instance_bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            contents: &vec![0u8; uniform_size],
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Uniform Bind Group", label)),
            layout: uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        Self {
            pipeline,
            instances,
            count,
            uniforms,
            bind_group,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_src: &str,
    uniform_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[uniform_layout, texture_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(ADDITIVE_BLEND),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        // Additive layers composite in draw order; no depth buffer.
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    config: &TextureConfig,
    label: &str,
) -> wgpu::BindGroup {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &config.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(config.width * 4),
            rows_per_image: Some(config.height),
        },
        wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
    );

    let filter = match config.filter {
        FilterMode::Linear => wgpu::FilterMode::Linear,
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
    };
    let address_mode = match config.address_mode {
        AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        AddressMode::Repeat => wgpu::AddressMode::Repeat,
    };
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}
