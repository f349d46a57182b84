use std::f32::consts::PI;

use anyhow::{Context, Result, bail};
use glam::Mat4;

use crate::device::{Gpu, SurfaceSize};
use crate::resource::{GpuHandle, ResourceScope};

use super::geometry::Geometry;
use super::pass::RenderPassTemplate;
use super::uniform::{MATRIX_UNIFORM_SIZE, UniformBuffer};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Vertical field of view of the projection, in radians.
pub const FOV_Y: f32 = 2.0 * PI / 5.0;
pub const Z_NEAR: f32 = 1.0;
pub const Z_FAR: f32 = 100.0;

/// Shader sources and geometry the scene is built from.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub vertex_shader: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_shader: &'static str,
    pub fragment_entry: &'static str,
    pub geometry: Geometry,
}

impl SceneAssets {
    pub fn cube() -> Self {
        Self {
            vertex_shader: include_str!("shaders/cube.vert.wgsl"),
            vertex_entry: "vs_main",
            fragment_shader: include_str!("shaders/cube.frag.wgsl"),
            fragment_entry: "fs_main",
            geometry: Geometry::cube(),
        }
    }
}

/// Monotonic count of rendered frames.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct FrameCounter(u64);

impl FrameCounter {
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Counts one rendered frame and returns the new value.
    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// Persistent GPU state of the rotating cube.
///
/// Every handle is registered in the scope passed to [`Scene::build`] and is
/// released when that scope closes.
pub struct Scene {
    pub(crate) pipeline: GpuHandle<wgpu::RenderPipeline>,
    pub(crate) vertex_buffer: GpuHandle<wgpu::Buffer>,
    pub(crate) vertex_count: u32,
    pub(crate) uniform: UniformBuffer,
    pub(crate) bind_group: GpuHandle<wgpu::BindGroup>,
    pub(crate) depth_texture: GpuHandle<wgpu::Texture>,
    pub(crate) pass: RenderPassTemplate,
    pub(crate) projection: Mat4,
    pub(crate) frame: FrameCounter,
}

impl Scene {
    /// Allocates and wires every persistent object, in dependency order.
    ///
    /// The surface must already be configured. Any failure aborts the build;
    /// objects created so far stay registered in `scope` and are released
    /// with it.
    pub fn build(gpu: &Gpu, scope: &mut ResourceScope, assets: &SceneAssets) -> Result<Self> {
        anyhow::ensure!(gpu.is_configured(), "surface must be configured before building the scene");

        let device = gpu.device();
        let size = gpu.size();

        // Stands in for the color view until the first frame assigns a real one.
        let placeholder = create_depth_texture(device, scope, "placeholder attachment", SurfaceSize::new(1, 1));
        let placeholder_view = create_view(scope, &placeholder, "placeholder attachment view")?;

        let vertex_buffer = upload_vertices(device, scope, &assets.geometry);

        let vs = compile_shader(device, scope, "cube vertex shader", assets.vertex_shader)?;
        let fs = compile_shader(device, scope, "cube fragment shader", assets.fragment_shader)?;

        let attributes = assets.geometry.attributes();
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube pipeline"),
            // Layout is derived from the shaders; bind group 0 is read back below.
            layout: None,

            vertex: wgpu::VertexState {
                module: &*vs.get()?,
                entry_point: Some(assets.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[assets.geometry.layout(&attributes)],
            },

            fragment: Some(wgpu::FragmentState {
                module: &*fs.get()?,
                entry_point: Some(assets.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),

            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },

            multiview_mask: None,
            cache: None,
        });
        let pipeline = GpuHandle::acquire_in(scope, "cube pipeline", pipeline);

        let depth_texture = create_depth_texture(device, scope, "depth texture", size);
        let depth_view = create_view(scope, &depth_texture, "depth view")?;

        let uniform = UniformBuffer::new(device, scope, "transform uniform", MATRIX_UNIFORM_SIZE);

        let layout = GpuHandle::acquire_in(
            scope,
            "cube bind group layout",
            pipeline.get()?.get_bind_group_layout(0),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cube bind group"),
            layout: &*layout.get()?,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.handle().get()?.as_entire_binding(),
            }],
        });
        let bind_group = GpuHandle::acquire_in(scope, "cube bind group", bind_group);

        let pass = RenderPassTemplate::new("cube pass", placeholder_view, depth_view);
        let projection = projection_matrix(size);

        log::info!(
            "scene built: {} vertices, depth {}x{}, format {:?}",
            assets.geometry.vertex_count,
            size.width,
            size.height,
            gpu.surface_format()
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            vertex_count: assets.geometry.vertex_count,
            uniform,
            bind_group,
            depth_texture,
            pass,
            projection,
            frame: FrameCounter::default(),
        })
    }

    /// Number of frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame.get()
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn depth_texture(&self) -> &GpuHandle<wgpu::Texture> {
        &self.depth_texture
    }
}

/// Perspective projection for the given surface size.
pub fn projection_matrix(size: SurfaceSize) -> Mat4 {
    Mat4::perspective_rh(FOV_Y, size.aspect(), Z_NEAR, Z_FAR)
}

fn create_depth_texture(
    device: &wgpu::Device,
    scope: &mut ResourceScope,
    label: &str,
    size: SurfaceSize,
) -> GpuHandle<wgpu::Texture> {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    GpuHandle::acquire_in(scope, label, texture)
}

fn create_view(
    scope: &mut ResourceScope,
    texture: &GpuHandle<wgpu::Texture>,
    label: &str,
) -> Result<GpuHandle<wgpu::TextureView>> {
    let view = texture.get()?.create_view(&wgpu::TextureViewDescriptor {
        label: Some(label),
        ..Default::default()
    });
    Ok(GpuHandle::acquire_in(scope, label, view))
}

/// Writes the vertices through a buffer mapped at creation, then unmaps it.
fn upload_vertices(
    device: &wgpu::Device,
    scope: &mut ResourceScope,
    geometry: &Geometry,
) -> GpuHandle<wgpu::Buffer> {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cube vertices"),
        size: geometry.vertices.len() as u64,
        usage: wgpu::BufferUsages::VERTEX,
        mapped_at_creation: true,
    });

    buffer
        .slice(..)
        .get_mapped_range_mut()
        .copy_from_slice(geometry.vertices);
    buffer.unmap();

    GpuHandle::acquire_in(scope, "cube vertices", buffer)
}

fn compile_shader(
    device: &wgpu::Device,
    scope: &mut ResourceScope,
    label: &str,
    source: &str,
) -> Result<GpuHandle<wgpu::ShaderModule>> {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let module = GpuHandle::acquire_in(scope, label, module);

    let info = pollster::block_on(module.get()?.get_compilation_info());
    report_compilation(label, &info.messages)
        .with_context(|| format!("failed to compile {label}"))?;

    Ok(module)
}

/// Forwards compiler messages to the log; fails when any is an error.
pub(crate) fn report_compilation(label: &str, messages: &[wgpu::CompilationMessage]) -> Result<()> {
    let mut errors = 0usize;

    for msg in messages {
        let position = msg
            .location
            .as_ref()
            .map(|l| format!("{}:{}", l.line_number, l.line_position))
            .unwrap_or_else(|| "?".to_string());

        match msg.message_type {
            wgpu::CompilationMessageType::Error => {
                errors += 1;
                log::error!("{label} [{position}]: {}", msg.message);
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("{label} [{position}]: {}", msg.message);
            }
            wgpu::CompilationMessageType::Info => {
                log::info!("{label} [{position}]: {}", msg.message);
            }
        }
    }

    if errors > 0 {
        bail!("{errors} shader compilation error(s) in {label}");
    }
    Ok(())
}
