use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::window::Window;

use super::surface::{self, SurfaceSize};
use super::{GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects and the presentable surface.
///
/// This type is the graphics context the scene and frame renderer consume:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates the Surface and records its capabilities and preferred format
/// - configures the surface exactly once via [`Gpu::configure_surface`]
pub struct Gpu {
    /// Surface bound to the window.
    surface: wgpu::Surface<'static>,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Capabilities advertised by the surface for the selected adapter.
    caps: wgpu::SurfaceCapabilities,

    /// Color format the surface will be configured with.
    format: wgpu::TextureFormat,

    /// Drawable size in physical pixels, sampled at creation.
    size: SurfaceSize,

    /// Present once the surface has been configured.
    config: Option<wgpu::SurfaceConfiguration>,

    init: GpuInit,
}

impl Gpu {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let inner = window.inner_size();
        anyhow::ensure!(inner.width > 0 && inner.height > 0, "window has zero size");
        let size = SurfaceSize::new(inner.width, inner.height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        log::info!("using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("hello-cube device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::require_surface_format(&caps, init.prefer_srgb)?;

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            caps,
            format,
            size,
            config: None,
            init,
        })
    }

    /// Negotiates the alpha mode and configures the surface for presentation.
    ///
    /// Must be called once, before any frame is acquired.
    pub fn configure_surface(&mut self) -> Result<()> {
        anyhow::ensure!(self.config.is_none(), "surface is already configured");

        let config = surface::surface_configuration(
            &self.caps,
            self.format,
            self.size,
            self.init.present_mode,
            self.init.preferred_alpha_mode,
            self.init.desired_maximum_frame_latency,
        );
        surface::configure_surface(&self.surface, &self.device, &config)?;
        self.config = Some(config);
        Ok(())
    }

    /// Returns the surface color format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Returns the drawable size (physical pixels).
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Acquires the next presentable texture.
    pub fn current_texture(&self) -> std::result::Result<wgpu::SurfaceTexture, SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&self, err: &SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, self.config.as_ref(), err)
    }
}
