/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB surface format when available.
    ///
    /// When false the surface's native preferred (first advertised) format is used.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is always supported and provides the only back-pressure the
    /// frame loop relies on.
    pub present_mode: wgpu::PresentMode,

    /// Alpha compositing mode to use when the surface advertises it.
    ///
    /// Falls back to `Opaque` otherwise.
    pub preferred_alpha_mode: wgpu::CompositeAlphaMode,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            preferred_alpha_mode: wgpu::CompositeAlphaMode::Inherit,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
