use anyhow::{Context, Result};

use super::SurfaceErrorAction;

/// Pixel size of the presentable surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Picks the surface color format.
///
/// The first advertised format is the surface's native preference; sRGB
/// variants win only when explicitly requested and available.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

/// Returns `preferred` when the surface supports it, `Opaque` otherwise.
pub fn select_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    preferred: wgpu::CompositeAlphaMode,
) -> wgpu::CompositeAlphaMode {
    if supported.contains(&preferred) {
        preferred
    } else {
        wgpu::CompositeAlphaMode::Opaque
    }
}

/// Builds the one-time presentation configuration for the surface.
pub(crate) fn surface_configuration(
    caps: &wgpu::SurfaceCapabilities,
    format: wgpu::TextureFormat,
    size: SurfaceSize,
    present_mode: wgpu::PresentMode,
    preferred_alpha_mode: wgpu::CompositeAlphaMode,
    desired_maximum_frame_latency: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode: select_alpha_mode(&caps.alpha_modes, preferred_alpha_mode),
        view_formats: vec![],
        desired_maximum_frame_latency,
    }
}

/// Binds `device` to `surface` for presentation.
pub(crate) fn configure_surface(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> Result<()> {
    anyhow::ensure!(
        config.width > 0 && config.height > 0,
        "surface has zero size"
    );

    surface.configure(device, config);

    log::info!(
        "surface configured: {}x{} {:?}, alpha {:?}, present {:?}",
        config.width,
        config.height,
        config.format,
        config.alpha_mode,
        config.present_mode
    );
    Ok(())
}

/// Picks the surface format, failing setup when nothing is advertised.
pub(crate) fn require_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Result<wgpu::TextureFormat> {
    choose_surface_format(caps, prefer_srgb).context("no supported surface formats")
}

/// What the frame renderer should do about a failed texture acquisition.
pub fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

/// Applies [`surface_error_action`], reconfiguring the surface when asked to.
pub(crate) fn map_surface_error(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: Option<&wgpu::SurfaceConfiguration>,
    err: &wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = surface_error_action(err);
    if action == SurfaceErrorAction::Reconfigured {
        if let Some(config) = config.filter(|c| c.width > 0 && c.height > 0) {
            surface.configure(device, config);
        }
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes,
            ..Default::default()
        }
    }

    #[test]
    fn preferred_alpha_mode_is_used_when_supported() {
        let supported = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::Inherit,
        ];
        assert_eq!(
            select_alpha_mode(&supported, wgpu::CompositeAlphaMode::Inherit),
            wgpu::CompositeAlphaMode::Inherit
        );
    }

    #[test]
    fn unsupported_alpha_mode_falls_back_to_opaque() {
        let supported = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(
            select_alpha_mode(&supported, wgpu::CompositeAlphaMode::Inherit),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(
            select_alpha_mode(&[], wgpu::CompositeAlphaMode::Inherit),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn native_format_is_first_advertised() {
        let c = caps(
            vec![
                wgpu::TextureFormat::Bgra8Unorm,
                wgpu::TextureFormat::Bgra8UnormSrgb,
            ],
            vec![],
        );
        assert_eq!(
            choose_surface_format(&c, false),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn missing_formats_is_a_setup_error() {
        let c = caps(vec![], vec![wgpu::CompositeAlphaMode::Opaque]);
        assert!(require_surface_format(&c, false).is_err());
    }

    #[test]
    fn configuration_uses_render_attachment_and_negotiated_alpha() {
        let c = caps(
            vec![wgpu::TextureFormat::Rgba8Unorm],
            vec![wgpu::CompositeAlphaMode::Opaque],
        );
        let config = surface_configuration(
            &c,
            wgpu::TextureFormat::Rgba8Unorm,
            SurfaceSize::new(800, 600),
            wgpu::PresentMode::Fifo,
            wgpu::CompositeAlphaMode::Inherit,
            2,
        );
        assert_eq!(config.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn lost_and_outdated_surfaces_are_reconfigured() {
        for err in [wgpu::SurfaceError::Lost, wgpu::SurfaceError::Outdated] {
            assert_eq!(surface_error_action(&err), SurfaceErrorAction::Reconfigured);
        }
    }

    #[test]
    fn timeouts_skip_the_frame() {
        for err in [wgpu::SurfaceError::Timeout, wgpu::SurfaceError::Other] {
            assert_eq!(surface_error_action(&err), SurfaceErrorAction::SkipFrame);
        }
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
    }

    #[test]
    fn aspect_ratio() {
        assert!((SurfaceSize::new(800, 600).aspect() - 4.0 / 3.0).abs() < 1e-6);
    }
}
