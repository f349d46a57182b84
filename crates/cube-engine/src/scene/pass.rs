use crate::resource::{GpuHandle, ResourceError};

/// Gray the color target is cleared to at the start of every pass.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 1.0,
};

/// Depth the depth target is cleared to (the far plane).
pub const DEPTH_CLEAR: f32 = 1.0;

pub struct ColorAttachmentTemplate {
    /// Overwritten with the presentable view every frame.
    pub view: GpuHandle<wgpu::TextureView>,
    pub ops: wgpu::Operations<wgpu::Color>,
}

pub struct DepthAttachmentTemplate {
    pub view: GpuHandle<wgpu::TextureView>,
    pub ops: wgpu::Operations<f32>,
}

/// Render-pass description built once at scene setup.
///
/// Only the color view changes between frames; everything else is reused.
pub struct RenderPassTemplate {
    pub label: &'static str,
    pub color: ColorAttachmentTemplate,
    pub depth: DepthAttachmentTemplate,
}

impl RenderPassTemplate {
    pub fn new(
        label: &'static str,
        placeholder_color: GpuHandle<wgpu::TextureView>,
        depth_view: GpuHandle<wgpu::TextureView>,
    ) -> Self {
        Self {
            label,
            color: ColorAttachmentTemplate {
                view: placeholder_color,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            },
            depth: DepthAttachmentTemplate {
                view: depth_view,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(DEPTH_CLEAR),
                    store: wgpu::StoreOp::Store,
                },
            },
        }
    }

    /// Points the color attachment at this frame's presentable view.
    pub fn set_color_view(&mut self, view: GpuHandle<wgpu::TextureView>) {
        self.color.view = view;
    }

    /// Begins a render pass on `encoder` using the current attachments.
    pub fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
    ) -> Result<wgpu::RenderPass<'e>, ResourceError> {
        let color_view = self.color.view.get()?;
        let depth_view = self.depth.view.get()?;

        Ok(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &color_view,
                resolve_target: None,
                ops: self.color.ops,
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth_view,
                depth_ops: Some(self.depth.ops),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        }))
    }
}
