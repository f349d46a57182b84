use wgpu::SurfaceError;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::resource::{GpuHandle, ResourceScope};
use crate::scene::{FrameCounter, Scene};

use super::FrameError;
use super::transform::{to_columns, transformation_matrix};

/// Result of one render attempt.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// A frame was submitted and presented; carries the frame counter after it.
    Rendered { frame: u64 },
    /// No surface texture was available; nothing was submitted.
    Skipped(SurfaceErrorAction),
}

/// Renders one frame of `scene`.
///
/// Every transient object (surface texture, its view, the encoder and the
/// command buffer) is registered in `scope`, which the caller closes at the
/// end of the tick.
pub fn render_frame(
    gpu: &Gpu,
    scene: &mut Scene,
    scope: &mut ResourceScope,
) -> Result<FrameOutcome, FrameError> {
    let transform = to_columns(transformation_matrix(scene.frame.get(), scene.projection));
    scene
        .uniform
        .write(gpu.queue(), bytemuck::cast_slice(&transform))?;

    present_or_skip(
        gpu.current_texture(),
        &mut scene.frame,
        |err| gpu.handle_surface_error(err),
        |surface_texture| {
            let surface_texture = GpuHandle::acquire_in(scope, "surface texture", surface_texture);

            let view = surface_texture
                .get()?
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            scene
                .pass
                .set_color_view(GpuHandle::acquire_in(scope, "presentable view", view));

            let encoder = GpuHandle::acquire_in(
                scope,
                "frame encoder",
                gpu.device()
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("cube frame encoder"),
                    }),
            );

            let mut recording = encoder.take()?;
            {
                let pipeline = scene.pipeline.get()?;
                let bind_group = scene.bind_group.get()?;
                let vertices = scene.vertex_buffer.get()?;

                let mut rpass = scene.pass.begin(&mut recording)?;
                rpass.set_pipeline(&pipeline);
                rpass.set_bind_group(0, &*bind_group, &[]);
                rpass.set_vertex_buffer(0, vertices.slice(..));
                rpass.draw(0..scene.vertex_count, 0..1);
            }

            let commands = GpuHandle::acquire_in(scope, "frame commands", recording.finish());
            gpu.queue().submit(std::iter::once(commands.take()?));
            surface_texture.take()?.present();
            Ok(())
        },
    )
}

/// Draws with an acquired surface texture, or decides how to skip.
///
/// The counter advances only after `draw` succeeds. A failed acquisition is
/// classified by `classify`; fatal failures become [`FrameError::Surface`].
pub(crate) fn present_or_skip<T>(
    acquired: Result<T, SurfaceError>,
    counter: &mut FrameCounter,
    classify: impl FnOnce(&SurfaceError) -> SurfaceErrorAction,
    draw: impl FnOnce(T) -> Result<(), FrameError>,
) -> Result<FrameOutcome, FrameError> {
    let texture = match acquired {
        Ok(texture) => texture,
        Err(err) => {
            let action = classify(&err);
            if action == SurfaceErrorAction::Fatal {
                log::error!("surface texture unavailable: {err}");
                return Err(FrameError::Surface(err));
            }
            log::warn!("skipping frame {}: {err} ({action:?})", counter.get());
            return Ok(FrameOutcome::Skipped(action));
        }
    };

    draw(texture)?;

    let frame = counter.advance();
    log::trace!("frame {frame} submitted");
    Ok(FrameOutcome::Rendered { frame })
}
