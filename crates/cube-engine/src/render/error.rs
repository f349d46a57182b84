use crate::resource::ResourceError;
use crate::scene::UniformError;

/// Errors that abort the frame loop.
///
/// Recoverable surface failures are not errors; they surface as
/// [`super::FrameOutcome::Skipped`].
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Uniform(#[from] UniformError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("surface failure is not recoverable")]
    Surface(#[source] wgpu::SurfaceError),
}
