//! Per-frame rendering.
//!
//! The transform is re-derived from the frame counter every tick, uploaded to
//! the scene's uniform buffer, and one command buffer is recorded against the
//! surface's current texture.

mod error;
mod frame;
pub mod transform;

pub use error::FrameError;
pub use frame::{FrameOutcome, render_frame};
