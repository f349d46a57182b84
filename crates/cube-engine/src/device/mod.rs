//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - negotiating and applying the one-time surface configuration
//! - handing out presentable textures and mapping surface errors

mod error;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::{SurfaceSize, select_alpha_mode, surface_error_action};
