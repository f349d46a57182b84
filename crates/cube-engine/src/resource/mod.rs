//! GPU resource ownership.
//!
//! [`GpuHandle`] wraps a single wgpu object with an explicit release
//! operation; [`ResourceScope`] owns a stack of handles and releases them in
//! reverse order when it closes. Every acquisition names its scope at the
//! call site.

mod error;
mod handle;
mod scope;

pub use error::{ReleaseError, ResourceError, ScopeError};
pub use handle::{GpuHandle, GpuObject, Releasable, ResourceKind};
pub use scope::ResourceScope;
