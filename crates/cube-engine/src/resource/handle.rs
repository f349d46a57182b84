use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use super::error::{ReleaseError, ResourceError};
use super::scope::ResourceScope;

/// Kind of device-side object behind a handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Buffer,
    Texture,
    TextureView,
    ShaderModule,
    BindGroupLayout,
    PipelineLayout,
    RenderPipeline,
    BindGroup,
    CommandEncoder,
    CommandBuffer,
    SurfaceTexture,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Buffer => "buffer",
            ResourceKind::Texture => "texture",
            ResourceKind::TextureView => "texture view",
            ResourceKind::ShaderModule => "shader module",
            ResourceKind::BindGroupLayout => "bind group layout",
            ResourceKind::PipelineLayout => "pipeline layout",
            ResourceKind::RenderPipeline => "render pipeline",
            ResourceKind::BindGroup => "bind group",
            ResourceKind::CommandEncoder => "command encoder",
            ResourceKind::CommandBuffer => "command buffer",
            ResourceKind::SurfaceTexture => "surface texture",
        };
        f.write_str(name)
    }
}

/// A GPU object type that can be owned by a [`GpuHandle`].
///
/// `release` consumes the object. Buffers and textures free their memory
/// eagerly; every other kind is released by dropping the last reference.
pub trait GpuObject: 'static {
    const KIND: ResourceKind;

    fn release(self) -> Result<(), String>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}

impl GpuObject for wgpu::Buffer {
    const KIND: ResourceKind = ResourceKind::Buffer;

    fn release(self) -> Result<(), String> {
        self.destroy();
        Ok(())
    }
}

impl GpuObject for wgpu::Texture {
    const KIND: ResourceKind = ResourceKind::Texture;

    fn release(self) -> Result<(), String> {
        self.destroy();
        Ok(())
    }
}

impl GpuObject for wgpu::TextureView {
    const KIND: ResourceKind = ResourceKind::TextureView;
}

impl GpuObject for wgpu::ShaderModule {
    const KIND: ResourceKind = ResourceKind::ShaderModule;
}

impl GpuObject for wgpu::BindGroupLayout {
    const KIND: ResourceKind = ResourceKind::BindGroupLayout;
}

impl GpuObject for wgpu::PipelineLayout {
    const KIND: ResourceKind = ResourceKind::PipelineLayout;
}

impl GpuObject for wgpu::RenderPipeline {
    const KIND: ResourceKind = ResourceKind::RenderPipeline;
}

impl GpuObject for wgpu::BindGroup {
    const KIND: ResourceKind = ResourceKind::BindGroup;
}

impl GpuObject for wgpu::CommandEncoder {
    const KIND: ResourceKind = ResourceKind::CommandEncoder;
}

impl GpuObject for wgpu::CommandBuffer {
    const KIND: ResourceKind = ResourceKind::CommandBuffer;
}

// Dropping an unpresented surface texture discards it.
impl GpuObject for wgpu::SurfaceTexture {
    const KIND: ResourceKind = ResourceKind::SurfaceTexture;
}

/// Type-erased view of a registered resource, as stored by [`ResourceScope`].
pub trait Releasable {
    fn kind(&self) -> ResourceKind;

    fn label(&self) -> &str;

    /// Identity of the underlying resource; clones of one handle share it.
    fn id(&self) -> usize;

    /// Releases the resource. Releasing an already released resource is a no-op.
    fn release(&self) -> Result<(), ReleaseError>;
}

struct Slot<T> {
    label: String,
    object: RefCell<Option<T>>,
}

/// Shared ownership handle around one GPU object.
///
/// Clones refer to the same object. The object is handed out by reference
/// through [`GpuHandle::get`], moved out by [`GpuHandle::take`] when a wgpu
/// call consumes it (`finish`, `submit`, `present`), and released at most once.
pub struct GpuHandle<T: GpuObject> {
    slot: Rc<Slot<T>>,
}

impl<T: GpuObject> GpuHandle<T> {
    pub fn new(label: impl Into<String>, object: T) -> Self {
        Self {
            slot: Rc::new(Slot {
                label: label.into(),
                object: RefCell::new(Some(object)),
            }),
        }
    }

    /// Wraps `object` and registers it in `scope` in one step.
    pub fn acquire_in(scope: &mut ResourceScope, label: impl Into<String>, object: T) -> Self {
        scope.acquire(Self::new(label, object))
    }

    pub fn kind(&self) -> ResourceKind {
        T::KIND
    }

    pub fn label(&self) -> &str {
        &self.slot.label
    }

    pub fn is_live(&self) -> bool {
        self.slot
            .object
            .try_borrow()
            .map(|o| o.is_some())
            .unwrap_or(true)
    }

    /// Borrows the live object.
    pub fn get(&self) -> Result<Ref<'_, T>, ResourceError> {
        let guard = self
            .slot
            .object
            .try_borrow()
            .map_err(|_| self.borrowed_error())?;

        Ref::filter_map(guard, Option::as_ref).map_err(|_| self.released_error())
    }

    /// Moves the object out; the handle reports it as released afterwards.
    pub fn take(&self) -> Result<T, ResourceError> {
        self.slot
            .object
            .try_borrow_mut()
            .map_err(|_| self.borrowed_error())?
            .take()
            .ok_or_else(|| self.released_error())
    }

    /// Releases the object now instead of waiting for the owning scope.
    pub fn release(&self) -> Result<(), ReleaseError> {
        let object = self
            .slot
            .object
            .try_borrow_mut()
            .map_err(|_| ReleaseError::Borrowed {
                kind: T::KIND,
                label: self.slot.label.clone(),
            })?
            .take();

        match object {
            Some(object) => object.release().map_err(|reason| ReleaseError::Failed {
                kind: T::KIND,
                label: self.slot.label.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Registers this handle in `scope`, returning it for chaining.
    pub fn register(self, scope: &mut ResourceScope) -> Self {
        scope.acquire(self)
    }

    fn released_error(&self) -> ResourceError {
        ResourceError::Released {
            kind: T::KIND,
            label: self.slot.label.clone(),
        }
    }

    fn borrowed_error(&self) -> ResourceError {
        ResourceError::Borrowed {
            kind: T::KIND,
            label: self.slot.label.clone(),
        }
    }
}

impl<T: GpuObject> Clone for GpuHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: GpuObject> fmt::Debug for GpuHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuHandle")
            .field("kind", &T::KIND)
            .field("label", &self.slot.label)
            .field("live", &self.is_live())
            .finish()
    }
}

impl<T: GpuObject> Releasable for GpuHandle<T> {
    fn kind(&self) -> ResourceKind {
        T::KIND
    }

    fn label(&self) -> &str {
        &self.slot.label
    }

    fn id(&self) -> usize {
        Rc::as_ptr(&self.slot) as *const () as usize
    }

    fn release(&self) -> Result<(), ReleaseError> {
        GpuHandle::release(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(Rc<RefCell<u32>>);

    impl GpuObject for Probe {
        const KIND: ResourceKind = ResourceKind::Buffer;

        fn release(self) -> Result<(), String> {
            *self.0.borrow_mut() += 1;
            Ok(())
        }
    }

    struct Faulty;

    impl GpuObject for Faulty {
        const KIND: ResourceKind = ResourceKind::Texture;

        fn release(self) -> Result<(), String> {
            Err("device lost".to_string())
        }
    }

    #[test]
    fn release_runs_once() {
        let count = Rc::new(RefCell::new(0));
        let handle = GpuHandle::new("probe", Probe(Rc::clone(&count)));
        let alias = handle.clone();

        handle.release().unwrap();
        alias.release().unwrap();

        assert_eq!(*count.borrow(), 1);
        assert!(!handle.is_live());
    }

    #[test]
    fn get_after_release_reports_released() {
        let handle = GpuHandle::new("probe", Probe(Rc::new(RefCell::new(0))));
        handle.release().unwrap();

        let err = handle.get().err().unwrap();
        assert_eq!(
            err,
            ResourceError::Released {
                kind: ResourceKind::Buffer,
                label: "probe".into()
            }
        );
    }

    #[test]
    fn taken_object_is_not_released_again() {
        let count = Rc::new(RefCell::new(0));
        let handle = GpuHandle::new("probe", Probe(Rc::clone(&count)));

        let probe = handle.take().unwrap();
        handle.release().unwrap();
        assert_eq!(*count.borrow(), 0);

        drop(probe);
        assert!(handle.take().is_err());
    }

    #[test]
    fn release_while_borrowed_fails_without_consuming() {
        let count = Rc::new(RefCell::new(0));
        let handle = GpuHandle::new("probe", Probe(Rc::clone(&count)));

        {
            let _guard = handle.get().unwrap();
            assert!(matches!(handle.release(), Err(ReleaseError::Borrowed { .. })));
        }

        assert!(handle.is_live());
        handle.release().unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn failing_release_surfaces_reason() {
        let handle = GpuHandle::new("depth", Faulty);
        let err = handle.release().unwrap_err();
        assert_eq!(
            err,
            ReleaseError::Failed {
                kind: ResourceKind::Texture,
                label: "depth".into(),
                reason: "device lost".into(),
            }
        );
        assert!(!handle.is_live());
    }

    #[test]
    fn clones_share_identity() {
        let a = GpuHandle::new("probe", Probe(Rc::new(RefCell::new(0))));
        let b = a.clone();
        let c = GpuHandle::new("probe", Probe(Rc::new(RefCell::new(0))));
        assert_eq!(Releasable::id(&a), Releasable::id(&b));
        assert_ne!(Releasable::id(&a), Releasable::id(&c));
    }
}
