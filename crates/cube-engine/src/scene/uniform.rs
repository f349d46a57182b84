use crate::resource::{GpuHandle, ResourceError, ResourceScope};

/// Byte size of one 4x4 `f32` matrix.
pub const MATRIX_UNIFORM_SIZE: u64 = 4 * 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniformError {
    #[error("uniform '{label}' holds {expected} bytes but the upload is {actual} bytes")]
    SizeMismatch {
        label: String,
        expected: u64,
        actual: usize,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Fixed-size uniform buffer. Uploads must cover it exactly.
#[derive(Debug, Clone)]
pub struct UniformBuffer {
    buffer: GpuHandle<wgpu::Buffer>,
    size: u64,
}

impl UniformBuffer {
    pub fn new(device: &wgpu::Device, scope: &mut ResourceScope, label: &str, size: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer: GpuHandle::acquire_in(scope, label, buffer),
            size,
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn handle(&self) -> &GpuHandle<wgpu::Buffer> {
        &self.buffer
    }

    /// Writes `payload` at offset 0.
    pub fn write(&self, queue: &wgpu::Queue, payload: &[u8]) -> Result<(), UniformError> {
        check_payload(self.buffer.label(), self.size, payload)?;
        queue.write_buffer(&*self.buffer.get()?, 0, payload);
        Ok(())
    }
}

pub(crate) fn check_payload(label: &str, expected: u64, payload: &[u8]) -> Result<(), UniformError> {
    if payload.len() as u64 != expected {
        log::error!(
            "uniform '{label}': upload of {} bytes does not match buffer size {expected}",
            payload.len()
        );
        return Err(UniformError::SizeMismatch {
            label: label.to_string(),
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}
