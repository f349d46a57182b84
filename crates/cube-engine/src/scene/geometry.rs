//! Fixed cube geometry.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

const fn v(p: [f32; 3], c: [f32; 3], uv: [f32; 2]) -> CubeVertex {
    CubeVertex {
        position: [p[0], p[1], p[2], 1.0],
        color: [c[0], c[1], c[2], 1.0],
        uv,
    }
}

pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Two triangles per face, counter-clockwise seen from outside.
pub static CUBE_VERTICES: [CubeVertex; CUBE_VERTEX_COUNT as usize] = [
    // -Y
    v([1.0, -1.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0]),
    v([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 0.0]),
    v([1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
    v([1.0, -1.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 0.0]),
    // +X
    v([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0]),
    v([1.0, -1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0]),
    v([1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [1.0, 0.0]),
    v([1.0, 1.0, -1.0], [1.0, 1.0, 0.0], [0.0, 0.0]),
    v([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0]),
    v([1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [1.0, 0.0]),
    // +Y
    v([-1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0]),
    v([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0]),
    v([1.0, 1.0, -1.0], [1.0, 1.0, 0.0], [1.0, 0.0]),
    v([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
    v([-1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0]),
    v([1.0, 1.0, -1.0], [1.0, 1.0, 0.0], [1.0, 0.0]),
    // -X
    v([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
    v([-1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0]),
    v([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [0.0, 0.0]),
    v([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
    v([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
    // +Z
    v([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0]),
    v([-1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0]),
    v([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
    v([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
    v([1.0, -1.0, 1.0], [1.0, 0.0, 1.0], [0.0, 0.0]),
    v([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0]),
    // -Z
    v([1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, 1.0]),
    v([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0]),
    v([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
    v([1.0, 1.0, -1.0], [1.0, 1.0, 0.0], [0.0, 0.0]),
    v([1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, 1.0]),
    v([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
];

/// Interleaved vertex data plus the layout facts the pipeline needs.
#[derive(Debug, Copy, Clone)]
pub struct Geometry {
    pub vertices: &'static [u8],
    pub stride: u64,
    pub position_offset: u64,
    pub uv_offset: u64,
    pub vertex_count: u32,
}

impl Geometry {
    pub fn cube() -> Self {
        Self {
            vertices: bytemuck::cast_slice(&CUBE_VERTICES),
            stride: std::mem::size_of::<CubeVertex>() as u64,
            position_offset: std::mem::offset_of!(CubeVertex, position) as u64,
            uv_offset: std::mem::offset_of!(CubeVertex, uv) as u64,
            vertex_count: CUBE_VERTEX_COUNT,
        }
    }

    /// Position at location 0, uv at location 1.
    pub fn attributes(&self) -> [wgpu::VertexAttribute; 2] {
        [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: self.position_offset,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: self.uv_offset,
                shader_location: 1,
            },
        ]
    }

    pub fn layout<'a>(&self, attributes: &'a [wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_layout_constants() {
        let g = Geometry::cube();
        assert_eq!(g.stride, 40);
        assert_eq!(g.position_offset, 0);
        assert_eq!(g.uv_offset, 32);
        assert_eq!(g.vertex_count, 36);
        assert_eq!(g.vertices.len(), 36 * 40);
        assert_eq!(g.vertices.len() % wgpu::COPY_BUFFER_ALIGNMENT as usize, 0);
    }

    #[test]
    fn attributes_match_shader_locations() {
        let g = Geometry::cube();
        let attrs = g.attributes();
        assert_eq!(attrs[0].shader_location, 0);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x4);
        assert_eq!(attrs[1].shader_location, 1);
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attrs[1].offset, 32);

        let layout = g.layout(&attrs);
        assert_eq!(layout.array_stride, 40);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn vertices_lie_on_unit_cube() {
        for vert in CUBE_VERTICES.iter() {
            assert_eq!(vert.position[3], 1.0);
            assert!(vert.position[..3].iter().all(|c| c.abs() == 1.0));
            assert!(vert.uv.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}
