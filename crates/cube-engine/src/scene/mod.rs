//! Rotating cube scene.
//!
//! Responsibilities:
//! - hold the fixed cube geometry and its two WGSL shaders
//! - build every persistent GPU object once, inside a caller-provided scope
//! - keep the reusable render-pass template and projection for the frame renderer

mod builder;
mod geometry;
mod pass;
mod uniform;

pub use builder::{
    DEPTH_FORMAT, FOV_Y, FrameCounter, Scene, SceneAssets, Z_FAR, Z_NEAR, projection_matrix,
};
pub use geometry::{CUBE_VERTEX_COUNT, CUBE_VERTICES, CubeVertex, Geometry};
pub use pass::{
    CLEAR_COLOR, ColorAttachmentTemplate, DEPTH_CLEAR, DepthAttachmentTemplate, RenderPassTemplate,
};
pub use uniform::{MATRIX_UNIFORM_SIZE, UniformBuffer, UniformError};
