//! Per-frame model-view-projection math.

use glam::{Mat4, Vec3, Vec4};

/// Camera pulled back along -Z.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -5.0);

/// Frames per radian of spin.
pub const FRAMES_PER_RADIAN: f64 = 100.0;

/// Spin angle, in radians, for a frame number.
pub fn spin_angle(frame: u64) -> f32 {
    (frame as f64 / FRAMES_PER_RADIAN) as f32
}

/// Two-axis spin built from the sine and cosine of one angle.
///
/// The X rotation and the Y rotation both take their sine/cosine slots from
/// `(sin, cos)` of the same angle, and are applied X first, then Y. At angle 0
/// this is the identity.
pub fn spin_rotation(sin: f32, cos: f32) -> Mat4 {
    let rot_x = Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, cos, sin, 0.0),
        Vec4::new(0.0, -sin, cos, 0.0),
        Vec4::W,
    );
    let rot_y = Mat4::from_cols(
        Vec4::new(cos, 0.0, -sin, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(sin, 0.0, cos, 0.0),
        Vec4::W,
    );
    rot_x * rot_y
}

/// View matrix for a frame: translate by [`CAMERA_OFFSET`], then spin.
pub fn view_matrix(frame: u64) -> Mat4 {
    let (sin, cos) = spin_angle(frame).sin_cos();
    Mat4::from_translation(CAMERA_OFFSET) * spin_rotation(sin, cos)
}

/// `projection * view` for a frame.
pub fn transformation_matrix(frame: u64, projection: Mat4) -> Mat4 {
    projection * view_matrix(frame)
}

/// Column-major floats as uploaded to the uniform buffer.
pub fn to_columns(m: Mat4) -> [f32; 16] {
    m.to_cols_array()
}
