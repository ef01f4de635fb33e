/// Object-to-world transformation matrices and rotation state
///
/// Every matrix here is in the row-vector convention of [`crate::math`]:
/// nalgebra builds column-vector matrices, so each one is transposed before
/// it is handed out.
use nalgebra::Vector3;

use crate::math::{compose, Mat4, Vec3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Mat4 {
        Mat4::identity()
    }

    /// Translation stored in the last row.
    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vector3::new(x, y, z)).transpose()
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    pub fn rotation_x(theta: f32) -> Mat4 {
        Mat4::new_rotation(Vector3::new(theta, 0.0, 0.0)).transpose()
    }

    pub fn rotation_y(theta: f32) -> Mat4 {
        Mat4::new_rotation(Vector3::new(0.0, theta, 0.0)).transpose()
    }

    pub fn rotation_z(theta: f32) -> Mat4 {
        Mat4::new_rotation(Vector3::new(0.0, 0.0, theta)).transpose()
    }

    /// Rotation applying x, then y, then z.
    pub fn rotation_matrix(rotation: &RotationState) -> Mat4 {
        let rx = Self::rotation_x(rotation.x);
        let ry = Self::rotation_y(rotation.y);
        let rz = Self::rotation_z(rotation.z);
        compose(&compose(&rx, &ry), &rz)
    }

    /// Object-to-world matrix: rotate about the object's origin, then move it
    /// to `offset`.
    pub fn world(rotation: &RotationState, offset: &Vec3) -> Mat4 {
        compose(
            &Self::rotation_matrix(rotation),
            &Self::translation(offset.x, offset.y, offset.z),
        )
    }
}
