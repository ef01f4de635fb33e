/// Camera orientation and view matrices
use crate::math::{cross3, direction, dot3, normalize3, point, Mat4, Vec4};

/// A viewer in world space. Supplied fresh by the caller every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec4,
    pub direction: Vec4,
    pub up: Vec4,
}

impl Camera {
    pub fn new(position: Vec4, direction: Vec4, up: Vec4) -> Self {
        Self {
            position,
            direction,
            up,
        }
    }

    /// The point one unit ahead of the camera.
    pub fn target(&self) -> Vec4 {
        self.position + self.direction
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        look_at(&point_at(&self.position, &self.target(), &self.up))
    }
}

impl Default for Camera {
    /// At the origin, looking down `+z` with `+y` up.
    fn default() -> Self {
        Self::new(
            point(0.0, 0.0, 0.0),
            direction(0.0, 0.0, 1.0),
            direction(0.0, 1.0, 0.0),
        )
    }
}

/// Object-to-world matrix placing something at `position`, facing `target`.
///
/// ```text
/// | Ax | Ay | Az | 0 |   A = right
/// | Bx | By | Bz | 0 |   B = up, re-orthogonalized against forward
/// | Cx | Cy | Cz | 0 |   C = forward
/// | Tx | Ty | Tz | 1 |   T = position
/// ```
pub fn point_at(position: &Vec4, target: &Vec4, up: &Vec4) -> Mat4 {
    let forward = normalize3(&(target - position));
    let up = normalize3(&(up - forward * dot3(up, &forward)));
    let right = cross3(&up, &forward);

    #[rustfmt::skip]
    let matrix = Mat4::new(
        right.x,    right.y,    right.z,    0.0,
        up.x,       up.y,       up.z,       0.0,
        forward.x,  forward.y,  forward.z,  0.0,
        position.x, position.y, position.z, 1.0,
    );
    matrix
}

/// Inverse of a [`point_at`] matrix.
///
/// The orientation block is orthonormal, so its inverse is its transpose and
/// the translation row becomes `-T·A, -T·B, -T·C`. No general inversion.
pub fn look_at(point_at: &Mat4) -> Mat4 {
    let row = |r: usize| direction(point_at[(r, 0)], point_at[(r, 1)], point_at[(r, 2)]);
    let (a, b, c, t) = (row(0), row(1), row(2), row(3));

    #[rustfmt::skip]
    let matrix = Mat4::new(
        a.x,           b.x,           c.x,           0.0,
        a.y,           b.y,           c.y,           0.0,
        a.z,           b.z,           c.z,           0.0,
        -dot3(&t, &a), -dot3(&t, &b), -dot3(&t, &c), 1.0,
    );
    matrix
}
