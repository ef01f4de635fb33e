/// Vector and matrix kernel
///
/// Points are row vectors: a point is transformed as `out = in · M`, so the
/// translation of a [`Mat4`] lives in its last row and `m[(row, col)]`
/// addresses the matrix exactly as the formulas are written.
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
/// Homogeneous point or direction; positions carry `w = 1`, directions `w = 0`.
pub type Vec4 = Vector4<f32>;
pub type Mat4 = Matrix4<f32>;

/// A position with `w = 1`.
pub fn point(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

/// A direction with `w = 0`.
pub fn direction(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 0.0)
}

/// Dot product of the `x, y, z` components.
pub fn dot3(a: &Vec4, b: &Vec4) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Cross product of the `x, y, z` components, returned as a direction.
pub fn cross3(a: &Vec4, b: &Vec4) -> Vec4 {
    let c = a.xyz().cross(&b.xyz());
    direction(c.x, c.y, c.z)
}

pub fn length3(v: &Vec4) -> f32 {
    dot3(v, v).sqrt()
}

/// Unit vector in the direction of `v`, returned with `w = 0`.
///
/// The caller guarantees a non-zero length. A zero vector divides by zero
/// and every component comes back NaN.
pub fn normalize3(v: &Vec4) -> Vec4 {
    let length = length3(v);
    direction(v.x / length, v.y / length, v.z / length)
}

/// Multiply the row vector `v` by `m`, then divide `x, y, z` by the
/// resulting `w` unless it is zero.
///
/// The returned `w` is left as computed so callers can still see the depth
/// a projection routed into it.
pub fn transform_point(v: &Vec4, m: &Mat4) -> Vec4 {
    let mut out = (v.transpose() * m).transpose();
    if out.w != 0.0 {
        out.x /= out.w;
        out.y /= out.w;
        out.z /= out.w;
    }
    out
}

/// The matrix that applies `first` and then `second`.
pub fn compose(first: &Mat4, second: &Mat4) -> Mat4 {
    first * second
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_ignores_w() {
        let a = Vec4::new(1.0, 2.0, 3.0, 7.0);
        let b = Vec4::new(4.0, 5.0, 6.0, 9.0);
        assert_eq!(dot3(&a, &b), 32.0);
    }

    #[test]
    fn test_cross_is_a_direction() {
        let c = cross3(&point(1.0, 0.0, 0.0), &point(0.0, 1.0, 0.0));
        assert_eq!(c, direction(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_normalize() {
        let n = normalize3(&point(3.0, 0.0, 4.0));
        assert!((length3(&n) - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert_eq!(n.w, 0.0);
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let n = normalize3(&direction(0.0, 0.0, 0.0));
        assert!(n.x.is_nan() && n.y.is_nan() && n.z.is_nan());
    }

    #[test]
    fn test_translation_lives_in_last_row() {
        let mut m = Mat4::identity();
        m[(3, 0)] = 2.0;
        m[(3, 1)] = -1.0;
        m[(3, 2)] = 0.5;
        let p = transform_point(&point(1.0, 1.0, 1.0), &m);
        assert_eq!(p, point(3.0, 0.0, 1.5));
    }

    #[test]
    fn test_divide_by_w() {
        let mut m = Mat4::identity();
        m[(3, 3)] = 0.0;
        m[(2, 3)] = 1.0;
        let p = transform_point(&point(2.0, 4.0, 2.0), &m);
        assert_eq!(p, Vec4::new(1.0, 2.0, 1.0, 2.0));
    }

    #[test]
    fn test_zero_w_skips_divide() {
        let mut m = Mat4::identity();
        m[(3, 3)] = 0.0;
        let p = transform_point(&point(2.0, 4.0, 6.0), &m);
        assert_eq!(p, Vec4::new(2.0, 4.0, 6.0, 0.0));
    }

    #[test]
    fn test_compose_order() {
        let mut scale = Mat4::identity();
        scale[(0, 0)] = 2.0;
        let mut shift = Mat4::identity();
        shift[(3, 0)] = 1.0;
        // Scale first, then shift: 1 * 2 + 1.
        let p = transform_point(&point(1.0, 0.0, 0.0), &compose(&scale, &shift));
        assert_eq!(p.x, 3.0);
        // Shift first, then scale: (1 + 1) * 2.
        let p = transform_point(&point(1.0, 0.0, 0.0), &compose(&shift, &scale));
        assert_eq!(p.x, 4.0);
    }
}
