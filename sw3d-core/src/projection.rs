/// Perspective projection
use crate::math::{transform_point, Mat4, Vec4};

/// Perspective matrix mapping camera-space `z` in `[near, far]` onto `[0, 1]`
/// and routing the input `z` into `w` for the following divide.
///
/// `aspect_ratio` scales the x-axis; pass `height / width` of the target.
pub fn projection_matrix(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    let inverse_tangent = 1.0 / (fov_degrees * 0.5).to_radians().tan();

    let mut matrix = Mat4::zeros();
    matrix[(0, 0)] = aspect_ratio * inverse_tangent;
    matrix[(1, 1)] = inverse_tangent;
    matrix[(2, 2)] = far / (far - near);
    matrix[(3, 2)] = (-far * near) / (far - near);
    matrix[(2, 3)] = 1.0;
    matrix[(3, 3)] = 0.0;
    matrix
}

/// Project a camera-space point. The divide is skipped when `w == 0`.
pub fn project(point: &Vec4, matrix: &Mat4) -> Vec4 {
    transform_point(point, matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn test_projection_matrix_terms() {
        let m = projection_matrix(90.0, 0.5, 1.0, 11.0);
        assert!((m[(0, 0)] - 0.5).abs() < 1e-6);
        assert!((m[(1, 1)] - 1.0).abs() < 1e-6);
        assert!((m[(2, 2)] - 1.1).abs() < 1e-6);
        assert!((m[(3, 2)] + 1.1).abs() < 1e-6);
        assert_eq!(m[(2, 3)], 1.0);
        assert_eq!(m[(3, 3)], 0.0);
    }

    #[test]
    fn test_depth_range() {
        let m = projection_matrix(90.0, 1.0, 1.0, 10.0);
        let near = project(&point(0.0, 0.0, 1.0), &m);
        let far = project(&point(0.0, 0.0, 10.0), &m);
        assert!(near.z.abs() < 1e-6);
        assert!((far.z - 1.0).abs() < 1e-6);
        // The camera-space depth survives in w.
        assert!((far.w - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_foreshortening() {
        let m = projection_matrix(90.0, 1.0, 0.1, 100.0);
        let close = project(&point(1.0, 1.0, 2.0), &m);
        let distant = project(&point(1.0, 1.0, 4.0), &m);
        assert!((close.x - 0.5).abs() < 1e-5);
        assert!((distant.x - 0.25).abs() < 1e-5);
        assert!((close.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_point_on_camera_plane_is_not_divided() {
        let m = projection_matrix(90.0, 1.0, 0.1, 100.0);
        let p = project(&point(2.0, 3.0, 0.0), &m);
        assert_eq!(p.w, 0.0);
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!((p.x - 2.0).abs() < 1e-5);
    }
}
