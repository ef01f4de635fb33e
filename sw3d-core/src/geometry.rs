/// Geometry primitives for 3D rendering
use crate::math::{cross3, normalize3, point, transform_point, Mat4, Vec4};

/// Color given to meshes that do not specify one: `0x00RRGGBB` green.
pub const DEFAULT_COLOR: u32 = 0x00_FF_00;

/// A triangle face: three homogeneous vertices and one packed `0x00RRGGBB`
/// color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec4; 3],
    pub color: u32,
}

impl Triangle {
    pub fn new(v0: Vec4, v1: Vec4, v2: Vec4) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color: DEFAULT_COLOR,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Each vertex multiplied by `matrix` (with perspective divide); color kept.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            vertices: self.vertices.map(|v| transform_point(&v, matrix)),
            color: self.color,
        }
    }

    /// Unit face normal from the winding `v0 -> v1 -> v2`.
    ///
    /// A zero-area triangle has no normal; every component comes back NaN.
    pub fn normal(&self) -> Vec4 {
        let [v0, v1, v2] = &self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        normalize3(&cross3(&edge1, &edge2))
    }
}

/// An ordered list of triangles.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Paint every triangle with `color`.
    pub fn with_color(mut self, color: u32) -> Self {
        for triangle in &mut self.triangles {
            triangle.color = color;
        }
        self
    }

    /// A cube centred on the origin.
    ///
    /// Faces are wound so that each face normal points into the cube, away
    /// from a viewer looking at that face from outside.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| point(x * h, y * h, z * h);
        let mut mesh = Self::with_capacity(12);
        let mut quad = |a: Vec4, b: Vec4, c: Vec4, d: Vec4| {
            mesh.add_triangle(Triangle::new(a, c, b));
            mesh.add_triangle(Triangle::new(a, d, c));
        };

        // South (-z)
        quad(corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, -1.0, -1.0));
        // East (+x)
        quad(corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0), corner(1.0, -1.0, 1.0));
        // North (+z)
        quad(corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, -1.0, 1.0));
        // West (-x)
        quad(corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0), corner(-1.0, -1.0, -1.0));
        // Top (+y)
        quad(corner(-1.0, 1.0, -1.0), corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0));
        // Bottom (-y)
        quad(corner(1.0, -1.0, 1.0), corner(-1.0, -1.0, 1.0), corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0));

        mesh
    }
}
