/// Triangle clipping against a plane
use crate::geometry::Triangle;
use crate::math::{Vec3, Vec4};

/// A half-space boundary: a point on the plane and a normal pointing into the
/// kept side. The normal need not be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// `dot(normal, point)`, the plane's offset along its normal.
    pub fn offset(&self) -> f32 {
        self.normal.dot(&self.point)
    }

    /// Positive on the kept side, zero on the plane. Ignores `w`.
    pub fn signed_distance(&self, v: &Vec4) -> f32 {
        self.normal.dot(&v.xyz()) - self.offset()
    }
}

/// Where the segment `start..end` meets `plane`.
///
/// A segment parallel to the plane divides by zero; the result is then
/// non-finite rather than an error. [`clip_triangle`] only asks for
/// intersections of edges that cross the plane.
pub fn intersect_plane(plane: &Plane, start: &Vec4, end: &Vec4) -> Vec4 {
    let start_distance = plane.normal.dot(&start.xyz());
    let end_distance = plane.normal.dot(&end.xyz());
    let t = (plane.offset() - start_distance) / (end_distance - start_distance);
    start + (end - start) * t
}

/// Result of clipping one triangle against one plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clipped {
    /// Entirely on the far side.
    Rejected,
    /// Entirely kept, or cut down to a single smaller triangle.
    Kept(Triangle),
    /// Cut to a quadrilateral, covered by two triangles.
    Split([Triangle; 2]),
}

impl Clipped {
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipped::Rejected)
    }

    pub fn as_slice(&self) -> &[Triangle] {
        match self {
            Clipped::Rejected => &[],
            Clipped::Kept(triangle) => std::slice::from_ref(triangle),
            Clipped::Split(pair) => pair,
        }
    }
}

/// Clip `triangle` to the side of `plane` its normal points into.
///
/// Vertices at signed distance `>= 0` count as inside. Outputs carry the
/// input's color; at most two triangles come back.
pub fn clip_triangle(plane: &Plane, triangle: &Triangle) -> Clipped {
    let mut inside = [Vec4::zeros(); 3];
    let mut outside = [Vec4::zeros(); 3];
    let (mut inside_count, mut outside_count) = (0, 0);

    for vertex in &triangle.vertices {
        if plane.signed_distance(vertex) >= 0.0 {
            inside[inside_count] = *vertex;
            inside_count += 1;
        } else {
            outside[outside_count] = *vertex;
            outside_count += 1;
        }
    }

    let color = triangle.color;
    match inside_count {
        0 => Clipped::Rejected,
        3 => Clipped::Kept(*triangle),
        1 => {
            let a = intersect_plane(plane, &inside[0], &outside[0]);
            let b = intersect_plane(plane, &inside[0], &outside[1]);
            Clipped::Kept(Triangle::new(inside[0], a, b).with_color(color))
        }
        _ => {
            let a = intersect_plane(plane, &inside[0], &outside[0]);
            let b = intersect_plane(plane, &inside[1], &outside[0]);
            Clipped::Split([
                Triangle::new(inside[0], inside[1], a).with_color(color),
                Triangle::new(inside[1], a, b).with_color(color),
            ])
        }
    }
}
