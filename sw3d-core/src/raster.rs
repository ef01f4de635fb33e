/// Pixel-exact scan conversion: points, lines and filled triangles
///
/// All arithmetic here is on integers. Products of coordinate differences are
/// taken in `i128`, so edge evaluation is exact for any `i32` vertex. Every
/// write is bounds-checked by the [`RenderTarget`], and every loop is clamped
/// to the target before it starts, so the work per call is bounded by the
/// target's size rather than by the input coordinates.
use crate::buffer::RenderTarget;

/// Integer screen coordinate, origin at the top-left, `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

pub fn plot_pixel(target: &mut RenderTarget, color: u32, x: i32, y: i32) {
    target.set_pixel(x, y, color);
}

fn plot(target: &mut RenderTarget, color: u32, x: i64, y: i64) {
    // Callers only step between two i32 endpoints.
    target.set_pixel(x as i32, y as i32, color);
}

/// Bresenham line including both endpoints.
///
/// The endpoints are ordered by `(x, y)` before stepping, so swapping them
/// draws exactly the same pixels.
pub fn draw_line(target: &mut RenderTarget, color: u32, p0: Pixel, p1: Pixel) {
    let (start, end) = if p0 <= p1 { (p0, p1) } else { (p1, p0) };
    let (x0, y0) = (i64::from(start.x), i64::from(start.y));
    let (x1, y1) = (i64::from(end.x), i64::from(end.y));
    let (width, height) = (target.width() as i64, target.height() as i64);

    let (min_y, max_y) = (y0.min(y1), y0.max(y1));
    if x1 < 0 || x0 >= width || max_y < 0 || min_y >= height {
        return;
    }

    if x0 == x1 {
        for y in min_y.max(0)..=max_y.min(height - 1) {
            plot(target, color, x0, y);
        }
        return;
    }
    if y0 == y1 {
        for x in x0.max(0)..=x1.min(width - 1) {
            plot(target, color, x, y0);
        }
        return;
    }

    // x only ever increases after ordering.
    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let step_y = (y1 - y0).signum();

    if dx >= dy {
        // Steps whose column is inside the target.
        let (first, last) = ((-x0).max(0), dx.min(width - 1 - x0));
        let (moved, mut err) = bresenham_at(dx, dy, first);
        let mut y = y0 + step_y * moved;
        for x in x0 + first..=x0 + last {
            plot(target, color, x, y);
            if err > 0 {
                y += step_y;
                err -= 2 * dx;
            }
            err += 2 * dy;
        }
    } else {
        // Steps whose row is inside the target.
        let (first, last) = if step_y > 0 {
            ((-y0).max(0), dy.min(height - 1 - y0))
        } else {
            ((y0 - (height - 1)).max(0), dy.min(y0))
        };
        let (moved, mut err) = bresenham_at(dy, dx, first);
        let (mut x, mut y) = (x0 + moved, y0 + step_y * first);
        for _ in first..=last {
            plot(target, color, x, y);
            if err > 0 {
                x += 1;
                err -= 2 * dy;
            }
            err += 2 * dx;
            y += step_y;
        }
    }
}

/// Bresenham state before step `k` along the major axis: how far the minor
/// axis has moved so far, and the error term.
///
/// The minor axis has moved `ceil((2 * minor * k - major) / (2 * major))`
/// after `k` steps, which is what stepping from zero would reach.
fn bresenham_at(major: i64, minor: i64, k: i64) -> (i64, i64) {
    let (major, minor, k) = (i128::from(major), i128::from(minor), i128::from(k));
    let numerator = 2 * minor * k - major;
    let moved = -(-numerator).div_euclid(2 * major);
    let err = numerator + 2 * minor - 2 * major * moved;
    // moved <= k and |err| <= 2 * major, both within i64.
    (moved as i64, err as i64)
}

/// A non-horizontal triangle edge walked from its upper to its lower end.
#[derive(Clone, Copy)]
struct Edge {
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
}

impl Edge {
    fn new(upper: Pixel, lower: Pixel) -> Self {
        Self {
            x0: i64::from(upper.x),
            y0: i64::from(upper.y),
            dx: i64::from(lower.x) - i64::from(upper.x),
            dy: i64::from(lower.y) - i64::from(upper.y),
        }
    }

    /// `(ceil, floor)` of the edge's exact `x` at row `y`.
    fn x_bounds(&self, y: i64) -> (i128, i128) {
        let dy = i128::from(self.dy);
        let numerator =
            i128::from(self.x0) * dy + i128::from(self.dx) * (i128::from(y) - i128::from(self.y0));
        let floor = numerator.div_euclid(dy);
        let ceil = -(-numerator).div_euclid(dy);
        (ceil, floor)
    }
}

fn fill_rows(
    target: &mut RenderTarget,
    color: u32,
    depth: f32,
    (a, b): (Edge, Edge),
    (first_row, last_row): (i32, i32),
) {
    let (width, height) = (target.width() as i64, target.height() as i64);
    let first_row = i64::from(first_row).max(0);
    let last_row = i64::from(last_row).min(height - 1);

    for y in first_row..=last_row {
        let (a_ceil, a_floor) = a.x_bounds(y);
        let (b_ceil, b_floor) = b.x_bounds(y);
        let left = a_ceil.min(b_ceil).max(0) as i64;
        let right = a_floor.max(b_floor).min(i128::from(width) - 1) as i64;
        for x in left..=right {
            target.set_pixel_with_depth(x as i32, y as i32, depth, color);
        }
    }
}

/// Fill the triangle `p0, p1, p2` with one color at one depth.
///
/// A pixel is covered when its center lies inside the triangle or on its
/// boundary. Triangles with a zero-height middle vertex are filled as a
/// single flat-top or flat-bottom triangle; any other triangle is split at
/// the middle vertex's row, the upper part owning that row. Zero-area input
/// draws nothing.
pub fn fill_triangle(
    target: &mut RenderTarget,
    color: u32,
    p0: Pixel,
    p1: Pixel,
    p2: Pixel,
    depth: f32,
) {
    if doubled_area(p0, p1, p2) == 0 || target.width() == 0 || target.height() == 0 {
        return;
    }

    let mut sorted = [p0, p1, p2];
    sorted.sort_by_key(|p| p.y);
    let [top, mid, bottom] = sorted;

    if top.y == mid.y {
        let edges = (Edge::new(top, bottom), Edge::new(mid, bottom));
        fill_rows(target, color, depth, edges, (top.y, bottom.y));
    } else if mid.y == bottom.y {
        let edges = (Edge::new(top, mid), Edge::new(top, bottom));
        fill_rows(target, color, depth, edges, (top.y, bottom.y));
    } else {
        let long = Edge::new(top, bottom);
        fill_rows(target, color, depth, (Edge::new(top, mid), long), (top.y, mid.y));
        fill_rows(target, color, depth, (Edge::new(mid, bottom), long), (mid.y + 1, bottom.y));
    }
}

fn doubled_area(p0: Pixel, p1: Pixel, p2: Pixel) -> i128 {
    let ax = i128::from(p1.x) - i128::from(p0.x);
    let ay = i128::from(p1.y) - i128::from(p0.y);
    let bx = i128::from(p2.x) - i128::from(p0.x);
    let by = i128::from(p2.y) - i128::from(p0.y);
    ax * by - bx * ay
}

/// The three edges of a triangle, without depth testing.
pub fn draw_triangle_outline(target: &mut RenderTarget, color: u32, p0: Pixel, p1: Pixel, p2: Pixel) {
    draw_line(target, color, p0, p1);
    draw_line(target, color, p1, p2);
    draw_line(target, color, p2, p0);
}

/// Every pixel to `color`, every depth cell to the depth test's baseline.
pub fn clear(target: &mut RenderTarget, color: u32) {
    target.clear(color);
}
