/// Per-frame pipeline: cull, light, view, clip, project, rasterize
use log::{trace, warn};
use thiserror::Error;

use crate::buffer::{DepthTest, RenderTarget, TargetError};
use crate::camera::Camera;
use crate::clip::{clip_triangle, Plane};
use crate::geometry::{Mesh, Triangle};
use crate::math::{direction, dot3, length3, normalize3, Mat4, Vec2, Vec3, Vec4};
use crate::projection::projection_matrix;
use crate::raster::{draw_triangle_outline, fill_triangle, Pixel};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("field of view must lie strictly between 0 and 180 degrees, got {0}")]
    FieldOfView(f32),
    #[error("near plane must be positive, got {0}")]
    Near(f32),
    #[error("far plane {far} must lie beyond the near plane {near}")]
    Far { near: f32, far: f32 },
    #[error("near clip distance must be positive, got {0}")]
    NearClip(f32),
    #[error("light direction must have a non-zero, finite length")]
    LightDirection,
}

/// The single depth value a whole triangle is tested with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthProxy {
    /// Mean of the projected vertex depths.
    Average,
    /// `offset` minus the mean, so nearer triangles get larger values.
    Inverted { offset: f32 },
}

impl Default for DepthProxy {
    fn default() -> Self {
        DepthProxy::Inverted { offset: 10.0 }
    }
}

impl DepthProxy {
    pub fn depth(&self, triangle: &Triangle) -> f32 {
        let [a, b, c] = &triangle.vertices;
        let average = (a.z + b.z + c.z) / 3.0;
        match self {
            DepthProxy::Average => average,
            DepthProxy::Inverted { offset } => offset - average,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Camera-space `z` below which geometry is clipped away.
    pub near_clip: f32,
    /// Direction towards the light. Need not be unit length.
    pub light_direction: Vec4,
    pub fill: bool,
    /// Outline color, when outlines are drawn.
    pub wireframe: Option<u32>,
    pub depth_proxy: DepthProxy,
    /// Comparison used by targets built with [`FrameRenderer::target`].
    pub depth_test: DepthTest,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
            near_clip: 0.1,
            light_direction: direction(0.0, 0.0, 1.0),
            fill: true,
            wireframe: None,
            depth_proxy: DepthProxy::default(),
            depth_test: DepthTest::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        if !(self.near > 0.0) {
            return Err(ConfigError::Near(self.near));
        }
        if !(self.far > self.near) {
            return Err(ConfigError::Far {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.near_clip > 0.0) {
            return Err(ConfigError::NearClip(self.near_clip));
        }
        let light = length3(&self.light_direction);
        if !(light > 0.0 && light.is_finite()) {
            return Err(ConfigError::LightDirection);
        }
        Ok(())
    }
}

/// Counters for one [`FrameRenderer::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles in the mesh.
    pub submitted: usize,
    /// Facing away from the camera, or degenerate.
    pub culled: usize,
    /// Entirely behind the near clip plane.
    pub near_clipped: usize,
    /// Triangles handed to the rasterizer after all clipping.
    pub rasterized: usize,
}

/// Pack 8-bit channels as `0x00RRGGBB`.
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Scale each channel of a packed color by `intensity`, clamped to `[0, 1]`.
pub fn shade(color: u32, intensity: f32) -> u32 {
    let i = intensity.clamp(0.0, 1.0);
    let channel = |shift: u32| (((color >> shift) & 0xFF) as f32 * i) as u8;
    pack_rgb(channel(16), channel(8), channel(0))
}

/// The four planes bounding a `width` by `height` pixel area, in the order
/// top, bottom, left, right.
pub fn screen_edge_planes(width: usize, height: usize) -> [Plane; 4] {
    let right = width as f32 - 1.0;
    let bottom = height as f32 - 1.0;
    [
        Plane::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0)),
        Plane::new(Vec3::new(0.0, bottom, 0.0), Vec3::new(0.0, -1.0, 0.0)),
        Plane::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)),
        Plane::new(Vec3::new(right, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
    ]
}

/// Normalized device coordinates to pixels, `y` flipped so up is up.
fn to_viewport(v: &Vec4, size: &Vec2) -> Vec4 {
    Vec4::new(
        (v.x + 1.0) * 0.5 * size.x,
        (1.0 - v.y) * 0.5 * size.y,
        v.z,
        v.w,
    )
}

/// Draws meshes into a [`RenderTarget`] under a fixed [`RenderConfig`].
///
/// Holds no per-frame state; the same renderer can draw any number of
/// frames into any number of targets.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    config: RenderConfig,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// A target over the caller's buffers using the configured depth test.
    pub fn target<'a>(
        &self,
        pixels: &'a mut [u32],
        depth: &'a mut [f32],
        width: usize,
        height: usize,
    ) -> Result<RenderTarget<'a>, TargetError> {
        Ok(RenderTarget::new(pixels, depth, width, height)?.with_depth_test(self.config.depth_test))
    }

    /// Draw `mesh`, placed by `world`, as seen from `camera`.
    ///
    /// The target is not cleared first. Its own depth test decides which
    /// triangle is kept, since that is what its depth cells were cleared for.
    /// Triangles must be wound clockwise as seen from the side that should
    /// be visible.
    pub fn render(
        &self,
        target: &mut RenderTarget,
        mesh: &Mesh,
        camera: &Camera,
        world: &Mat4,
    ) -> FrameStats {
        let mut stats = FrameStats {
            submitted: mesh.len(),
            ..FrameStats::default()
        };
        if target.width() == 0 || target.height() == 0 {
            return stats;
        }
        if target.depth_test() != self.config.depth_test {
            warn!(
                "target uses {:?} depth test, configured for {:?}",
                target.depth_test(),
                self.config.depth_test
            );
        }

        let size = Vec2::new(target.width() as f32, target.height() as f32);
        let config = &self.config;
        let projection =
            projection_matrix(config.fov_degrees, size.y / size.x, config.near, config.far);
        let view = camera.view_matrix();
        let light = normalize3(&config.light_direction);
        let near_plane = Plane::new(
            Vec3::new(0.0, 0.0, config.near_clip),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let screen_planes = screen_edge_planes(target.width(), target.height());

        let mut queue: Vec<Triangle> = Vec::new();
        let mut scratch: Vec<Triangle> = Vec::new();

        for triangle in &mesh.triangles {
            let placed = triangle.transformed(world);
            let normal = placed.normal();
            let facing = dot3(&normal, &(placed.vertices[0] - camera.position));
            // A degenerate triangle's normal is NaN and fails this too.
            if facing.is_nan() || facing < 0.0 {
                stats.culled += 1;
                continue;
            }

            let lit = placed.with_color(shade(placed.color, dot3(&normal, &light)));
            let viewed = lit.transformed(&view);
            let near_clipped = clip_triangle(&near_plane, &viewed);
            if near_clipped.is_empty() {
                stats.near_clipped += 1;
                continue;
            }

            queue.clear();
            for survivor in near_clipped.as_slice() {
                let projected = survivor.transformed(&projection);
                queue.push(Triangle {
                    vertices: projected.vertices.map(|v| to_viewport(&v, &size)),
                    color: survivor.color,
                });
            }

            for plane in &screen_planes {
                scratch.clear();
                for pending in &queue {
                    scratch.extend_from_slice(clip_triangle(plane, pending).as_slice());
                }
                std::mem::swap(&mut queue, &mut scratch);
            }

            for on_screen in &queue {
                let [p0, p1, p2] = on_screen
                    .vertices
                    .map(|v| Pixel::new(v.x as i32, v.y as i32));
                if config.fill {
                    let depth = config.depth_proxy.depth(on_screen);
                    fill_triangle(target, on_screen.color, p0, p1, p2, depth);
                }
                if let Some(outline) = config.wireframe {
                    draw_triangle_outline(target, outline, p0, p1, p2);
                }
            }
            stats.rasterized += queue.len();
        }

        trace!("frame: {stats:?}");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;
    use crate::raster::clear;
    use crate::transform::{RotationState, Transform};
    use rstest::rstest;

    const SIZE: usize = 32;
    const BACKGROUND: u32 = 0x000000;

    fn draw(renderer: &FrameRenderer, mesh: &Mesh, world: &Mat4) -> (Vec<u32>, FrameStats) {
        let mut pixels = vec![0; SIZE * SIZE];
        let mut depth = vec![0.0; SIZE * SIZE];
        let mut target = renderer.target(&mut pixels, &mut depth, SIZE, SIZE).unwrap();
        clear(&mut target, BACKGROUND);
        let stats = renderer.render(&mut target, mesh, &Camera::default(), world);
        (pixels, stats)
    }

    fn at(pixels: &[u32], x: usize, y: usize) -> u32 {
        pixels[y * SIZE + x]
    }

    /// A square at depth `z` facing away from a camera at the origin.
    fn square(z: f32, half: f32, color: u32) -> Mesh {
        let mut mesh = Mesh::new();
        let (a, b) = (point(-half, -half, z), point(half, half, z));
        mesh.add_triangle(Triangle::new(a, b, point(-half, half, z)).with_color(color));
        mesh.add_triangle(Triangle::new(a, point(half, -half, z), b).with_color(color));
        mesh
    }

    #[test]
    fn test_cube_in_front_is_drawn() {
        let renderer = FrameRenderer::new(RenderConfig::default()).unwrap();
        let world = Transform::world(&RotationState::zero(), &Vec3::new(0.0, 0.0, 5.0));
        let (pixels, stats) = draw(&renderer, &Mesh::cube(2.0), &world);

        assert_eq!(stats.submitted, 12);
        // Only the near face points towards the camera.
        assert_eq!(stats.culled, 10);
        assert_eq!(stats.near_clipped, 0);
        assert_eq!(stats.rasterized, 2);
        // Facing the light head on: full intensity.
        assert_eq!(at(&pixels, SIZE / 2, SIZE / 2), 0x00FF00);
        assert_eq!(at(&pixels, 0, 0), BACKGROUND);
    }

    #[test]
    fn test_cube_behind_camera_draws_nothing() {
        let renderer = FrameRenderer::new(RenderConfig::default()).unwrap();
        let world = Transform::world(&RotationState::new(0.3, 0.7, 0.0), &Vec3::new(0.0, 0.0, -5.0));
        let (pixels, stats) = draw(&renderer, &Mesh::cube(2.0), &world);

        assert_eq!(stats.rasterized, 0);
        assert_eq!(stats.culled + stats.near_clipped, 12);
        assert!(pixels.iter().all(|&p| p == BACKGROUND));
    }

    #[test]
    fn test_rotated_cube_draws_only_inside_target() {
        const PAD: usize = 3 * SIZE;
        const GUARD: u32 = 0xDEAD;
        let renderer = FrameRenderer::new(RenderConfig::default()).unwrap();
        for step in 0..16 {
            let angle = step as f32 * 0.4;
            let rotation = RotationState::new(angle, angle * 0.5, angle * 0.25);
            let world = Transform::world(&rotation, &Vec3::new(0.0, 0.0, 3.0));

            // Guard cells on both sides of the target's pixels.
            let mut pixels = vec![GUARD; PAD + SIZE * SIZE + PAD];
            let mut depth = vec![0.0; SIZE * SIZE];
            let visible = &mut pixels[PAD..PAD + SIZE * SIZE];
            let mut target = renderer.target(visible, &mut depth, SIZE, SIZE).unwrap();
            clear(&mut target, BACKGROUND);
            let stats = renderer.render(&mut target, &Mesh::cube(2.0), &Camera::default(), &world);
            drop(target);

            assert!(stats.rasterized > 0, "step {step}");
            assert!(pixels[..PAD].iter().all(|&p| p == GUARD), "step {step}");
            assert!(pixels[PAD + SIZE * SIZE..].iter().all(|&p| p == GUARD), "step {step}");
            assert!(pixels[PAD..PAD + SIZE * SIZE].iter().any(|&p| p != BACKGROUND), "step {step}");
        }
    }

    #[test]
    fn test_target_uses_configured_depth_test() {
        let config = RenderConfig {
            depth_test: DepthTest::Less,
            depth_proxy: DepthProxy::Average,
            ..RenderConfig::default()
        };
        let renderer = FrameRenderer::new(config).unwrap();
        let mut pixels = vec![0; SIZE * SIZE];
        let mut depth = vec![0.0; SIZE * SIZE];
        let target = renderer.target(&mut pixels, &mut depth, SIZE, SIZE).unwrap();
        assert_eq!(target.depth_test(), DepthTest::Less);

        // Projected depth grows with distance, so the smallest average wins.
        let mut mesh = square(6.0, 2.0, 0x0000FF);
        mesh.triangles.extend(square(3.0, 1.0, 0xFF0000).triangles);
        let (pixels, _) = draw(&renderer, &mesh, &Mat4::identity());
        assert_eq!(at(&pixels, SIZE / 2, SIZE / 2), 0xFF0000);
    }

    #[test]
    fn test_target_size_is_checked() {
        let renderer = FrameRenderer::new(RenderConfig::default()).unwrap();
        let mut pixels = vec![0; 6];
        let mut depth = vec![0.0; 6];
        assert!(renderer.target(&mut pixels, &mut depth, 4, 2).is_err());
    }

    #[test]
    fn test_oversized_face_is_clipped_to_screen() {
        let renderer = FrameRenderer::new(RenderConfig::default()).unwrap();
        let (pixels, stats) = draw(&renderer, &square(0.5, 1.0, 0xFF0000), &Mat4::identity());

        assert_eq!(stats.culled, 0);
        assert!(stats.rasterized >= 2);
        let lit = pixels.iter().filter(|&&p| p == 0xFF0000).count();
        assert!(lit > SIZE * SIZE / 2, "{lit}");
    }

    #[test]
    fn test_nearer_surface_wins() {
        let renderer = FrameRenderer::new(RenderConfig::default()).unwrap();
        let mut mesh = square(3.0, 1.0, 0xFF0000);
        mesh.triangles.extend(square(6.0, 2.0, 0x0000FF).triangles);
        let (pixels, _) = draw(&renderer, &mesh, &Mat4::identity());
        assert_eq!(at(&pixels, SIZE / 2, SIZE / 2), 0xFF0000);

        let mut reversed = square(6.0, 2.0, 0x0000FF);
        reversed.triangles.extend(square(3.0, 1.0, 0xFF0000).triangles);
        let (pixels, _) = draw(&renderer, &reversed, &Mat4::identity());
        assert_eq!(at(&pixels, SIZE / 2, SIZE / 2), 0xFF0000);
    }

    #[test]
    fn test_wireframe_only() {
        let config = RenderConfig {
            fill: false,
            wireframe: Some(0xFFFFFF),
            ..RenderConfig::default()
        };
        let renderer = FrameRenderer::new(config).unwrap();
        let world = Transform::translation(0.0, 0.0, 5.0);
        let (pixels, _) = draw(&renderer, &Mesh::cube(2.0), &world);

        assert!(pixels.iter().any(|&p| p == 0xFFFFFF));
        assert!(pixels.iter().all(|&p| p == 0xFFFFFF || p == BACKGROUND));
    }

    #[test]
    fn test_light_from_the_side_darkens() {
        let config = RenderConfig {
            light_direction: direction(1.0, 0.0, 1.0),
            ..RenderConfig::default()
        };
        let renderer = FrameRenderer::new(config).unwrap();
        let (pixels, _) = draw(&renderer, &square(4.0, 1.0, 0xFFFFFF), &Mat4::identity());
        // cos 45°
        assert_eq!(at(&pixels, SIZE / 2, SIZE / 2), shade(0xFFFFFF, std::f32::consts::FRAC_1_SQRT_2));
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade(0x00FF00, 0.5), 0x007F00);
        assert_eq!(shade(0x804020, 1.0), 0x804020);
        assert_eq!(shade(0x804020, 3.0), 0x804020);
        assert_eq!(shade(0x804020, -1.0), 0x000000);
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x123456);
    }

    #[test]
    fn test_depth_proxy() {
        let t = Triangle::new(point(0.0, 0.0, 0.2), point(0.0, 0.0, 0.4), point(0.0, 0.0, 0.6));
        assert!((DepthProxy::Average.depth(&t) - 0.4).abs() < 1e-6);
        assert!((DepthProxy::default().depth(&t) - 9.6).abs() < 1e-6);
    }

    #[rstest]
    #[case::zero_fov(RenderConfig { fov_degrees: 0.0, ..RenderConfig::default() }, ConfigError::FieldOfView(0.0))]
    #[case::straight_fov(RenderConfig { fov_degrees: 180.0, ..RenderConfig::default() }, ConfigError::FieldOfView(180.0))]
    #[case::near(RenderConfig { near: 0.0, ..RenderConfig::default() }, ConfigError::Near(0.0))]
    #[case::far(RenderConfig { near: 5.0, far: 5.0, ..RenderConfig::default() }, ConfigError::Far { near: 5.0, far: 5.0 })]
    #[case::near_clip(RenderConfig { near_clip: -1.0, ..RenderConfig::default() }, ConfigError::NearClip(-1.0))]
    #[case::light(RenderConfig { light_direction: direction(0.0, 0.0, 0.0), ..RenderConfig::default() }, ConfigError::LightDirection)]
    fn test_invalid_config(#[case] config: RenderConfig, #[case] expected: ConfigError) {
        assert_eq!(FrameRenderer::new(config).err(), Some(expected));
    }

    #[test]
    fn test_screen_edge_planes() {
        let planes = screen_edge_planes(10, 6);
        let inside = point(4.0, 3.0, 0.0);
        assert!(planes.iter().all(|p| p.signed_distance(&inside) > 0.0));
        assert!(planes[1].signed_distance(&point(0.0, 5.0, 0.0)).abs() < 1e-6);
        assert!(planes[3].signed_distance(&point(9.0, 0.0, 0.0)).abs() < 1e-6);
        assert!(planes[0].signed_distance(&point(0.0, -0.5, 0.0)) < 0.0);
    }
}
