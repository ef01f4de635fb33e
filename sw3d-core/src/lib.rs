/// SW3D Core Library - Software rendering pipeline
///
/// This library turns triangle meshes into pixels without a GPU: vector and
/// matrix math, camera and projection matrices, plane clipping, integer
/// rasterization with a depth test, and a frame renderer wiring them together.
/// Pixel and depth buffers are owned by the caller and borrowed per frame.

pub mod buffer;
pub mod camera;
pub mod clip;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod projection;
pub mod raster;
pub mod render;
pub mod transform;

// Re-export commonly used types
pub use buffer::{DepthTest, RenderTarget, TargetError};
pub use camera::Camera;
pub use clip::{Clipped, Plane};
pub use geometry::{Mesh, Triangle, DEFAULT_COLOR};
pub use math::{Mat4, Vec2, Vec3, Vec4};
pub use obj::{load_obj, parse_obj, ObjError};
pub use raster::Pixel;
pub use render::{ConfigError, DepthProxy, FrameRenderer, FrameStats, RenderConfig};
pub use transform::{RotationState, Transform};
