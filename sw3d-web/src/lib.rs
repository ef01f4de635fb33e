/// SW3D Web - WASM wrapper around the software renderer
///
/// Frames are rasterized on the CPU into buffers owned here, then copied to
/// an HTML canvas through `ImageData`.
use sw3d_core::{
    parse_obj, raster, Camera, FrameRenderer, FrameStats, Mesh, RenderConfig, RotationState,
    TargetError, Transform, Vec3,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

const BACKGROUND: u32 = 0x000000;
const DISTANCE: f32 = 5.0;

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Expand packed `0x00RRGGBB` pixels into opaque RGBA bytes.
pub fn to_rgba(pixels: &[u32], rgba: &mut Vec<u8>) {
    rgba.clear();
    rgba.reserve(pixels.len() * 4);
    for &pixel in pixels {
        rgba.extend_from_slice(&[(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8, 0xFF]);
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    depth: Vec<f32>,
    rgba: Vec<u8>,
    mesh: Mesh,
    rotation: RotationState,
    renderer: FrameRenderer,
    context: Option<CanvasRenderingContext2d>,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<WebRenderer, JsValue> {
        let renderer = FrameRenderer::new(RenderConfig::default()).map_err(js_error)?;
        let (width, height) = (width as usize, height as usize);
        Ok(WebRenderer {
            width,
            height,
            pixels: vec![BACKGROUND; width * height],
            depth: vec![f32::NEG_INFINITY; width * height],
            rgba: Vec::new(),
            mesh: Mesh::cube(2.0),
            rotation: RotationState::new(0.3, 0.3, 0.0),
            renderer,
            context: None,
        })
    }

    /// Attach to the canvas with id `canvas_id`, sizing it to the renderer.
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("{canvas_id:?} is not a canvas")))?;
        canvas.set_width(self.width as u32);
        canvas.set_height(self.height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        self.context = Some(context);
        Ok(())
    }

    /// Replace the displayed model with the OBJ document `text`.
    pub fn load_obj(&mut self, text: &str) -> Result<(), JsValue> {
        self.mesh = parse_obj(text).map_err(js_error)?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as usize;
        self.height = height as usize;
        self.pixels = vec![BACKGROUND; self.width * self.height];
        self.depth = vec![f32::NEG_INFINITY; self.width * self.height];
    }

    /// Update rotation state
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
    }

    /// Render a frame and, once [`WebRenderer::init`] has run, show it.
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.draw_frame().map_err(js_error)?;

        let Some(context) = &self.context else {
            return Ok(());
        };
        to_rgba(&self.pixels, &mut self.rgba);
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&self.rgba),
            self.width as u32,
            self.height as u32,
        )?;
        context.put_image_data(&image, 0.0, 0.0)
    }
}

impl WebRenderer {
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Clear the buffers and draw the current model into them.
    pub fn draw_frame(&mut self) -> Result<FrameStats, TargetError> {
        let world = Transform::world(&self.rotation, &Vec3::new(0.0, 0.0, DISTANCE));
        let mut target = self
            .renderer
            .target(&mut self.pixels, &mut self.depth, self.width, self.height)?;
        raster::clear(&mut target, BACKGROUND);
        Ok(self
            .renderer
            .render(&mut target, &self.mesh, &Camera::default(), &world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgba() {
        let mut rgba = vec![9; 3];
        to_rgba(&[0x123456, 0x00FF00], &mut rgba);
        assert_eq!(rgba, vec![0x12, 0x34, 0x56, 0xFF, 0x00, 0xFF, 0x00, 0xFF]);
    }

    #[test]
    fn test_draw_frame_without_canvas() {
        let mut renderer = WebRenderer::new(48, 32).unwrap();
        let stats = renderer.draw_frame().unwrap();
        assert_eq!(stats.submitted, 12);
        assert!(renderer.pixels().iter().any(|&p| p != BACKGROUND));
    }

    #[test]
    fn test_load_obj_and_resize() {
        let mut renderer = WebRenderer::new(8, 8).unwrap();
        renderer
            .load_obj("v -1 -1 0\nv 1 1 0\nv -1 1 0\nf 1 2 3\n")
            .unwrap();
        renderer.resize(16, 12);
        assert_eq!(renderer.pixels().len(), 16 * 12);
        assert_eq!(renderer.draw_frame().unwrap().submitted, 1);
    }
}
