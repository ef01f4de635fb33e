/// Pixel buffers shown as colored ASCII cells
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sw3d_core::{raster, Camera, FrameRenderer, FrameStats, Mat4, Mesh, TargetError};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

pub const BACKGROUND: u32 = 0x000000;

/// Ramp character for a packed `0x00RRGGBB` color, by its brightest channel.
pub fn glyph(color: u32) -> char {
    let brightest = [16, 8, 0]
        .iter()
        .map(|shift| (color >> shift) & 0xFF)
        .max()
        .unwrap_or(0);
    let index = brightest as usize * (LUMINOSITY_RAMP.len() - 1) / 255;
    LUMINOSITY_RAMP[index]
}

fn terminal_color(color: u32) -> Color {
    Color::Rgb {
        r: (color >> 16) as u8,
        g: (color >> 8) as u8,
        b: color as u8,
    }
}

/// One pixel per terminal cell. Owns the buffers the core renderer draws
/// into, and reallocates them only between frames.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    depth: Vec<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; size],
            depth: vec![f32::NEG_INFINITY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        log::debug!("resizing canvas to {width}x{height}");
        self.width = width;
        self.height = height;
        self.pixels = vec![BACKGROUND; width * height];
        self.depth = vec![f32::NEG_INFINITY; width * height];
    }

    /// Clear the buffers and draw one frame of `mesh` into them.
    pub fn render(
        &mut self,
        renderer: &FrameRenderer,
        mesh: &Mesh,
        camera: &Camera,
        world: &Mat4,
    ) -> Result<FrameStats, TargetError> {
        let (width, height) = (self.width, self.height);
        let mut target = renderer.target(&mut self.pixels, &mut self.depth, width, height)?;
        raster::clear(&mut target, BACKGROUND);
        Ok(renderer.render(&mut target, mesh, camera, world))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for (y, row) in self.pixels.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for &color in row {
                if current != Some(color) {
                    writer.queue(SetForegroundColor(terminal_color(color)))?;
                    current = Some(color);
                }
                writer.queue(Print(glyph(color)))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
