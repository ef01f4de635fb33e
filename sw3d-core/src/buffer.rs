/// Borrowed view of the caller's pixel and depth buffers
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("{buffer} buffer holds {actual} cells, expected {width}x{height} = {expected}")]
    SizeMismatch {
        buffer: &'static str,
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{width}x{height} cells do not fit in memory")]
    TooLarge { width: usize, height: usize },
}

/// Which of two depth values survives a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthTest {
    /// The larger depth wins; cleared to negative infinity.
    #[default]
    Greater,
    /// The smaller depth wins; cleared to positive infinity.
    Less,
}

impl DepthTest {
    /// Whether `candidate` replaces `stored`.
    pub fn passes(self, candidate: f32, stored: f32) -> bool {
        match self {
            DepthTest::Greater => candidate > stored,
            DepthTest::Less => candidate < stored,
        }
    }

    /// Depth value that every finite candidate beats.
    pub fn baseline(self) -> f32 {
        match self {
            DepthTest::Greater => f32::NEG_INFINITY,
            DepthTest::Less => f32::INFINITY,
        }
    }
}

/// Row-major pixel and depth arrays, origin at the top-left.
///
/// The arrays stay owned by the caller; a target only borrows them for one
/// frame, and every access is checked against `width` and `height`.
pub struct RenderTarget<'a> {
    pixels: &'a mut [u32],
    depth: &'a mut [f32],
    width: usize,
    height: usize,
    depth_test: DepthTest,
}

impl<'a> RenderTarget<'a> {
    pub fn new(
        pixels: &'a mut [u32],
        depth: &'a mut [f32],
        width: usize,
        height: usize,
    ) -> Result<Self, TargetError> {
        let expected = width
            .checked_mul(height)
            .ok_or(TargetError::TooLarge { width, height })?;
        for (buffer, actual) in [("pixel", pixels.len()), ("depth", depth.len())] {
            if actual != expected {
                return Err(TargetError::SizeMismatch {
                    buffer,
                    width,
                    height,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self {
            pixels,
            depth,
            width,
            height,
            depth_test: DepthTest::default(),
        })
    }

    pub fn with_depth_test(mut self, depth_test: DepthTest) -> Self {
        self.depth_test = depth_test;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth_test(&self) -> DepthTest {
        self.depth_test
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Write `color` at `(x, y)`; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Write `color` and `depth` at `(x, y)` if `depth` passes the target's
    /// depth test. Out-of-range coordinates are ignored.
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) {
        if let Some(i) = self.index(x, y) {
            if self.depth_test.passes(depth, self.depth[i]) {
                self.depth[i] = depth;
                self.pixels[i] = color;
            }
        }
    }

    /// Fill every pixel with `color` and reset depth to the test's baseline.
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
        self.depth.fill(self.depth_test.baseline());
    }

    pub fn pixels(&self) -> &[u32] {
        &*self.pixels
    }
}
