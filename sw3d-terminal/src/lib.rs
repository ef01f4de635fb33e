/// Terminal frontend for the software rendering pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use sw3d_core::{
    Camera, ConfigError, FrameRenderer, FrameStats, Mesh, RenderConfig, RotationState, Transform,
    Vec3,
};

pub mod logging;
pub mod renderer;

pub use renderer::AsciiRenderer;

const ROTATION_STEP: f32 = 0.1;
const OUTLINE_COLOR: u32 = 0xFFFFFF;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    rotation: RotationState,
    distance: f32,
    camera: Camera,
    renderer: FrameRenderer,
    canvas: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: RenderConfig, distance: f32) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(
            mesh,
            FrameRenderer::new(config)?,
            distance,
            width as usize,
            height as usize,
        ))
    }

    pub fn with_size(
        mesh: Mesh,
        renderer: FrameRenderer,
        distance: f32,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            mesh,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            distance,
            camera: Camera::default(),
            renderer,
            canvas: AsciiRenderer::new(width, height),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_wireframe(&self) -> bool {
        !self.renderer.config().fill
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.update();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> Result<(), ConfigError> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code)?,
            Event::Resize(width, height) => self.canvas.resize(width as usize, height as usize),
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<(), ConfigError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.rotation.rotate(ROTATION_STEP, 0.0, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.rotation.rotate(-ROTATION_STEP, 0.0, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.rotation.rotate(0.0, -ROTATION_STEP, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.rotation.rotate(0.0, ROTATION_STEP, 0.0);
            }
            KeyCode::Char('e') => {
                self.rotation.rotate(0.0, 0.0, ROTATION_STEP);
            }
            KeyCode::Char('r') => {
                self.rotation.rotate(0.0, 0.0, -ROTATION_STEP);
            }
            KeyCode::Char('m') => {
                let config = wireframe_config(self.renderer.config(), !self.is_wireframe());
                self.renderer = FrameRenderer::new(config)?;
                log::debug!("wireframe: {}", self.is_wireframe());
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect
        self.rotation.rotate(0.01, 0.015, 0.0);
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let world = Transform::world(&self.rotation, &Vec3::new(0.0, 0.0, self.distance));
        self.stats = self
            .canvas
            .render(&self.renderer, &self.mesh, &self.camera, &world)?;

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.canvas.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SW3D | FPS: {:.1} | Triangles: {}/{} | WASD/Arrows=Rotate E/R=Roll M=Wireframe Q=Quit",
                self.fps, self.stats.rasterized, self.stats.submitted
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// `base` switched between filled faces and white outlines.
pub fn wireframe_config(base: &RenderConfig, wireframe: bool) -> RenderConfig {
    RenderConfig {
        fill: !wireframe,
        wireframe: wireframe.then_some(OUTLINE_COLOR),
        ..base.clone()
    }
}
