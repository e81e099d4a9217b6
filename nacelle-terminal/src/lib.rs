//! Terminal front end: drives the ship's tick/render loop and draws it as
//! ASCII art.
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use nacelle_core::{render_ship, Camera, ProjectionMode, Ship};
use nalgebra::{Point3, Vector3};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal rows used by the status line
const OVERLAY_ROWS: u16 = 1;
/// Terminal cells are roughly twice as tall as they are wide
const CELL_HEIGHT_RATIO: u32 = 2;

const MOVE_STEP: f32 = 0.25;
const TURN_STEP: f32 = 0.05;

/// Settings for [`TerminalApp`]
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub fps: u32,
    pub camera_distance: f32,
    pub projection: ProjectionMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            camera_distance: 8.0,
            projection: ProjectionMode::Perspective,
        }
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Move { forward: f32, right: f32, up: f32 },
    Look { yaw: f32, pitch: f32 },
    TurnShip(f32),
    ToggleEngines,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('w') => Action::Move { forward: MOVE_STEP, right: 0.0, up: 0.0 },
            KeyCode::Char('s') => Action::Move { forward: -MOVE_STEP, right: 0.0, up: 0.0 },
            KeyCode::Char('a') => Action::Move { forward: 0.0, right: -MOVE_STEP, up: 0.0 },
            KeyCode::Char('d') => Action::Move { forward: 0.0, right: MOVE_STEP, up: 0.0 },
            KeyCode::Char('r') => Action::Move { forward: 0.0, right: 0.0, up: MOVE_STEP },
            KeyCode::Char('f') => Action::Move { forward: 0.0, right: 0.0, up: -MOVE_STEP },
            KeyCode::Left => Action::Look { yaw: -TURN_STEP, pitch: 0.0 },
            KeyCode::Right => Action::Look { yaw: TURN_STEP, pitch: 0.0 },
            KeyCode::Up => Action::Look { yaw: 0.0, pitch: TURN_STEP },
            KeyCode::Down => Action::Look { yaw: 0.0, pitch: -TURN_STEP },
            KeyCode::Char('j') => Action::TurnShip(TURN_STEP * 2.0),
            KeyCode::Char('l') => Action::TurnShip(-TURN_STEP * 2.0),
            KeyCode::Char(' ') => Action::ToggleEngines,
            _ => return None,
        };
        Some(action)
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    ship: Ship,
    camera: Camera,
    renderer: AsciiRenderer,
    config: AppConfig,
    running: bool,
    started: Instant,
    last_tick: f64,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(ship: Ship, config: AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(ship, config, width, height))
    }

    /// Build for a terminal of `width` x `height` cells
    pub fn with_size(mut ship: Ship, config: AppConfig, width: u16, height: u16) -> Self {
        ship.set_position(Vector3::zeros());

        let mut camera = Camera::new(width as u32, height as u32);
        camera.mode = config.projection;
        camera.position = Point3::new(0.0, 1.0, config.camera_distance);
        camera.look_at(&Point3::origin());

        let mut app = Self {
            ship,
            camera,
            renderer: AsciiRenderer::new(width as usize, 1),
            config,
            running: true,
            started: Instant::now(),
            last_tick: 0.0,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(width, height);
        app
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs_f64(1.0 / self.config.fps.max(1) as f64);
        debug!("entering main loop at {} fps", self.config.fps);

        self.started = Instant::now();
        self.last_tick = 0.0;
        let mut frames: u64 = 0;

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            let now = self.started.elapsed().as_secs_f64();
            self.update(now);

            // Render
            self.render()?;

            // Frame timing
            frames += 1;
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        info!("leaving main loop after {} frames", frames);
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(action) = Action::from_key(code) {
                    self.apply(action);
                }
            }
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Move { forward, right, up } => {
                self.camera.move_forward(forward);
                self.camera.strafe(right);
                self.camera.rise(up);
            }
            Action::Look { yaw, pitch } => self.camera.turn(yaw, pitch),
            Action::TurnShip(delta) => {
                let heading = self.ship.heading() + delta;
                self.ship.set_heading(heading);
            }
            Action::ToggleEngines => self.ship.request_status_change(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(OVERLAY_ROWS).max(1);
        self.renderer.resize(width as usize, rows as usize);
        self.camera
            .set_aspect(width as u32, rows as u32 * CELL_HEIGHT_RATIO);
        debug!("viewport resized to {}x{}", width, rows);
    }

    /// Advance the ship to absolute time `now` (seconds since start)
    pub fn update(&mut self, now: f64) {
        let delta = (now - self.last_tick).max(0.0);
        self.ship.tick(now, delta);
        self.last_tick = now;
    }

    /// Rasterize the current frame into the renderer's buffers
    pub fn draw_frame(&mut self) -> &AsciiRenderer {
        self.renderer.begin_frame(&self.camera);
        render_ship(&self.ship, &mut self.renderer);
        &self.renderer
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_frame();

        let mut stdout = stdout();
        self.renderer.present(&mut stdout, OVERLAY_ROWS)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "NACELLE | FPS: {:.1} | engines: {} | WASD/RF=Move Arrows=Look J/L=Turn ship Space=Engines Q=Quit",
                self.fps,
                self.ship.status()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
