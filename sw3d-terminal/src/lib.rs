//! Terminal frontend: drives the software renderer into character cells.

use std::io::{stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use sw3d_core::error::Result;
use sw3d_core::{
    Camera, Mesh, ObjectHandle, RenderMode, Scene, SceneObject, Vector3, ViewParams,
};

pub mod surface;

pub use surface::CharSurface;

/// Interactive terminal viewer around a [`Scene`] and one [`Camera`].
pub struct TerminalApp {
    scene: Scene,
    camera: Camera<CharSurface>,
    /// Object the rotation keys act on.
    focus: ObjectHandle,
    running: bool,
    spinning: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Demo scene: grid floor, cube, tetrahedron.
    pub fn demo() -> Result<Self> {
        let mut scene = Scene::new();

        let mut floor = SceneObject::new(Mesh::grid_floor(8));
        floor.set_scale(Vector3::new(8.0, 1.0, 8.0));
        floor.set_position(Vector3::new(0.0, -2.5, 0.0));
        let floor = scene.insert(floor);

        let cube = scene.insert(SceneObject::new(Mesh::cube()));

        let mut tetra = SceneObject::new(Mesh::tetrahedron());
        tetra.set_position(Vector3::new(4.0, 0.0, 2.0));
        let tetra = scene.insert(tetra);

        Self::with_scene(scene, vec![floor, cube, tetra], cube)
    }

    /// Single-mesh viewer, used by the OBJ loader example.
    pub fn viewer(mesh: Mesh) -> Result<Self> {
        let mut scene = Scene::new();
        let object = scene.insert(SceneObject::new(mesh));
        Self::with_scene(scene, vec![object], object)
    }

    fn with_scene(scene: Scene, queued: Vec<ObjectHandle>, focus: ObjectHandle) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let mut camera = Camera::new(width as u32, height as u32, ViewParams::default())?;
        camera.transform_mut().set_position(Vector3::new(0.0, 0.0, -10.0));
        for handle in queued {
            camera.enqueue(handle);
        }
        Ok(Self {
            scene,
            camera,
            focus,
            running: true,
            spinning: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
            self.render()?;

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            self.frame_count += 1;
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> Result<()> {
        let Event::Key(KeyEvent { code, .. }) = event::read()? else {
            return Ok(());
        };
        const STEP: f32 = 0.1;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.rotate_focus(Vector3::X, STEP),
            KeyCode::Char('s') | KeyCode::Down => self.rotate_focus(Vector3::X, -STEP),
            KeyCode::Char('a') | KeyCode::Left => self.rotate_focus(Vector3::Y, -STEP),
            KeyCode::Char('d') | KeyCode::Right => self.rotate_focus(Vector3::Y, STEP),
            KeyCode::Char('e') => self.rotate_focus(Vector3::Z, STEP),
            KeyCode::Char('r') => self.rotate_focus(Vector3::Z, -STEP),
            KeyCode::Char('m') => {
                let next = match self.camera.mode() {
                    RenderMode::Wireframe => RenderMode::Solid,
                    RenderMode::Solid => RenderMode::Wireframe,
                };
                self.camera.set_mode(next);
            }
            KeyCode::Char('g') => self.camera.draw_axes = !self.camera.draw_axes,
            KeyCode::Char(' ') => {
                if let Some(object) = self.scene.get_mut(self.focus) {
                    object.selected = !object.selected;
                }
            }
            KeyCode::Char('p') => self.spinning = !self.spinning,
            KeyCode::Char('+') => {
                let zoom = self.camera.view_params().zoom * 1.25;
                self.camera.set_zoom(zoom)?;
            }
            KeyCode::Char('-') => {
                let zoom = self.camera.view_params().zoom / 1.25;
                self.camera.set_zoom(zoom)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn rotate_focus(&mut self, axis: Vector3, angle: f32) {
        if let Some(object) = self.scene.get_mut(self.focus) {
            object.rotate_axis_angle(axis, angle);
        }
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect.
        if self.spinning {
            self.rotate_focus(Vector3::Y, 0.015);
            self.rotate_focus(Vector3::X, 0.01);
        }
    }

    fn render(&mut self) -> Result<()> {
        // Track terminal resizes; the camera reallocates its surface.
        let (width, height) = terminal::size()?;
        if (width as u32, height as u32) != (self.camera.width(), self.camera.height()) {
            log::debug!("terminal resized to {width}x{height}");
            self.camera.set_viewport(width as u32, height as u32)?;
        }

        let mode = self.camera.mode();
        let fps = self.fps;
        let image = self.camera.render(&self.scene)?;

        let mut out = stdout();
        image.draw(&mut out)?;

        // Status overlay
        let mode_label = match mode {
            RenderMode::Wireframe => "wireframe",
            RenderMode::Solid => "solid",
        };
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "SW3D [{}] {:.1} fps | wasd/arrows rotate  e/r roll  m mode  g axes  space select  p pause  +/- zoom  q quit",
                mode_label, fps
            )),
            ResetColor
        )?;
        out.flush()?;
        Ok(())
    }
}
