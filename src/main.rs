use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use grid_runner::backend::WindowSurface;
use grid_runner::input::InputState;
use grid_runner::{Config, FramePacer, GameContext, Grid, PixelSurface, TickOutcome, maze};

struct App {
    config: Config,
    game: GameContext,
    input: InputState,
    pacer: FramePacer,
    surface: Option<WindowSurface>,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // First fatal error raised inside the event loop
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config, grid: Grid) -> Self {
        let game = GameContext::new(&config, grid);
        let pacer = FramePacer::new(config.tick_interval(), Instant::now());
        Self {
            config,
            game,
            input: InputState::new(),
            pacer,
            surface: None,
            frame_counter: 0,
            last_fps_print: Instant::now(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn create_surface(&self, event_loop: &ActiveEventLoop) -> Result<WindowSurface> {
        let scale = self.config.window_scale as f64;
        let attributes = Window::default_attributes()
            .with_title("Grid Runner")
            .with_inner_size(LogicalSize::new(
                self.config.screen_width as f64 * scale,
                self.config.screen_height as f64 * scale,
            ));
        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("create window: {e}"))?,
        );
        WindowSurface::new(
            window,
            self.config.screen_width,
            self.config.screen_height,
            self.config.palette(),
        )
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        self.game.render(surface);
        surface.blit()?;

        // Print FPS
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            debug!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        match self.create_surface(event_loop) {
            Ok(surface) => {
                surface.window().request_redraw();
                self.surface = Some(surface);
                self.pacer = FramePacer::new(self.config.tick_interval(), Instant::now());
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match self.surface.as_ref() {
            Some(s) if s.window().id() == id => {}
            _ => return,
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.input.key_down(code),
                ElementState::Released => self.input.key_up(code),
            },

            WindowEvent::Focused(false) => self.input.clear(),

            WindowEvent::Resized(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.resized(size.width as usize, size.height as usize);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let due = self.pacer.ticks_due(Instant::now());
        for _ in 0..due {
            if self.game.tick(&mut self.input) == TickOutcome::Quit {
                event_loop.exit();
                return;
            }
        }
        if due > 0 {
            if let Some(surface) = &self.surface {
                surface.window().request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.next_deadline()));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = Config::load()?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.map = Some(path.into());
    }
    debug!("{config:?}");

    let grid = match &config.map {
        Some(path) => Grid::from_path(path)
            .with_context(|| format!("load map {}", path.display()))?,
        None => maze::load().context("load built-in map")?,
    };

    let event_loop = EventLoop::new().map_err(|e| anyhow!("create event loop: {e}"))?;
    let mut app = App::new(config, grid);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {e}"))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => {
            info!("connection terminated after {} ticks", app.game.ticks());
            Ok(())
        }
    }
}
