//! Ninja Platformer -- application entry point and frame loop.
//!
//! winit drives the event loop via `ApplicationHandler`. Each redraw runs one
//! variable-length frame:
//!
//!   1. `begin_frame()` -- measure wall-clock delta
//!   2. open the egui pass so screens can build widgets
//!   3. `MainGame::update` then `MainGame::draw` on the current screen
//!   4. render the queued sprite layers, then composite egui on top
//!
//! The loop sleeps until the frame timer allows the next frame, which caps
//! the frame rate at `max_fps` from the config file.

mod config;
mod context;
mod editor;
mod entities;
mod level;
mod level_io;
mod physics;
mod screens;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use ben_core::{FrameTimer, Key, MainGame, MouseBtn, ScreenList};
use ben_gui::{DebugOverlay, Gui, OverlayStats};
use ben_platform::PlatformConfig;
use ben_render::{GpuContext, SpriteRenderer};
use config::{GameConfig, CONFIG_PATH};
use context::GameContext;
use screens::{EditorScreen, GameplayScreen, MainMenuScreen, SCREEN_INDEX_MAIN_MENU};

/// Longest frame the simulation will see; a stalled window does not launch
/// bodies through the floor.
const MAX_FRAME_DT: f32 = 0.1;
/// Pixels per wheel tick for touchpads reporting pixel deltas.
const PIXELS_PER_WHEEL_TICK: f32 = 40.0;

/// Everything that needs a window. Built in `resumed`.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SpriteRenderer,
    gui: Gui,
    overlay: DebugOverlay,
    overlay_stats: OverlayStats,
    timer: FrameTimer,
    main_game: MainGame<GameContext>,
    ctx: GameContext,
}

impl EngineState {
    fn new(window: Arc<Window>, config: GameConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let renderer = SpriteRenderer::new(&gpu);
        let gui = Gui::new(&gpu.device, gpu.surface_format, &window);
        let timer = FrameTimer::new(config.max_fps);

        let mut ctx = GameContext::new(config, gui.context().clone());
        ctx.viewport = gpu.size;
        ctx.pixels_per_point = window.scale_factor() as f32;

        let mut screens = ScreenList::new();
        screens.add_screen(Box::new(MainMenuScreen::new()));
        screens.add_screen(Box::new(GameplayScreen::new()));
        screens.add_screen(Box::new(EditorScreen::new()));
        let mut main_game = MainGame::new(screens);
        main_game.init(SCREEN_INDEX_MAIN_MENU, &mut ctx);

        Ok(Self {
            window,
            gpu,
            renderer,
            gui,
            overlay: DebugOverlay::new(),
            overlay_stats: OverlayStats::default(),
            timer,
            main_game,
            ctx,
        })
    }

    fn handle_key(&mut self, key_code: KeyCode, pressed: bool, egui_consumed: bool) {
        if key_code == KeyCode::F3 {
            if pressed && !egui_consumed {
                self.overlay.toggle();
            }
            return;
        }
        let Some(key) = map_key(key_code) else {
            return;
        };
        if !pressed {
            self.ctx.input.key_up(key);
        } else if !egui_consumed {
            self.ctx.input.key_down(key);
        }
    }

    /// Run one frame. Returns false once the game has stopped.
    fn frame(&mut self) -> bool {
        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return true;
        }
        self.timer.begin_frame();
        self.ctx.dt = (self.timer.real_dt as f32).min(MAX_FRAME_DT);
        self.ctx.frame.clear();

        self.gui.begin_pass(&self.window);
        self.main_game.update(&mut self.ctx);
        if !self.main_game.is_running() {
            self.gui.shutdown();
            return false;
        }
        self.main_game.draw(&mut self.ctx);

        self.overlay_stats.screen = self
            .main_game
            .current_screen_name()
            .unwrap_or("-")
            .to_string();
        self.overlay_stats.body_count = self.ctx.stats.body_count;
        self.overlay_stats.box_count = self.ctx.stats.box_count;
        self.overlay_stats.light_count = self.ctx.stats.light_count;
        self.overlay
            .show(self.gui.context(), &self.timer, &self.overlay_stats);
        let gui_frame = self.gui.end_pass(&self.window);

        let Some((output, view)) = self.gpu.begin_frame() else {
            self.ctx.input.end_frame();
            return true;
        };
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let stats = self
            .renderer
            .render(&self.gpu, &mut encoder, &view, &self.ctx.frame);
        self.overlay_stats.draw_calls = stats.draw_calls;
        self.overlay_stats.texture_binds = stats.texture_binds;
        self.overlay_stats.sprite_count = stats.sprite_count;

        if let Some(gui_frame) = &gui_frame {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
                pixels_per_point: gui_frame.pixels_per_point,
            };
            self.gui.upload(
                &self.gpu.device,
                &self.gpu.queue,
                &mut encoder,
                gui_frame,
                &screen_descriptor,
            );
            {
                let mut egui_pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                self.gui.paint(&mut egui_pass, gui_frame, &screen_descriptor);
            }
            self.gui.cleanup(gui_frame);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.ctx.input.end_frame();
        true
    }
}

struct App {
    config: GameConfig,
    state: Option<EngineState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = PlatformConfig {
            title: self.config.window.title.clone(),
            width: self.config.window.width,
            height: self.config.window.height,
            resizable: true,
        };
        let started = ben_platform::create_window(event_loop, &platform)
            .and_then(|window| EngineState::new(window, self.config.clone()));
        match started {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Startup failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            let next = state.timer.next_frame_at();
            if state.timer.is_frame_due(Instant::now()) {
                state.window.request_redraw();
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(next));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let egui_consumed = state.gui.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.main_game.exit_game(&mut state.ctx);
                state.gui.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let (w, h) = (physical_size.width, physical_size.height);
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.ctx.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.ctx.pixels_per_point = scale_factor as f32;
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    state.handle_key(key_code, pressed, egui_consumed);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state
                    .ctx
                    .input
                    .mouse_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(btn) = map_mouse_button(button) {
                    match button_state {
                        ElementState::Pressed => state.ctx.input.mouse_down(btn),
                        ElementState::Released => state.ctx.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let ticks = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_WHEEL_TICK,
                };
                state.ctx.input.wheel_scrolled(ticks);
            }

            WindowEvent::RedrawRequested => {
                if !state.frame() {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            state.main_game.exit_game(&mut state.ctx);
            state.gui.shutdown();
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::ShiftLeft => Some(Key::LShift),
        KeyCode::ControlLeft => Some(Key::LCtrl),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Ninja Platformer starting...");
    let config = config::load_or_default(Path::new(CONFIG_PATH));

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
    }
}
