//! egui integration owned by the application.
//!
//! The GUI is created once after the window and device exist and torn down
//! with `shutdown()` before the device goes away. Each frame runs in phases:
//!
//!   1. `begin_pass()` -- start an egui pass; screens then build widgets
//!      against `context()` during their update/draw
//!   2. `end_pass()`   -- finish the pass and tessellate
//!   3. `upload()`     -- upload textures and buffers (borrows the encoder)
//!   4. `paint()`      -- render into a pass made with `forget_lifetime()`
//!   5. `cleanup()`    -- free textures egui no longer references
//!
//! After `shutdown()` every phase is a no-op.

use winit::window::Window;

/// Tessellated output of one egui pass.
pub struct GuiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

pub struct Gui {
    ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: Option<egui_wgpu::Renderer>,
    pass_open: bool,
}

impl Gui {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        log::info!("GUI initialised");

        Self {
            ctx,
            winit_state,
            renderer: Some(renderer),
            pass_open: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.renderer.is_some()
    }

    /// Handle to the egui context. Cheap to clone.
    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Feed a window event to egui; returns whether egui consumed it.
    pub fn handle_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        if !self.is_active() {
            return false;
        }
        self.winit_state.on_window_event(window, event).consumed
    }

    pub fn begin_pass(&mut self, window: &Window) {
        if !self.is_active() || self.pass_open {
            return;
        }
        let raw_input = self.winit_state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
        self.pass_open = true;
    }

    pub fn end_pass(&mut self, window: &Window) -> Option<GuiFrame> {
        if !self.pass_open {
            return None;
        }
        self.pass_open = false;
        let full_output = self.ctx.end_pass();
        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        Some(GuiFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        })
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &GuiFrame,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        for (id, image_delta) in &frame.textures_delta.set {
            renderer.update_texture(device, queue, *id, image_delta);
        }
        renderer.update_buffers(device, queue, encoder, &frame.primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        frame: &GuiFrame,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        if let Some(renderer) = &self.renderer {
            renderer.render(render_pass, &frame.primitives, screen_descriptor);
        }
    }

    pub fn cleanup(&mut self, frame: &GuiFrame) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        for id in &frame.textures_delta.free {
            renderer.free_texture(id);
        }
    }

    /// Release the GPU side of the GUI. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.pass_open {
            // Close the pass so the context is not left mid-frame.
            let _ = self.ctx.end_pass();
            self.pass_open = false;
        }
        if self.renderer.take().is_some() {
            log::info!("GUI shut down");
        }
    }
}
