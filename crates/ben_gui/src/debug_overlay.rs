//! F3 stats window drawn with egui on top of the current screen.

use ben_core::FrameTimer;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub sprite_count: u32,
    pub body_count: usize,
    pub box_count: usize,
    pub light_count: usize,
    pub screen: String,
}

#[derive(Debug, Default)]
pub struct DebugOverlay {
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn show(&self, ctx: &egui::Context, timer: &FrameTimer, stats: &OverlayStats) {
        if !self.visible {
            return;
        }
        egui::Window::new("Debug")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.1}", timer.smoothed_fps));
                ui.label(format!("Frame time: {:.2} ms", timer.smoothed_frame_time_ms));
                ui.label(format!("Frame: {}", timer.frame_count));
                ui.label(format!("FPS cap: {:.0}", timer.max_fps));
                ui.separator();
                ui.label(format!("Screen: {}", stats.screen));
                ui.label(format!("Draw calls: {}", stats.draw_calls));
                ui.label(format!("Texture binds: {}", stats.texture_binds));
                ui.label(format!("Sprites: {}", stats.sprite_count));
                ui.separator();
                ui.label(format!("Bodies: {}", stats.body_count));
                ui.label(format!("Boxes: {}", stats.box_count));
                ui.label(format!("Lights: {}", stats.light_count));
            });
    }
}
