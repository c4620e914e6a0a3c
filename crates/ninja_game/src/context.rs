use ben_core::InputState;
use ben_render::RenderQueue;

use crate::config::GameConfig;

/// Counts the screens publish for the debug overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub body_count: usize,
    pub box_count: usize,
    pub light_count: usize,
}

/// Per-application state handed to every screen callback.
///
/// Screens read input and the egui context during `update`, and push finished
/// sprite batches into `frame` during `draw`. The main loop owns the GPU and
/// renders `frame` once the current screen has drawn.
pub struct GameContext {
    pub config: GameConfig,
    pub input: InputState,
    pub viewport: (u32, u32),
    pub pixels_per_point: f32,
    pub ui: egui::Context,
    pub frame: RenderQueue,
    pub stats: WorldStats,
    /// Seconds since the previous frame, clamped by the main loop.
    pub dt: f32,
}

impl GameContext {
    pub fn new(config: GameConfig, ui: egui::Context) -> Self {
        let viewport = (config.window.width, config.window.height);
        Self {
            config,
            input: InputState::new(),
            viewport,
            pixels_per_point: 1.0,
            ui,
            frame: RenderQueue::new(),
            stats: WorldStats::default(),
            dt: 0.0,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> GameContext {
    GameContext::new(GameConfig::default(), egui::Context::default())
}
