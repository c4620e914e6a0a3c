pub mod debug_overlay;
pub mod gui;

pub use debug_overlay::{DebugOverlay, OverlayStats};
pub use gui::{Gui, GuiFrame};
