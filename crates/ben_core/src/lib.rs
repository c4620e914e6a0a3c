pub mod color;
pub mod geometry;
pub mod input;
pub mod main_game;
pub mod screen;
pub mod time;

pub use color::ColorRGBA8;
pub use geometry::Rect;
pub use input::{InputState, Key, MouseBtn};
pub use main_game::MainGame;
pub use screen::{Screen, ScreenIndex, ScreenList, ScreenState};
pub use time::FrameTimer;
