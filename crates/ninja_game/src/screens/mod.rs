pub mod editor;
pub mod gameplay;
pub mod main_menu;

pub use editor::EditorScreen;
pub use gameplay::GameplayScreen;
pub use main_menu::MainMenuScreen;

use ben_core::ScreenIndex;

/// Screens are added to the list in this order by `main`.
pub const SCREEN_INDEX_MAIN_MENU: ScreenIndex = 0;
pub const SCREEN_INDEX_GAMEPLAY: ScreenIndex = 1;
pub const SCREEN_INDEX_EDITOR: ScreenIndex = 2;
