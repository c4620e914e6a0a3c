use ben_core::{ColorRGBA8, Screen, ScreenIndex, ScreenState};

use super::{SCREEN_INDEX_EDITOR, SCREEN_INDEX_GAMEPLAY};
use crate::context::{GameContext, WorldStats};

const CLEAR_COLOR: ColorRGBA8 = ColorRGBA8::new(0, 0, 102, 255);
const BUTTON_SIZE: [f32; 2] = [200.0, 40.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    StartGame,
    LevelEditor,
    Exit,
}

pub struct MainMenuScreen {
    state: ScreenState,
    next_screen: ScreenIndex,
}

impl MainMenuScreen {
    pub fn new() -> Self {
        Self {
            state: ScreenState::None,
            next_screen: SCREEN_INDEX_GAMEPLAY,
        }
    }

    pub fn choose(&mut self, choice: MenuChoice) {
        log::info!("Main menu: {choice:?}");
        match choice {
            MenuChoice::StartGame => {
                self.next_screen = SCREEN_INDEX_GAMEPLAY;
                self.state = ScreenState::ChangeNext;
            }
            MenuChoice::LevelEditor => {
                self.next_screen = SCREEN_INDEX_EDITOR;
                self.state = ScreenState::ChangeNext;
            }
            MenuChoice::Exit => self.state = ScreenState::ExitApplication,
        }
    }

    fn show_buttons(ctx: &egui::Context) -> Option<MenuChoice> {
        let mut choice = None;
        egui::Area::new(egui::Id::new("main_menu"))
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Ninja Platformer");
                    ui.add_space(16.0);
                    for (label, pick) in [
                        ("Start Game", MenuChoice::StartGame),
                        ("Level Editor", MenuChoice::LevelEditor),
                        ("Exit Game", MenuChoice::Exit),
                    ] {
                        if ui.add_sized(BUTTON_SIZE, egui::Button::new(label)).clicked() {
                            choice = Some(pick);
                        }
                        ui.add_space(8.0);
                    }
                });
            });
        choice
    }
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<GameContext> for MainMenuScreen {
    fn name(&self) -> &'static str {
        "MainMenu"
    }

    fn next_screen_index(&self) -> Option<ScreenIndex> {
        Some(self.next_screen)
    }

    fn previous_screen_index(&self) -> Option<ScreenIndex> {
        None
    }

    fn on_entry(&mut self, ctx: &mut GameContext) {
        ctx.stats = WorldStats::default();
    }

    fn on_exit(&mut self, _ctx: &mut GameContext) {}

    fn update(&mut self, ctx: &mut GameContext) {
        if let Some(choice) = Self::show_buttons(&ctx.ui) {
            self.choose(choice);
        }
    }

    fn draw(&mut self, ctx: &mut GameContext) {
        ctx.frame.clear_color = CLEAR_COLOR;
    }

    fn state(&self) -> ScreenState {
        self.state
    }

    fn set_state(&mut self, state: ScreenState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_pick_next_screen() {
        let mut menu = MainMenuScreen::new();
        menu.set_running();
        assert_eq!(menu.previous_screen_index(), None);

        menu.choose(MenuChoice::LevelEditor);
        assert_eq!(menu.state(), ScreenState::ChangeNext);
        assert_eq!(menu.next_screen_index(), Some(SCREEN_INDEX_EDITOR));

        menu.choose(MenuChoice::StartGame);
        assert_eq!(menu.next_screen_index(), Some(SCREEN_INDEX_GAMEPLAY));

        menu.choose(MenuChoice::Exit);
        assert_eq!(menu.state(), ScreenState::ExitApplication);
    }

    #[test]
    fn idle_update_keeps_running() {
        let mut ctx = crate::context::test_context();
        let mut menu = MainMenuScreen::new();
        menu.set_running();
        let _ = ctx.ui.clone().run(egui::RawInput::default(), |_| {
            menu.update(&mut ctx);
        });
        assert_eq!(menu.state(), ScreenState::Running);
        menu.draw(&mut ctx);
        assert_eq!(ctx.frame.clear_color, CLEAR_COLOR);
    }
}
