use crate::screen::{ScreenIndex, ScreenList, ScreenState};

/// Drives a [`ScreenList`] once per frame.
///
/// The window layer owns the event loop; it calls `update` then `draw` every
/// frame and stops when `is_running` turns false.
pub struct MainGame<C> {
    screens: ScreenList<C>,
    is_running: bool,
}

impl<C> MainGame<C> {
    pub fn new(screens: ScreenList<C>) -> Self {
        Self {
            screens,
            is_running: false,
        }
    }

    /// Enter `initial` and start running. An invalid index exits on the
    /// first update.
    pub fn init(&mut self, initial: ScreenIndex, ctx: &mut C) {
        self.is_running = true;
        self.screens.set_screen(Some(initial));
        self.enter_current(ctx);
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn screens(&self) -> &ScreenList<C> {
        &self.screens
    }

    pub fn current_screen_name(&self) -> Option<&'static str> {
        self.screens.current().map(|s| s.name())
    }

    pub fn update(&mut self, ctx: &mut C) {
        if !self.is_running {
            return;
        }
        let Some(screen) = self.screens.current_mut() else {
            log::info!("No current screen, exiting");
            self.exit_game(ctx);
            return;
        };

        match screen.state() {
            ScreenState::Running => screen.update(ctx),
            ScreenState::ChangeNext => {
                screen.on_exit(ctx);
                self.screens.move_next();
                self.enter_current(ctx);
            }
            ScreenState::ChangePrevious => {
                screen.on_exit(ctx);
                self.screens.move_previous();
                self.enter_current(ctx);
            }
            ScreenState::ExitApplication => self.exit_game(ctx),
            ScreenState::None => {}
        }
    }

    /// Draw the current screen if it is running.
    pub fn draw(&mut self, ctx: &mut C) {
        if !self.is_running {
            return;
        }
        if let Some(screen) = self.screens.current_mut() {
            if screen.state() == ScreenState::Running {
                screen.draw(ctx);
            }
        }
    }

    /// Leave the current screen, destroy the list and stop. Safe to call
    /// more than once.
    pub fn exit_game(&mut self, ctx: &mut C) {
        if !self.is_running {
            return;
        }
        if let Some(screen) = self.screens.current_mut() {
            screen.on_exit(ctx);
        }
        self.screens.destroy();
        self.is_running = false;
        log::info!("Main game stopped");
    }

    fn enter_current(&mut self, ctx: &mut C) {
        if let Some(screen) = self.screens.current_mut() {
            log::info!("Entering screen '{}'", screen.name());
            screen.set_running();
            screen.on_entry(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;
    use std::cell::Cell;
    use std::rc::Rc;

    const MENU: ScreenIndex = 0;
    const GAMEPLAY: ScreenIndex = 1;
    const EDITOR: ScreenIndex = 2;

    /// Each hook appends "<name>:<hook>" to the context log.
    struct TestScreen {
        name: &'static str,
        next: Option<ScreenIndex>,
        previous: Option<ScreenIndex>,
        state: ScreenState,
        destroyed: Rc<Cell<u32>>,
    }

    impl Screen<Vec<String>> for TestScreen {
        fn name(&self) -> &'static str {
            self.name
        }
        fn next_screen_index(&self) -> Option<ScreenIndex> {
            self.next
        }
        fn previous_screen_index(&self) -> Option<ScreenIndex> {
            self.previous
        }
        fn destroy(&mut self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
        fn on_entry(&mut self, log: &mut Vec<String>) {
            log.push(format!("{}:entry", self.name));
        }
        fn on_exit(&mut self, log: &mut Vec<String>) {
            log.push(format!("{}:exit", self.name));
        }
        fn update(&mut self, log: &mut Vec<String>) {
            log.push(format!("{}:update", self.name));
        }
        fn draw(&mut self, log: &mut Vec<String>) {
            log.push(format!("{}:draw", self.name));
        }
        fn state(&self) -> ScreenState {
            self.state
        }
        fn set_state(&mut self, state: ScreenState) {
            self.state = state;
        }
    }

    fn three_screen_game(destroyed: &Rc<Cell<u32>>) -> MainGame<Vec<String>> {
        game_with_menu_target(GAMEPLAY, destroyed)
    }

    // Menu buttons pick the next target at click time; the test menu fixes it up front.
    fn game_with_menu_target(
        menu_next: ScreenIndex,
        destroyed: &Rc<Cell<u32>>,
    ) -> MainGame<Vec<String>> {
        let mut list = ScreenList::new();
        let screen = |name, next, previous| -> Box<dyn Screen<Vec<String>>> {
            Box::new(TestScreen {
                name,
                next,
                previous,
                state: ScreenState::None,
                destroyed: destroyed.clone(),
            })
        };
        list.add_screen(screen("menu", Some(menu_next), None));
        list.add_screen(screen("gameplay", None, Some(MENU)));
        list.add_screen(screen("editor", None, Some(MENU)));
        MainGame::new(list)
    }

    fn request(game: &mut MainGame<Vec<String>>, state: ScreenState) {
        game.screens
            .current_mut()
            .expect("current screen")
            .set_state(state);
    }

    #[test]
    fn init_enters_initial_screen_running() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = three_screen_game(&destroyed);
        let mut log = Vec::new();
        game.init(MENU, &mut log);
        assert!(game.is_running());
        assert_eq!(log, vec!["menu:entry"]);
        assert_eq!(game.current_screen_name(), Some("menu"));
        assert_eq!(
            game.screens().current().map(|s| s.state()),
            Some(ScreenState::Running)
        );
    }

    #[test]
    fn change_next_exits_then_enters_target() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = three_screen_game(&destroyed);
        let mut log = Vec::new();
        game.init(MENU, &mut log);
        request(&mut game, ScreenState::ChangeNext);
        game.update(&mut log);
        assert_eq!(log, vec!["menu:entry", "menu:exit", "gameplay:entry"]);
        assert_eq!(game.screens().current_index(), Some(GAMEPLAY));

        request(&mut game, ScreenState::ChangePrevious);
        game.update(&mut log);
        assert_eq!(game.screens().current_index(), Some(MENU));
    }

    #[test]
    fn menu_reaches_editor_and_back() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = game_with_menu_target(EDITOR, &destroyed);
        let mut log = Vec::new();
        game.init(MENU, &mut log);
        request(&mut game, ScreenState::ChangeNext);
        game.update(&mut log);
        assert_eq!(game.current_screen_name(), Some("editor"));
        request(&mut game, ScreenState::ChangePrevious);
        game.update(&mut log);
        assert_eq!(game.current_screen_name(), Some("menu"));
    }

    #[test]
    fn previous_from_menu_exits_on_following_frame() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = three_screen_game(&destroyed);
        let mut log = Vec::new();
        game.init(MENU, &mut log);
        request(&mut game, ScreenState::ChangePrevious);

        game.update(&mut log);
        assert!(game.is_running());
        assert!(game.screens().current().is_none());

        game.update(&mut log);
        assert!(!game.is_running());
        assert_eq!(destroyed.get(), 3);
    }

    #[test]
    fn next_to_no_screen_from_gameplay_exits() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = three_screen_game(&destroyed);
        let mut log = Vec::new();
        game.init(GAMEPLAY, &mut log);
        request(&mut game, ScreenState::ChangeNext);
        game.update(&mut log);
        game.update(&mut log);
        assert!(!game.is_running());
        assert_eq!(log, vec!["gameplay:entry", "gameplay:exit"]);
    }

    #[test]
    fn only_running_screen_is_updated_and_drawn() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = three_screen_game(&destroyed);
        let mut log = Vec::new();
        game.init(MENU, &mut log);
        game.update(&mut log);
        game.draw(&mut log);
        assert_eq!(log, vec!["menu:entry", "menu:update", "menu:draw"]);

        request(&mut game, ScreenState::ChangeNext);
        log.clear();
        game.draw(&mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn exit_application_tears_down_once() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = three_screen_game(&destroyed);
        let mut log = Vec::new();
        game.init(MENU, &mut log);
        request(&mut game, ScreenState::ExitApplication);
        game.update(&mut log);
        game.exit_game(&mut log);
        game.update(&mut log);
        assert!(!game.is_running());
        assert_eq!(destroyed.get(), 3);
        assert_eq!(log, vec!["menu:entry", "menu:exit"]);
        assert!(game.screens().is_empty());
    }

    #[test]
    fn invalid_initial_index_exits_on_first_update() {
        let destroyed = Rc::new(Cell::new(0));
        let mut game = three_screen_game(&destroyed);
        let mut log = Vec::new();
        game.init(9, &mut log);
        assert!(log.is_empty());
        game.update(&mut log);
        assert!(!game.is_running());
    }
}
