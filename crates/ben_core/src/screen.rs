//! Application modes and the ordered list that navigates between them.
//!
//! A screen never switches the application itself. It raises its own state to
//! `ChangeNext`, `ChangePrevious` or `ExitApplication` and the driver in
//! [`crate::main_game`] performs the transition at the start of the next frame.
//! Next/previous targets are plain list positions; `None` means "no screen",
//! which the driver treats as a request to exit.

/// Position of a screen inside its [`ScreenList`].
pub type ScreenIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenState {
    #[default]
    None,
    Running,
    ChangeNext,
    ChangePrevious,
    ExitApplication,
}

/// One mode of the application. `C` is the per-frame context the driver hands
/// to every hook (input, renderer queues, UI).
pub trait Screen<C> {
    fn name(&self) -> &'static str;

    fn next_screen_index(&self) -> Option<ScreenIndex>;
    fn previous_screen_index(&self) -> Option<ScreenIndex>;

    /// Called once when the screen is added to a list.
    fn build(&mut self) {}
    /// Called once when the list is torn down.
    fn destroy(&mut self) {}

    fn on_entry(&mut self, ctx: &mut C);
    fn on_exit(&mut self, ctx: &mut C);
    fn update(&mut self, ctx: &mut C);
    fn draw(&mut self, ctx: &mut C);

    fn state(&self) -> ScreenState;
    fn set_state(&mut self, state: ScreenState);

    fn set_running(&mut self) {
        self.set_state(ScreenState::Running);
    }
}

pub struct ScreenList<C> {
    screens: Vec<Box<dyn Screen<C>>>,
    current: Option<ScreenIndex>,
}

impl<C> Default for ScreenList<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ScreenList<C> {
    pub fn new() -> Self {
        Self {
            screens: Vec::new(),
            current: None,
        }
    }

    /// Append a screen, build it, and return its index.
    pub fn add_screen(&mut self, mut screen: Box<dyn Screen<C>>) -> ScreenIndex {
        screen.build();
        self.screens.push(screen);
        self.screens.len() - 1
    }

    /// Point the cursor at `index`. Out-of-range targets clear the cursor.
    pub fn set_screen(&mut self, index: Option<ScreenIndex>) {
        self.current = index.filter(|&i| i < self.screens.len());
    }

    pub fn current_index(&self) -> Option<ScreenIndex> {
        self.current
    }

    pub fn current(&self) -> Option<&(dyn Screen<C> + 'static)> {
        self.current
            .and_then(|i| self.screens.get(i))
            .map(|s| s.as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut (dyn Screen<C> + 'static)> {
        match self.current {
            Some(i) => self.screens.get_mut(i).map(|s| s.as_mut()),
            None => None,
        }
    }

    /// Follow the current screen's next index.
    pub fn move_next(&mut self) -> Option<ScreenIndex> {
        let target = self.current().and_then(|s| s.next_screen_index());
        self.set_screen(target);
        self.current
    }

    /// Follow the current screen's previous index.
    pub fn move_previous(&mut self) -> Option<ScreenIndex> {
        let target = self.current().and_then(|s| s.previous_screen_index());
        self.set_screen(target);
        self.current
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Destroy every screen and empty the list.
    pub fn destroy(&mut self) {
        for screen in &mut self.screens {
            screen.destroy();
        }
        self.screens.clear();
        self.current = None;
    }
}
