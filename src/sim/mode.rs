//! Top-level application state machine.
//!
//! ```text
//!   MainMenu ──Start──▶ Playing ◀──PAUSE / Resume──▶ Paused
//!      │  ▲                                            │
//!   Editor│└────────────PAUSE──── Editor ◀──Editor─────┘
//!      ▼  │                         ▲
//!      └──┴─────────────────────────┘
//!   MainMenu ──Quit──▶ Quit
//! ```

use super::input::{Buttons, InputSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainMenuItem {
    StartGame,
    EnterEditor,
    Options,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    EnterEditor,
}

const MAIN_MENU_LABELS: [&str; 4] = ["Start Game", "Enter Editor", "Options", "Quit"];
const PAUSE_LABELS: [&str; 2] = ["Resume Game", "Enter Editor"];

impl MainMenuItem {
    pub const ALL: [Self; 4] = [Self::StartGame, Self::EnterEditor, Self::Options, Self::Quit];

    #[inline]
    pub const fn label(self) -> &'static str {
        MAIN_MENU_LABELS[self as usize]
    }
}

impl PauseItem {
    pub const ALL: [Self; 2] = [Self::Resume, Self::EnterEditor];

    #[inline]
    pub const fn label(self) -> &'static str {
        PAUSE_LABELS[self as usize]
    }
}

/// Step `current` by `delta` through `all`, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, delta: isize) -> T {
    let n = all.len() as isize;
    let i = all.iter().position(|&x| x == current).unwrap_or(0) as isize;
    all[(i + delta).rem_euclid(n) as usize]
}

fn menu_delta(input: &InputSnapshot) -> isize {
    input.pressed(Buttons::MENU_DOWN) as isize - input.pressed(Buttons::MENU_UP) as isize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    MainMenu { selected: MainMenuItem },
    Playing,
    Paused { selected: PauseItem },
    Editor,
    Quit,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::MainMenu {
            selected: MainMenuItem::StartGame,
        }
    }
}

impl Mode {
    /// Apply one frame of input.
    pub fn next(self, input: &InputSnapshot) -> Mode {
        let confirm = input.pressed(Buttons::CONFIRM);
        let pause = input.pressed(Buttons::PAUSE);

        match self {
            Mode::MainMenu { selected } if confirm => match selected {
                MainMenuItem::StartGame => Mode::Playing,
                MainMenuItem::EnterEditor => Mode::Editor,
                MainMenuItem::Options => self,
                MainMenuItem::Quit => Mode::Quit,
            },
            Mode::MainMenu { selected } => Mode::MainMenu {
                selected: cycle(&MainMenuItem::ALL, selected, menu_delta(input)),
            },

            Mode::Playing if pause => Mode::Paused {
                selected: PauseItem::Resume,
            },
            Mode::Playing => self,

            Mode::Paused { .. } if pause => Mode::Playing,
            Mode::Paused { selected } if confirm => match selected {
                PauseItem::Resume => Mode::Playing,
                PauseItem::EnterEditor => Mode::Editor,
            },
            Mode::Paused { selected } => Mode::Paused {
                selected: cycle(&PauseItem::ALL, selected, menu_delta(input)),
            },

            Mode::Editor if pause => Mode::default(),
            Mode::Editor => self,

            Mode::Quit => self,
        }
    }

    /// Entering play from the main menu starts a fresh game.
    #[inline]
    pub fn starts_new_game(self, next: Mode) -> bool {
        matches!(self, Mode::MainMenu { .. }) && next == Mode::Playing
    }

    /// Whether the 3-D view should be drawn (behind the pause menu too).
    #[inline]
    pub fn shows_world(self) -> bool {
        matches!(self, Mode::Playing | Mode::Paused { .. })
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
