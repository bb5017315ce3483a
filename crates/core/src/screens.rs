//! Screen catalog
//!
//! Every screen is immutable content defined once at startup: optional static text
//! and an ordered list of targets. Each target may carry a destination (read by the
//! navigation state machine) and a callback (run synchronously by the app before the
//! navigation request is queued). Together the destinations form the screen graph.

use crate::nav::Destination;
use crate::types::{GameMode, ScreenId, Side, Theme, DIFFICULTY_MAX};

/// Side effect attached to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ResetScores,
    SetMode(GameMode),
    SetFirstPlayer(Side),
    /// Queue a return to the last game screen with a session reset
    Rematch,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Button,
    /// Value slider; the value itself lives in the app settings
    Slider { min: u8, max: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub label: &'static str,
    pub kind: TargetKind,
    pub destination: Option<Destination>,
    pub action: Option<Action>,
}

impl Target {
    pub fn button(label: &'static str) -> Self {
        Self {
            label,
            kind: TargetKind::Button,
            destination: None,
            action: None,
        }
    }

    pub fn to(mut self, screen: ScreenId) -> Self {
        self.destination = Some(Destination::GoTo(screen));
        self
    }

    pub fn back(mut self) -> Self {
        self.destination = Some(Destination::Back);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.destination = Some(Destination::ThemeOnly(theme));
        self
    }

    pub fn run(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn slider(label: &'static str, min: u8, max: u8) -> Self {
        Self {
            label,
            kind: TargetKind::Slider { min, max },
            destination: None,
            action: None,
        }
    }

    pub fn is_slider(&self) -> bool {
        matches!(self.kind, TargetKind::Slider { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub id: ScreenId,
    pub text: Option<&'static str>,
    pub targets: Vec<Target>,
    /// Target activated by the escape key
    pub escape: Option<usize>,
}

impl Screen {
    pub fn new(id: ScreenId, text: Option<&'static str>, targets: Vec<Target>) -> Self {
        // Escape maps to the screen's "back" target, else its last target.
        let escape = targets
            .iter()
            .position(|t| t.destination == Some(Destination::Back))
            .or_else(|| targets.len().checked_sub(1));
        Self {
            id,
            text,
            targets,
            escape,
        }
    }

    pub fn escape_at(mut self, index: usize) -> Self {
        self.escape = Some(index);
        self
    }

    pub fn target(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }
}

const MENU_TEXT: &str = "Welcome to Connect Four!\nChoose an option below to start playing.";
const HOW_TO_PLAY_TEXT: &str = "How to Play:\n\
1. Choose a column to drop your piece.\n\
2. Connect four pieces in a row, column, or diagonal to win.\n\
3. Take turns with your opponent.\n\
4. The game ends when one player wins or the board is full.";

/// All screens, looked up by id.
#[derive(Debug, Clone)]
pub struct ScreenCatalog {
    screens: Vec<Screen>,
}

impl ScreenCatalog {
    pub fn new(screens: Vec<Screen>) -> Self {
        Self { screens }
    }

    /// The full game shell.
    pub fn standard() -> Self {
        use ScreenId::*;

        let themes = Theme::ALL
            .iter()
            .map(|&t| Target::button(theme_label(t)).theme(t))
            .chain(std::iter::once(Target::button("Back").to(Menu)))
            .collect();

        Self::new(vec![
            Screen::new(
                Menu,
                Some(MENU_TEXT),
                vec![
                    Target::button("Start Game").to(ChooseGameMode),
                    Target::button("Settings").to(Settings),
                    Target::button("Reset Score").run(Action::ResetScores).to(Menu),
                    Target::button("How to Play").to(HowToPlay),
                    Target::button("Exit").to(QuitScreen),
                ],
            ),
            Screen::new(
                ChooseGameMode,
                Some("How many players?"),
                vec![
                    Target::button("1 Player")
                        .run(Action::SetMode(GameMode::SoloVsEngine))
                        .to(ChooseFirstSingle),
                    Target::button("2 Players")
                        .run(Action::SetMode(GameMode::TwoPlayer))
                        .to(ChooseFirstMulti),
                    Target::button("Back").back(),
                ],
            ),
            Screen::new(
                ChooseFirstSingle,
                Some("Who goes first?"),
                vec![
                    Target::button("Player")
                        .run(Action::SetFirstPlayer(Side::A))
                        .to(SelectDifficulty),
                    Target::button("Computer")
                        .run(Action::SetFirstPlayer(Side::B))
                        .to(SelectDifficulty),
                    Target::button("Back").back(),
                ],
            ),
            Screen::new(
                SelectDifficulty,
                Some("Adjust Difficulty:"),
                vec![
                    Target::slider("Difficulty", 0, DIFFICULTY_MAX),
                    Target::button("Start").to(SoloGame),
                    Target::button("Back").back(),
                ],
            ),
            Screen::new(
                ChooseFirstMulti,
                Some("Who goes first?"),
                vec![
                    Target::button("Player 1")
                        .run(Action::SetFirstPlayer(Side::A))
                        .to(DuoGame),
                    Target::button("Player 2")
                        .run(Action::SetFirstPlayer(Side::B))
                        .to(DuoGame),
                    Target::button("Back").back(),
                ],
            ),
            Screen::new(SoloGame, None, vec![Target::button("Exit Game").to(Forfeit)]),
            Screen::new(DuoGame, None, vec![Target::button("Exit Game").to(Forfeit)]),
            Screen::new(
                EndScreen,
                None,
                vec![
                    Target::button("Play Again").run(Action::Rematch),
                    Target::button("Main Menu").to(Menu),
                    Target::button("Reset Score").run(Action::ResetScores).to(EndScreen),
                    Target::button("Exit").to(QuitScreen),
                ],
            )
            .escape_at(1),
            Screen::new(
                HowToPlay,
                Some(HOW_TO_PLAY_TEXT),
                vec![Target::button("Back").back()],
            ),
            Screen::new(
                QuitScreen,
                Some("Are you sure you want to exit the game?"),
                vec![
                    Target::button("Yes, Exit").run(Action::Exit),
                    Target::button("No, Go Back").back(),
                ],
            ),
            Screen::new(
                Forfeit,
                Some("Are you sure you want to forfeit the match and go back to the main menu?"),
                vec![
                    Target::button("Yes, forfeit and return").to(Menu),
                    Target::button("No, continue game").back(),
                ],
            ),
            Screen::new(Settings, Some("Change your theme!"), themes),
        ])
    }

    pub fn get(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<ScreenId> {
        self.screens.iter().map(|s| s.id).collect()
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }
}

impl Default for ScreenCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Button label of a theme
pub fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Bubblegum => "Bubblegum",
        Theme::Mint => "Mint",
        Theme::Greyscale => "Greyscale",
        Theme::Coffee => "Coffee",
        Theme::Sleek => "Sleek",
        Theme::Magic => "Magic",
        Theme::Jungle => "Jungle",
        Theme::Default => "Default",
    }
}
