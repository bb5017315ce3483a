//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, engine collaborators).
//!
//! # Board Geometry
//!
//! Standard Connect Four playfield:
//!
//! - **Width**: 7 columns (indexed 0-6, left to right)
//! - **Height**: 6 rows (indexed 0-5, bottom to top)
//! - **Row stride**: 7 bits per column (6 cells + 1 guard bit)
//!
//! A cell `(column, row)` lives at bit `column * ROW_STRIDE + row`. The guard bit at
//! the top of every column stays zero, so shift-based line detection never wraps
//! from the top of one column into the bottom of the next.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 5 | Fixed timestep interval |
//! | `TRANSITION_FRAME_WIDTH` | 700 | Slide cover width (midpoint of a transition) |
//! | `TRANSITION_STEP` | 20 | Slide advance per tick |
//! | `GRACE_AFTER_DROP` | 10 | Ticks of suppressed input after a landing |
//!
//! # Drop Physics
//!
//! Positions are measured in lane units from the top of the drop lane,
//! `CELL_UNITS` per cell. Two header rows sit above the board, so the resting
//! line for row `r` is `(BOARD_HEIGHT + 1 - r) * CELL_UNITS`.
//!
//! # Examples
//!
//! ```
//! use tui_connect4_types::{ScreenId, Side, Theme, BOARD_HEIGHT, BOARD_WIDTH, ROW_STRIDE};
//!
//! assert_eq!(BOARD_WIDTH, 7);
//! assert_eq!(BOARD_HEIGHT, 6);
//! assert_eq!(ROW_STRIDE, 7);
//!
//! assert_eq!(Side::A.other(), Side::B);
//! assert_eq!(ScreenId::from_str("gamebot"), Some(ScreenId::SoloGame));
//! assert_eq!(Theme::from_str("Mint"), Some(Theme::Mint));
//! ```

/// Board width in columns (7)
pub const BOARD_WIDTH: u8 = 7;

/// Board height in rows (6)
pub const BOARD_HEIGHT: u8 = 6;

/// Bits reserved per column: the playable rows plus one guard bit.
pub const ROW_STRIDE: u8 = BOARD_HEIGHT + 1;

/// Total number of playable cells (42)
pub const CELL_COUNT: u8 = BOARD_WIDTH * BOARD_HEIGHT;

/// Pieces in a line needed to win.
pub const CONNECT: u8 = 4;

/// Column used for the engine's scripted opening move.
pub const CENTER_COLUMN: u8 = BOARD_WIDTH / 2;

// The bitboard is a u64; every column plus its guard bit must fit.
const _: () = assert!(ROW_STRIDE > BOARD_HEIGHT);
const _: () = assert!((BOARD_WIDTH as u32) * (ROW_STRIDE as u32) <= 64);

/// Fixed timestep interval in milliseconds.
pub const TICK_MS: u32 = 5;

/// Width of the sliding transition cover. The pending screen change is applied
/// when progress first reaches this value, the transition ends at twice it.
pub const TRANSITION_FRAME_WIDTH: u32 = 700;

/// Transition progress per tick.
pub const TRANSITION_STEP: u32 = 20;

/// Ticks of suppressed column input after a drop lands.
pub const GRACE_AFTER_DROP: u32 = 10;

/// Lane units per board cell.
pub const CELL_UNITS: f32 = 100.0;

/// Header rows drawn above the board inside the drop lane.
pub const HEADER_ROWS: u8 = 2;

/// Velocity added per physics step.
pub const DROP_GRAVITY: f32 = 0.8;

/// Fraction of speed kept when a piece bounces.
pub const DROP_DAMPING: f32 = 0.6;

/// Minimum impact speed that still produces a bounce.
pub const BOUNCE_THRESHOLD: f32 = 2.0;

/// Bounces allowed per drop.
pub const BOUNCE_BUDGET: u8 = 2;

/// Physics steps the landed piece stays visible as an animated piece.
pub const AFTERIMAGE_STEPS: u8 = 2;

/// Think-time budget of the engine's first ("probe") query.
pub const PROBE_BUDGET_MS: u32 = 500;

/// Difficulty at which random moves stop and think time starts to grow.
pub const DIFFICULTY_THRESHOLD: u8 = 75;

/// Maximum difficulty slider value.
pub const DIFFICULTY_MAX: u8 = 100;

/// Think-time budget below the difficulty threshold.
pub const MIN_THINK_MS: u32 = 1;

/// Think-time budget at the difficulty threshold.
pub const BASE_THINK_MS: u32 = 10;

/// Growth factor of the think-time budget across the upper difficulty segment.
pub const THINK_GROWTH: f64 = 1000.0;

/// One of the two players.
///
/// - **A**: player one. In solo mode the human.
/// - **B**: player two. In solo mode the engine.
///
/// Win evaluation checks side A before side B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Turn index (0 for A, 1 for B)
    pub fn index(&self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Side::A
        } else {
            Side::B
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Display label used on score lines
    pub fn label(&self) -> &'static str {
        match self {
            Side::A => "Player 1",
            Side::B => "Player 2",
        }
    }
}

/// Result of evaluating a board for four in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    SideAWins,
    SideBWins,
    NoWinYet,
}

impl Outcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::SideAWins => Some(Side::A),
            Outcome::SideBWins => Some(Side::B),
            Outcome::NoWinYet => None,
        }
    }

    pub fn for_side(side: Side) -> Self {
        match side {
            Side::A => Outcome::SideAWins,
            Side::B => Outcome::SideBWins,
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    Win(Side),
    Draw,
}

/// Which kind of game is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Human (side A) against the move-search engine (side B)
    SoloVsEngine,
    /// Two humans sharing the terminal
    TwoPlayer,
}

impl GameMode {
    /// The game screen that hosts this mode
    pub fn screen(&self) -> ScreenId {
        match self {
            GameMode::SoloVsEngine => ScreenId::SoloGame,
            GameMode::TwoPlayer => ScreenId::DuoGame,
        }
    }
}

/// Identifier of a navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Menu,
    ChooseGameMode,
    ChooseFirstSingle,
    SelectDifficulty,
    ChooseFirstMulti,
    SoloGame,
    DuoGame,
    EndScreen,
    HowToPlay,
    QuitScreen,
    Forfeit,
    Settings,
}

impl ScreenId {
    pub const ALL: [ScreenId; 12] = [
        ScreenId::Menu,
        ScreenId::ChooseGameMode,
        ScreenId::ChooseFirstSingle,
        ScreenId::SelectDifficulty,
        ScreenId::ChooseFirstMulti,
        ScreenId::SoloGame,
        ScreenId::DuoGame,
        ScreenId::EndScreen,
        ScreenId::HowToPlay,
        ScreenId::QuitScreen,
        ScreenId::Forfeit,
        ScreenId::Settings,
    ];

    /// Parse a screen name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_connect4_types::ScreenId;
    ///
    /// assert_eq!(ScreenId::from_str("menu"), Some(ScreenId::Menu));
    /// assert_eq!(ScreenId::from_str("ENDSCREEN"), Some(ScreenId::EndScreen));
    /// assert_eq!(ScreenId::from_str("lobby"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALL.into_iter().find(|id| id.as_str() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenId::Menu => "menu",
            ScreenId::ChooseGameMode => "choosegamemode",
            ScreenId::ChooseFirstSingle => "choosefirst_single",
            ScreenId::SelectDifficulty => "selectdifficulty",
            ScreenId::ChooseFirstMulti => "choosefirst_multi",
            ScreenId::SoloGame => "gamebot",
            ScreenId::DuoGame => "gamehmn",
            ScreenId::EndScreen => "endscreen",
            ScreenId::HowToPlay => "howtoplay",
            ScreenId::QuitScreen => "quitscreen",
            ScreenId::Forfeit => "forfeit",
            ScreenId::Settings => "settings",
        }
    }

    /// True for the two screens that host a board
    pub fn is_game(&self) -> bool {
        matches!(self, ScreenId::SoloGame | ScreenId::DuoGame)
    }

    pub fn game_mode(&self) -> Option<GameMode> {
        match self {
            ScreenId::SoloGame => Some(GameMode::SoloVsEngine),
            ScreenId::DuoGame => Some(GameMode::TwoPlayer),
            _ => None,
        }
    }
}

/// Visual theme identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    Bubblegum,
    Mint,
    Greyscale,
    Coffee,
    Sleek,
    Magic,
    Jungle,
    #[default]
    Default,
}

impl Theme {
    pub const ALL: [Theme; 8] = [
        Theme::Bubblegum,
        Theme::Mint,
        Theme::Greyscale,
        Theme::Coffee,
        Theme::Sleek,
        Theme::Magic,
        Theme::Jungle,
        Theme::Default,
    ];

    /// Parse a theme name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Bubblegum => "bubblegum",
            Theme::Mint => "mint",
            Theme::Greyscale => "greyscale",
            Theme::Coffee => "coffee",
            Theme::Sleek => "sleek",
            Theme::Magic => "magic",
            Theme::Jungle => "jungle",
            Theme::Default => "default",
        }
    }
}

/// Player commands delivered to the application state.
///
/// These are produced by the input layer (keyboard mapping or pointer hit-testing)
/// and consumed by the core. They carry no terminal types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Move focus to the next target on the screen
    FocusNext,
    /// Move focus to the previous target on the screen
    FocusPrev,
    /// Activate the focused target
    Activate,
    /// Activate a target by index (pointer click)
    ActivateTarget(usize),
    /// Activate the screen's back/exit target
    Escape,
    /// Nudge the focused slider by the given amount
    SliderStep(i8),
    /// Set the slider at target index to a value
    SliderSet { target: usize, value: u8 },
    /// Hover a board column (pointer move)
    HoverColumn(u8),
    /// Move the hovered column left/right
    HoverStep(i8),
    /// Drop into a specific column
    DropColumn(u8),
    /// Drop into the hovered column
    DropHovered,
}

/// What a pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Press,
    Drag,
    Release,
}

/// A pointer event in terminal cell coordinates.
///
/// The view's hit map turns these into [`UiCommand`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: u16,
    pub y: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_leaves_one_guard_bit_per_column() {
        assert_eq!(ROW_STRIDE, BOARD_HEIGHT + 1);
        assert_eq!(CELL_COUNT, 42);
        assert_eq!(CENTER_COLUMN, 3);
    }

    #[test]
    fn transition_midpoint_is_reachable_in_whole_steps() {
        assert_eq!(TRANSITION_FRAME_WIDTH % TRANSITION_STEP, 0);
    }
}
