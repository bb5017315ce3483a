use crate::bitboard::BitBoard;
use crate::drop::AnimatedPiece;
use crate::screens::Screen;
use crate::types::{GameMode, Side, Theme};

/// Everything the view needs to draw one frame.
///
/// Borrowed from the app for the duration of a render; the core never draws.
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub screen: &'a Screen,
    pub theme: Theme,
    /// Slide cover progress, `None` when idle
    pub transition: Option<u32>,
    pub focus: usize,
    pub difficulty: u8,
    pub board: &'a BitBoard,
    pub piece: Option<AnimatedPiece>,
    pub hover: Option<u8>,
    pub turn: Side,
    pub mode: GameMode,
    pub thinking: bool,
    pub scores: [u32; 2],
    /// Result banner while a finished game is still on screen
    pub banner: Option<&'static str>,
    /// Result of the most recent game, shown on the end screen
    pub last_result: Option<&'static str>,
    pub input_blocked: bool,
}

impl FrameSnapshot<'_> {
    pub fn is_game(&self) -> bool {
        self.screen.id.is_game()
    }

    /// Side whose color the hover arrow takes
    pub fn arrow_side(&self) -> Side {
        match self.mode {
            GameMode::SoloVsEngine => Side::A,
            GameMode::TwoPlayer => self.turn,
        }
    }
}
