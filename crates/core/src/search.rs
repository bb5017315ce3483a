//! Move-search port
//!
//! The session never searches for moves itself. It hands a [`SearchRequest`] to a
//! [`MoveEngine`] and polls for the reply once per tick, so an engine may run on
//! another thread (or process) while the board keeps rendering.

use thiserror::Error;

use crate::bitboard::BitBoard;
use crate::types::{Side, BOARD_WIDTH};

/// Why an engine reply could not be used. Always recovered by playing a random
/// legal column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFault {
    #[error("engine reply is not a column: {0:?}")]
    Unparseable(String),
    #[error("engine column {0} is out of range")]
    OutOfRange(i64),
    #[error("engine column {0} is full")]
    IllegalColumn(u8),
    #[error("engine exceeded its {budget_ms}ms budget")]
    Timeout { budget_ms: u32 },
    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

/// One query: the position, the side to move, and the think-time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    pub board: BitBoard,
    pub to_move: Side,
    pub budget_ms: u32,
}

impl SearchRequest {
    pub fn new(board: BitBoard, to_move: Side, budget_ms: u32) -> Self {
        Self {
            board,
            to_move,
            budget_ms,
        }
    }

    /// Bits of the side the engine plays
    pub fn engine_bits(&self) -> u64 {
        self.board.bits(self.to_move)
    }

    pub fn opponent_bits(&self) -> u64 {
        self.board.bits(self.to_move.other())
    }
}

/// A move-search collaborator.
///
/// At most one request is outstanding: `submit` replaces any earlier one and
/// `poll` yields its reply exactly once.
pub trait MoveEngine {
    fn submit(&mut self, request: SearchRequest);

    /// Non-blocking. `None` while the reply is not ready (or nothing was submitted).
    fn poll(&mut self) -> Option<Result<u8, EngineFault>>;

    /// Forget the outstanding request, if any.
    fn cancel(&mut self) {}
}

/// Check a raw engine column against the board.
pub fn validate_column(board: &BitBoard, column: i64) -> Result<u8, EngineFault> {
    let col = u8::try_from(column)
        .ok()
        .filter(|&c| c < BOARD_WIDTH)
        .ok_or(EngineFault::OutOfRange(column))?;
    if board.can_drop(col) {
        Ok(col)
    } else {
        Err(EngineFault::IllegalColumn(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_column() {
        let mut board = BitBoard::new();
        assert_eq!(validate_column(&board, 3), Ok(3));
        assert_eq!(validate_column(&board, -1), Err(EngineFault::OutOfRange(-1)));
        assert_eq!(validate_column(&board, 7), Err(EngineFault::OutOfRange(7)));
        for i in 0..6 {
            board.commit_drop(0, Side::from_index(i % 2));
        }
        assert_eq!(validate_column(&board, 0), Err(EngineFault::IllegalColumn(0)));
    }

    #[test]
    fn test_request_bits_follow_side_to_move() {
        let board = BitBoard::from_columns(&[3, 4]).unwrap();
        let req = SearchRequest::new(board, Side::B, 10);
        assert_eq!(req.engine_bits(), board.side_b());
        assert_eq!(req.opponent_bits(), board.side_a());
    }
}
