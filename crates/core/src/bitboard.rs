//! Bitboard module - packed two-player board
//!
//! Each side owns a `u64` where cell `(column, row)` is bit `column * ROW_STRIDE + row`.
//! Rows count from the bottom. The extra bit at the top of every column is a guard
//! bit that is never set, which keeps the shifted-AND line check from connecting
//! the top of one column with the bottom of the next.
//!
//! A `heights` array tracks the next free row of every column, so legality checks
//! and commits are O(1).

use arrayvec::ArrayVec;

use crate::types::{Outcome, Side, BOARD_HEIGHT, BOARD_WIDTH, CELL_COUNT, ROW_STRIDE};

/// Shift distances for the four line directions.
pub const VERTICAL: u32 = 1;
pub const HORIZONTAL: u32 = ROW_STRIDE as u32;
pub const DIAGONAL_UP: u32 = ROW_STRIDE as u32 + 1;
pub const DIAGONAL_DOWN: u32 = ROW_STRIDE as u32 - 1;

/// All directions, in evaluation order.
pub const DIRECTIONS: [u32; 4] = [VERTICAL, HORIZONTAL, DIAGONAL_UP, DIAGONAL_DOWN];

const COLUMN_MASK: u64 = (1u64 << BOARD_HEIGHT) - 1;

/// Mask of every playable cell (guard bits excluded).
pub const PLAYABLE_MASK: u64 = playable_mask();

const fn playable_mask() -> u64 {
    let mut mask = 0u64;
    let mut col = 0;
    while col < BOARD_WIDTH as u32 {
        mask |= COLUMN_MASK << (col * ROW_STRIDE as u32);
        col += 1;
    }
    mask
}

/// Bit index of a cell.
#[inline(always)]
pub fn cell_bit(column: u8, row: u8) -> u64 {
    1u64 << (column as u32 * ROW_STRIDE as u32 + row as u32)
}

/// True when `bits` contains four set bits spaced by one of the line directions.
#[inline]
pub fn has_four(bits: u64) -> bool {
    DIRECTIONS.iter().any(|&d| line_of_four(bits, d) != 0)
}

#[inline(always)]
fn line_of_four(bits: u64, d: u32) -> u64 {
    bits & (bits >> d) & (bits >> (2 * d)) & (bits >> (3 * d))
}

/// The game board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitBoard {
    side_a: u64,
    side_b: u64,
    heights: [u8; BOARD_WIDTH as usize],
}

impl BitBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a board from two bitsets.
    ///
    /// Returns `None` when the sets overlap, touch a guard bit, or contain floating
    /// pieces (a gap below a set bit).
    pub fn from_bits(side_a: u64, side_b: u64) -> Option<Self> {
        if side_a & side_b != 0 {
            return None;
        }
        let occupied = side_a | side_b;
        if occupied & !PLAYABLE_MASK != 0 {
            return None;
        }

        let mut heights = [0u8; BOARD_WIDTH as usize];
        for (col, height) in heights.iter_mut().enumerate() {
            let column = (occupied >> (col as u32 * ROW_STRIDE as u32)) & COLUMN_MASK;
            let filled = column.count_ones();
            // Pieces stack from the bottom: the column must be a contiguous run.
            if column != (1u64 << filled) - 1 {
                return None;
            }
            *height = filled as u8;
        }

        Some(Self {
            side_a,
            side_b,
            heights,
        })
    }

    pub fn bits(&self, side: Side) -> u64 {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    pub fn side_a(&self) -> u64 {
        self.side_a
    }

    pub fn side_b(&self) -> u64 {
        self.side_b
    }

    pub fn heights(&self) -> &[u8; BOARD_WIDTH as usize] {
        &self.heights
    }

    /// Number of pieces in a column (= next free row)
    pub fn height(&self, column: u8) -> Option<u8> {
        self.heights.get(column as usize).copied()
    }

    pub fn piece_count(&self) -> u8 {
        self.heights.iter().sum()
    }

    /// Check whether a piece can still be dropped into `column`
    pub fn can_drop(&self, column: u8) -> bool {
        matches!(self.height(column), Some(h) if h < BOARD_HEIGHT)
    }

    /// Drop a piece for `side` into `column`.
    ///
    /// Returns false (and leaves the board untouched) when the column is full or
    /// out of range.
    pub fn commit_drop(&mut self, column: u8, side: Side) -> bool {
        if !self.can_drop(column) {
            return false;
        }

        let row = self.heights[column as usize];
        let bit = cell_bit(column, row);
        match side {
            Side::A => self.side_a |= bit,
            Side::B => self.side_b |= bit,
        }
        self.heights[column as usize] += 1;

        debug_assert_eq!(self.side_a & self.side_b, 0);
        true
    }

    /// Evaluate the board for four in a row.
    ///
    /// Side A is checked before side B; under correct alternation at most one of
    /// them can have a line.
    pub fn evaluate(&self) -> Outcome {
        if has_four(self.side_a) {
            Outcome::SideAWins
        } else if has_four(self.side_b) {
            Outcome::SideBWins
        } else {
            Outcome::NoWinYet
        }
    }

    /// Board full with no line for either side
    pub fn is_draw(&self) -> bool {
        self.piece_count() == CELL_COUNT && self.evaluate() == Outcome::NoWinYet
    }

    /// Owner of a cell, rows counted from the bottom
    pub fn cell(&self, column: u8, row: u8) -> Option<Side> {
        if column >= BOARD_WIDTH || row >= BOARD_HEIGHT {
            return None;
        }
        let bit = cell_bit(column, row);
        if self.side_a & bit != 0 {
            Some(Side::A)
        } else if self.side_b & bit != 0 {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Columns that still accept a piece, left to right
    pub fn legal_columns(&self) -> ArrayVec<u8, { BOARD_WIDTH as usize }> {
        (0..BOARD_WIDTH).filter(|&c| self.can_drop(c)).collect()
    }

    /// Would dropping `side` into `column` complete a line for that side?
    pub fn would_win(&self, column: u8, side: Side) -> bool {
        let mut next = *self;
        next.commit_drop(column, side) && has_four(next.bits(side))
    }

    /// Build a board by alternating drops starting with side A.
    ///
    /// Stops at the first illegal column and returns `None`.
    pub fn from_columns(columns: &[u8]) -> Option<Self> {
        let mut board = Self::new();
        let mut side = Side::A;
        for &c in columns {
            if !board.commit_drop(c, side) {
                return None;
            }
            side = side.other();
        }
        Some(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = BitBoard::new();
        assert_eq!(board.piece_count(), 0);
        assert_eq!(board.evaluate(), Outcome::NoWinYet);
        for c in 0..BOARD_WIDTH {
            assert!(board.can_drop(c));
            for r in 0..BOARD_HEIGHT {
                assert_eq!(board.cell(c, r), None);
            }
        }
    }

    #[test]
    fn test_commit_sets_bit_and_height() {
        let mut board = BitBoard::new();
        assert!(board.commit_drop(3, Side::A));
        assert_eq!(board.side_a(), 1 << (3 * ROW_STRIDE as u32));
        assert_eq!(board.height(3), Some(1));

        assert!(board.commit_drop(3, Side::B));
        assert_eq!(board.side_b(), 1 << (3 * ROW_STRIDE as u32 + 1));
        assert_eq!(board.cell(3, 1), Some(Side::B));
    }

    #[test]
    fn test_out_of_range_column_is_illegal() {
        let mut board = BitBoard::new();
        assert!(!board.can_drop(BOARD_WIDTH));
        assert!(!board.commit_drop(BOARD_WIDTH, Side::A));
        assert_eq!(board, BitBoard::new());
    }

    #[test]
    fn test_full_column_rejects_commit_without_mutation() {
        let mut board = BitBoard::new();
        for i in 0..BOARD_HEIGHT {
            let side = if i % 2 == 0 { Side::A } else { Side::B };
            assert!(board.commit_drop(0, side));
        }
        let before = board;
        assert!(!board.can_drop(0));
        assert!(!board.commit_drop(0, Side::A));
        assert_eq!(board, before);
    }

    #[test]
    fn test_vertical_win() {
        let mut board = BitBoard::new();
        for _ in 0..4 {
            board.commit_drop(3, Side::A);
        }
        assert_eq!(board.evaluate(), Outcome::SideAWins);
    }

    #[test]
    fn test_horizontal_win_for_b() {
        let mut board = BitBoard::new();
        for c in 1..5 {
            board.commit_drop(c, Side::B);
        }
        assert_eq!(board.evaluate(), Outcome::SideBWins);
    }

    #[test]
    fn test_diagonal_up_win() {
        // A climbs 0,0 -> 3,3 on a staircase of B pieces.
        let board = BitBoard::from_columns(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]).unwrap();
        assert_eq!(board.evaluate(), Outcome::SideAWins);
    }

    #[test]
    fn test_diagonal_down_win() {
        let board = BitBoard::from_columns(&[6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3]).unwrap();
        assert_eq!(board.evaluate(), Outcome::SideAWins);
    }

    #[test]
    fn test_guard_bit_blocks_vertical_wrap() {
        // Top two cells of column 0 and bottom two of column 1 are consecutive in
        // a naive packing; with the guard bit they are not.
        let bits = cell_bit(0, 4) | cell_bit(0, 5) | cell_bit(1, 0) | cell_bit(1, 1);
        assert!(!has_four(bits));
    }

    #[test]
    fn test_guard_bit_blocks_diagonal_wrap() {
        // Stride ROW_STRIDE - 1 from (0,3) would land on (1,2),(2,1),(3,0): a real line.
        let real = cell_bit(0, 3) | cell_bit(1, 2) | cell_bit(2, 1) | cell_bit(3, 0);
        assert!(has_four(real));
        // (0,0) sits two diagonal steps below (1,5); the step between them is the
        // guard bit of column 0, which is never set.
        let wrapped = cell_bit(0, 0) | cell_bit(1, 5) | cell_bit(2, 4) | cell_bit(3, 3);
        assert!(!has_four(wrapped));
    }

    #[test]
    fn test_from_bits_round_trips_heights() {
        let board = BitBoard::from_columns(&[3, 3, 4, 0]).unwrap();
        let rebuilt = BitBoard::from_bits(board.side_a(), board.side_b()).unwrap();
        assert_eq!(rebuilt, board);
    }

    #[test]
    fn test_from_bits_rejects_overlap_and_gaps() {
        assert!(BitBoard::from_bits(1, 1).is_none());
        assert!(BitBoard::from_bits(cell_bit(0, 1), 0).is_none());
        assert!(BitBoard::from_bits(1 << 6, 0).is_none());
    }

    #[test]
    fn test_would_win_does_not_mutate() {
        let mut board = BitBoard::new();
        for _ in 0..3 {
            board.commit_drop(2, Side::B);
        }
        let before = board;
        assert!(board.would_win(2, Side::B));
        assert!(!board.would_win(2, Side::A));
        assert!(!board.would_win(5, Side::B));
        assert_eq!(board, before);
    }

    #[test]
    fn test_legal_columns_skip_full() {
        let mut board = BitBoard::new();
        for i in 0..BOARD_HEIGHT {
            board.commit_drop(6, Side::from_index(i as usize % 2));
        }
        assert_eq!(board.legal_columns().as_slice(), &[0, 1, 2, 3, 4, 5]);
    }
}
