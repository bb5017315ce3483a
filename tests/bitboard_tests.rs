//! BitBoard tests through the facade crate.

use tui_connect4::core::bitboard::{cell_bit, has_four, PLAYABLE_MASK};
use tui_connect4::core::{BitBoard, SimpleRng};
use tui_connect4::types::{Outcome, Side, BOARD_HEIGHT, BOARD_WIDTH, CELL_COUNT, ROW_STRIDE};

/// Every four-cell line on the board as (start column, start row, dc, dr).
fn all_lines() -> Vec<[(u8, u8); 4]> {
    let mut lines = Vec::new();
    let dirs: [(i8, i8); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
    for c in 0..BOARD_WIDTH as i8 {
        for r in 0..BOARD_HEIGHT as i8 {
            for (dc, dr) in dirs {
                let end_c = c + 3 * dc;
                let end_r = r + 3 * dr;
                if end_c < 0
                    || end_c >= BOARD_WIDTH as i8
                    || end_r < 0
                    || end_r >= BOARD_HEIGHT as i8
                {
                    continue;
                }
                let mut line = [(0u8, 0u8); 4];
                for (i, cell) in line.iter_mut().enumerate() {
                    let i = i as i8;
                    *cell = ((c + i * dc) as u8, (r + i * dr) as u8);
                }
                lines.push(line);
            }
        }
    }
    lines
}

fn bits_of(cells: &[(u8, u8)]) -> u64 {
    cells.iter().fold(0, |acc, &(c, r)| acc | cell_bit(c, r))
}

#[test]
fn test_board_has_69_lines_and_each_is_detected() {
    let lines = all_lines();
    assert_eq!(lines.len(), 69);
    for line in &lines {
        assert!(has_four(bits_of(line)), "line {:?} not detected", line);
        // Three of four is never a line.
        assert!(!has_four(bits_of(&line[..3])), "partial {:?} detected", line);
    }
}

#[test]
fn test_guard_bits_stop_wraparound() {
    // Top three cells of column 0 plus bottom cell of column 1 are adjacent in a
    // vertical shift only if the guard bit is missing.
    let bits = cell_bit(0, 3) | cell_bit(0, 4) | cell_bit(0, 5) | cell_bit(1, 0);
    assert!(!has_four(bits));

    assert_eq!(PLAYABLE_MASK.count_ones(), CELL_COUNT as u32);
    for c in 0..BOARD_WIDTH {
        let guard = 1u64 << (c as u32 * ROW_STRIDE as u32 + BOARD_HEIGHT as u32);
        assert_eq!(PLAYABLE_MASK & guard, 0);
    }
}

#[test]
fn test_drops_stack_from_the_bottom() {
    let mut board = BitBoard::new();
    for row in 0..BOARD_HEIGHT {
        let side = if row % 2 == 0 { Side::A } else { Side::B };
        assert!(board.commit_drop(2, side));
        assert_eq!(board.cell(2, row), Some(side));
        assert_eq!(board.height(2), Some(row + 1));
    }
    assert!(!board.can_drop(2));
    let before = board;
    assert!(!board.commit_drop(2, Side::A));
    assert_eq!(board, before);
    assert!(!board.commit_drop(BOARD_WIDTH, Side::A));
}

#[test]
fn test_side_a_is_evaluated_first() {
    // Not reachable under alternation, but the order is fixed.
    let a = bits_of(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
    let b = bits_of(&[(0, 1), (1, 1), (2, 1), (3, 1)]);
    let board = BitBoard::from_bits(a, b).unwrap();
    assert_eq!(board.evaluate(), Outcome::SideAWins);

    let board = BitBoard::from_bits(0, a).unwrap();
    assert_eq!(board.evaluate(), Outcome::SideBWins);
}

#[test]
fn test_from_bits_rejects_impossible_positions() {
    // Overlap.
    assert!(BitBoard::from_bits(cell_bit(0, 0), cell_bit(0, 0)).is_none());
    // Floating piece.
    assert!(BitBoard::from_bits(cell_bit(0, 1), 0).is_none());
    // Guard bit.
    assert!(BitBoard::from_bits(1u64 << BOARD_HEIGHT, 0).is_none());
}

#[test]
fn test_full_board_without_line_is_a_draw() {
    // Rows alternate in pairs of columns; no four in any direction.
    let mut a = 0;
    let mut b = 0;
    for c in 0..BOARD_WIDTH {
        for r in 0..BOARD_HEIGHT {
            if (r + c / 2) % 2 == 0 {
                a |= cell_bit(c, r);
            } else {
                b |= cell_bit(c, r);
            }
        }
    }
    let board = BitBoard::from_bits(a, b).unwrap();
    assert_eq!(board.piece_count(), CELL_COUNT);
    assert_eq!(board.evaluate(), Outcome::NoWinYet);
    assert!(board.is_draw());
    assert!(board.legal_columns().is_empty());
}

#[test]
fn test_would_win_leaves_board_untouched() {
    let board = BitBoard::from_columns(&[0, 6, 1, 6, 2, 6]).unwrap();
    assert!(board.would_win(3, Side::A));
    assert!(board.would_win(6, Side::B));
    assert!(!board.would_win(4, Side::A));
    assert_eq!(board.piece_count(), 6);
}

#[test]
fn test_sides_stay_disjoint_over_random_games() {
    let mut rng = SimpleRng::new(0x5eed);
    for _ in 0..2_000 {
        let mut board = BitBoard::new();
        let mut side = Side::A;
        for placed in 1..=60u32 {
            let Some(column) = rng.pick(&board.legal_columns()) else {
                break;
            };
            assert!(board.commit_drop(column, side));
            assert_eq!(board.side_a() & board.side_b(), 0);
            assert_eq!((board.side_a() | board.side_b()) & !PLAYABLE_MASK, 0);
            assert_eq!(board.piece_count() as u32, placed);
            if board.evaluate() != Outcome::NoWinYet {
                break;
            }
            side = side.other();
        }
    }
}

#[test]
fn test_alternating_column_has_no_winner() {
    let board = BitBoard::from_columns(&[3, 3, 3, 3]).unwrap();
    assert_eq!(board.height(3), Some(4));
    assert_eq!(board.evaluate(), Outcome::NoWinYet);

    let mut board = BitBoard::new();
    for _ in 0..3 {
        assert!(board.commit_drop(3, Side::A));
        assert_eq!(board.evaluate(), Outcome::NoWinYet);
    }
    assert!(board.commit_drop(3, Side::A));
    assert_eq!(board.evaluate(), Outcome::SideAWins);
}

#[test]
fn test_alternating_drops_can_fill_the_board_without_a_winner() {
    // Row by row in this column order, the sides alternate and the result is the
    // same paired-column pattern as the `from_bits` draw above.
    const ORDER: [u8; 7] = [0, 2, 1, 3, 4, 6, 5];
    let mut board = BitBoard::new();
    let mut side = Side::A;
    for _ in 0..BOARD_HEIGHT {
        for column in ORDER {
            assert!(board.commit_drop(column, side));
            assert_eq!(board.evaluate(), Outcome::NoWinYet);
            side = side.other();
        }
    }

    assert_eq!(board.piece_count(), CELL_COUNT);
    assert!(board.is_draw());
    assert!(!board.commit_drop(3, side));
    assert_eq!(board.cell(0, 0), Some(Side::A));
    assert_eq!(board.cell(2, 0), Some(Side::B));
    assert_eq!(board.cell(0, 1), Some(Side::B));
}
