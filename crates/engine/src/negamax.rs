//! Built-in move search: iterative-deepening negamax with alpha-beta pruning.
//!
//! Works directly on the session's [`BitBoard`]. Columns are tried center-first,
//! immediate wins are taken before recursing, and leaves are scored by counting
//! the four-cell windows each side still has a stake in. The search deepens one ply
//! at a time until the think-time budget runs out, keeping the best column of the
//! last fully searched depth.

use std::time::{Duration, Instant};

use crate::core::bitboard::cell_bit;
use crate::core::BitBoard;
use crate::types::{Side, BOARD_HEIGHT, BOARD_WIDTH, CELL_COUNT, CENTER_COLUMN, CONNECT};

/// Column ordering: center-first for better alpha-beta pruning.
const MOVE_ORDER: [u8; BOARD_WIDTH as usize] = [3, 2, 4, 1, 5, 0, 6];

const WIN_SCORE: i32 = 1_000_000;
const INF: i32 = i32::MAX - 1;

/// Nodes between deadline checks.
const CLOCK_MASK: u64 = 0x3ff;

#[derive(Debug, Clone)]
pub struct NegamaxEngine {
    max_depth: u8,
    windows: Vec<u64>,
}

struct SearchContext {
    deadline: Instant,
    nodes: u64,
    aborted: bool,
}

impl SearchContext {
    fn out_of_time(&mut self) -> bool {
        self.nodes += 1;
        if !self.aborted && self.nodes & CLOCK_MASK == 0 && Instant::now() >= self.deadline {
            self.aborted = true;
        }
        self.aborted
    }
}

impl NegamaxEngine {
    pub fn new() -> Self {
        Self::with_max_depth(CELL_COUNT)
    }

    pub fn with_max_depth(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.max(1),
            windows: line_windows(),
        }
    }

    /// Best column for `to_move`, `None` when the board is full.
    ///
    /// Depth 1 always completes, so even a zero budget yields a legal column.
    pub fn best_move(&self, board: &BitBoard, to_move: Side, budget_ms: u32) -> Option<u8> {
        let first_legal = MOVE_ORDER.iter().copied().find(|&c| board.can_drop(c))?;

        let mut ctx = SearchContext {
            deadline: Instant::now() + Duration::from_millis(budget_ms as u64),
            nodes: 0,
            aborted: false,
        };
        let remaining = CELL_COUNT - board.piece_count();
        let mut best = first_legal;

        for depth in 1..=self.max_depth.min(remaining) {
            let Some((column, score)) = self.search_root(board, to_move, depth, &mut ctx) else {
                break;
            };
            best = column;
            log::trace!("negamax: depth {depth} -> column {column} ({score}), {} nodes", ctx.nodes);
            if score.abs() >= WIN_SCORE - CELL_COUNT as i32 {
                break;
            }
            // Depth 1 runs unconditionally; deeper iterations respect the clock.
            if Instant::now() >= ctx.deadline {
                break;
            }
        }
        Some(best)
    }

    fn search_root(
        &self,
        board: &BitBoard,
        side: Side,
        depth: u8,
        ctx: &mut SearchContext,
    ) -> Option<(u8, i32)> {
        if let Some(column) = MOVE_ORDER.iter().copied().find(|&c| board.would_win(c, side)) {
            return Some((column, WIN_SCORE));
        }

        let mut alpha = -INF;
        let mut best: Option<(u8, i32)> = None;
        for &column in &MOVE_ORDER {
            let mut next = *board;
            if !next.commit_drop(column, side) {
                continue;
            }
            let score = -self.negamax(&next, side.other(), depth - 1, -INF, -alpha, 1, ctx)?;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((column, score));
            }
            alpha = alpha.max(score);
        }
        best
    }

    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &self,
        board: &BitBoard,
        side: Side,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply: i32,
        ctx: &mut SearchContext,
    ) -> Option<i32> {
        if ctx.out_of_time() {
            return None;
        }
        if board.piece_count() == CELL_COUNT {
            return Some(0);
        }
        if MOVE_ORDER.iter().any(|&c| board.would_win(c, side)) {
            return Some(WIN_SCORE - ply);
        }
        if depth == 0 {
            return Some(self.heuristic(board, side));
        }

        let mut best = -INF;
        for &column in &MOVE_ORDER {
            let mut next = *board;
            if !next.commit_drop(column, side) {
                continue;
            }
            let score = -self.negamax(&next, side.other(), depth - 1, -beta, -alpha, ply + 1, ctx)?;
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        Some(best)
    }

    /// Static score of `board` from `side`'s point of view.
    fn heuristic(&self, board: &BitBoard, side: Side) -> i32 {
        let own = board.bits(side);
        let opp = board.bits(side.other());

        let center = (0..BOARD_HEIGHT).fold(0u64, |m, r| m | cell_bit(CENTER_COLUMN, r));
        let mut score =
            3 * ((own & center).count_ones() as i32 - (opp & center).count_ones() as i32);

        for &w in &self.windows {
            let mine = (own & w).count_ones();
            let theirs = (opp & w).count_ones();
            score += match (mine, theirs) {
                (3, 0) => 50,
                (2, 0) => 10,
                (0, 3) => -80,
                (0, 2) => -10,
                _ => 0,
            };
        }
        score
    }
}

impl Default for NegamaxEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Every four-cell line on the board as a bit mask.
fn line_windows() -> Vec<u64> {
    let n = CONNECT as i8;
    let steps: [(i8, i8); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    let mut windows = Vec::new();
    for col in 0..BOARD_WIDTH as i8 {
        for row in 0..BOARD_HEIGHT as i8 {
            for (dc, dr) in steps {
                let end_c = col + dc * (n - 1);
                let end_r = row + dr * (n - 1);
                if !(0..BOARD_WIDTH as i8).contains(&end_c)
                    || !(0..BOARD_HEIGHT as i8).contains(&end_r)
                {
                    continue;
                }
                let mask = (0..n).fold(0u64, |m, i| {
                    m | cell_bit((col + dc * i) as u8, (row + dr * i) as u8)
                });
                windows.push(mask);
            }
        }
    }
    windows
}
