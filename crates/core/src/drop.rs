//! Drop animator - time-stepped fall and bounce of a single piece
//!
//! A drop runs `Falling -> (Bouncing)* -> Landed`, one [`DropAnimator::step`] per
//! fixed tick. The move is committed to the board at the landing step; the landed
//! piece stays visible as an afterimage for [`AFTERIMAGE_STEPS`] more steps so the
//! renderer never shows a frame where it has vanished from the lane but is not yet
//! drawn on the board.

use crate::bitboard::BitBoard;
use crate::types::{
    Side, AFTERIMAGE_STEPS, BOARD_HEIGHT, BOUNCE_BUDGET, BOUNCE_THRESHOLD, CELL_UNITS,
    DROP_DAMPING, DROP_GRAVITY, HEADER_ROWS,
};

/// Phase of an in-flight piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPhase {
    Falling,
    Bouncing,
    Landed,
}

/// Transient state of a falling piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedPiece {
    pub column: u8,
    pub target_row: u8,
    pub side: Side,
    /// Distance from the top of the drop lane, in lane units
    pub y: f32,
    pub velocity: f32,
    pub bounces_remaining: u8,
    pub phase: DropPhase,
}

impl AnimatedPiece {
    fn new(column: u8, target_row: u8, side: Side) -> Self {
        Self {
            column,
            target_row,
            side,
            y: 0.0,
            velocity: 0.0,
            bounces_remaining: BOUNCE_BUDGET,
            phase: DropPhase::Falling,
        }
    }

    /// Advance one physics step.
    fn step(&mut self) {
        if self.phase == DropPhase::Landed {
            return;
        }

        self.velocity += DROP_GRAVITY;
        self.y += self.velocity;

        let rest = resting_line(self.target_row);
        if self.y >= rest {
            self.y = rest;
            if self.velocity.abs() > BOUNCE_THRESHOLD && self.bounces_remaining > 0 {
                self.velocity = -self.velocity * DROP_DAMPING;
                self.bounces_remaining -= 1;
                self.phase = DropPhase::Bouncing;
            } else {
                self.velocity = 0.0;
                self.phase = DropPhase::Landed;
            }
        }
    }
}

/// Lane position at which a piece rests on `row` (rows count from the bottom).
pub fn resting_line(row: u8) -> f32 {
    (HEADER_ROWS + BOARD_HEIGHT - 1 - row) as f32 * CELL_UNITS
}

/// A committed landing reported back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub column: u8,
    pub row: u8,
    pub side: Side,
}

/// Drives at most one [`AnimatedPiece`] at a time.
#[derive(Debug, Clone, Default)]
pub struct DropAnimator {
    piece: Option<AnimatedPiece>,
    afterimage: Option<(AnimatedPiece, u8)>,
}

impl DropAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dropping `side` into `column`.
    ///
    /// Returns false without touching any state when the column cannot take a piece
    /// or another drop is still in flight.
    pub fn start(&mut self, board: &BitBoard, column: u8, side: Side) -> bool {
        if self.piece.is_some() || !board.can_drop(column) {
            return false;
        }
        let Some(target_row) = board.height(column) else {
            return false;
        };
        self.afterimage = None;
        self.piece = Some(AnimatedPiece::new(column, target_row, side));
        true
    }

    pub fn in_flight(&self) -> bool {
        self.piece.is_some()
    }

    /// Advance the in-flight piece by one step.
    ///
    /// On the landing step the move is committed to `board` and the landing is
    /// returned. If the commit is refused (the board changed under the animation)
    /// the piece is discarded and nothing is reported.
    pub fn step(&mut self, board: &mut BitBoard) -> Option<Landing> {
        if let Some((_, remaining)) = self.afterimage.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.afterimage = None;
            }
        }

        let piece = self.piece.as_mut()?;
        piece.step();
        if piece.phase != DropPhase::Landed {
            return None;
        }

        let landed = *piece;
        self.piece = None;

        if !board.commit_drop(landed.column, landed.side) {
            return None;
        }
        self.afterimage = Some((landed, AFTERIMAGE_STEPS));
        Some(Landing {
            column: landed.column,
            row: landed.target_row,
            side: landed.side,
        })
    }

    /// The piece to draw this frame: the falling piece, or the landed afterimage.
    pub fn visible(&self) -> Option<&AnimatedPiece> {
        self.piece
            .as_ref()
            .or(self.afterimage.as_ref().map(|(p, _)| p))
    }

    /// Drop everything (used on game reset).
    pub fn clear(&mut self) {
        self.piece = None;
        self.afterimage = None;
    }
}
