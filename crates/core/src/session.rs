//! Game session - the turn orchestrator
//!
//! `GameSession` owns everything that lives for one game: the board, the drop
//! animator, the turn, the placement counter and the grace counter. Cumulative
//! scores live here too and survive resets.
//!
//! Per fixed tick the session advances the falling piece, polls the engine when a
//! query is in flight, and counts down the result banner. When a game ends it raises
//! a navigation request for the end screen; it never touches navigation state itself.
//!
//! Solo turn sequence (engine plays side B):
//!
//! ```text
//! human drop lands -> probe query -> forced column? ---------------> engine drop
//!                                  -> random roll hits? -----------> engine drop (random)
//!                                  -> search query (difficulty budget) -> engine drop
//! ```

use log::{debug, info, warn};

use crate::bitboard::BitBoard;
use crate::difficulty::EngineParams;
use crate::drop::{AnimatedPiece, DropAnimator, Landing};
use crate::nav::{Destination, PendingChange};
use crate::rng::SimpleRng;
use crate::search::{validate_column, EngineFault, MoveEngine, SearchRequest};
use crate::types::{
    GameMode, MatchResult, ScreenId, Side, BOARD_WIDTH, CELL_COUNT, CENTER_COLUMN,
    GRACE_AFTER_DROP, PROBE_BUDGET_MS, TICK_MS,
};

/// Side played by the engine in solo mode.
pub const ENGINE_SIDE: Side = Side::B;

/// Default time the result banner stays up before the end screen is requested.
pub const RESULT_HOLD_MS: u32 = 1500;

/// Session knobs that come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTuning {
    pub probe_budget_ms: u32,
    pub result_hold_ticks: u32,
}

impl SessionTuning {
    pub fn from_millis(probe_budget_ms: u32, result_hold_ms: u32) -> Self {
        Self {
            probe_budget_ms,
            result_hold_ticks: result_hold_ms.div_ceil(TICK_MS),
        }
    }
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self::from_millis(PROBE_BUDGET_MS, RESULT_HOLD_MS)
    }
}

/// Input suppression around drops.
///
/// Held for the whole flight of a piece, then counts down a few ticks after the
/// landing. Column input is ignored while it blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraceCounter {
    remaining: u32,
    held: bool,
}

impl GraceCounter {
    pub fn hold(&mut self) {
        self.held = true;
    }

    pub fn release_after(&mut self, ticks: u32) {
        self.held = false;
        self.remaining = ticks;
    }

    pub fn tick(&mut self) {
        if !self.held {
            self.remaining = self.remaining.saturating_sub(1);
        }
    }

    pub fn blocks_input(&self) -> bool {
        self.held || self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Which engine query is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineQuery {
    /// Fixed-budget query whose answer is checked for an immediate win or block
    Probe,
    /// Query with the difficulty-derived budget
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No game running
    Idle,
    AwaitingMove,
    Dropping,
    Thinking(EngineQuery),
    /// Result banner on screen
    Finished { result: MatchResult, hold_ticks: u32 },
    /// End screen requested, waiting for the reset
    Concluded(MatchResult),
}

/// Banner text for a finished game.
pub fn result_label(mode: GameMode, result: MatchResult) -> &'static str {
    match (mode, result) {
        (_, MatchResult::Draw) => "Tie!",
        (GameMode::SoloVsEngine, MatchResult::Win(Side::A)) => "You win!",
        (GameMode::SoloVsEngine, MatchResult::Win(Side::B)) => "You Lost...",
        (GameMode::TwoPlayer, MatchResult::Win(Side::A)) => "Player 1 Wins!",
        (GameMode::TwoPlayer, MatchResult::Win(Side::B)) => "Player 2 Wins!",
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: BitBoard,
    animator: DropAnimator,
    mode: GameMode,
    turn: Side,
    placed: u8,
    scores: [u32; 2],
    grace: GraceCounter,
    hover: Option<u8>,
    started: bool,
    phase: TurnPhase,
    rng: SimpleRng,
    params: EngineParams,
    tuning: SessionTuning,
    last_result: Option<(GameMode, MatchResult)>,
    nav_request: Option<PendingChange>,
}

impl GameSession {
    pub fn new(seed: u32, tuning: SessionTuning) -> Self {
        Self {
            board: BitBoard::new(),
            animator: DropAnimator::new(),
            mode: GameMode::TwoPlayer,
            turn: Side::A,
            placed: 0,
            scores: [0; 2],
            grace: GraceCounter::default(),
            hover: None,
            started: false,
            phase: TurnPhase::Idle,
            rng: SimpleRng::new(seed),
            params: EngineParams::default(),
            tuning,
            last_result: None,
            nav_request: None,
        }
    }

    /// Start a game on entry to a game screen. Does nothing if one is running.
    ///
    /// In solo mode with the engine moving first, the opening piece goes straight
    /// into the center column without consulting the engine.
    pub fn enter(&mut self, mode: GameMode, first: Side, params: EngineParams) {
        if self.started {
            return;
        }
        self.mode = mode;
        self.params = params;
        self.turn = first;
        self.started = true;
        self.phase = TurnPhase::AwaitingMove;
        info!(
            "session: {:?} started, {} first, {:?}",
            mode,
            first.label(),
            params
        );

        if mode == GameMode::SoloVsEngine && first == ENGINE_SIDE {
            debug!("session: engine opens in column {CENTER_COLUMN}");
            self.start_drop(CENTER_COLUMN, ENGINE_SIDE);
        }
    }

    /// Reset the per-game state. Scores and the last result are kept.
    pub fn reset(&mut self) {
        self.board = BitBoard::new();
        self.animator.clear();
        self.turn = Side::A;
        self.placed = 0;
        self.grace.clear();
        self.hover = None;
        self.started = false;
        self.phase = TurnPhase::Idle;
        self.nav_request = None;
        debug!("session: reset");
    }

    pub fn reset_scores(&mut self) {
        self.scores = [0; 2];
    }

    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    pub fn animated_piece(&self) -> Option<&AnimatedPiece> {
        self.animator.visible()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn placed(&self) -> u8 {
        self.placed
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn hover(&self) -> Option<u8> {
        self.hover
    }

    pub fn grace(&self) -> &GraceCounter {
        &self.grace
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn params(&self) -> EngineParams {
        self.params
    }

    pub fn is_thinking(&self) -> bool {
        matches!(self.phase, TurnPhase::Thinking(_))
    }

    /// True while drops, engine queries, grace or the result hold suppress input.
    pub fn input_blocked(&self) -> bool {
        self.grace.blocks_input()
            || !matches!(self.phase, TurnPhase::Idle | TurnPhase::AwaitingMove)
    }

    /// Banner for the game on screen, if it has ended
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            TurnPhase::Finished { result, .. } | TurnPhase::Concluded(result) => {
                Some(result_label(self.mode, result))
            }
            _ => None,
        }
    }

    pub fn last_result(&self) -> Option<(GameMode, MatchResult)> {
        self.last_result
    }

    /// Navigation request raised by the session (end of game)
    pub fn take_nav_request(&mut self) -> Option<PendingChange> {
        self.nav_request.take()
    }

    fn accepts_column_input(&self) -> bool {
        self.phase == TurnPhase::AwaitingMove
            && !self.grace.blocks_input()
            && (self.mode == GameMode::TwoPlayer || self.turn != ENGINE_SIDE)
    }

    pub fn hover_column(&mut self, column: u8) {
        if column < BOARD_WIDTH && self.accepts_column_input() {
            self.hover = Some(column);
        }
    }

    pub fn hover_step(&mut self, delta: i8) {
        let from = self.hover.unwrap_or(CENTER_COLUMN) as i16;
        let to = (from + delta as i16).clamp(0, BOARD_WIDTH as i16 - 1);
        self.hover_column(to as u8);
    }

    /// Drop the side to move into `column`.
    ///
    /// Returns false when input is blocked, it is not a human's turn, or the column
    /// is full; nothing changes in that case.
    pub fn drop_column(&mut self, column: u8) -> bool {
        if !self.accepts_column_input() {
            return false;
        }
        if !self.start_drop(column, self.turn) {
            debug!("session: column {column} rejected");
            return false;
        }
        self.hover = Some(column);
        true
    }

    pub fn drop_hovered(&mut self) -> bool {
        match self.hover {
            Some(column) => self.drop_column(column),
            None => false,
        }
    }

    fn start_drop(&mut self, column: u8, side: Side) -> bool {
        if !self.animator.start(&self.board, column, side) {
            return false;
        }
        self.grace.hold();
        self.phase = TurnPhase::Dropping;
        true
    }

    /// Advance one fixed tick.
    pub fn tick(&mut self, engine: &mut dyn MoveEngine) {
        if !self.started {
            return;
        }
        if !self.animator.in_flight() {
            self.grace.tick();
        }

        if let Some(landing) = self.animator.step(&mut self.board) {
            self.on_landing(landing, engine);
            return;
        }

        match self.phase {
            TurnPhase::Dropping if !self.animator.in_flight() => {
                warn!("session: drop discarded, board changed under the animation");
                self.grace.release_after(0);
                self.phase = TurnPhase::AwaitingMove;
            }
            TurnPhase::Thinking(query) => {
                if let Some(reply) = engine.poll() {
                    self.on_reply(query, reply, engine);
                }
            }
            TurnPhase::Finished { result, hold_ticks } => {
                if hold_ticks == 0 {
                    self.nav_request = Some(PendingChange::with_reset(Destination::GoTo(
                        ScreenId::EndScreen,
                    )));
                    self.phase = TurnPhase::Concluded(result);
                } else {
                    self.phase = TurnPhase::Finished {
                        result,
                        hold_ticks: hold_ticks - 1,
                    };
                }
            }
            _ => {}
        }
    }

    fn on_landing(&mut self, landing: Landing, engine: &mut dyn MoveEngine) {
        self.placed += 1;
        self.grace.release_after(GRACE_AFTER_DROP);
        debug!(
            "session: {} landed at column {} row {}",
            landing.side.label(),
            landing.column,
            landing.row
        );

        if let Some(result) = self.terminal_result() {
            self.finish(result);
            return;
        }

        self.turn = landing.side.other();
        if self.mode == GameMode::SoloVsEngine && self.turn == ENGINE_SIDE {
            self.query(EngineQuery::Probe, self.tuning.probe_budget_ms, engine);
        } else {
            self.phase = TurnPhase::AwaitingMove;
        }
    }

    fn terminal_result(&self) -> Option<MatchResult> {
        if let Some(side) = self.board.evaluate().winner() {
            Some(MatchResult::Win(side))
        } else if self.placed >= CELL_COUNT {
            Some(MatchResult::Draw)
        } else {
            None
        }
    }

    fn finish(&mut self, result: MatchResult) {
        if let MatchResult::Win(side) = result {
            self.scores[side.index()] += 1;
        }
        self.last_result = Some((self.mode, result));
        self.phase = TurnPhase::Finished {
            result,
            hold_ticks: self.tuning.result_hold_ticks,
        };
        info!(
            "session: game over after {} pieces: {} (score {}-{})",
            self.placed,
            result_label(self.mode, result),
            self.scores[0],
            self.scores[1]
        );
    }

    fn query(&mut self, query: EngineQuery, budget_ms: u32, engine: &mut dyn MoveEngine) {
        debug!("session: {query:?} query, budget {budget_ms}ms");
        engine.submit(SearchRequest::new(self.board, ENGINE_SIDE, budget_ms));
        self.phase = TurnPhase::Thinking(query);
    }

    fn on_reply(
        &mut self,
        query: EngineQuery,
        reply: Result<u8, EngineFault>,
        engine: &mut dyn MoveEngine,
    ) {
        let checked = reply.and_then(|c| validate_column(&self.board, c as i64));
        let column = match checked {
            Ok(column) => column,
            Err(fault) => {
                warn!("session: {fault}, playing a random column");
                match self.random_column() {
                    Some(column) => column,
                    None => {
                        self.phase = TurnPhase::AwaitingMove;
                        return;
                    }
                }
            }
        };

        match query {
            EngineQuery::Probe => {
                if self.board.would_win(column, ENGINE_SIDE)
                    || self.board.would_win(column, ENGINE_SIDE.other())
                {
                    debug!("session: column {column} completes a line, forcing it");
                    self.engine_drop(column);
                } else if self.rng.chance(self.params.random_move_percent) {
                    let random = self.random_column().unwrap_or(column);
                    debug!("session: random roll, playing column {random}");
                    self.engine_drop(random);
                } else {
                    self.query(EngineQuery::Search, self.params.think_budget_ms, engine);
                }
            }
            EngineQuery::Search => self.engine_drop(column),
        }
    }

    fn engine_drop(&mut self, column: u8) {
        if self.start_drop(column, ENGINE_SIDE) {
            return;
        }
        if let Some(random) = self.random_column() {
            self.start_drop(random, ENGINE_SIDE);
        }
    }

    fn random_column(&mut self) -> Option<u8> {
        let legal = self.board.legal_columns();
        self.rng.pick(&legal)
    }
}
