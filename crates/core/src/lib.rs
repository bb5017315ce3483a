//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the board rules, the drop animation, the navigation shell and
//! the turn orchestration. It has **no dependencies** on terminals, processes or
//! threads:
//!
//! - **Deterministic**: all timing is counted in fixed ticks, all randomness comes
//!   from a seeded RNG
//! - **Testable**: the move-search engine is a trait, so tests script its replies
//! - **Portable**: the binary, the integration tests and the benches all drive the
//!   same [`App`]
//!
//! # Module Structure
//!
//! - [`bitboard`]: packed 7x6 board with guard bits, legality and win detection
//! - [`drop`]: falling/bouncing piece, commits the move at landing
//! - [`nav`]: back-stack, slide transition, apply-once pending change
//! - [`screens`]: the catalog of screens and their targets
//! - [`session`]: turn orchestrator (grace counter, engine queries, game over)
//! - [`difficulty`]: slider value to random-move chance and think-time budget
//! - [`search`]: the engine port ([`MoveEngine`]) and its fault type
//! - [`app`]: everything above behind `handle` / `tick` / `snapshot`
//!
//! # Example
//!
//! ```
//! use tui_connect4_core::{App, MoveEngine, SearchRequest, EngineFault, SessionTuning};
//! use tui_connect4_types::{ScreenId, UiCommand};
//!
//! struct Idle;
//! impl MoveEngine for Idle {
//!     fn submit(&mut self, _: SearchRequest) {}
//!     fn poll(&mut self) -> Option<Result<u8, EngineFault>> { None }
//! }
//!
//! let mut app = App::new(1, SessionTuning::default());
//! app.handle(UiCommand::Activate); // "Start Game"
//! for _ in 0..100 {
//!     app.tick(&mut Idle);
//! }
//! assert_eq!(app.nav().current(), ScreenId::ChooseGameMode);
//! ```

pub mod app;
pub mod bitboard;
pub mod difficulty;
pub mod drop;
pub mod nav;
pub mod rng;
pub mod screens;
pub mod search;
pub mod session;
pub mod snapshot;

pub use tui_connect4_types as types;

// Re-export commonly used types for convenience
pub use app::{App, Settings};
pub use bitboard::BitBoard;
pub use difficulty::{stage_label, EngineParams};
pub use drop::{AnimatedPiece, DropAnimator, DropPhase, Landing};
pub use nav::{Applied, Destination, NavError, NavigationState, PendingChange};
pub use rng::SimpleRng;
pub use screens::{Action, Screen, ScreenCatalog, Target, TargetKind};
pub use search::{validate_column, EngineFault, MoveEngine, SearchRequest};
pub use session::{GameSession, GraceCounter, SessionTuning, TurnPhase};
pub use snapshot::FrameSnapshot;
