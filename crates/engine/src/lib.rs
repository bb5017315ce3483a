//! Move-search collaborators.
//!
//! - [`negamax`]: built-in iterative-deepening alpha-beta search
//! - [`external`]: an external search program driven through its command line
//! - [`worker`]: runs either backend off the tick thread and implements
//!   [`MoveEngine`](crate::core::MoveEngine) on top of a single-slot reply channel

pub mod external;
pub mod negamax;
pub mod worker;

pub use tui_connect4_core as core;
pub use tui_connect4_types as types;

pub use external::{parse_reply, ExternalEngine};
pub use negamax::NegamaxEngine;
pub use worker::{Backend, EngineWorker, DEFAULT_TIMEOUT_SLACK};
