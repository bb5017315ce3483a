//! TUI Connect Four (workspace facade crate).
//!
//! Re-exports the member crates as `tui_connect4::{core,engine,input,term,types}` and
//! holds the runner's ambient pieces: configuration, logging and their errors.

pub mod config;
pub mod error;
pub mod logging;

pub use tui_connect4_core as core;
pub use tui_connect4_engine as engine;
pub use tui_connect4_input as input;
pub use tui_connect4_term as term;
pub use tui_connect4_types as types;

pub use config::AppConfig;
pub use error::{ConfigError, LogInitError};
