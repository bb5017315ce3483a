//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::UiCommand`] and mouse events into
//! [`crate::types::PointerEvent`]. Pointer events are resolved against the view's
//! hit map by the caller; this crate knows nothing about layout.

pub mod map;

pub use tui_connect4_types as types;

pub use map::{handle_key_event, handle_mouse_event, should_quit};
