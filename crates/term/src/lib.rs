//! Terminal rendering for the Connect Four shell.
//!
//! Screens render into a plain framebuffer that is diffed and flushed to the
//! terminal; no widget toolkit is involved.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Draw every frame from an immutable [`core::FrameSnapshot`]
//! - Record target and column rectangles while drawing so pointer input hits
//!   exactly what is on screen

pub mod fb;
pub mod renderer;
pub mod theme;
pub mod throttle;
pub mod view;

pub use tui_connect4_core as core;
pub use tui_connect4_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{collect_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
pub use theme::Palette;
pub use throttle::RenderThrottle;
pub use view::{fingerprint, BoardLayout, HitMap, HitZone, Rect, ScreenView, Viewport};
