//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. A swipe is
//! a single key press with no auto-repeat.

pub mod map;

pub use tui_2048_types as types;

pub use map::{handle_key_event, should_quit};
