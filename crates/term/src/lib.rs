//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It renders into a simple framebuffer that is diffed and flushed to a
//! terminal backend.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Draw tiles mid-slide so each turn's moves are visible before they commit
//! - Reuse tile sprites through the core's pool contract

pub mod board_view;
pub mod fb;
pub mod palette;
pub mod renderer;
pub mod sprites;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use board_view::{AnchorY, BoardLayout, BoardView, HudView, Motion, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use sprites::{Sprite, TileSprites};
