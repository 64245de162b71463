//! Adapter module - session runtime between the turn controller and a front end
//!
//! The core's [`GameState`](crate::core::GameState) is synchronous. A front end
//! that animates wants to show each turn's moves before the merges are
//! committed and the next tile spawns. This crate runs the controller on a
//! tokio runtime and exchanges messages with the game loop:
//!
//! 1. **Commands**: the game loop queues [`SessionCommand`]s (`try_send`, bounded)
//! 2. **Animate**: for every swipe that moves something the driver sends
//!    [`PresentationEvent::Animate`] with a `oneshot` completion handle
//! 3. **Commit**: once the handle fires (or is dropped) the driver finishes the
//!    turn and sends [`PresentationEvent::TurnCommitted`]
//! 4. **End**: [`PresentationEvent::GameEnded`] is sent once per game
//!
//! Swipes that arrive during an animation are dropped.
//!
//! # Environment Variables
//!
//! - `TUI2048_GRID_SIZE`: Grid side length, 2..=8 (default: 4)
//! - `TUI2048_SEED`: RNG seed (default: 1)
//! - `TUI2048_WIN_VALUE`: Tile value that wins (default: 2048)
//! - `TUI2048_MAX_PENDING`: Command queue capacity (default: 16)
//! - `TUI2048_JOURNAL_PATH`: Append a JSON line per turn to this file
//! - `TUI2048_CHECK_EVERY_TURN`: Run the terminal check after every spawn
//!
//! # Journal
//!
//! ```text
//! {"type":"turn","episode":0,"turn":1,"direction":"left","moves":[{"tile_id":1,"from":{"row":0,"col":3},"to":{"row":0,"col":0},"merged_into":null}],"spawned":{"tile_id":2,"at":{"row":2,"col":1},"value":2},"tile_count":3,"max_tile":2}
//! {"type":"game_end","episode":0,"turn":812,"outcome":"lost","max_tile":1024}
//! ```

pub mod config;
pub mod driver;
pub mod events;
pub mod journal;
pub mod runtime;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use config::SessionConfig;
pub use driver::run_driver;
pub use events::*;
pub use journal::run_journal;
pub use runtime::Session;
