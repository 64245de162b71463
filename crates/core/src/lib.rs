//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and move resolution.
//! It has **no dependencies** on UI, async runtimes, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Unit tests for every rule and edge case
//! - **Portable**: Can run in any environment (terminal, headless, benches)
//!
//! # Module Structure
//!
//! - [`geometry`]: N x N grid coordinates, neighbors and world-space mapping
//! - [`grid`]: Cell and tile arena with the one-to-one occupancy links
//! - [`resolver`]: Move resolution for a swipe, plus the side-effect-free dry run
//! - [`spawner`]: Random tile placement
//! - [`terminal`]: Legal-move detection
//! - [`game_state`]: The turn controller tying everything together
//! - [`rng`]: Deterministic seedable generator
//! - [`pool`]: Reuse contract for presentation objects
//!
//! # Game Rules
//!
//! - **Swipe**: Every tile travels as far as it can in the swipe direction
//! - **Merge**: Two equal tiles combine into one of double value, at most once per turn
//! - **Spawn**: A successful swipe adds one tile (2 with 90%, 4 with 10%) to a random empty cell
//! - **Win**: A merge reaching the win value (2048 by default) ends the game
//! - **Loss**: A full grid with no slide or merge left ends the game
//!
//! # Example
//!
//! ```
//! use tui_2048_core::GameState;
//! use tui_2048_types::Direction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//! assert_eq!(game.grid().tile_count(), 2);
//!
//! // Swipes that move nothing are ignored
//! for dir in Direction::ALL {
//!     if let Some(report) = game.play(dir) {
//!         assert!(report.spawned.is_some());
//!         break;
//!     }
//! }
//! ```

pub mod error;
pub mod game_state;
pub mod geometry;
pub mod grid;
pub mod pool;
pub mod resolver;
pub mod rng;
pub mod snapshot;
pub mod spawner;
pub mod terminal;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use error::GridError;
pub use game_state::{GameConfig, GameState, MergeRecord, TurnPlan, TurnReport};
pub use geometry::{CellIndex, GridGeometry};
pub use grid::{Cell, Grid, Tile, TileIndex};
pub use pool::{FreeListPool, Poolable, TilePool};
pub use resolver::{MoveResolver, MoveSet, TileMove};
pub use rng::SimpleRng;
pub use snapshot::GameSnapshot;
pub use spawner::SpawnedTile;
pub use terminal::TerminalCheck;
