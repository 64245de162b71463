//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, session runtime, terminal rendering).
//!
//! # Grid Dimensions
//!
//! The grid is square with side length `N`, fixed for the lifetime of a game:
//!
//! - **Default**: 4x4
//! - **Range**: `MIN_GRID_SIZE..=MAX_GRID_SIZE` (2..=8)
//! - **Coordinates**: `(row, col)`, row 0 is the top row, col 0 the left column
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `WIN_VALUE` | 2048 | Tile value that ends the game with a win |
//! | `SPAWN_FOUR_PROBABILITY` | 0.1 | Chance a spawned tile is a 4 instead of a 2 |
//! | `START_TILES` | 2 | Tiles placed when a game starts |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, Position, DEFAULT_GRID_SIZE};
//!
//! let dir = Direction::from_str("left").unwrap();
//! assert_eq!(dir.delta(), (0, -1));
//! assert_eq!(dir.opposite(), Direction::Right);
//!
//! let action = GameAction::from_str("moveUp").unwrap();
//! assert_eq!(action, GameAction::Move(Direction::Up));
//!
//! let pos = Position::new(1, 2);
//! assert_eq!((pos.row, pos.col), (1, 2));
//! assert_eq!(DEFAULT_GRID_SIZE, 4);
//! ```

use std::fmt;

/// Default grid side length (4x4)
pub const DEFAULT_GRID_SIZE: u8 = 4;

/// Smallest supported grid side length
pub const MIN_GRID_SIZE: u8 = 2;

/// Largest supported grid side length
pub const MAX_GRID_SIZE: u8 = 8;

/// Upper bound on the number of cells in any supported grid
pub const MAX_CELLS: usize = (MAX_GRID_SIZE as usize) * (MAX_GRID_SIZE as usize);

/// Tile value that wins the game
pub const WIN_VALUE: u32 = 2048;

/// Probability that a spawned tile holds a 4 (otherwise a 2)
pub const SPAWN_FOUR_PROBABILITY: f64 = 0.1;

/// Tiles spawned when a game starts
pub const START_TILES: u8 = 2;

/// Side length of the world coordinate square the grid is laid out in.
///
/// Cell spacing is `WORLD_EXTENT / N`, so every grid size covers the same area.
pub const WORLD_EXTENT: f32 = 4.0;

/// Time a tile takes to slide to its destination (milliseconds)
pub const SLIDE_MS: u32 = 100;

/// Front-end frame interval (milliseconds)
pub const FRAME_MS: u32 = 16;

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the order the terminal check tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    /// One-step offset as `(d_row, d_col)`
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for Left/Right
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Grid position: row 0 is the top row, col 0 the left column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Session-unique tile identity.
///
/// Assigned monotonically when a tile spawns and never reused within a
/// session, so the presentation layer can key visuals on it even though the
/// core recycles arena slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Move(Direction),
    Restart,
    /// Grow the grid by one for the next game
    GrowGrid,
    /// Shrink the grid by one for the next game
    ShrinkGrid,
}

impl GameAction {
    /// Parse action from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(GameAction::Move(Direction::Up)),
            "movedown" => Some(GameAction::Move(Direction::Down)),
            "moveleft" => Some(GameAction::Move(Direction::Left)),
            "moveright" => Some(GameAction::Move(Direction::Right)),
            "restart" => Some(GameAction::Restart),
            "growgrid" => Some(GameAction::GrowGrid),
            "shrinkgrid" => Some(GameAction::ShrinkGrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Move(Direction::Up) => "moveUp",
            GameAction::Move(Direction::Down) => "moveDown",
            GameAction::Move(Direction::Left) => "moveLeft",
            GameAction::Move(Direction::Right) => "moveRight",
            GameAction::Restart => "restart",
            GameAction::GrowGrid => "growGrid",
            GameAction::ShrinkGrid => "shrinkGrid",
        }
    }
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    Won,
    Lost,
}

impl GameOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, GameOutcome::Won)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutcome::Won => "won",
            GameOutcome::Lost => "lost",
        }
    }
}

/// Turn controller phase
///
/// `Idle` is the only phase that accepts input. `GameOver` is absorbing
/// until the game is restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Idle,
    Resolving,
    Finalizing,
    GameOver(GameOutcome),
}

impl TurnPhase {
    pub fn accepts_input(&self) -> bool {
        matches!(self, TurnPhase::Idle)
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self {
            TurnPhase::GameOver(outcome) => Some(*outcome),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Resolving => "resolving",
            TurnPhase::Finalizing => "finalizing",
            TurnPhase::GameOver(_) => "gameOver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_delta_and_opposite() {
        for dir in Direction::ALL {
            let (dr, dc) = dir.delta();
            let (or, oc) = dir.opposite().delta();
            assert_eq!((dr + or, dc + oc), (0, 0));
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_direction_roundtrip_str() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
        assert_eq!(Direction::from_str("sideways"), None);
    }

    #[test]
    fn test_game_action_parse() {
        assert_eq!(
            GameAction::from_str("moveRight"),
            Some(GameAction::Move(Direction::Right))
        );
        assert_eq!(GameAction::from_str("RESTART"), Some(GameAction::Restart));
        assert_eq!(GameAction::from_str("hardDrop"), None);
    }

    #[test]
    fn test_phase_accepts_input_only_when_idle() {
        assert!(TurnPhase::Idle.accepts_input());
        assert!(!TurnPhase::Resolving.accepts_input());
        assert!(!TurnPhase::Finalizing.accepts_input());
        assert!(!TurnPhase::GameOver(GameOutcome::Lost).accepts_input());
        assert_eq!(
            TurnPhase::GameOver(GameOutcome::Won).outcome(),
            Some(GameOutcome::Won)
        );
    }

    #[test]
    fn test_max_cells_covers_largest_grid() {
        assert_eq!(MAX_CELLS, 64);
        assert!(MIN_GRID_SIZE <= DEFAULT_GRID_SIZE && DEFAULT_GRID_SIZE <= MAX_GRID_SIZE);
    }
}
