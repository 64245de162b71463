//! Fixed-size, allocation-free frame snapshot of a game for front ends.

use crate::types::{GameOutcome, Position, TileId, TurnPhase, MAX_CELLS, WIN_VALUE};

/// Fixed-size copy of everything a front end needs to draw a frame.
///
/// Cells are row-major over the first `size * size` entries; the rest stay
/// zero so snapshots of any grid size have the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub size: u8,
    pub values: [u32; MAX_CELLS],
    pub tile_ids: [Option<TileId>; MAX_CELLS],
    pub phase: TurnPhase,
    pub turn: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub tile_count: u32,
    pub value_sum: u64,
    pub max_tile: u32,
    pub win_value: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.values = [0; MAX_CELLS];
        self.tile_ids = [None; MAX_CELLS];
        self.phase = TurnPhase::Idle;
        self.turn = 0;
        self.episode_id = 0;
        self.seed = 0;
        self.tile_count = 0;
        self.value_sum = 0;
        self.max_tile = 0;
        self.win_value = WIN_VALUE;
    }

    fn offset(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        Some(pos.row as usize * self.size as usize + pos.col as usize)
    }

    /// Value at a position, 0 for empty or out of bounds
    pub fn value(&self, pos: Position) -> u32 {
        self.offset(pos).map_or(0, |i| self.values[i])
    }

    pub fn tile_id(&self, pos: Position) -> Option<TileId> {
        self.offset(pos).and_then(|i| self.tile_ids[i])
    }

    /// Rows of values, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        let n = self.size as usize;
        self.values[..n * n].chunks(n.max(1))
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.phase.outcome()
    }

    pub fn playable(&self) -> bool {
        self.phase.accepts_input()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            size: 0,
            values: [0; MAX_CELLS],
            tile_ids: [None; MAX_CELLS],
            phase: TurnPhase::Idle,
            turn: 0,
            episode_id: 0,
            seed: 0,
            tile_count: 0,
            value_sum: 0,
            max_tile: 0,
            win_value: WIN_VALUE,
        };
        s.clear();
        s
    }
}
