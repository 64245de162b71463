//! Pooled tile sprites keyed by tile id.
//!
//! A sprite is the pre-formatted label and style a tile is drawn with. Sprites
//! come from a [`FreeListPool`] sized for the grid: acquired when a tile
//! spawns, re-labelled when it survives a merge, released when it is absorbed.

use arrayvec::ArrayString;

use crate::core::{FreeListPool, Poolable, SpawnedTile, TilePool, TurnReport};
use crate::fb::{format_u32, CellStyle};
use crate::palette::tile_style;
use crate::types::TileId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprite {
    value: u32,
    label: ArrayString<10>,
    style: CellStyle,
}

impl Sprite {
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> CellStyle {
        self.style
    }
}

impl Poolable for Sprite {
    fn reset(&mut self, value: u32) {
        self.value = value;
        self.label = format_u32(value);
        self.style = tile_style(value);
    }
}

/// Live sprites for the current game
#[derive(Debug, Clone)]
pub struct TileSprites {
    pool: FreeListPool<Sprite>,
    grid_size: u8,
    live: Vec<(TileId, Sprite)>,
}

impl TileSprites {
    pub fn for_grid(n: u8) -> Self {
        Self {
            pool: FreeListPool::for_grid(n),
            grid_size: n,
            live: Vec::with_capacity((n as usize) * (n as usize)),
        }
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn pool(&self) -> &FreeListPool<Sprite> {
        &self.pool
    }

    pub fn get(&self, id: TileId) -> Option<&Sprite> {
        self.live.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }

    pub fn spawn(&mut self, id: TileId, value: u32) {
        if let Some(sprite) = self.get_mut(id) {
            sprite.reset(value);
            return;
        }
        let sprite = self.pool.acquire(value);
        self.live.push((id, sprite));
    }

    /// Return the sprite of an absorbed tile to the pool
    pub fn release(&mut self, id: TileId) -> bool {
        let Some(i) = self.live.iter().position(|(t, _)| *t == id) else {
            return false;
        };
        let (_, sprite) = self.live.swap_remove(i);
        self.pool.release(sprite);
        true
    }

    /// Re-label a surviving tile with its merged value
    pub fn promote(&mut self, id: TileId, value: u32) {
        match self.get_mut(id) {
            Some(sprite) => sprite.reset(value),
            None => self.spawn(id, value),
        }
    }

    /// Apply a committed turn: merges first, then the spawn.
    pub fn apply_report(&mut self, report: &TurnReport) {
        for merge in &report.merges {
            self.release(merge.absorbed);
            self.promote(merge.survivor, merge.value);
        }
        if let Some(s) = report.spawned {
            self.spawn(s.id, s.value);
        }
    }

    /// Release everything and bind the opening tiles of a new game.
    ///
    /// The pool is rebuilt when the grid size changed.
    pub fn reset(&mut self, grid_size: u8, spawned: &[SpawnedTile]) {
        for (_, sprite) in self.live.drain(..) {
            self.pool.release(sprite);
        }
        if grid_size != self.grid_size {
            *self = Self::for_grid(grid_size);
        }
        for s in spawned {
            self.spawn(s.id, s.value);
        }
    }

    fn get_mut(&mut self, id: TileId) -> Option<&mut Sprite> {
        self.live.iter_mut().find(|(i, _)| *i == id).map(|(_, s)| s)
    }
}
