//! Grid module - cells, tiles and their index-based ownership links
//!
//! Cells never move: there is exactly one per position, stored row-major in a
//! flat vector. Tiles live in a slot arena with a free list. A cell holds the
//! slot index of its tile and the tile holds the index of its cell, so the
//! two-way link is plain data instead of a reference cycle.
//!
//! During the resolving phase a tile that is about to merge is detached from
//! every cell and points at its merge target instead; it is released when the
//! turn controller commits the merge.

use crate::geometry::{CellIndex, GridGeometry};
use crate::types::{Position, TileId};
use crate::GridError;

/// Slot index of a tile in the grid's arena
pub type TileIndex = usize;

/// A numbered game piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    value: u32,
    cell: Option<CellIndex>,
    merge_target: Option<TileIndex>,
    pending_merge: bool,
}

impl Tile {
    fn new(id: TileId, value: u32) -> Self {
        Self {
            id,
            value,
            cell: None,
            merge_target: None,
            pending_merge: false,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Cell currently owning this tile
    pub fn cell(&self) -> Option<CellIndex> {
        self.cell
    }

    /// Stationary tile this one merges into this turn
    pub fn merge_target(&self) -> Option<TileIndex> {
        self.merge_target
    }

    /// Already claimed as a merge destination this turn
    pub fn pending_merge(&self) -> bool {
        self.pending_merge
    }

    /// Detached from its cell and travelling towards a merge target
    pub fn is_in_flight(&self) -> bool {
        self.cell.is_none() && self.merge_target.is_some()
    }
}

/// A single grid slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    tile: Option<TileIndex>,
}

impl Cell {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn tile(&self) -> Option<TileIndex> {
        self.tile
    }

    pub fn is_occupied(&self) -> bool {
        self.tile.is_some()
    }
}

/// N x N grid of cells plus the arena of tiles they own
#[derive(Debug, Clone)]
pub struct Grid {
    geometry: GridGeometry,
    cells: Vec<Cell>,
    tiles: Vec<Option<Tile>>,
    free_slots: Vec<TileIndex>,
    live_tiles: usize,
    next_id: u32,
}

impl Grid {
    /// Create an empty `size` x `size` grid
    pub fn new(size: u8) -> Result<Self, GridError> {
        Ok(Self::with_geometry(GridGeometry::new(size)?))
    }

    pub fn with_geometry(geometry: GridGeometry) -> Self {
        let cells = geometry
            .positions()
            .map(|position| Cell {
                position,
                tile: None,
            })
            .collect();
        Self {
            geometry,
            cells,
            tiles: Vec::with_capacity(geometry.cell_count()),
            free_slots: Vec::with_capacity(geometry.cell_count()),
            live_tiles: 0,
            next_id: 0,
        }
    }

    /// Build a grid from rows of values, 0 meaning an empty cell.
    ///
    /// Tiles get ids in row-major order.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, GridError> {
        let n = rows.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.as_ref().len() != n {
                return Err(GridError::NotSquare {
                    rows: n,
                    row,
                    cols: cells.as_ref().len(),
                });
            }
        }
        let size = u8::try_from(n).map_err(|_| GridError::InvalidSize(u8::MAX))?;
        let mut grid = Self::new(size)?;
        for (r, cells) in rows.iter().enumerate() {
            for (c, &value) in cells.as_ref().iter().enumerate() {
                if value != 0 {
                    grid.insert(Position::new(r as u8, c as u8), value)?;
                }
            }
        }
        Ok(grid)
    }

    /// Dump values row by row, 0 for empty cells
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        let n = self.geometry.size() as usize;
        self.cells
            .chunks(n)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.tile.and_then(|t| self.tile(t)).map_or(0, Tile::value))
                    .collect()
            })
            .collect()
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn size(&self) -> u8 {
        self.geometry.size()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: CellIndex) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        self.tiles.get(index).and_then(Option::as_ref)
    }

    /// Tile slot index and tile at a position
    pub fn tile_at(&self, pos: Position) -> Option<(TileIndex, &Tile)> {
        let cell = self.geometry.index(pos)?;
        let index = self.cells[cell].tile?;
        self.tile(index).map(|t| (index, t))
    }

    pub fn value_at(&self, pos: Position) -> Option<u32> {
        self.tile_at(pos).map(|(_, t)| t.value)
    }

    /// Live tiles with their slot indices, in slot order
    pub fn tiles(&self) -> impl Iterator<Item = (TileIndex, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|t| (i, t)))
    }

    pub fn tile_count(&self) -> usize {
        self.live_tiles
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tile.is_none())
            .map(|(i, _)| i)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.tile.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Cell::is_occupied)
    }

    /// Sum of all tile values
    pub fn value_sum(&self) -> u64 {
        self.tiles().map(|(_, t)| t.value as u64).sum()
    }

    pub fn max_value(&self) -> u32 {
        self.tiles().map(|(_, t)| t.value).max().unwrap_or(0)
    }

    /// Id the next inserted tile will receive
    pub fn next_id(&self) -> TileId {
        TileId(self.next_id)
    }

    /// Keep tile ids unique across grids of the same session
    pub(crate) fn continue_ids_from(&mut self, next: TileId) {
        self.next_id = next.0;
    }

    /// Place a new tile with `value` at `pos`
    pub fn insert(&mut self, pos: Position, value: u32) -> Result<TileIndex, GridError> {
        let cell = self
            .geometry
            .index(pos)
            .ok_or(GridError::OutOfBounds(pos))?;
        self.insert_at(cell, value)
    }

    pub(crate) fn insert_at(
        &mut self,
        cell: CellIndex,
        value: u32,
    ) -> Result<TileIndex, GridError> {
        if value < 2 || !value.is_power_of_two() {
            return Err(GridError::InvalidValue(value));
        }
        if self.cells[cell].tile.is_some() {
            return Err(GridError::Occupied(self.cells[cell].position));
        }

        let tile = Tile::new(TileId(self.next_id), value);
        self.next_id = self.next_id.wrapping_add(1);

        let index = match self.free_slots.pop() {
            Some(slot) => {
                self.tiles[slot] = Some(tile);
                slot
            }
            None => {
                self.tiles.push(Some(tile));
                self.tiles.len() - 1
            }
        };
        self.live_tiles += 1;
        self.fill(cell, index);
        Ok(index)
    }

    fn tile_mut(&mut self, index: TileIndex) -> &mut Tile {
        match self.tiles.get_mut(index).and_then(Option::as_mut) {
            Some(tile) => tile,
            None => panic!("tile slot {index} is not live"),
        }
    }

    /// Link `cell` and `tile` both ways
    fn fill(&mut self, cell: CellIndex, tile: TileIndex) {
        debug_assert!(self.cells[cell].tile.is_none(), "filling occupied cell {cell}");
        self.cells[cell].tile = Some(tile);
        self.tile_mut(tile).cell = Some(cell);
    }

    /// Unlink whatever tile owns `cell`
    fn vacate(&mut self, cell: CellIndex) -> Option<TileIndex> {
        let tile = self.cells[cell].tile.take()?;
        self.tile_mut(tile).cell = None;
        Some(tile)
    }

    /// Slide a tile from its current cell into the empty cell `to`
    pub(crate) fn relocate(&mut self, tile: TileIndex, to: CellIndex) {
        if let Some(from) = self.tile_mut(tile).cell {
            self.vacate(from);
        }
        self.fill(to, tile);
    }

    /// Detach `tile` from its cell and aim it at the stationary `target`,
    /// claiming the target for this turn.
    pub(crate) fn claim_merge(&mut self, tile: TileIndex, target: TileIndex) {
        if let Some(from) = self.tile_mut(tile).cell {
            self.vacate(from);
        }
        self.tile_mut(tile).merge_target = Some(target);
        self.tile_mut(target).pending_merge = true;
    }

    /// Double the survivor of a merge and return its new value
    pub(crate) fn promote(&mut self, tile: TileIndex) -> u32 {
        let t = self.tile_mut(tile);
        t.value = t.value.saturating_mul(2);
        t.pending_merge = false;
        t.value
    }

    /// Remove a tile from the arena, unlinking it from its cell if it has one
    pub(crate) fn release(&mut self, tile: TileIndex) -> Option<Tile> {
        let cell = self.tile(tile)?.cell;
        if let Some(cell) = cell {
            self.vacate(cell);
        }
        let removed = self.tiles[tile].take();
        self.free_slots.push(tile);
        self.live_tiles -= 1;
        removed
    }

    /// Reset per-turn merge bookkeeping on every tile
    pub(crate) fn clear_merge_marks(&mut self) {
        for tile in self.tiles.iter_mut().flatten() {
            tile.merge_target = None;
            tile.pending_merge = false;
        }
    }

    /// Verify that every cell/tile link is mutual.
    ///
    /// A tile with no cell is only allowed while it is in flight to a merge
    /// target.
    pub fn check_consistency(&self) -> Result<(), GridError> {
        for (ci, cell) in self.cells.iter().enumerate() {
            if let Some(ti) = cell.tile {
                match self.tile(ti) {
                    Some(t) if t.cell == Some(ci) => {}
                    _ => {
                        return Err(GridError::Inconsistent {
                            cell: Some(ci),
                            tile: ti,
                        })
                    }
                }
            }
        }

        let mut live = 0;
        for (ti, tile) in self.tiles() {
            live += 1;
            if tile.value < 2 || !tile.value.is_power_of_two() {
                return Err(GridError::InvalidValue(tile.value));
            }
            match tile.cell {
                Some(ci) if self.cells.get(ci).and_then(|c| c.tile) == Some(ti) => {}
                None if tile.merge_target.is_some() => {}
                cell => return Err(GridError::Inconsistent { cell, tile: ti }),
            }
        }

        if live != self.live_tiles {
            log::error!(
                "live tile counter {} disagrees with arena ({})",
                self.live_tiles,
                live
            );
            return Err(GridError::Inconsistent {
                cell: None,
                tile: self.tiles.len(),
            });
        }
        Ok(())
    }
}
