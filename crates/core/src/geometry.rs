//! Grid geometry - pure mapping between positions, flat indices and world space
//!
//! Cells are stored row-major (`row * N + col`). World space is a square of
//! side [`WORLD_EXTENT`] centred on the origin: x grows to the right, y grows
//! upwards, and each cell is `WORLD_EXTENT / N` wide, so a 4x4 grid has cell
//! centres at -1.5, -0.5, 0.5, 1.5 on both axes.

use crate::types::{Direction, Position, MAX_GRID_SIZE, MIN_GRID_SIZE, WORLD_EXTENT};
use crate::GridError;

/// Flat index of a cell in row-major order
pub type CellIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridGeometry {
    size: u8,
}

impl GridGeometry {
    /// Create the geometry for an `size` x `size` grid
    pub fn new(size: u8) -> Result<Self, GridError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Self { size })
    }

    /// Side length N
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Flat index for a position, `None` if out of bounds
    #[inline(always)]
    pub fn index(&self, pos: Position) -> Option<CellIndex> {
        if !self.contains(pos) {
            return None;
        }
        Some((pos.row as usize) * (self.size as usize) + (pos.col as usize))
    }

    /// Position of a flat index. Panics in debug builds if out of range.
    #[inline(always)]
    pub fn position(&self, index: CellIndex) -> Position {
        debug_assert!(index < self.cell_count(), "cell index {index} out of range");
        let n = self.size as usize;
        Position::new((index / n) as u8, (index % n) as u8)
    }

    /// The position one step from `pos` in `direction`, `None` past the edge
    #[inline(always)]
    pub fn step(&self, pos: Position, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = pos.row as i16 + dr as i16;
        let col = pos.col as i16 + dc as i16;
        if row < 0 || col < 0 || row >= self.size as i16 || col >= self.size as i16 {
            return None;
        }
        Some(Position::new(row as u8, col as u8))
    }

    /// Neighbouring cell index one step in `direction`
    #[inline(always)]
    pub fn neighbor(&self, index: CellIndex, direction: Direction) -> Option<CellIndex> {
        self.step(self.position(index), direction)
            .and_then(|p| self.index(p))
    }

    /// Sort key that puts the tile farthest along `direction` first.
    ///
    /// Moving left settles column 0 first, moving right the last column,
    /// moving up row 0, moving down the last row.
    #[inline(always)]
    pub fn travel_rank(&self, pos: Position, direction: Direction) -> u8 {
        let last = self.size - 1;
        match direction {
            Direction::Left => pos.col,
            Direction::Right => last - pos.col,
            Direction::Up => pos.row,
            Direction::Down => last - pos.row,
        }
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).map(move |i| self.position(i))
    }

    /// Distance between neighbouring cell centres in world units
    pub fn spacing(&self) -> f32 {
        WORLD_EXTENT / self.size as f32
    }

    /// World-space centre of a cell
    pub fn to_world(&self, pos: Position) -> (f32, f32) {
        let s = self.spacing();
        let half = WORLD_EXTENT / 2.0;
        let x = -half + s * (pos.col as f32 + 0.5);
        let y = half - s * (pos.row as f32 + 0.5);
        (x, y)
    }

    /// Cell containing a world-space point, `None` outside the grid
    pub fn from_world(&self, x: f32, y: f32) -> Option<Position> {
        let s = self.spacing();
        let half = WORLD_EXTENT / 2.0;
        let col = ((x + half) / s).floor();
        let row = ((half - y) / s).floor();
        if col < 0.0 || row < 0.0 || col >= self.size as f32 || row >= self.size as f32 {
            return None;
        }
        Some(Position::new(row as u8, col as u8))
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            size: crate::types::DEFAULT_GRID_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_sizes() {
        assert_eq!(GridGeometry::new(1), Err(GridError::InvalidSize(1)));
        assert_eq!(GridGeometry::new(9), Err(GridError::InvalidSize(9)));
        assert!(GridGeometry::new(2).is_ok());
        assert!(GridGeometry::new(8).is_ok());
    }

    #[test]
    fn test_index_position_roundtrip() {
        let g = GridGeometry::new(5).unwrap();
        for i in 0..g.cell_count() {
            assert_eq!(g.index(g.position(i)), Some(i));
        }
        assert_eq!(g.index(Position::new(5, 0)), None);
        assert_eq!(g.index(Position::new(0, 5)), None);
    }

    #[test]
    fn test_step_stops_at_edges() {
        let g = GridGeometry::new(4).unwrap();
        let corner = Position::new(0, 0);
        assert_eq!(g.step(corner, Direction::Up), None);
        assert_eq!(g.step(corner, Direction::Left), None);
        assert_eq!(g.step(corner, Direction::Right), Some(Position::new(0, 1)));
        assert_eq!(g.step(corner, Direction::Down), Some(Position::new(1, 0)));
        let far = Position::new(3, 3);
        assert_eq!(g.step(far, Direction::Down), None);
        assert_eq!(g.step(far, Direction::Right), None);
    }

    #[test]
    fn test_travel_rank_orders_leading_edge_first() {
        let g = GridGeometry::new(4).unwrap();
        let p = Position::new(1, 3);
        assert_eq!(g.travel_rank(p, Direction::Left), 3);
        assert_eq!(g.travel_rank(p, Direction::Right), 0);
        assert_eq!(g.travel_rank(p, Direction::Up), 1);
        assert_eq!(g.travel_rank(p, Direction::Down), 2);
    }

    #[test]
    fn test_world_layout_4x4_matches_unit_spacing() {
        let g = GridGeometry::new(4).unwrap();
        assert_eq!(g.spacing(), 1.0);
        assert_eq!(g.to_world(Position::new(0, 0)), (-1.5, 1.5));
        assert_eq!(g.to_world(Position::new(3, 3)), (1.5, -1.5));
    }

    #[test]
    fn test_world_roundtrip_all_sizes() {
        for n in MIN_GRID_SIZE..=MAX_GRID_SIZE {
            let g = GridGeometry::new(n).unwrap();
            for pos in g.positions() {
                let (x, y) = g.to_world(pos);
                assert_eq!(g.from_world(x, y), Some(pos), "n={n} pos={pos}");
            }
            assert_eq!(g.from_world(-2.5, 0.0), None);
            assert_eq!(g.from_world(0.0, 2.5), None);
        }
    }
}
