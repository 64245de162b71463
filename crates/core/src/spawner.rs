//! Spawner - places a new 2 or 4 in a uniformly chosen empty cell
//!
//! The random source is injected so games can be replayed from a seed.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::geometry::CellIndex;
use crate::grid::{Grid, TileIndex};
use crate::types::{Position, TileId, MAX_CELLS, SPAWN_FOUR_PROBABILITY};
use crate::GridError;

/// A tile created by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedTile {
    pub tile: TileIndex,
    pub id: TileId,
    pub position: Position,
    pub value: u32,
}

/// Draw a spawn value: 4 with probability [`SPAWN_FOUR_PROBABILITY`], else 2
pub fn roll_value<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_bool(SPAWN_FOUR_PROBABILITY) {
        4
    } else {
        2
    }
}

/// Spawn a tile into a random empty cell.
///
/// The cell is drawn first, then the value. Spawning into a full grid is a
/// sequencing bug: it asserts in debug builds and returns
/// [`GridError::Full`] otherwise.
pub fn spawn<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<SpawnedTile, GridError> {
    let empty: ArrayVec<CellIndex, MAX_CELLS> = grid.empty_cells().collect();
    debug_assert!(!empty.is_empty(), "spawn requested on a full grid");
    if empty.is_empty() {
        return Err(GridError::Full);
    }

    let cell = empty[rng.gen_range(0..empty.len())];
    let value = roll_value(rng);
    let tile = grid.insert_at(cell, value)?;

    let spawned = SpawnedTile {
        tile,
        id: grid.tile(tile).map_or(TileId(0), |t| t.id()),
        position: grid.geometry().position(cell),
        value,
    };
    log::trace!("spawned {} at {} ({})", spawned.value, spawned.position, spawned.id);
    Ok(spawned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    #[test]
    fn test_spawn_fills_an_empty_cell() {
        let mut grid = Grid::from_rows(&[[2, 4], [0, 8]]).unwrap();
        let mut rng = SimpleRng::new(7);

        let s = spawn(&mut grid, &mut rng).unwrap();
        assert_eq!(s.position, Position::new(1, 0));
        assert!(s.value == 2 || s.value == 4);
        assert_eq!(grid.value_at(s.position), Some(s.value));
        assert!(grid.is_full());
        assert!(grid.check_consistency().is_ok());
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let run = |seed| {
            let mut grid = Grid::new(4).unwrap();
            let mut rng = SimpleRng::new(seed);
            (0..10)
                .map(|_| {
                    let s = spawn(&mut grid, &mut rng).unwrap();
                    (s.position, s.value)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "full grid")]
    fn test_spawn_on_full_grid_asserts() {
        let mut grid = Grid::from_rows(&[[2, 4], [8, 16]]).unwrap();
        let _ = spawn(&mut grid, &mut SimpleRng::new(1));
    }

    #[test]
    fn test_roll_value_distribution() {
        let mut rng = SimpleRng::new(2024);
        let fours = (0..10_000).filter(|_| roll_value(&mut rng) == 4).count();
        // 10% +- a generous margin
        assert!((700..=1300).contains(&fours), "fours = {fours}");
    }
}
