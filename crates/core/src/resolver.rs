//! Move resolver - computes the slides and merges for one swipe
//!
//! Tiles are processed farthest-along-the-direction first. Each tile keeps
//! stepping into empty cells until it hits the edge, a tile of a different
//! value, or a tile already claimed as a merge destination this turn. If the
//! blocking tile has the same value and is unclaimed, the moving tile is
//! detached and aimed at it, and stops there.
//!
//! Processing order is what makes a single pass correct: tiles nearest the
//! target edge settle first, so every later tile slides against its final
//! neighbours. `[2, _, 2, 2]` moved left becomes `[4, 2, _, _]`.
//!
//! Merges are only *claimed* here. Values change when the turn controller
//! commits them, so a tile produced by a merge can never merge again in the
//! same turn.

use crate::geometry::CellIndex;
use crate::grid::{Grid, TileIndex};
use crate::types::{Direction, Position, TileId};

/// One tile's movement for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMove {
    /// Arena slot of the moving tile
    pub tile: TileIndex,
    pub id: TileId,
    /// Value before any merge is committed
    pub value: u32,
    pub from: Position,
    pub to: Position,
    /// Arena slot of the stationary tile this one merges into
    pub merge_target: Option<TileIndex>,
    /// Id of the stationary tile this one merges into
    pub merged_into: Option<TileId>,
}

impl TileMove {
    pub fn is_merge(&self) -> bool {
        self.merge_target.is_some()
    }
}

/// All moves for one turn, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSet {
    moves: Vec<TileMove>,
    merges: usize,
}

impl MoveSet {
    pub fn moves(&self) -> &[TileMove] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<TileMove> {
        self.moves
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Number of merges claimed
    pub fn merges(&self) -> usize {
        self.merges
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Slide(CellIndex),
    Merge(TileIndex),
    Blocked,
}

/// Look one cell ahead of `from` for a tile holding `value`
#[inline(always)]
fn next_step(grid: &Grid, from: CellIndex, value: u32, direction: Direction) -> Step {
    let Some(next) = grid.geometry().neighbor(from, direction) else {
        return Step::Blocked;
    };

    match grid.cells()[next].tile() {
        None => Step::Slide(next),
        Some(other) => match grid.tile(other) {
            Some(t) if t.value() == value && !t.pending_merge() => Step::Merge(other),
            _ => Step::Blocked,
        },
    }
}

/// Resolves swipes against a grid.
///
/// Holds a reusable ordering buffer so repeated resolution does not allocate
/// once warmed up.
#[derive(Debug, Clone, Default)]
pub struct MoveResolver {
    order: Vec<TileIndex>,
}

impl MoveResolver {
    pub fn new() -> Self {
        Self { order: Vec::new() }
    }

    /// Fill the ordering buffer with every tile that owns a cell, farthest
    /// along `direction` first.
    fn order_tiles(&mut self, grid: &Grid, direction: Direction) {
        let geometry = *grid.geometry();
        self.order.clear();
        self.order.extend(
            grid.tiles()
                .filter(|(_, t)| t.cell().is_some())
                .map(|(i, _)| i),
        );
        // Stable: ties keep slot order. Tiles sharing a rank sit in different
        // lines and never interact.
        self.order.sort_by_key(|&i| {
            grid.tile(i)
                .and_then(|t| t.cell())
                .map_or(u8::MAX, |c| geometry.travel_rank(geometry.position(c), direction))
        });
    }

    /// Ordering the resolver uses for `direction` (for inspection and tests)
    pub fn processing_order(&mut self, grid: &Grid, direction: Direction) -> &[TileIndex] {
        self.order_tiles(grid, direction);
        &self.order
    }

    /// Resolve a swipe, applying every slide and claiming every merge on the
    /// grid.
    ///
    /// Sliding tiles end up in their destination cells. Merging tiles end up
    /// detached, with their merge target marked `pending_merge`; the caller
    /// commits or discards those claims.
    pub fn resolve(&mut self, grid: &mut Grid, direction: Direction) -> MoveSet {
        self.order_tiles(grid, direction);
        let geometry = *grid.geometry();

        let mut set = MoveSet::default();
        for &tile in &self.order {
            let Some((id, value, start)) = grid
                .tile(tile)
                .and_then(|t| t.cell().map(|c| (t.id(), t.value(), c)))
            else {
                continue;
            };

            let mut at = start;
            let mut target = None;
            loop {
                match next_step(grid, at, value, direction) {
                    Step::Slide(next) => {
                        grid.relocate(tile, next);
                        at = next;
                    }
                    Step::Merge(other) => {
                        grid.claim_merge(tile, other);
                        target = Some(other);
                        break;
                    }
                    Step::Blocked => break,
                }
            }

            let to = match target {
                // The target was found in the cell ahead of `at`.
                Some(_) => geometry.neighbor(at, direction).unwrap_or(at),
                None if at != start => at,
                None => continue,
            };

            if target.is_some() {
                set.merges += 1;
            }
            set.moves.push(TileMove {
                tile,
                id,
                value,
                from: geometry.position(start),
                to: geometry.position(to),
                merge_target: target,
                merged_into: target.and_then(|t| grid.tile(t)).map(|t| t.id()),
            });
        }

        log::trace!(
            "resolved {} move(s), {} merge(s) going {}",
            set.len(),
            set.merges,
            direction.as_str()
        );
        set
    }

    /// Dry run: report the first legal step in `direction` without touching
    /// the grid.
    ///
    /// The returned move covers a single step, which is enough to answer
    /// whether the direction is playable. Uses the same ordering and the same
    /// step rule as [`MoveResolver::resolve`], so it agrees with it on every
    /// grid that has no claims outstanding.
    pub fn dry_run(&mut self, grid: &Grid, direction: Direction) -> Option<TileMove> {
        self.order_tiles(grid, direction);
        let geometry = grid.geometry();

        for &tile in &self.order {
            let Some(t) = grid.tile(tile) else {
                continue;
            };
            let Some(cell) = t.cell() else {
                continue;
            };

            let (to, merge_target) = match next_step(grid, cell, t.value(), direction) {
                Step::Slide(next) => (next, None),
                Step::Merge(other) => (geometry.neighbor(cell, direction)?, Some(other)),
                Step::Blocked => continue,
            };

            return Some(TileMove {
                tile,
                id: t.id(),
                value: t.value(),
                from: geometry.position(cell),
                to: geometry.position(to),
                merge_target,
                merged_into: merge_target.and_then(|o| grid.tile(o)).map(|o| o.id()),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: [u32; 4]) -> Grid {
        Grid::from_rows(&[values, [0; 4], [0; 4], [0; 4]]).unwrap()
    }

    #[test]
    fn test_ordering_per_direction() {
        let grid = Grid::from_rows(&[[0, 2, 0, 4], [8, 0, 0, 0], [0, 0, 0, 0], [0, 0, 16, 0]])
            .unwrap();
        let mut resolver = MoveResolver::new();

        let values = |resolver: &mut MoveResolver, dir| -> Vec<u32> {
            resolver
                .processing_order(&grid, dir)
                .iter()
                .map(|&i| grid.tile(i).unwrap().value())
                .collect()
        };

        assert_eq!(values(&mut resolver, Direction::Left), vec![8, 2, 16, 4]);
        assert_eq!(values(&mut resolver, Direction::Right), vec![4, 16, 2, 8]);
        assert_eq!(values(&mut resolver, Direction::Up), vec![2, 4, 8, 16]);
        assert_eq!(values(&mut resolver, Direction::Down), vec![16, 8, 2, 4]);
    }

    #[test]
    fn test_multi_cell_slide_is_one_record() {
        let mut grid = row([0, 0, 0, 2]);
        let set = MoveResolver::new().resolve(&mut grid, Direction::Left);

        assert_eq!(set.len(), 1);
        let m = set.moves()[0];
        assert_eq!(m.from, Position::new(0, 3));
        assert_eq!(m.to, Position::new(0, 0));
        assert!(!m.is_merge());
        assert_eq!(grid.to_rows()[0], vec![2, 0, 0, 0]);
    }

    #[test]
    fn test_merge_claim_leaves_values_untouched() {
        let mut grid = row([2, 2, 0, 0]);
        let set = MoveResolver::new().resolve(&mut grid, Direction::Left);

        assert_eq!(set.merges(), 1);
        let m = set.moves()[0];
        assert_eq!(m.from, Position::new(0, 1));
        assert_eq!(m.to, Position::new(0, 0));
        let target = m.merge_target.unwrap();
        assert!(grid.tile(target).unwrap().pending_merge());
        assert_eq!(grid.tile(target).unwrap().value(), 2);
        assert!(grid.tile(m.tile).unwrap().is_in_flight());
        assert!(grid.check_consistency().is_ok());
    }

    #[test]
    fn test_claimed_target_blocks_second_merge() {
        // 2 2 2 _ left: first pair merges, third 2 slides behind the claim.
        let mut grid = row([2, 2, 2, 0]);
        let set = MoveResolver::new().resolve(&mut grid, Direction::Left);

        assert_eq!(set.merges(), 1);
        assert_eq!(set.len(), 2);
        assert_eq!(set.moves()[1].to, Position::new(0, 1));
        assert!(!set.moves()[1].is_merge());
    }

    #[test]
    fn test_dry_run_does_not_mutate() {
        let grid = row([0, 2, 2, 0]);
        let before = grid.to_rows();
        let mut resolver = MoveResolver::new();

        let first = resolver.dry_run(&grid, Direction::Left).unwrap();
        assert_eq!(first.from, Position::new(0, 1));
        assert_eq!(first.to, Position::new(0, 0));
        assert_eq!(grid.to_rows(), before);
        assert!(grid.tiles().all(|(_, t)| !t.pending_merge()));

        let merge = resolver.dry_run(&grid, Direction::Up);
        assert!(merge.is_none());
    }

    #[test]
    fn test_dry_run_reports_merge_on_packed_row() {
        let grid = row([2, 2, 4, 8]);
        let m = MoveResolver::new().dry_run(&grid, Direction::Left).unwrap();
        assert!(m.is_merge());
        assert_eq!((m.from, m.to), (Position::new(0, 1), Position::new(0, 0)));
    }

    #[test]
    fn test_second_resolve_is_empty() {
        let mut grid = row([2, 2, 2, 2]);
        let mut resolver = MoveResolver::new();
        assert_eq!(resolver.resolve(&mut grid, Direction::Right).merges(), 2);
        assert!(resolver.resolve(&mut grid, Direction::Right).is_empty());
    }
}
