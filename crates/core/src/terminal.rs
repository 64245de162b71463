//! Terminal detector - decides whether any legal move is left
//!
//! Tries the four directions with the resolver's dry run. A grid that still
//! has an empty cell always has a move (some tile borders it), so the turn
//! controller only needs the check once a spawn has filled the last cell.

use crate::grid::Grid;
use crate::resolver::MoveResolver;
use crate::types::Direction;

/// When the turn controller runs the terminal check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalCheck {
    /// Only after a spawn fills the last empty cell
    #[default]
    WhenFull,
    /// After every spawn
    EveryTurn,
}

impl TerminalCheck {
    /// Whether the check must run for `grid` right after a spawn
    pub fn applies(&self, grid: &Grid) -> bool {
        match self {
            TerminalCheck::WhenFull => grid.is_full(),
            TerminalCheck::EveryTurn => true,
        }
    }
}

/// First direction with a legal move, probing in [`Direction::ALL`] order
pub fn first_playable(resolver: &mut MoveResolver, grid: &Grid) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|&dir| resolver.dry_run(grid, dir).is_some())
}

/// True if at least one direction has a legal slide or merge
pub fn has_legal_move(resolver: &mut MoveResolver, grid: &Grid) -> bool {
    first_playable(resolver, grid).is_some()
}

/// True if no direction has a legal slide or merge
pub fn is_stuck(resolver: &mut MoveResolver, grid: &Grid) -> bool {
    !has_legal_move(resolver, grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_is_stuck() {
        let grid = Grid::from_rows(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ])
        .unwrap();
        assert!(is_stuck(&mut MoveResolver::new(), &grid));
    }

    #[test]
    fn test_single_vertical_pair_is_playable() {
        let grid = Grid::from_rows(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 8, 4],
            [4, 2, 8, 2],
        ])
        .unwrap();
        let mut resolver = MoveResolver::new();
        assert!(has_legal_move(&mut resolver, &grid));
        // Row-wise nothing merges, so the first playable direction is vertical.
        assert_eq!(first_playable(&mut resolver, &grid), Some(Direction::Down));
    }

    #[test]
    fn test_empty_cell_means_playable() {
        let grid = Grid::from_rows(&[[2, 4], [8, 0]]).unwrap();
        assert!(has_legal_move(&mut MoveResolver::new(), &grid));
    }

    #[test]
    fn test_check_policy() {
        let open = Grid::from_rows(&[[2, 0], [0, 0]]).unwrap();
        let full = Grid::from_rows(&[[2, 4], [8, 16]]).unwrap();
        assert!(!TerminalCheck::WhenFull.applies(&open));
        assert!(TerminalCheck::WhenFull.applies(&full));
        assert!(TerminalCheck::EveryTurn.applies(&open));
    }
}
