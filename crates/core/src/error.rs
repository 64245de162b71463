use thiserror::Error;

use crate::geometry::CellIndex;
use crate::grid::TileIndex;
use crate::types::Position;

/// Errors raised by grid construction and mutation.
///
/// `Full` and `Inconsistent` are programming errors under correct turn
/// sequencing; callers assert on them rather than recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid size {0} is outside the supported range")]
    InvalidSize(u8),
    #[error("grid rows are not square: {rows} rows, row {row} has {cols} cells")]
    NotSquare { rows: usize, row: usize, cols: usize },
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),
    #[error("cell {0} is already occupied")]
    Occupied(Position),
    #[error("tile value {0} is not a power of two >= 2")]
    InvalidValue(u32),
    #[error("no empty cell left to spawn into")]
    Full,
    #[error("cell {cell:?} and tile slot {tile} disagree about ownership")]
    Inconsistent {
        cell: Option<CellIndex>,
        tile: TileIndex,
    },
}
