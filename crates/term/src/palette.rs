//! Tile colours per power of two.

use crate::fb::{CellStyle, Rgb};

pub const BOARD_BG: Rgb = Rgb::new(187, 173, 160);
pub const EMPTY_BG: Rgb = Rgb::new(205, 193, 180);
const DARK_TEXT: Rgb = Rgb::new(119, 110, 101);
const LIGHT_TEXT: Rgb = Rgb::new(249, 246, 242);

/// Backgrounds for 2, 4, 8, ... 2048
const TILE_BG: [Rgb; 11] = [
    Rgb::new(238, 228, 218),
    Rgb::new(237, 224, 200),
    Rgb::new(242, 177, 121),
    Rgb::new(245, 149, 99),
    Rgb::new(246, 124, 95),
    Rgb::new(246, 94, 59),
    Rgb::new(237, 207, 114),
    Rgb::new(237, 204, 97),
    Rgb::new(237, 200, 80),
    Rgb::new(237, 197, 63),
    Rgb::new(237, 194, 46),
];

/// Everything past 2048
const SUPER_BG: Rgb = Rgb::new(60, 58, 50);

pub fn tile_color(value: u32) -> Rgb {
    if value < 2 {
        return EMPTY_BG;
    }
    (value.trailing_zeros() as usize)
        .checked_sub(1)
        .and_then(|i| TILE_BG.get(i))
        .copied()
        .unwrap_or(SUPER_BG)
}

/// Label style for a tile: readable text over the tile colour
pub fn tile_style(value: u32) -> CellStyle {
    let bg = tile_color(value);
    let fg = if bg.luma() > 200 { DARK_TEXT } else { LIGHT_TEXT };
    CellStyle::new(fg, bg).bold()
}
