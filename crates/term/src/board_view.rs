//! BoardView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, TurnPlan};
use crate::fb::{format_u32, CellStyle, FrameBuffer, Rgb};
use crate::palette::{tile_style, BOARD_BG, EMPTY_BG};
use crate::sprites::TileSprites;
use crate::types::{GameOutcome, Position, TileId};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Front-end state shown under the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudView {
    /// Grid size the next restart will use
    pub next_grid_size: u8,
}

/// A turn being animated: tiles drawn `progress` of the way along their moves
#[derive(Debug, Clone, Copy)]
pub struct Motion<'a> {
    pub plan: &'a TurnPlan,
    pub progress: f32,
}

/// Cell metrics chosen for a grid size and viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Top-left corner of the frame
    pub x: u16,
    pub y: u16,
    pub cell_w: u16,
    pub cell_h: u16,
    pub gap_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
}

impl BoardLayout {
    fn tile_w(&self) -> u16 {
        self.cell_w - 1
    }

    fn tile_h(&self) -> u16 {
        self.cell_h - self.gap_y
    }

    /// Top-left terminal cell of the tile at a (possibly fractional) grid slot
    fn tile_origin(&self, row: f32, col: f32) -> (u16, u16) {
        let px = self.x as f32 + 2.0 + col * self.cell_w as f32;
        let py = self.y as f32 + 1.0 + self.gap_y as f32 + row * self.cell_h as f32;
        (px.round() as u16, py.round() as u16)
    }
}

/// Cell sizes tried from largest to smallest
const CELL_SIZES: [(u16, u16); 4] = [(8, 4), (6, 3), (5, 2), (4, 1)];

/// Lines reserved under the frame for the status and help text
const HUD_LINES: u16 = 2;

/// A terminal renderer for the board.
#[derive(Debug, Clone, Copy)]
pub struct BoardView {
    anchor_y: AnchorY,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
        }
    }
}

impl BoardView {
    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Pick the largest cell size that fits, centred horizontally.
    pub fn layout(&self, size: u8, viewport: Viewport) -> BoardLayout {
        let n = size as u16;
        let fit = |(cw, ch): (u16, u16)| {
            let gap_y = if ch > 1 { 1 } else { 0 };
            let frame_w = n * cw + 1 + 2;
            let frame_h = n * ch + gap_y + 2;
            (cw, ch, gap_y, frame_w, frame_h)
        };
        let (cell_w, cell_h, gap_y, frame_w, frame_h) = CELL_SIZES
            .into_iter()
            .map(fit)
            .find(|&(_, _, _, w, h)| w <= viewport.width && h + HUD_LINES <= viewport.height)
            .unwrap_or_else(|| fit(CELL_SIZES[CELL_SIZES.len() - 1]));

        let x = viewport.width.saturating_sub(frame_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h + HUD_LINES) / 2,
            AnchorY::Top => 0,
        };
        BoardLayout {
            x,
            y,
            cell_w,
            cell_h,
            gap_y,
            frame_w,
            frame_h,
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        sprites: &TileSprites,
        motion: Option<Motion<'_>>,
        hud: Option<&HudView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));
        if snap.size == 0 {
            return;
        }

        let layout = self.layout(snap.size, viewport);
        let board = CellStyle::new(BOARD_BG, BOARD_BG);
        fb.fill_rect(layout.x, layout.y, layout.frame_w, layout.frame_h, ' ', board);
        fb.draw_box(
            layout.x,
            layout.y,
            layout.frame_w,
            layout.frame_h,
            CellStyle::new(Rgb::new(120, 110, 100), BOARD_BG),
        );

        let moving = |id: TileId| motion.is_some_and(|m| m.plan.moves.iter().any(|mv| mv.id == id));

        // Empty slots and resting tiles.
        let n = snap.size;
        for row in 0..n {
            for col in 0..n {
                let pos = Position::new(row, col);
                let (x, y) = layout.tile_origin(row as f32, col as f32);
                self.draw_slot(fb, &layout, x, y);
                if let Some(id) = snap.tile_id(pos) {
                    if !moving(id) {
                        self.draw_tile(fb, &layout, x, y, sprites, id, snap.value(pos));
                    }
                }
            }
        }

        // Moving tiles on top, so merging tiles slide over their targets.
        if let Some(m) = motion {
            let t = m.progress.clamp(0.0, 1.0);
            for mv in &m.plan.moves {
                let row = lerp(mv.from.row as f32, mv.to.row as f32, t);
                let col = lerp(mv.from.col as f32, mv.to.col as f32, t);
                let (x, y) = layout.tile_origin(row, col);
                self.draw_tile(fb, &layout, x, y, sprites, mv.id, mv.value);
            }
        }

        self.draw_hud(fb, snap, hud, &layout);

        match snap.outcome() {
            Some(GameOutcome::Won) => self.draw_banner(fb, &layout, "YOU WIN!  r to restart"),
            Some(GameOutcome::Lost) => self.draw_banner(fb, &layout, "GAME OVER  r to restart"),
            None => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        sprites: &TileSprites,
        motion: Option<Motion<'_>>,
        hud: Option<&HudView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, sprites, motion, hud, viewport, &mut fb);
        fb
    }

    fn draw_slot(&self, fb: &mut FrameBuffer, layout: &BoardLayout, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(170, 158, 146), EMPTY_BG);
        fb.fill_rect(x, y, layout.tile_w(), layout.tile_h(), ' ', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        x: u16,
        y: u16,
        sprites: &TileSprites,
        id: TileId,
        value: u32,
    ) {
        let (w, h) = (layout.tile_w(), layout.tile_h());
        match sprites.get(id) {
            Some(sprite) => {
                fb.fill_rect(x, y, w, h, ' ', sprite.style());
                fb.put_str_centered(x, y + h / 2, w, sprite.label(), sprite.style());
            }
            None => {
                let style = tile_style(value);
                fb.fill_rect(x, y, w, h, ' ', style);
                fb.put_str_centered(x, y + h / 2, w, &format_u32(value), style);
            }
        }
    }

    fn draw_hud(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        hud: Option<&HudView>,
        layout: &BoardLayout,
    ) {
        let label = CellStyle::default().bold();
        let value = CellStyle::default();
        let dim = CellStyle {
            dim: true,
            ..value
        };

        let y = layout.y.saturating_add(layout.frame_h);
        let mut x = layout.x;
        for (name, v) in [
            ("TURN ", snap.turn),
            ("  TILES ", snap.tile_count),
            ("  MAX ", snap.max_tile),
        ] {
            fb.put_str(x, y, name, label);
            x = x.saturating_add(name.len() as u16);
            fb.put_u32(x, y, v, value);
            x = x.saturating_add(format_u32(v).len() as u16);
        }
        fb.put_str(x.saturating_add(2), y, snap.phase.as_str(), dim);

        let help_y = y.saturating_add(1);
        fb.put_str(layout.x, help_y, "arrows/hjkl/wasd move  r restart  +/- size ", dim);
        if let Some(hud) = hud {
            let x = layout.x.saturating_add(43);
            fb.put_u32(x, help_y, hud.next_grid_size as u32, dim);
        }
    }

    fn draw_banner(&self, fb: &mut FrameBuffer, layout: &BoardLayout, text: &str) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(60, 58, 50)).bold();
        let w = (text.chars().count() as u16 + 4).min(layout.frame_w);
        let x = layout.x + (layout.frame_w - w) / 2;
        let y = layout.y + layout.frame_h / 2;
        fb.fill_rect(x, y, w, 1, ' ', style);
        fb.put_str_centered(x, y, w, text, style);
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
