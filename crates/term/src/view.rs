//! BoardView: maps a `core::Board` into a glyph frame.
//!
//! This module is pure (no I/O). It only reads the board through its public
//! queries: `cell_state` for every cell, and `shadow_row` plus catalog
//! occupancy for the ghost piece.

use crate::core::{Board, PieceSource};
use crate::frame::{Frame, Glyph, Tone};
use crate::types::{Cell, SHAPE_GRID};

pub const ACTIVE: Glyph = Glyph::new('█', Tone::Active);
pub const LOCKED: Glyph = Glyph::new('▓', Tone::Locked);
pub const SHADOW: Glyph = Glyph::new('░', Tone::Shadow);
pub const ENDED: Glyph = Glyph::new('▒', Tone::Ended);
pub const WELL: Glyph = Glyph::new(' ', Tone::Well);

pub struct BoardView {
    /// Terminal columns per board cell
    cell_w: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        // Two columns per cell roughly squares up terminal glyphs.
        Self { cell_w: 2 }
    }
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Frame size for a `width × height` board: border plus one status row.
    /// Saturates at `u16::MAX`; cells past the edge are dropped.
    pub fn frame_size(&self, width: u16, height: u16) -> (u16, u16) {
        (
            width.saturating_mul(self.cell_w).saturating_add(2),
            height.saturating_add(3),
        )
    }

    pub fn render<S: PieceSource>(&self, board: &Board<S>) -> Frame {
        let (fw, fh) = self.frame_size(board.width(), board.height());
        let mut frame = Frame::new(fw, fh);
        let ended = board.is_ended();

        self.draw_border(&mut frame, fw, board.height().saturating_add(2));

        for y in 0..board.height() {
            for x in 0..board.width() {
                let glyph = match board.cell_state(x as i32, y as i32) {
                    Ok(Cell::Locked) if ended => ENDED,
                    Ok(Cell::Locked) => LOCKED,
                    Ok(Cell::Active) => ACTIVE,
                    _ => WELL,
                };
                self.put_cell(&mut frame, x as i32, y as i32, glyph);
            }
        }

        if !ended {
            self.draw_shadow(&mut frame, board);
        }

        let status = if ended {
            format!(" GAME OVER  locks {}", board.locks())
        } else {
            format!(" locks {}  fall {}ms", board.locks(), board.fall_interval_ms())
        };
        frame.put_str(0, fh - 1, &status, Tone::Text);

        if ended {
            let banner = "GAME OVER";
            let x = fw.saturating_sub(banner.len() as u16) / 2;
            frame.put_str(x, board.height().saturating_add(2) / 2, banner, Tone::Text);
        }

        frame
    }

    fn draw_shadow<S: PieceSource>(&self, frame: &mut Frame, board: &Board<S>) {
        let Some(active) = board.active_piece() else {
            return;
        };
        let Some(shadow_y) = board.shadow_row(active.x) else {
            return;
        };

        let catalog = board.catalog();
        for ly in 0..SHAPE_GRID as i32 {
            for lx in 0..SHAPE_GRID as i32 {
                if !catalog
                    .occupied(active.shape, active.rotation, lx, ly)
                    .unwrap_or(false)
                {
                    continue;
                }
                let (x, y) = (active.x + lx, shadow_y + ly);
                // Only on empty cells; the active piece and stack stay visible.
                if board.cell_state(x, y) == Ok(Cell::Empty) {
                    self.put_cell(frame, x, y, SHADOW);
                }
            }
        }
    }

    fn put_cell(&self, frame: &mut Frame, x: i32, y: i32, glyph: Glyph) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        let (Some(fx), Some(fy)) = (
            x.checked_mul(self.cell_w).and_then(|v| v.checked_add(1)),
            y.checked_add(1),
        ) else {
            return;
        };
        for dx in 0..self.cell_w {
            if let Some(cx) = fx.checked_add(dx) {
                frame.set(cx, fy, glyph);
            }
        }
    }

    fn draw_border(&self, frame: &mut Frame, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        let border = |ch| Glyph::new(ch, Tone::Border);
        for x in 1..w - 1 {
            frame.set(x, 0, border('─'));
            frame.set(x, h - 1, border('─'));
        }
        for y in 1..h - 1 {
            frame.set(0, y, border('│'));
            frame.set(w - 1, y, border('│'));
        }
        frame.set(0, 0, border('┌'));
        frame.set(w - 1, 0, border('┐'));
        frame.set(0, h - 1, border('└'));
        frame.set(w - 1, h - 1, border('┘'));
    }
}
