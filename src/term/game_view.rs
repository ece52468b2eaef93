//! GameView: maps engine snapshots into a terminal framebuffer.
//!
//! This module is pure (no I/O). The falling piece is composited over the
//! locked grid for display only; the snapshot's board is never modified.

use crate::core::{GameState, Piece};
use crate::term::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

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

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Render a game snapshot into a framebuffer.
    pub fn render(&self, state: &GameState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        fb.fill(' ', CellStyle::default());

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = CellStyle::plain(Rgb::new(80, 80, 90), Rgb::new(25, 25, 35));
        let border = CellStyle::plain(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        // Background for play area.
        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);

        // Border.
        self.draw_border(&mut fb, start_x, start_y, frame_w, frame_h, border);

        // Locked board cells.
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                match state.board.get(x, y).flatten() {
                    Some(kind) => {
                        self.draw_board_cell(&mut fb, start_x, start_y, x as u16, y as u16, kind)
                    }
                    None => self.draw_empty_cell(&mut fb, start_x, start_y, x as u16, y as u16),
                }
            }
        }

        // Falling piece, composited for display only.
        if let Some(piece) = state.current {
            for (x, y) in piece.board_cells(0, 0) {
                if x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8 {
                    self.draw_board_cell(&mut fb, start_x, start_y, x as u16, y as u16, piece.kind);
                }
            }
        }

        // Side panel (score/level/lines/next).
        self.draw_side_panel(&mut fb, state, viewport, start_x, start_y, frame_w);

        // Overlays.
        if state.paused {
            self.draw_overlay_text(&mut fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        } else if state.game_over {
            self.draw_overlay_text(&mut fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        }

        fb
    }

    /// Draw the name-entry prompt over an already rendered frame.
    pub fn draw_name_entry(&self, fb: &mut FrameBuffer, viewport: Viewport, typed: &str) {
        let box_w: u16 = 30;
        let box_h: u16 = 5;
        let x = viewport.width.saturating_sub(box_w) / 2;
        let y = viewport.height.saturating_sub(box_h) / 2;

        let frame = CellStyle::plain(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0));
        let label = CellStyle {
            bold: true,
            ..frame
        };

        fb.fill_rect(x, y, box_w, box_h, ' ', frame);
        self.draw_border(fb, x, y, box_w, box_h, frame);
        fb.put_str(x + 2, y + 1, "NEW HIGH SCORE!", label);
        fb.put_str(x + 2, y + 2, "Name:", frame);
        fb.put_str(x + 8, y + 2, typed, frame);
        fb.put_char(x + 8 + typed.chars().count() as u16, y + 2, '_', label);
        fb.put_str(x + 2, y + 3, "enter: save  esc: skip", CellStyle { dim: true, ..frame });
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle {
            dim: true,
            ..CellStyle::plain(Rgb::new(90, 90, 100), Rgb::new(25, 25, 35))
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
    ) {
        let style = CellStyle {
            bold: true,
            ..CellStyle::plain(piece_color(kind), Rgb::new(25, 25, 35))
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        state: &GameState,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::plain(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", state.score), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", state.level), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LINES", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", state.lines), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = state.next {
            self.draw_preview(fb, panel_x, y, &next);
        }
    }

    /// Draw a piece's bitmap in panel coordinates (outside the board frame).
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, piece: &Piece) {
        let style = CellStyle {
            bold: true,
            ..CellStyle::plain(piece_color(piece.kind), Rgb::new(0, 0, 0))
        };
        for (cx, cy) in piece.shape.occupied_cells() {
            let px = x + (cx as u16) * self.cell_w;
            let py = y + cy as u16;
            fb.fill_rect(px, py, self.cell_w, 1, '█', style);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            bold: true,
            ..CellStyle::plain(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0))
        };
        fb.put_str(x, mid_y, text, style);
    }
}

/// Display color for a piece kind.
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(0, 245, 255),
        PieceKind::O => Rgb::new(255, 237, 0),
        PieceKind::T => Rgb::new(160, 0, 240),
        PieceKind::S => Rgb::new(0, 240, 0),
        PieceKind::Z => Rgb::new(240, 0, 0),
        PieceKind::J => Rgb::new(0, 0, 245),
        PieceKind::L => Rgb::new(255, 128, 0),
    }
}
