//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, ShapeMatrix};
use crate::fb::{FrameBuffer, Glyph, Rgb, Style};
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(140, 140, 150);

/// Display color for a piece kind.
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::hex(0x00f0f0),
        PieceKind::O => Rgb::hex(0xf0f000),
        PieceKind::T => Rgb::hex(0xa000f0),
        PieceKind::S => Rgb::hex(0x00f000),
        PieceKind::Z => Rgb::hex(0xf00000),
        PieceKind::J => Rgb::hex(0x0000f0),
        PieceKind::L => Rgb::hex(0xf0a000),
    }
}

/// Board well, side panel, and modal overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell compensates for the usual glyph aspect ratio.
        Self::new(2)
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn cell_w(&self) -> u16 {
        self.cell_w
    }

    /// Outer size of the bordered well.
    pub fn frame_size(&self) -> (u16, u16) {
        (
            BOARD_WIDTH as u16 * self.cell_w + 2,
            BOARD_HEIGHT as u16 + 2,
        )
    }

    /// Top-left corner of the bordered well inside `viewport`.
    pub fn frame_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size();
        let x = viewport.width.saturating_sub(frame_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        (x, y)
    }

    /// Render one game frame into an existing framebuffer.
    ///
    /// Callers keep one framebuffer across frames; this never allocates once
    /// the buffer has the viewport's size.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let (frame_w, frame_h) = self.frame_size();
        let (ox, oy) = self.frame_origin(viewport);

        fb.draw_box(ox, oy, frame_w, frame_h, Style::new(TEXT, SCREEN_BG));

        let empty = Style::new(Rgb::new(90, 90, 100), WELL_BG).dim();
        let grid = snap.display_grid();
        for (y, row) in grid.iter().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                let px = ox + 1 + x as u16 * self.cell_w;
                let py = oy + 1 + y as u16;
                match PieceKind::from_color_id(id) {
                    Some(kind) => self.draw_block(fb, px, py, kind),
                    None => fb.fill_rect(px, py, self.cell_w, 1, '·', empty),
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, ox + frame_w + 2, oy);

        if snap.game_over {
            let lines = [
                Line::Title("GAME OVER"),
                Line::Labeled("Final Score: ", snap.score),
                Line::Labeled("Level: ", snap.level),
                Line::Hint("R to play again"),
            ];
            self.draw_modal(fb, ox, oy, &lines);
        } else if snap.paused {
            let lines = [Line::Title("PAUSED"), Line::Hint("ESC to resume")];
            self.draw_modal(fb, ox, oy, &lines);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Title card shown before the first game starts.
    pub fn render_start_into(&self, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let text = [
            "Use arrow keys to move and rotate pieces.",
            "Space to drop, Escape to pause.",
        ];
        let inner_w = text.iter().map(|s| s.len() as u16).max().unwrap_or(0) + 4;
        let box_w = inner_w + 2;
        let box_h = 9;
        let x = viewport.width.saturating_sub(box_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(box_h) / 2,
            AnchorY::Top => 0,
        };

        let panel = Style::new(TEXT, SCREEN_BG);
        fb.draw_box(x, y, box_w, box_h, panel);
        fb.put_str_centered(x, box_w, y + 2, "TETRIS", panel.bold());
        for (i, line) in text.iter().enumerate() {
            fb.put_str_centered(x, box_w, y + 4 + i as u16, line, panel);
        }
        let button = Style::new(Rgb::new(255, 255, 255), Rgb::hex(0x2050c0)).bold();
        fb.put_str_centered(x, box_w, y + 7, " ENTER: START GAME ", button);
    }

    pub fn render_start(&self, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_start_into(viewport, &mut fb);
        fb
    }

    fn draw_block(&self, fb: &mut FrameBuffer, px: u16, py: u16, kind: PieceKind) {
        let style = Style::new(piece_color(kind), WELL_BG).bold();
        fb.fill_rect(px, py, self.cell_w, 1, '█', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        panel_x: u16,
        top: u16,
    ) {
        if panel_x.saturating_add(10) > viewport.width {
            return;
        }

        let label = Style::new(TEXT, SCREEN_BG).bold();
        let value = Style::new(TEXT, SCREEN_BG);
        let mut y = top;

        for (name, v) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y += 3;
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        y += self.draw_preview(fb, panel_x, y, snap.next, &snap.next_preview());
        y += 1;

        let hint = Style::new(MUTED, SCREEN_BG);
        for line in ["←→  move", "↑   rotate", "↓   down", "SPC drop", "ESC pause", "R   restart", "Q   quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y += 1;
        }
    }

    /// Draw the preview matrix; returns the rows used.
    fn draw_preview(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        kind: PieceKind,
        shape: &ShapeMatrix,
    ) -> u16 {
        let style = Style::new(piece_color(kind), SCREEN_BG).bold();
        for (row, cells) in shape.rows().enumerate() {
            for (col, &filled) in cells.iter().enumerate() {
                if filled {
                    let px = x + col as u16 * self.cell_w;
                    fb.fill_rect(px, y + row as u16, self.cell_w, 1, '█', style);
                }
            }
        }
        shape.size() as u16
    }

    fn draw_modal(&self, fb: &mut FrameBuffer, ox: u16, oy: u16, lines: &[Line]) {
        let (frame_w, frame_h) = self.frame_size();
        let box_w = frame_w.saturating_sub(2).max(16);
        let box_h = lines.len() as u16 + 4;
        let x = (ox + frame_w / 2).saturating_sub(box_w / 2);
        let y = oy + frame_h.saturating_sub(box_h) / 2;

        let panel = Style::new(TEXT, SCREEN_BG);
        fb.fill_rect(x, y, box_w, box_h, ' ', panel);
        fb.draw_box(x, y, box_w, box_h, panel);

        for (i, line) in lines.iter().enumerate() {
            let ly = y + 2 + i as u16;
            match *line {
                Line::Title(s) => fb.put_str_centered(x, box_w, ly, s, panel.bold()),
                Line::Hint(s) => fb.put_str_centered(x, box_w, ly, s, Style::new(MUTED, SCREEN_BG)),
                Line::Labeled(s, v) => {
                    let digits = decimal_width(v);
                    let w = s.chars().count() as u16 + digits;
                    let lx = x + box_w.saturating_sub(w) / 2;
                    fb.put_str(lx, ly, s, panel);
                    fb.put_u32(lx + s.chars().count() as u16, ly, v, panel);
                }
            }
        }
    }
}

enum Line {
    Title(&'static str),
    Labeled(&'static str, u32),
    Hint(&'static str),
}

fn decimal_width(mut v: u32) -> u16 {
    let mut n = 1;
    while v >= 10 {
        v /= 10;
        n += 1;
    }
    n
}
