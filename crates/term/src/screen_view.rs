//! ScreenView: maps the engine's monochrome pixel buffer into terminal cells.
//!
//! Two pixel rows share one cell through half-block glyphs, so the 128x64 screen
//! needs 128x32 cells plus a one-cell border. Text primitives are overlaid as plain
//! characters at the cell containing their anchor pixel.
//!
//! This module is pure (no I/O).

use crate::core::{Canvas, Color, PixelBuffer};
use crate::fb::{Cell, CellStyle, FrameBuffer, BACKLIGHT, BEZEL, INK};

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

#[derive(Debug, Clone, Default)]
pub struct ScreenView {
    status: Option<String>,
}

impl ScreenView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A line of text shown under the screen.
    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
    }

    /// Cells needed for `pixels` including the border.
    pub fn frame_size(pixels: &PixelBuffer) -> (u16, u16) {
        (pixels.width() + 2, pixels.height().div_ceil(2) + 2)
    }

    /// Render `pixels` centered in `viewport`.
    pub fn render_into(&self, pixels: &PixelBuffer, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let (frame_w, frame_h) = Self::frame_size(pixels);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h + 1) / 2;

        draw_border(fb, start_x, start_y, frame_w, frame_h);

        let screen_x = start_x + 1;
        let screen_y = start_y + 1;
        let rows = pixels.height().div_ceil(2);
        for row in 0..rows {
            for x in 0..pixels.width() {
                let top = pixels.is_ink(x as i32, row as i32 * 2);
                let bottom = pixels.is_ink(x as i32, row as i32 * 2 + 1);
                fb.set(screen_x + x, screen_y + row, half_block(top, bottom));
            }
        }

        for text in pixels.texts() {
            let inside = (0..pixels.width() as i32).contains(&text.x)
                && (0..pixels.height() as i32).contains(&text.y);
            if !inside {
                continue;
            }
            let style = match text.color {
                Color::Black => CellStyle::new(INK, BACKLIGHT).bold(),
                Color::White => CellStyle::new(BACKLIGHT, INK).bold(),
            };
            let x = screen_x + text.x as u16;
            let max = (screen_x + pixels.width()).saturating_sub(x) as usize;
            let clipped: String = text.text.chars().take(max).collect();
            fb.put_str(x, screen_y + (text.y / 2) as u16, &clipped, style);
        }

        if let Some(status) = self.status.as_deref() {
            fb.put_str(start_x, start_y + frame_h, status, CellStyle::default());
        }
    }
}

fn half_block(top: bool, bottom: bool) -> Cell {
    let lit = CellStyle::new(INK, BACKLIGHT);
    match (top, bottom) {
        (false, false) => Cell::new(' ', lit),
        (true, false) => Cell::new('▀', lit),
        (false, true) => Cell::new('▄', lit),
        (true, true) => Cell::new('█', lit),
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let style = CellStyle::new(BACKLIGHT, BEZEL);
    let right = x + w - 1;
    let bottom = y + h - 1;
    for cx in x + 1..right {
        fb.set(cx, y, Cell::new('─', style));
        fb.set(cx, bottom, Cell::new('─', style));
    }
    for cy in y + 1..bottom {
        fb.set(x, cy, Cell::new('│', style));
        fb.set(right, cy, Cell::new('│', style));
    }
    fb.set(x, y, Cell::new('┌', style));
    fb.set(right, y, Cell::new('┐', style));
    fb.set(x, bottom, Cell::new('└', style));
    fb.set(right, bottom, Cell::new('┘', style));
}
