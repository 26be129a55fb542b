//! Drawing surface used by the renderer.
//!
//! The core never touches a display directly. Everything goes through [`Canvas`],
//! which the host implements over whatever it actually draws on. [`PixelBuffer`] is
//! the in-memory monochrome implementation used by the terminal host and by tests.

use std::rc::Rc;

use free_roam_types::{EngineError, Vector, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Monochrome ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn inverted(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// A 1-bit image, row-major, one `bool` per pixel (`true` = ink).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    name: String,
    width: u16,
    height: u16,
    bits: Vec<bool>,
}

impl Bitmap {
    pub fn new(name: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Build from text rows where `#` marks ink. Short rows are padded.
    pub fn from_rows(name: impl Into<String>, rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u16;
        let mut bitmap = Bitmap::new(name, width, rows.len() as u16);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    bitmap.set(x as u16, y as u16, true);
                }
            }
        }
        bitmap
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u16, y: u16, ink: bool) {
        if x < self.width && y < self.height {
            self.bits[y as usize * self.width as usize + x as usize] = ink;
        }
    }
}

/// Shared reference to a flat sprite image.
pub type SpriteRef = Rc<Bitmap>;

/// Primitives the host provides over its small monochrome screen.
///
/// Coordinates are in pixels and may be negative or past the edge; implementations
/// clip silently.
pub trait Canvas {
    fn width(&self) -> u16;
    fn height(&self) -> u16;

    /// Fill the whole surface with the background colour.
    fn clear(&mut self);

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color);

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for dy in 0..h.max(0) {
            for dx in 0..w.max(0) {
                self.draw_pixel(x + dx, y + dy, color);
            }
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        for dx in 0..w {
            self.draw_pixel(x + dx, y, color);
            self.draw_pixel(x + dx, y + h - 1, color);
        }
        for dy in 0..h {
            self.draw_pixel(x, y + dy, color);
            self.draw_pixel(x + w - 1, y + dy, color);
        }
    }

    /// Bresenham line, both endpoints inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.draw_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw the ink pixels of `bitmap` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color) {
        for by in 0..bitmap.height() {
            for bx in 0..bitmap.width() {
                if bitmap.get(bx, by) {
                    self.draw_pixel(x + bx as i32, y + by as i32, color);
                }
            }
        }
    }

    /// Push the finished frame to the physical display.
    fn present(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// A text primitive recorded by [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub color: Color,
}

/// In-memory monochrome framebuffer.
///
/// Pixels are stored as ink flags against a white background. Text is not
/// rasterized; it is kept as a list of items so the host can overlay it in whatever
/// font it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    ink: Vec<bool>,
    texts: Vec<TextItem>,
}

impl PixelBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ink: vec![false; width as usize * height as usize],
            texts: Vec::new(),
        }
    }

    /// A buffer matching the target device screen.
    pub fn screen() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Colour at `(x, y)`; outside the buffer reads as background.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        match self.idx(x, y) {
            Some(i) if self.ink[i] => Color::Black,
            _ => Color::White,
        }
    }

    pub fn is_ink(&self, x: i32, y: i32) -> bool {
        self.pixel(x, y) == Color::Black
    }

    pub fn ink_count(&self) -> usize {
        self.ink.iter().filter(|&&b| b).count()
    }

    /// Number of ink pixels in column `x`.
    pub fn column_ink(&self, x: i32) -> usize {
        (0..self.height as i32).filter(|&y| self.is_ink(x, y)).count()
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }
}

impl Canvas for PixelBuffer {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn clear(&mut self) {
        self.ink.fill(false);
        self.texts.clear();
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.idx(x, y) {
            self.ink[i] = color == Color::Black;
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        self.texts.push(TextItem {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }
}

/// Convenience for drawing at a world-space vector rounded down to pixels.
pub fn pixel_of(v: Vector) -> (i32, i32) {
    (v.x.floor() as i32, v.y.floor() as i32)
}
