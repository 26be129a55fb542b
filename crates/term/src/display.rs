//! TerminalDisplay: a [`Canvas`] whose frames end up on the terminal.

use std::io;

use anyhow::Result;
use crossterm::terminal;

use crate::core::{Bitmap, Canvas, Color, PixelBuffer};
use crate::fb::FrameBuffer;
use crate::renderer::TerminalRenderer;
use crate::screen_view::{ScreenView, Viewport};
use crate::types::EngineError;

/// Draws into an in-memory pixel buffer; [`Canvas::present`] converts it to cells
/// and flushes the changes.
pub struct TerminalDisplay {
    pixels: PixelBuffer,
    view: ScreenView,
    fb: FrameBuffer,
    renderer: TerminalRenderer,
    viewport: Viewport,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            pixels: PixelBuffer::screen(),
            view: ScreenView::new(),
            fb: FrameBuffer::new(0, 0),
            renderer: TerminalRenderer::new(),
            viewport: Viewport::new(0, 0),
        }
    }

    /// Take over the terminal.
    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()?;
        let (w, h) = terminal::size()?;
        self.resize(w, h);
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    /// Adopt a new terminal size; the next frame is redrawn whole.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width, height);
        self.renderer.invalidate();
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.view.set_status(status);
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for TerminalDisplay {
    fn width(&self) -> u16 {
        self.pixels.width()
    }

    fn height(&self) -> u16 {
        self.pixels.height()
    }

    fn clear(&mut self) {
        self.pixels.clear();
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.pixels.draw_pixel(x, y, color);
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        self.pixels.draw_text(x, y, text, color);
    }

    fn draw_image(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color) {
        self.pixels.draw_image(x, y, bitmap, color);
    }

    fn present(&mut self) -> Result<(), EngineError> {
        self.view.render_into(&self.pixels, self.viewport, &mut self.fb);
        self.renderer
            .draw_swap(&mut self.fb)
            .map_err(|err| EngineError::Io(io::Error::other(err)))
    }
}
