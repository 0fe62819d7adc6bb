//! CPU pixel canvas the spectrum overlays draw into.

use crate::viz::color::Rgba;

/// Fixed-size RGBA8 pixel buffer with canvas-style clipped drawing:
/// rects that run off any edge are silently cut, never an error.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipping to the canvas bounds.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);

        for row in y0..y1.max(y0) {
            let start = row as usize * self.width as usize;
            for col in x0..x1.max(x0) {
                self.pixels[start + col as usize] = color;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Rows top to bottom, each `width` pixels wide.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgba]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Shift the whole image `dx` columns to the left, filling the vacated
    /// right edge with `fill`. Used by scrolling spectrograms.
    pub fn shift_left(&mut self, dx: u32, fill: Rgba) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        let dx = (dx as usize).min(w);
        for row in self.pixels.chunks_mut(w) {
            row.copy_within(dx.., 0);
            for p in &mut row[w - dx..] {
                *p = fill;
            }
        }
    }

    /// Raw RGBA8 bytes, row-major from the top row.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
