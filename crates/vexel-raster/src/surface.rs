//! Pixel Buffer
//!
//! The RGBA8 backing store every draw call writes into.

use crate::Color;

/// Row-major RGBA8 pixel store, transparent black at creation
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zeroed buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Wrap existing RGBA bytes; `None` when the length does not match
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw pixel bytes
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read one pixel; out-of-bounds reads are transparent black
    pub fn pixel(&self, x: i64, y: i64) -> Color {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Color::TRANSPARENT;
        }
        let idx = self.index(x as u32, y as u32);
        Color::rgba(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    /// Write one pixel; out-of-bounds writes are dropped
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx] = color.r;
        self.pixels[idx + 1] = color.g;
        self.pixels[idx + 2] = color.b;
        self.pixels[idx + 3] = color.a;
    }

    /// Copy a rectangle out as RGBA bytes.
    ///
    /// Pixels outside the buffer read as transparent black, so the result
    /// always has `w * h * 4` bytes.
    pub fn read_rect(&self, x: i64, y: i64, w: u32, h: u32) -> Vec<u8> {
        let mut out = vec![0u8; w as usize * h as usize * 4];

        for row in 0..h as i64 {
            let src_y = y + row;
            if src_y < 0 || src_y >= self.height as i64 {
                continue;
            }

            // Overlap of the requested row with the buffer row
            let col_start = (-x).max(0);
            let col_end = (self.width as i64 - x).min(w as i64);
            if col_start >= col_end {
                continue;
            }

            let src_idx = self.index((x + col_start) as u32, src_y as u32);
            let dst_idx = (row as usize * w as usize + col_start as usize) * 4;
            let len = (col_end - col_start) as usize * 4;
            out[dst_idx..dst_idx + len].copy_from_slice(&self.pixels[src_idx..src_idx + len]);
        }

        out
    }

    /// Copy the `(sx, sy, sw, sh)` sub-rectangle of `src` (given as RGBA
    /// bytes with row stride `src_w`) to `(dx, dy)`, clipping silently at
    /// the buffer bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn write_rect(
        &mut self,
        dx: i64,
        dy: i64,
        src: &[u8],
        src_w: u32,
        sx: i64,
        sy: i64,
        sw: u32,
        sh: u32,
    ) {
        let src_h = if src_w == 0 { 0 } else { src.len() as i64 / (src_w as i64 * 4) };

        for row in 0..sh as i64 {
            let from_y = sy + row;
            let to_y = dy + row;
            if from_y < 0 || from_y >= src_h || to_y < 0 || to_y >= self.height as i64 {
                continue;
            }

            for col in 0..sw as i64 {
                let from_x = sx + col;
                let to_x = dx + col;
                if from_x < 0 || from_x >= src_w as i64 || to_x < 0 || to_x >= self.width as i64 {
                    continue;
                }

                let src_idx = (from_y as usize * src_w as usize + from_x as usize) * 4;
                let dst_idx = self.index(to_x as u32, to_y as u32);
                self.pixels[dst_idx..dst_idx + 4].copy_from_slice(&src[src_idx..src_idx + 4]);
            }
        }
    }
}
