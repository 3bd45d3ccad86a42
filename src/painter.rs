//! Plaid Grid Painter
//!
//! Paints the working canvas block by block in row-major order. With
//! anti-aliasing on, each block's right column is blended with its right
//! neighbour and then its bottom row with the block below, so the
//! bottom-right corner pixel carries the vertical blend.

use crate::color::Rgb;
use crate::palette::Palette;

/// Square RGB8 canvas, stored row-major (`y`, then `x`, then channel).
pub struct PixelBuffer {
    dim: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(dim: u32) -> Self {
        let len = dim as usize * dim as usize * 3;
        Self { dim, data: vec![0; len] }
    }

    pub fn dim(&self) -> u32 {
        self.dim
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.dim as usize + x as usize) * 3
    }

    pub fn get(&self, x: u32, y: u32) -> Rgb {
        let i = self.offset(x, y);
        Rgb([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&color.0);
    }

    /// Fill `[x, x+w) x [y, y+h)`, clipped to the canvas.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        let x_end = x.saturating_add(w).min(self.dim);
        let y_end = y.saturating_add(h).min(self.dim);
        if x >= x_end || y >= y_end {
            return;
        }
        for row in y..y_end {
            let start = self.offset(x, row);
            let end = self.offset(x_end, row);
            for px in self.data[start..end].chunks_exact_mut(3) {
                px.copy_from_slice(&color.0);
            }
        }
    }

    /// Hand the bytes over to the compositor.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

pub fn paint(dim: u32, block: u32, palette: &Palette, antialias: bool) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(dim);
    let block = block.max(1);
    let blocks = dim.div_ceil(block);

    for row in 0..blocks {
        for col in 0..blocks {
            let x = col * block;
            let y = row * block;
            let color = palette.block_color(row, col);
            buffer.fill_rect(x, y, block, block, color);

            if !antialias {
                continue;
            }

            let edge_x = x + block - 1;
            if edge_x < dim {
                let blend = Rgb::average(color, palette.block_color(row, col + 1));
                buffer.fill_rect(edge_x, y, 1, block, blend);
            }

            let edge_y = y + block - 1;
            if edge_y < dim {
                let blend = Rgb::average(color, palette.block_color(row + 1, col));
                buffer.fill_rect(x, edge_y, block, 1, blend);
            }
        }
    }

    buffer
}
