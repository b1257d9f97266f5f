//! Pixel output abstraction. The raycaster only ever writes palette indices
//! through [`PixelSurface`]; presenting them is the backend's business.

use crate::palette::ColorIndex;

pub trait PixelSurface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Writes outside the surface are dropped.
    fn set_pixel(&mut self, x: usize, y: usize, color: ColorIndex);

    /// Present the finished frame.
    fn blit(&mut self) -> anyhow::Result<()>;

    /// Fill rows `y0..y1` completely.
    fn fill_rows(&mut self, y0: usize, y1: usize, color: ColorIndex) {
        let w = self.width();
        for y in y0..y1.min(self.height()) {
            for x in 0..w {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Inclusive vertical span in column `x`, clipped to the surface.
    fn vline(&mut self, x: usize, y0: usize, y1: usize, color: ColorIndex) {
        if x >= self.width() || self.height() == 0 {
            return;
        }
        let y1 = y1.min(self.height() - 1);
        for y in y0..=y1 {
            self.set_pixel(x, y, color);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: ColorIndex) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set_pixel(xx, yy, color);
            }
        }
    }
}

/// In-memory frame of palette indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    width: usize,
    height: usize,
    pixels: Vec<ColorIndex>,
}

impl IndexedFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[ColorIndex] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<ColorIndex> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Top-to-bottom pixels of column `x`; empty when `x` is off the frame.
    pub fn column(&self, x: usize) -> impl Iterator<Item = ColorIndex> + '_ {
        let rows = if x < self.width { self.height } else { 0 };
        (0..rows).map(move |y| self.pixels[y * self.width + x])
    }
}

impl PixelSurface for IndexedFrame {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: ColorIndex) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    fn blit(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn fill_rows(&mut self, y0: usize, y1: usize, color: ColorIndex) {
        let end = y1.min(self.height) * self.width;
        let start = (y0 * self.width).min(end);
        self.pixels[start..end].fill(color);
    }
}
