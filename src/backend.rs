use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use winit::window::Window;

use crate::palette::{ColorIndex, Palette};
use crate::scaler::{ScaleLut, blit_indexed_stretch, build_scale_lut};
use crate::surface::{IndexedFrame, PixelSurface};

/// Window-backed surface: draws into a fixed-size indexed frame and stretches
/// it over the whole window on `blit`.
pub struct WindowSurface {
    window: Rc<Window>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    frame: IndexedFrame,
    palette: Palette,
    scale_lut: ScaleLut,
}

impl WindowSurface {
    pub fn new(window: Rc<Window>, frame_w: usize, frame_h: usize, palette: Palette) -> Result<Self> {
        let context =
            softbuffer::Context::new(window.clone()).map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        let scale_lut = build_scale_lut(size.width as usize, size.height as usize, frame_w, frame_h);

        Ok(Self {
            window,
            surface,
            frame: IndexedFrame::new(frame_w, frame_h),
            palette,
            scale_lut,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Rebuild the stretch table after the window changes size.
    pub fn resized(&mut self, dw: usize, dh: usize) {
        self.scale_lut = build_scale_lut(dw, dh, self.frame.width(), self.frame.height());
    }
}

impl PixelSurface for WindowSurface {
    #[inline]
    fn width(&self) -> usize {
        self.frame.width()
    }

    #[inline]
    fn height(&self) -> usize {
        self.frame.height()
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: ColorIndex) {
        self.frame.set_pixel(x, y, color);
    }

    fn fill_rows(&mut self, y0: usize, y1: usize, color: ColorIndex) {
        self.frame.fill_rows(y0, y1, color);
    }

    fn blit(&mut self) -> Result<()> {
        let size = self.window.inner_size();
        let (dw, dh) = (size.width as usize, size.height as usize);
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Ok(()); // Minimized window, skip drawing
        };
        if self.scale_lut.dst_size() != (dw, dh) {
            self.resized(dw, dh);
        }

        self.surface
            .resize(w, h)
            .map_err(|e| anyhow!("softbuffer resize: {e}"))?;
        let mut buf = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow!("softbuffer buffer: {e}"))?;
        blit_indexed_stretch(
            &mut buf,
            dw,
            self.frame.pixels(),
            self.frame.width(),
            &self.palette,
            &self.scale_lut,
        );
        buf.present().map_err(|e| anyhow!("softbuffer present: {e}"))?;
        Ok(())
    }
}
