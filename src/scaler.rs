use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::palette::{ColorIndex, Palette};

/// Precomputed mapping from dest pixels to the nearest src pixel
pub struct ScaleLut {
    sx: Vec<usize>,
    sy: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            sx: Vec::new(),
            sy: Vec::new(),
        }
    }

    #[inline]
    pub fn dst_size(&self) -> (usize, usize) {
        (self.sx.len(), self.sy.len())
    }
}

/// Sample at dest pixel centres so edges split evenly on non-integer ratios.
pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let axis = |dst: usize, src: usize| -> Vec<usize> {
        if src == 0 {
            return vec![0; dst];
        }
        let ratio = src as f32 / dst as f32;
        (0..dst)
            .map(|d| (((d as f32 + 0.5) * ratio) as usize).min(src - 1))
            .collect()
    };

    ScaleLut {
        sx: axis(dst_w, src_w),
        sy: axis(dst_h, src_h),
    }
}

/// Parallel nearest-neighbour stretch with palette lookup
/// Rows are processed in parallel for cache friendly writes
pub fn blit_indexed_stretch(
    dst: &mut [u32],
    dw: usize,
    src: &[ColorIndex],
    sw: usize,
    palette: &Palette,
    lut: &ScaleLut,
) {
    if dw == 0 {
        return;
    }
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(&sy) = lut.sy.get(y) else {
            return;
        };
        let row = &src[sy * sw..(sy + 1) * sw];
        for (out, &sx) in dst_row.iter_mut().zip(&lut.sx) {
            *out = palette.rgb(row[sx]);
        }
    });
}
