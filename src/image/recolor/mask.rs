use image::RgbaImage;
use rayon::prelude::*;

/// Pixels whose channel mean falls below this value count as dark.
pub(super) const DARK_THRESHOLD: f32 = 128.0;

/// Muted gray (`#9CA3AF`) written over dark ink.
pub(super) const REPLACEMENT_RGB: [u8; 3] = [156, 163, 175];

const PARALLEL_PIXEL_THRESHOLD: usize = 32 * 1024;

/// Per-pixel recolor mask, row-major, one entry per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecolorMask {
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) hits: Vec<bool>,
}

impl RecolorMask {
    /// Number of pixels selected for recoloring.
    pub fn count(&self) -> usize {
        self.hits.iter().filter(|&&hit| hit).count()
    }

    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Unweighted mean of the three color channels.
///
/// Summed in `f32` so that `u8` addition can never wrap.
#[inline]
pub fn brightness(pixel: &[u8]) -> f32 {
    (f32::from(pixel[0]) + f32::from(pixel[1]) + f32::from(pixel[2])) / 3.0
}

/// A pixel is recolorable when it is dark and not fully transparent.
///
/// Transparency wins: `(10, 10, 10, 0)` is never touched.
#[inline]
pub fn is_recolorable(pixel: &[u8]) -> bool {
    pixel[3] > 0 && brightness(pixel) < DARK_THRESHOLD
}

/// Build the recolor mask for a whole image.
pub fn build_recolor_mask(img: &RgbaImage) -> RecolorMask {
    let (width, height) = img.dimensions();
    let len = width as usize * height as usize;
    let raw = img.as_raw();

    let mut hits = vec![false; len];
    if len >= PARALLEL_PIXEL_THRESHOLD {
        hits.par_iter_mut()
            .zip(raw.par_chunks_exact(4))
            .for_each(|(hit, pixel)| *hit = is_recolorable(pixel));
    } else {
        for (hit, pixel) in hits.iter_mut().zip(raw.chunks_exact(4)) {
            *hit = is_recolorable(pixel);
        }
    }

    RecolorMask {
        width,
        height,
        hits,
    }
}

/// Overwrite the color channels of every masked pixel.
///
/// Alpha is never written. Returns the number of pixels changed.
pub fn apply_recolor_mask(output: &mut RgbaImage, mask: &RecolorMask) -> usize {
    assert_eq!(
        output.dimensions(),
        mask.dimensions(),
        "recolor mask size mismatch: image={:?} mask={:?}",
        output.dimensions(),
        mask.dimensions()
    );

    let mut written = 0;
    for (pixel, _) in output
        .chunks_exact_mut(4)
        .zip(mask.hits.iter())
        .filter(|(_, hit)| **hit)
    {
        pixel[..3].copy_from_slice(&REPLACEMENT_RGB);
        written += 1;
    }
    written
}
