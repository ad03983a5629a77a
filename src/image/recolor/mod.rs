//! Mute dark ink in a flattened RGBA image.
//!
//! A pixel is recolored when it is both dark (channel mean below 128) and
//! visible (alpha above zero). Its color channels become `#9CA3AF`; alpha is
//! left alone. The replacement color is itself bright, so the transform is
//! idempotent.
//!
//! Brightness is a plain channel average, not perceptual luminance.

mod mask;

use image::RgbaImage;

pub use mask::{RecolorMask, apply_recolor_mask, brightness, build_recolor_mask, is_recolorable};

/// Outcome of a recolor pass, for progress logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecolorStats {
    /// Pixels whose color channels were overwritten.
    pub recolored: usize,
    /// Pixels visited.
    pub total: usize,
}

/// Recolor every dark, non-transparent pixel in place.
pub fn recolor_dark_pixels(img: &mut RgbaImage) -> RecolorStats {
    let total = img.width() as usize * img.height() as usize;
    if total == 0 {
        return RecolorStats {
            recolored: 0,
            total,
        };
    }

    let mask = build_recolor_mask(img);
    let recolored = apply_recolor_mask(img, &mask);
    debug_assert_eq!(recolored, mask.count());
    RecolorStats { recolored, total }
}
