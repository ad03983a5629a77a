use std::path::Path;

use image::{DynamicImage, RgbaImage};

use super::LayerInfo;
use crate::image::error::ProcessError;

/// Decode a flat raster image (PNG, JPEG, WebP).
pub(super) fn decode(path: &Path, bytes: &[u8]) -> Result<DynamicImage, ProcessError> {
    image::load_from_memory(bytes).map_err(|err| ProcessError::decode(path, err.to_string()))
}

/// A flat image is a document with a single, always-visible layer.
pub(super) fn layers(path: &Path) -> Vec<LayerInfo> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "background".to_string());
    vec![LayerInfo {
        name,
        visible: true,
        opacity: u8::MAX,
    }]
}

pub(super) fn composite(img: &DynamicImage) -> RgbaImage {
    img.to_rgba8()
}
