//! Layered document loading and flattening.
//!
//! PSD files are parsed by the `psd` crate. Anything else is handed to the
//! `image` crate and treated as a document with one layer.

mod photoshop;
mod raster;

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};

use crate::image::error::ProcessError;

/// Magic bytes at the start of every PSD/PSB file.
const PSD_SIGNATURE: &[u8; 4] = b"8BPS";

/// Summary of one layer, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: String,
    pub visible: bool,
    pub opacity: u8,
}

enum Source {
    Psd(Box<psd::Psd>),
    Raster(DynamicImage),
}

/// A decoded input document, ready to be flattened.
pub struct Document {
    path: PathBuf,
    width: u32,
    height: u32,
    layers: Vec<LayerInfo>,
    source: Source,
}

impl Document {
    /// Open and decode the document at `path`.
    ///
    /// A missing file is reported as [`ProcessError::NotFound`] before any
    /// read is attempted.
    pub fn open(path: &Path) -> Result<Self, ProcessError> {
        if !path.exists() {
            return Err(ProcessError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|err| ProcessError::Read(path.to_path_buf(), err))?;
        Self::from_bytes(path, &bytes)
    }

    /// Decode an in-memory document. `path` is only used for naming and errors.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self, ProcessError> {
        if is_psd(bytes) {
            let doc = photoshop::decode(path, bytes)?;
            Ok(Self {
                path: path.to_path_buf(),
                width: doc.width(),
                height: doc.height(),
                layers: photoshop::layers(&doc),
                source: Source::Psd(Box::new(doc)),
            })
        } else {
            let img = raster::decode(path, bytes)?;
            Ok(Self {
                path: path.to_path_buf(),
                width: img.width(),
                height: img.height(),
                layers: raster::layers(path),
                source: Source::Raster(img),
            })
        }
    }

    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    /// Short format name for logs.
    pub const fn kind(&self) -> &'static str {
        match self.source {
            Source::Psd(_) => "psd",
            Source::Raster(_) => "raster",
        }
    }

    /// Flatten visible layers into a single RGBA8 image.
    pub fn composite(&self) -> Result<RgbaImage, ProcessError> {
        match &self.source {
            Source::Psd(doc) => photoshop::composite(&self.path, doc),
            Source::Raster(img) => Ok(raster::composite(img)),
        }
    }
}

/// Check for the PSD signature.
#[inline]
pub fn is_psd(bytes: &[u8]) -> bool {
    bytes.starts_with(PSD_SIGNATURE)
}
