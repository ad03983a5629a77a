//! PNG output.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::image::error::ProcessError;

/// Encode an RGBA image as PNG bytes.
///
/// `path` only names the destination in error messages.
pub fn encode_png(img: &RgbaImage, path: &Path) -> Result<Vec<u8>, ProcessError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| ProcessError::Encode(path.to_path_buf(), err))?;
    Ok(buf.into_inner())
}

/// Write encoded bytes to `path`, creating parent directories and replacing
/// any existing file.
pub fn write_png(bytes: &[u8], path: &Path) -> Result<(), ProcessError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| ProcessError::Write(parent.to_path_buf(), err))?;
    }
    fs::write(path, bytes).map_err(|err| ProcessError::Write(path.to_path_buf(), err))
}

/// Encode and write in one step. Returns the number of bytes written.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<usize, ProcessError> {
    let bytes = encode_png(img, path)?;
    write_png(&bytes, path)?;
    Ok(bytes.len())
}
