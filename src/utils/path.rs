//! Path utilities.
//!
//! Pure functions for path manipulation. `normalize_path` touches the
//! filesystem only to canonicalize.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve a relative path against `root`.
///
/// # Example
/// ```ignore
/// expand_path(Path::new("art/logo.psd"), Path::new("/work")) // -> /work/art/logo.psd
/// expand_path(Path::new("~/logo.psd"), Path::new("/work"))   // -> $HOME/logo.psd
/// ```
pub fn expand_path(path: &Path, root: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    let full_path = if expanded.is_relative() {
        root.join(&expanded)
    } else {
        expanded
    };
    normalize_path(&full_path)
}

/// Default PNG destination next to the input document.
///
/// `art/logo.psd` becomes `art/logo.png`. A PNG input gets a `.muted.png`
/// suffix instead so it is never overwritten in place.
pub fn default_output_path(input: &Path) -> PathBuf {
    let is_png = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        input.with_extension("muted.png")
    } else {
        input.with_extension("png")
    }
}
