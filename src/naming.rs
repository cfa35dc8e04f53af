//! Centralized filename rules shared by both commands.
//!
//! Raw captures and previews are joined on their **base name**: the file name
//! with its final extension removed. The comparison is exact and
//! case-sensitive:
//!
//! - `M31_0001.fits` → `M31_0001`
//! - `M31_0001.jpg`  → `M31_0001`
//! - `m31.light.fit` → `m31.light` (only the final extension goes)
//!
//! A file is a raw capture when its final extension starts with `fit`, which
//! covers `.fit`, `.fits` and the other 3- and 4-letter variants capture
//! software writes. Previews are always `<base>.jpg`.

use std::path::Path;

/// Name of the subdirectory that holds previews, relative to the source directory.
pub const PREVIEW_DIR: &str = "previews";

/// Extension written for every preview.
pub const PREVIEW_EXTENSION: &str = "jpg";

/// Prefix shared by every raw-capture extension.
const RAW_EXTENSION_PREFIX: &str = "fit";

/// Base name of a path: the file name with the final extension removed.
///
/// Returns `None` for paths without a file name or with a non-UTF-8 name.
/// A dotfile such as `.fits` has no extension and keeps its whole name.
pub fn base_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n.starts_with('.'))
}

/// Whether a file name looks like a raw capture (`*.fit*`).
pub fn is_raw_name(path: &Path) -> bool {
    !is_hidden(path) && extension(path).is_some_and(|e| e.starts_with(RAW_EXTENSION_PREFIX))
}

/// Whether a file name looks like a preview (`*.jpg`).
pub fn is_preview_name(path: &Path) -> bool {
    !is_hidden(path) && extension(path) == Some(PREVIEW_EXTENSION)
}

/// Preview file name for a raw capture: `<base>.jpg`.
pub fn preview_file_name(raw: &Path) -> Option<String> {
    base_name(raw).map(|base| format!("{base}.{PREVIEW_EXTENSION}"))
}

/// Display name of a path (file name only), falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
