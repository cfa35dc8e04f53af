//! Directory enumeration for raw captures and previews.
//!
//! Both commands look at exactly one directory level: raw captures live
//! directly in the source directory and previews directly in its
//! [`PREVIEW_DIR`] child. Nothing is recursive.
//!
//! ```text
//! night-2024-09-14/
//! ├── M31_0001.fits        # raw capture
//! ├── M31_0002.fit         # raw capture (same family)
//! ├── notes.txt            # ignored
//! └── previews/
//!     ├── M31_0001.jpg     # preview for M31_0001.fits
//!     └── ...
//! ```
//!
//! Listings are sorted so reports and deletion order are stable across runs.

use crate::naming::{self, PREVIEW_DIR};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Path of the preview directory for a source directory.
pub fn preview_dir(source: &Path) -> PathBuf {
    source.join(PREVIEW_DIR)
}

/// Regular files directly inside `dir` whose name passes `keep`, sorted.
fn collect_files(dir: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)?.map(|e| e.map(|e| e.path()));
    select_files(entries, keep)
}

/// Keep matching regular files from directory entries; the first entry error aborts.
fn select_files(
    entries: impl Iterator<Item = io::Result<PathBuf>>,
    keep: impl Fn(&Path) -> bool,
) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in entries {
        let path = path?;
        if keep(&path) && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Raw captures (`*.fit*`) directly inside `source`, sorted by path.
pub fn raw_files(source: &Path) -> io::Result<Vec<PathBuf>> {
    collect_files(source, naming::is_raw_name)
}

/// Preview files (`*.jpg`) directly inside `preview_dir`, sorted by path.
pub fn preview_files(preview_dir: &Path) -> io::Result<Vec<PathBuf>> {
    collect_files(preview_dir, naming::is_preview_name)
}

/// Base names of every preview in `preview_dir`.
pub fn preview_base_names(preview_dir: &Path) -> io::Result<BTreeSet<String>> {
    Ok(preview_files(preview_dir)?
        .iter()
        .filter_map(|p| naming::base_name(p).map(str::to_owned))
        .collect())
}
