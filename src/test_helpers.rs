//! Shared test utilities for the fits-triage test suite.
//!
//! Builds synthetic FITS files in memory or inside a temp directory so tests
//! never depend on real captures.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_gradient_fits(tmp.path(), "M31_0001.fits", 16, 8);
//! write_corrupt_fits(tmp.path(), "M31_0002.fits");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

// =========================================================================
// In-memory FITS construction
// =========================================================================

/// Format one 80-column header card: keyword in columns 1-8, value right-aligned to column 30.
fn card(keyword: &str, value: &str) -> String {
    format!("{:<8}= {:>20}", keyword, value)
}

fn pad_to_block(bytes: &mut Vec<u8>, fill: u8) {
    let rem = bytes.len() % 2880;
    if rem != 0 {
        bytes.resize(bytes.len() + 2880 - rem, fill);
    }
}

/// Build a complete single-HDU FITS file.
///
/// `axes` are `NAXIS1, NAXIS2, ...`; `extra` cards are written after them in
/// order, so they can also override earlier keywords. `data` is the raw
/// big-endian data unit and is padded to a full block.
pub fn fits_bytes(bitpix: i64, axes: &[usize], extra: &[(&str, &str)], data: &[u8]) -> Vec<u8> {
    let mut cards = vec![
        card("SIMPLE", "T"),
        card("BITPIX", &bitpix.to_string()),
        card("NAXIS", &axes.len().to_string()),
    ];
    for (i, len) in axes.iter().enumerate() {
        cards.push(card(&format!("NAXIS{}", i + 1), &len.to_string()));
    }
    for (keyword, value) in extra {
        cards.push(card(keyword, value));
    }
    cards.push("END".to_string());

    let mut bytes = Vec::new();
    for c in cards {
        let mut raw = c.into_bytes();
        raw.resize(80, b' ');
        bytes.extend_from_slice(&raw);
    }
    pad_to_block(&mut bytes, b' ');

    let mut data = data.to_vec();
    pad_to_block(&mut data, 0);
    bytes.extend_from_slice(&data);
    bytes
}

/// Build a 2-D `BITPIX = -32` FITS file from row-major pixels.
pub fn fits_f32_bytes(width: usize, height: usize, pixels: &[f32]) -> Vec<u8> {
    assert_eq!(pixels.len(), width * height, "pixel count mismatch");
    let raw: Vec<u8> = pixels.iter().flat_map(|v| v.to_be_bytes()).collect();
    fits_bytes(-32, &[width, height], &[], &raw)
}

// =========================================================================
// Files on disk
// =========================================================================

/// Horizontal ramp with a bright "star" in the top-right corner.
pub fn gradient_pixels(width: usize, height: usize) -> Vec<f32> {
    let mut pixels: Vec<f32> = (0..width * height)
        .map(|i| 100.0 + (i % width) as f32 * 10.0)
        .collect();
    if let Some(last) = pixels.last_mut() {
        *last = 60_000.0;
    }
    pixels
}

/// Write a valid float FITS file with [`gradient_pixels`] and return its path.
pub fn write_gradient_fits(dir: &Path, name: &str, width: usize, height: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, fits_f32_bytes(width, height, &gradient_pixels(width, height))).unwrap();
    path
}

/// Write a valid FITS file in which every pixel has the same value.
pub fn write_constant_fits(dir: &Path, name: &str, width: usize, height: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, fits_f32_bytes(width, height, &vec![42.0; width * height])).unwrap();
    path
}

/// Write a file with a FITS extension that is not a FITS file.
pub fn write_corrupt_fits(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"this capture was interrupted").unwrap();
    path
}

/// Create an empty placeholder file (for name-only tests).
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    path
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
