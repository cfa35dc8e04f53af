//! Pure functions for the preview stretch and preview dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! ## Stretch
//!
//! Astronomical captures have far more dynamic range than a display. Each
//! preview is stretched in two steps:
//!
//! 1. **Linear window**: `x = clamp((v - vmin) / (vmax - vmin), 0, 1)` where
//!    `vmin`/`vmax` are the 5th and 99.5th percentiles of the image.
//! 2. **Asinh**: `y = asinh(x / a) / asinh(1 / a)` with `a = 0.1`. Faint
//!    signal near the sky background is lifted, bright cores are compressed.
//!
//! `y` is then quantized to 8 bits.

use super::params::Normalization;

/// Lower percentile of the linear window.
pub const LOWER_PERCENTILE: f64 = 5.0;

/// Upper percentile of the linear window.
pub const UPPER_PERCENTILE: f64 = 99.5;

/// Softening parameter `a` of the asinh curve.
pub const ASINH_SOFTENING: f32 = 0.1;

/// Display level used when the image has no usable range.
pub const FLAT_LEVEL: f32 = 0.5;

/// Percentile of already-sorted values, interpolating linearly between closest ranks.
///
/// `p` is in percent (0-100). Returns `None` for an empty slice.
///
/// ```text
/// sorted = [1, 2, 3, 4], p = 50  → rank 1.5 → 2.5
/// ```
pub fn percentile(sorted: &[f32], p: f64) -> Option<f32> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let (a, b) = (sorted[lo] as f64, sorted[hi] as f64);
    Some((a + (b - a) * (rank - lo as f64)) as f32)
}

/// Compute the stretch window from the finite pixels of an image.
///
/// NaN and infinite pixels (blank or saturated float data) are ignored.
/// Returns `None` when no pixel is finite.
pub fn normalization(data: &[f32]) -> Option<Normalization> {
    let mut finite: Vec<f32> = data.iter().copied().filter(|v| v.is_finite()).collect();
    finite.sort_unstable_by(f32::total_cmp);
    Some(Normalization {
        vmin: percentile(&finite, LOWER_PERCENTILE)?,
        vmax: percentile(&finite, UPPER_PERCENTILE)?,
    })
}

/// Asinh curve on `[0, 1]`, normalized so `0 → 0` and `1 → 1`.
pub fn asinh_stretch(x: f32) -> f32 {
    (x / ASINH_SOFTENING).asinh() / (1.0 / ASINH_SOFTENING).asinh()
}

/// Display level in `[0, 1]` for one pixel.
///
/// Non-finite pixels render black.
pub fn stretch_value(value: f32, norm: &Normalization) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let x = ((value - norm.vmin) / (norm.vmax - norm.vmin)).clamp(0.0, 1.0);
    asinh_stretch(x)
}

fn to_byte(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// 8-bit preview pixels for an image whose row 0 is the bottom row.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayPixels {
    /// Row-major, top row first (ready for encoding).
    pub pixels: Vec<u8>,
    /// True when the image had no usable range and rendered at [`FLAT_LEVEL`].
    pub flat: bool,
}

/// Stretch an intensity plane into display-ordered 8-bit pixels.
///
/// FITS stores the bottom row first; the output rows are reversed so the
/// encoded preview shows the bottom row at the bottom. A missing or
/// degenerate window renders every pixel at [`FLAT_LEVEL`].
pub fn render_gray(data: &[f32], width: usize, norm: Option<Normalization>) -> GrayPixels {
    let usable = norm.filter(|n| !n.is_degenerate());
    let mut pixels = Vec::with_capacity(data.len());

    match usable {
        Some(n) => {
            for row in data.chunks(width.max(1)).rev() {
                pixels.extend(row.iter().map(|&v| to_byte(stretch_value(v, &n))));
            }
        }
        None => pixels.resize(data.len(), to_byte(FLAT_LEVEL)),
    }

    GrayPixels {
        pixels,
        flat: usable.is_none(),
    }
}

/// Dimensions that fit within `max_size` on the longer edge, keeping the aspect ratio.
///
/// Images already small enough keep their size; nothing is upscaled.
///
/// ```text
/// (6000, 4000) within 2048 → (2048, 1365)
/// (800, 600)   within 2048 → (800, 600)
/// ```
pub fn fit_within(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_size || max_size == 0 {
        return (width, height);
    }
    let scale = max_size as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}
