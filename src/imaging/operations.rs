//! High-level preview operation.
//!
//! Combines the backend (decode, encode) with the pure stretch calculations
//! to turn one raw capture into one preview file.

use super::backend::{BackendError, PreviewBackend};
use super::calculations::{normalization, render_gray};
use super::params::{EncodeParams, Normalization, Quality};
use crate::naming;
use image::GrayImage;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Encoding settings shared by every preview in a batch.
#[derive(Debug, Clone, Default)]
pub struct PreviewSettings {
    pub quality: Quality,
    pub max_size: Option<u32>,
}

/// A preview that was written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPreview {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Stretch window, `None` when the capture has no finite pixel.
    pub normalization: Option<Normalization>,
    /// True when the capture had no usable range and rendered flat gray.
    pub flat: bool,
}

/// Render the preview for `source` into `preview_dir/<base>.jpg`.
///
/// Decodes the capture, stretches it with its own 5th/99.5th percentile
/// window, flips it to display order and encodes it, overwriting any existing
/// preview of the same name.
pub fn render_preview(
    backend: &impl PreviewBackend,
    source: &Path,
    preview_dir: &Path,
    settings: &PreviewSettings,
) -> Result<RenderedPreview> {
    let output_name = naming::preview_file_name(source).ok_or_else(|| {
        BackendError::Decode(format!("unusable file name: {}", source.display()))
    })?;
    let output = preview_dir.join(output_name);

    let image = backend.decode(source)?;
    let norm = normalization(&image.data);
    let gray = render_gray(&image.data, image.width as usize, norm);

    let preview = GrayImage::from_raw(image.width, image.height, gray.pixels).ok_or_else(|| {
        BackendError::Decode(format!(
            "pixel count {} does not match {}x{}",
            image.data.len(),
            image.width,
            image.height
        ))
    })?;

    backend.encode(
        &preview,
        &EncodeParams {
            output: output.clone(),
            quality: settings.quality,
            max_size: settings.max_size,
        },
    )?;

    Ok(RenderedPreview {
        output,
        width: image.width,
        height: image.height,
        normalization: norm,
        flat: gray.flat,
    })
}
