//! Pure Rust preview backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode FITS | custom [`fits_parser`](super::fits_parser) (primary HDU, first plane) |
//! | Downscale | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! Previews are encoded into a hidden `.<name>.partial` file next to the
//! target and renamed into place, so an interrupted run never leaves a
//! half-written `.jpg` behind.

use super::backend::{BackendError, IntensityImage, PreviewBackend};
use super::calculations::fit_within;
use super::fits_parser;
use super::params::EncodeParams;
use image::GrayImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Pure Rust backend: custom FITS reader plus the `image` crate's JPEG encoder.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Hidden sibling used while a preview is being written.
fn partial_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!(".{name}.partial"))
}

fn write_jpeg(img: &GrayImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality as u8);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(e.to_string()))?;
    writer.flush()?;
    Ok(())
}

impl PreviewBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<IntensityImage, BackendError> {
        let plane = fits_parser::read_primary_plane_from_path(path)?;
        let width = u32::try_from(plane.width)
            .map_err(|_| BackendError::Decode(format!("image too wide: {}", plane.width)))?;
        let height = u32::try_from(plane.height)
            .map_err(|_| BackendError::Decode(format!("image too tall: {}", plane.height)))?;
        Ok(IntensityImage {
            width,
            height,
            data: plane.data,
        })
    }

    fn encode(&self, preview: &GrayImage, params: &EncodeParams) -> Result<(), BackendError> {
        let img = match params.max_size {
            Some(max) => {
                let (w, h) = fit_within(preview.width(), preview.height(), max);
                if (w, h) == preview.dimensions() {
                    Cow::Borrowed(preview)
                } else {
                    Cow::Owned(image::imageops::resize(preview, w, h, FilterType::Lanczos3))
                }
            }
            None => Cow::Borrowed(preview),
        };

        let partial = partial_path(&params.output);
        let written = write_jpeg(&img, &partial, params.quality.value())
            .and_then(|()| fs::rename(&partial, &params.output).map_err(BackendError::Io));
        if written.is_err() {
            let _ = fs::remove_file(&partial);
        }
        written
    }
}
