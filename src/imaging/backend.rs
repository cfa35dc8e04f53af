//! Preview backend trait and shared types.
//!
//! The [`PreviewBackend`] trait covers the two operations that touch pixels
//! on disk: decoding a raw capture and encoding a preview. Everything in
//! between (percentiles, stretch, row order) is pure and lives in
//! [`calculations`](super::calculations).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::fits_parser::FitsError;
use super::params::EncodeParams;
use image::GrayImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Decode(String),
    #[error("JPEG encode failed: {0}")]
    Encode(String),
}

impl From<FitsError> for BackendError {
    fn from(err: FitsError) -> Self {
        match err {
            FitsError::Io(e) => BackendError::Io(e),
            other => BackendError::Decode(other.to_string()),
        }
    }
}

/// Decoded intensity plane of one capture.
///
/// Row-major, `width` samples per row, row 0 at the bottom (FITS order).
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

/// Trait for preview backends.
pub trait PreviewBackend {
    /// Decode the primary image plane of a raw capture.
    fn decode(&self, path: &Path) -> Result<IntensityImage, BackendError>;

    /// Write an 8-bit preview, downscaling to `params.max_size` when set.
    fn encode(&self, preview: &GrayImage, params: &EncodeParams) -> Result<(), BackendError>;
}
