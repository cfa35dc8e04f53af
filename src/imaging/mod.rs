//! Preview rendering in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | custom FITS reader (primary HDU, first plane) |
//! | **Stretch** | 5th/99.5th percentile window + asinh curve |
//! | **Downscale** | `image::imageops::resize` (Lanczos3), optional |
//! | **Encode** | `image` JPEG encoder, 8-bit grayscale |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for percentiles, stretch and dimensions (unit testable)
//! - **Parameters**: Data structures describing an encode
//! - **Backend**: [`PreviewBackend`] trait + [`RustBackend`]
//! - **Operations**: [`render_preview`], combining calculations + backend

pub mod backend;
pub mod calculations;
pub(crate) mod fits_parser;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, IntensityImage, PreviewBackend};
pub use operations::{PreviewSettings, RenderedPreview, render_preview};
pub use params::{EncodeParams, Normalization, Quality};
pub use rust_backend::RustBackend;
