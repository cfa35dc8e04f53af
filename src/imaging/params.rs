//! Parameter types for preview rendering.
//!
//! These structs describe *what* to produce, not *how*. The
//! [`operations`](super::operations) module fills them in and hands them to a
//! [`PreviewBackend`](super::backend::PreviewBackend), so tests can swap in a
//! mock backend without touching the stretch logic.

use std::path::PathBuf;

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Linear input range of the stretch, taken from the image's own percentiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Value mapped to black before the stretch (5th percentile).
    pub vmin: f32,
    /// Value mapped to white before the stretch (99.5th percentile).
    pub vmax: f32,
}

impl Normalization {
    /// True when the range is empty and no linear mapping exists (e.g. a constant image).
    pub fn is_degenerate(&self) -> bool {
        !(self.vmax > self.vmin)
    }
}

/// Everything the backend needs to write one preview.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub quality: Quality,
    /// Longest edge of the written preview; `None` keeps the capture's size.
    pub max_size: Option<u32>,
}
